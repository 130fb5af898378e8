pub mod cleanup;
pub mod extend;
pub mod fillet;
pub mod intersect;
pub mod join;
pub mod offset;
pub mod transform;
