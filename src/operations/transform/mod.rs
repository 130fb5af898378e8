//! Rigid and affine curve transforms.
//!
//! Every transform returns fresh geometry and preserves the curve variant
//! where that is mathematically exact; a non-conformal matrix applied to an
//! arc or circle is reported as `NotImplemented` rather than silently
//! approximated.

mod general;
mod mirror;
mod project;
mod rotate;
mod translate;

pub use general::transform;
pub use mirror::mirror;
pub use project::project;
pub use rotate::rotate;
pub use translate::translate;
