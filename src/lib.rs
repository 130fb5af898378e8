pub mod error;
pub mod geometry;
pub mod log;
pub mod math;
pub mod operations;

pub use error::{CurvekitError, Result};
