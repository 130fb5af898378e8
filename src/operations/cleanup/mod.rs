//! Curve cleanup and simplification.
//!
//! Vertex-level repairs applied before the heavier modification operations:
//! dropping vertices that barely turn, culling segments shorter than a
//! threshold, and snapping coordinates to a decimal grid without distorting
//! arc sweeps.

mod least_significant;
mod round_coordinates;
mod short_segments;

pub use least_significant::remove_least_significant_vertices;
pub use round_coordinates::{round_arc, round_line, round_point, round_polyline};
pub use short_segments::remove_short_segments;
