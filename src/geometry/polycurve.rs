use crate::math::Point3;

use super::Curve;

/// An ordered composite of heterogeneous curve segments representing one
/// continuous path.
///
/// Validity requires each segment's end to coincide with the next segment's
/// start within tolerance; this invariant is actively repaired by the
/// joiner rather than merely checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyCurve {
    pub curves: Vec<Curve>,
}

impl PolyCurve {
    /// Creates a poly-curve from its segments.
    #[must_use]
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }

    /// Start point of the first segment.
    #[must_use]
    pub fn start_point(&self) -> Option<Point3> {
        self.curves.first().and_then(|c| c.start_point().ok())
    }

    /// End point of the last segment.
    #[must_use]
    pub fn end_point(&self) -> Option<Point3> {
        self.curves.last().and_then(|c| c.end_point().ok())
    }

    /// Whether start and end coincide within `tol`.
    #[must_use]
    pub fn is_closed(&self, tol: f64) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(s), Some(e)) => (e - s).norm_squared() <= tol * tol,
            _ => false,
        }
    }

    /// Recursively flattened segments: nested poly-curves are expanded and
    /// polylines decomposed into their lines.
    #[must_use]
    pub fn sub_parts(&self) -> Vec<Curve> {
        let mut parts = Vec::with_capacity(self.curves.len());
        for curve in &self.curves {
            parts.extend(curve.sub_parts());
        }
        parts
    }

    /// The same path traversed in the opposite direction: segment order
    /// reversed and every segment flipped.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            curves: self.curves.iter().rev().map(Curve::flip).collect(),
        }
    }
}
