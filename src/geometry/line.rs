use crate::math::{normalize_or_zero, Point3, Vector3};

/// A line segment between two points.
///
/// When `infinite` is set the line behaves as an unbounded line in
/// intersection tests; every other operation treats it as the segment
/// `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
    pub infinite: bool,
}

impl Line {
    /// Creates a bounded line segment.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self {
            start,
            end,
            infinite: false,
        }
    }

    /// Creates a line with infinite extent through the two points.
    #[must_use]
    pub fn unbounded(start: Point3, end: Point3) -> Self {
        Self {
            start,
            end,
            infinite: true,
        }
    }

    /// The (non-unit) vector from start to end.
    #[must_use]
    pub fn vector(&self) -> Vector3 {
        self.end - self.start
    }

    /// Unit direction; zero vector for a degenerate segment.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        normalize_or_zero(&self.vector())
    }

    /// Segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Point at normalized parameter `t` (0 = start, 1 = end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.start + self.vector() * t
    }

    /// Closest point on the line to `point`. Bounded segments clamp to the
    /// endpoints; infinite lines project freely.
    #[must_use]
    pub fn closest_point(&self, point: &Point3) -> Point3 {
        let v = self.vector();
        let len_sq = v.norm_squared();
        if len_sq < 1e-20 {
            return self.start;
        }
        let mut t = (point - self.start).dot(&v) / len_sq;
        if !self.infinite {
            t = t.clamp(0.0, 1.0);
        }
        self.start + v * t
    }

    /// The same segment traversed in the opposite direction.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            infinite: self.infinite,
        }
    }
}
