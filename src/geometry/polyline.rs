use crate::math::{normalize_or_zero, Point3};

use super::line::Line;

/// An ordered sequence of control points connected by straight segments.
///
/// A polyline whose first and last points coincide within tolerance is
/// closed. The point list always stores the closing point explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point3>,
}

impl Polyline {
    /// Creates a polyline from its control points.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Total length over all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum()
    }

    /// Whether the first and last points coincide within `tol`.
    #[must_use]
    pub fn is_closed(&self, tol: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => {
                (last - first).norm_squared() <= tol * tol
            }
            _ => false,
        }
    }

    /// The polyline's segments as bounded lines, skipping zero-length ones.
    #[must_use]
    pub fn sub_lines(&self) -> Vec<Line> {
        self.points
            .windows(2)
            .filter(|w| (w[1] - w[0]).norm_squared() > 1e-20)
            .map(|w| Line::new(w[0], w[1]))
            .collect()
    }

    /// Point at normalized arc-length parameter `t` (0 = start, 1 = end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Option<Point3> {
        let first = *self.points.first()?;
        if self.points.len() == 1 {
            return Some(first);
        }
        let total = self.length();
        if total <= 0.0 {
            return Some(first);
        }
        let mut remaining = t.clamp(0.0, 1.0) * total;
        for w in self.points.windows(2) {
            let seg = w[1] - w[0];
            let len = seg.norm();
            if remaining <= len {
                if len <= 0.0 {
                    return Some(w[0]);
                }
                return Some(w[0] + seg * (remaining / len));
            }
            remaining -= len;
        }
        self.points.last().copied()
    }

    /// Closest point over all segments.
    #[must_use]
    pub fn closest_point(&self, point: &Point3) -> Option<Point3> {
        if self.points.len() == 1 {
            return self.points.first().copied();
        }
        self.sub_lines()
            .iter()
            .map(|l| l.closest_point(point))
            .min_by(|a, b| {
                let da = (a - point).norm_squared();
                let db = (b - point).norm_squared();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// The same polyline traversed in the opposite direction.
    #[must_use]
    pub fn flip(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Control points where the tangent direction changes by more than
    /// `angle_tol`, always including both endpoints (which preserves
    /// closure for closed polylines).
    #[must_use]
    pub fn discontinuity_points(&self, angle_tol: f64) -> Vec<Point3> {
        let n = self.points.len();
        if n < 3 {
            return self.points.clone();
        }
        let mut result = Vec::with_capacity(n);
        result.push(self.points[0]);
        for i in 1..n - 1 {
            let d0 = normalize_or_zero(&(self.points[i] - self.points[i - 1]));
            let d1 = normalize_or_zero(&(self.points[i + 1] - self.points[i]));
            if d0.dot(&d1) < (angle_tol).cos() {
                result.push(self.points[i]);
            }
        }
        result.push(self.points[n - 1]);
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn l_shape() -> Polyline {
        Polyline::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 3.0)])
    }

    #[test]
    fn length_sums_segments() {
        assert!((l_shape().length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn closure_detection() {
        let open = l_shape();
        assert!(!open.is_closed(1e-6));
        let closed = Polyline::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)]);
        assert!(closed.is_closed(1e-6));
    }

    #[test]
    fn point_at_walks_arclength() {
        let pl = l_shape();
        let m = pl.point_at(4.0 / 7.0).unwrap();
        assert!((m - p(4.0, 0.0)).norm() < 1e-9);
        let q = pl.point_at(1.0).unwrap();
        assert!((q - p(4.0, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn closest_point_over_segments() {
        let pl = l_shape();
        let c = pl.closest_point(&p(2.0, 1.0)).unwrap();
        assert!((c - p(2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn discontinuities_skip_straight_vertices() {
        let pl = Polyline::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(4.0, 0.0), p(4.0, 3.0)]);
        let d = pl.discontinuity_points(0.01);
        assert_eq!(d.len(), 3);
        assert!((d[1] - p(4.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn flip_is_involution() {
        let pl = l_shape();
        assert_eq!(pl.flip().flip(), pl);
    }
}
