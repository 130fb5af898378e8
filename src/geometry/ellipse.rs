use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::frame::Frame;
use crate::math::{Point3, Vector3};

/// An ellipse defined by a local coordinate system and two semi-axis radii.
///
/// `radius_1` scales the frame's `x` axis, `radius_2` its `y` axis.
/// Supported by transforms and basic queries; offsetting and filleting
/// reject ellipses.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub frame: Frame,
    pub radius_1: f64,
    pub radius_2: f64,
}

impl Ellipse {
    /// Creates a new ellipse.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is not positive.
    pub fn new(frame: Frame, radius_1: f64, radius_2: f64) -> Result<Self> {
        if radius_1 <= 0.0 || radius_2 <= 0.0 {
            return Err(
                GeometryError::Degenerate("ellipse radii must be positive".into()).into(),
            );
        }
        Ok(Self {
            frame,
            radius_1,
            radius_2,
        })
    }

    /// Point at normalized parameter `t` (one full turn over `[0, 1]`).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        let angle = t * TAU;
        self.frame.origin
            + self.frame.x * (self.radius_1 * angle.cos())
            + self.frame.y * (self.radius_2 * angle.sin())
    }

    /// Unit tangent at normalized parameter `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector3 {
        let angle = t * TAU;
        let v = self.frame.x * (-self.radius_1 * angle.sin())
            + self.frame.y * (self.radius_2 * angle.cos());
        crate::math::normalize_or_zero(&v)
    }

    /// Perimeter, by Ramanujan's second approximation.
    #[must_use]
    pub fn length(&self) -> f64 {
        let (a, b) = (self.radius_1, self.radius_2);
        let h = ((a - b) / (a + b)).powi(2);
        PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
    }

    /// The same ellipse traversed in the opposite direction.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            frame: Frame {
                origin: self.frame.origin,
                x: self.frame.x,
                y: -self.frame.y,
                z: -self.frame.z,
            },
            radius_1: self.radius_1,
            radius_2: self.radius_2,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn xy_ellipse() -> Ellipse {
        let frame = Frame::new(Point3::origin(), &Vector3::z(), &Vector3::x()).unwrap();
        Ellipse::new(frame, 3.0, 2.0).unwrap()
    }

    #[test]
    fn point_at_axes() {
        let e = xy_ellipse();
        assert!((e.point_at(0.0) - Point3::new(3.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((e.point_at(0.25) - Point3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn circle_length_exact() {
        let frame = Frame::new(Point3::origin(), &Vector3::z(), &Vector3::x()).unwrap();
        let e = Ellipse::new(frame, 2.0, 2.0).unwrap();
        assert!((e.length() - TAU * 2.0).abs() < 1e-9);
    }

    #[test]
    fn flip_preserves_point_set() {
        let e = xy_ellipse();
        let f = e.flip();
        assert!((f.point_at(0.25) - e.point_at(0.75)).norm() < 1e-12);
    }
}
