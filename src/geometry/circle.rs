use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::frame::Frame;
use crate::math::{normalize_or_zero, Point3, Vector3};

/// A full circle defined by a center, a unit normal and a radius.
///
/// Traversal is counter-clockwise around the normal; the zero-parameter
/// reference direction is derived lazily from the normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point3,
    pub normal: Vector3,
    pub radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the normal is
    /// zero-length.
    pub fn new(center: Point3, normal: &Vector3, radius: f64) -> Result<Self> {
        if radius <= 0.0 {
            return Err(
                GeometryError::Degenerate("circle radius must be positive".into()).into(),
            );
        }
        let normal = normalize_or_zero(normal);
        if normal == Vector3::zeros() {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            center,
            normal,
            radius,
        })
    }

    /// Local coordinate system with an arbitrary in-plane reference
    /// direction.
    ///
    /// # Errors
    ///
    /// Propagates frame construction failure (cannot occur for a valid
    /// circle).
    pub fn frame(&self) -> Result<Frame> {
        Frame::from_normal(self.center, &self.normal)
    }

    /// Circumference.
    #[must_use]
    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    /// Point at normalized parameter `t` (one full turn over `[0, 1]`).
    ///
    /// # Errors
    ///
    /// Propagates frame construction failure (cannot occur for a valid
    /// circle).
    pub fn point_at(&self, t: f64) -> Result<Point3> {
        Ok(self.frame()?.point_at(self.radius, t * TAU))
    }

    /// Unit tangent at normalized parameter `t`.
    ///
    /// # Errors
    ///
    /// Propagates frame construction failure (cannot occur for a valid
    /// circle).
    pub fn tangent_at(&self, t: f64) -> Result<Vector3> {
        Ok(self.frame()?.tangent_at(t * TAU))
    }

    /// Closest point on the circle to `point`; for points on the axis the
    /// zero-parameter point is returned.
    ///
    /// # Errors
    ///
    /// Propagates frame construction failure (cannot occur for a valid
    /// circle).
    pub fn closest_point(&self, point: &Point3) -> Result<Point3> {
        let in_plane = point - self.normal * (point - self.center).dot(&self.normal);
        let radial = in_plane - self.center;
        let radial = normalize_or_zero(&radial);
        if radial == Vector3::zeros() {
            return self.point_at(0.0);
        }
        Ok(self.center + radial * self.radius)
    }

    /// The same circle traversed in the opposite direction.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            center: self.center,
            normal: -self.normal,
            radius: self.radius,
        }
    }

    /// The concentric circle with a different radius.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn with_radius(&self, radius: f64) -> Result<Self> {
        Self::new(self.center, &self.normal, radius)
    }
}
