use crate::error::{GeometryError, Result};
use crate::math::{any_perpendicular, normalize_or_zero, wrap_angle, Point3, Vector3};

/// Right-handed orthonormal local coordinate system.
///
/// Used as the local frame of arcs and ellipses: `z` is the plane normal,
/// `x` the zero-angle reference direction, `y = z.cross(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub origin: Point3,
    pub x: Vector3,
    pub y: Vector3,
    pub z: Vector3,
}

impl Frame {
    /// Creates a frame from an origin, a plane normal and an in-plane
    /// reference direction. Both directions are normalized; `x` is made
    /// exactly perpendicular to `z` by Gram-Schmidt.
    ///
    /// # Errors
    ///
    /// Returns an error if either vector is zero-length or the two are
    /// parallel.
    pub fn new(origin: Point3, normal: &Vector3, ref_dir: &Vector3) -> Result<Self> {
        let z = normalize_or_zero(normal);
        if z == Vector3::zeros() {
            return Err(GeometryError::ZeroVector.into());
        }
        let x = normalize_or_zero(&(ref_dir - z * ref_dir.dot(&z)));
        if x == Vector3::zeros() {
            return Err(GeometryError::Degenerate(
                "reference direction is parallel to normal".into(),
            )
            .into());
        }
        let y = z.cross(&x);
        Ok(Self { origin, x, y, z })
    }

    /// Creates a frame from an origin and a normal, with an arbitrary
    /// in-plane reference direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn from_normal(origin: Point3, normal: &Vector3) -> Result<Self> {
        let z = normalize_or_zero(normal);
        if z == Vector3::zeros() {
            return Err(GeometryError::ZeroVector.into());
        }
        let x = any_perpendicular(&z);
        let y = z.cross(&x);
        Ok(Self { origin, x, y, z })
    }

    /// Returns the point at in-plane polar coordinates (`radius`, `angle`).
    #[must_use]
    pub fn point_at(&self, radius: f64, angle: f64) -> Point3 {
        self.origin + self.x * (radius * angle.cos()) + self.y * (radius * angle.sin())
    }

    /// Counter-clockwise in-plane tangent direction at `angle`.
    #[must_use]
    pub fn tangent_at(&self, angle: f64) -> Vector3 {
        self.x * (-angle.sin()) + self.y * angle.cos()
    }

    /// In-plane coordinates of a point (the out-of-plane component is
    /// dropped).
    #[must_use]
    pub fn local_uv(&self, point: &Point3) -> (f64, f64) {
        let d = point - self.origin;
        (d.dot(&self.x), d.dot(&self.y))
    }

    /// Polar angle of a point around the origin, wrapped to `[0, 2*pi)`.
    #[must_use]
    pub fn angle_of(&self, point: &Point3) -> f64 {
        let (u, v) = self.local_uv(point);
        wrap_angle(v.atan2(u))
    }

    /// Signed distance of a point from the frame plane.
    #[must_use]
    pub fn height_of(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.z)
    }
}
