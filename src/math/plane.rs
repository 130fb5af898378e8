use crate::error::{GeometryError, Result};
use crate::math::{normalize_or_zero, Point3, Vector3};

/// An infinite plane defined by an origin point and a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn new(origin: Point3, normal: &Vector3) -> Result<Self> {
        let normal = normalize_or_zero(normal);
        if normal == Vector3::zeros() {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { origin, normal })
    }

    /// Signed distance from a point to the plane.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Orthogonal projection of a point onto the plane.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Mirror image of a point across the plane.
    #[must_use]
    pub fn mirror(&self, point: &Point3) -> Point3 {
        point - self.normal * (2.0 * self.signed_distance(point))
    }
}

/// Fits a plane through a point set using Newell's normal summation.
///
/// The origin is the centroid. Works for any polygon-like point cloud with
/// at least three non-collinear points.
///
/// # Errors
///
/// Returns an error if fewer than three points are given or all points are
/// collinear.
pub fn fit_plane(points: &[Point3]) -> Result<Plane> {
    if points.len() < 3 {
        return Err(GeometryError::Degenerate(
            "at least 3 points required to fit a plane".into(),
        )
        .into());
    }

    let n = points.len();
    let mut normal = Vector3::zeros();
    let mut centroid = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
        centroid += a.coords;
    }
    centroid /= n as f64;

    let normal = normalize_or_zero(&normal);
    if normal == Vector3::zeros() {
        // Newell degenerates for open/collinear-ish sets; fall back to the
        // first non-degenerate cross product.
        let a = points[0];
        for i in 1..n - 1 {
            let cross = (points[i] - a).cross(&(points[i + 1] - a));
            let cross = normalize_or_zero(&cross);
            if cross != Vector3::zeros() {
                return Plane::new(Point3::from(centroid), &cross);
            }
        }
        return Err(GeometryError::Degenerate("points are collinear".into()).into());
    }

    Plane::new(Point3::from(centroid), &normal)
}

/// Returns whether every point lies within `tol` of a common plane.
///
/// Collinear point sets are considered planar.
#[must_use]
pub fn is_coplanar(points: &[Point3], tol: f64) -> bool {
    if points.len() < 4 {
        return true;
    }
    match fit_plane(points) {
        Ok(plane) => points
            .iter()
            .all(|p| plane.signed_distance(p).abs() <= tol),
        Err(_) => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn fit_plane_of_square() {
        let plane = fit_plane(&[
            p(0.0, 0.0, 1.0),
            p(2.0, 0.0, 1.0),
            p(2.0, 2.0, 1.0),
            p(0.0, 2.0, 1.0),
        ])
        .unwrap();
        assert!(plane.normal.cross(&Vector3::z()).norm() < 1e-12);
        assert!(plane.signed_distance(&p(5.0, -3.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn project_and_mirror() {
        let plane = Plane::new(Point3::origin(), &Vector3::z()).unwrap();
        let q = p(1.0, 2.0, 3.0);
        assert!((plane.project(&q) - p(1.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((plane.mirror(&q) - p(1.0, 2.0, -3.0)).norm() < 1e-12);
    }

    #[test]
    fn coplanarity_detects_outlier() {
        let mut pts = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ];
        assert!(is_coplanar(&pts, 1e-9));
        pts.push(p(0.5, 0.5, 0.2));
        assert!(!is_coplanar(&pts, 1e-9));
    }

    #[test]
    fn collinear_points_are_an_error() {
        let r = fit_plane(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]);
        assert!(r.is_err());
    }
}
