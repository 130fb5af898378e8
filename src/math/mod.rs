pub mod frame;
pub mod intersect;
pub mod plane;

use std::f64::consts::TAU;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Distance and angle epsilons used by every equality test in the kernel.
///
/// Passed explicitly (usually by `Default`) rather than read from global
/// state. Distance comparisons in hot loops use [`Tolerance::sq_dist`]
/// against squared distances to avoid square roots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Maximum distance between two coincident points.
    pub distance: f64,
    /// Maximum angle (radians) between two parallel directions.
    pub angle: f64,
}

impl Tolerance {
    /// Default distance epsilon.
    pub const DISTANCE: f64 = 1e-6;
    /// Default angle epsilon (0.1 degree).
    pub const ANGLE: f64 = 0.001_745_329_251_994_33;

    /// Creates a tolerance policy with explicit epsilons.
    #[must_use]
    pub fn new(distance: f64, angle: f64) -> Self {
        Self { distance, angle }
    }

    /// Precomputed squared distance epsilon.
    #[must_use]
    pub fn sq_dist(&self) -> f64 {
        self.distance * self.distance
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            distance: Self::DISTANCE,
            angle: Self::ANGLE,
        }
    }
}

/// Normalizes a vector, returning the zero vector for zero-length input.
#[must_use]
pub fn normalize_or_zero(v: &Vector3) -> Vector3 {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Wraps an angle into `[0, 2*pi)`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Returns an arbitrary unit vector perpendicular to `v`.
///
/// `v` must be non-zero; the least-aligned coordinate axis is used as seed.
#[must_use]
pub fn any_perpendicular(v: &Vector3) -> Vector3 {
    let seed = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    normalize_or_zero(&v.cross(&seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_normalizes_to_zero() {
        let z = normalize_or_zero(&Vector3::zeros());
        assert_eq!(z, Vector3::zeros());
    }

    #[test]
    fn wrap_angle_into_range() {
        assert!((wrap_angle(-std::f64::consts::PI) - std::f64::consts::PI).abs() < 1e-12);
        assert!(wrap_angle(TAU).abs() < 1e-12);
        assert!((wrap_angle(3.0 * TAU + 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        for v in [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::x(),
            Vector3::new(0.0, 0.0, -4.0),
        ] {
            let p = any_perpendicular(&v);
            assert!((p.norm() - 1.0).abs() < 1e-12);
            assert!(p.dot(&v).abs() < 1e-12);
        }
    }

    #[test]
    fn sq_dist_is_square_of_distance() {
        let tol = Tolerance::default();
        assert!((tol.sq_dist() - tol.distance * tol.distance).abs() < f64::EPSILON);
    }
}
