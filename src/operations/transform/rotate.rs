use crate::error::{OperationError, Result};
use crate::geometry::Curve;
use crate::math::{normalize_or_zero, Matrix4, Point3, Vector3};

use super::general::transform;

/// Rotates a curve around an axis through `origin` by `angle` radians.
///
/// # Errors
///
/// `InvalidInput` for a zero-length axis.
pub fn rotate(curve: &Curve, origin: &Point3, axis: &Vector3, angle: f64) -> Result<Curve> {
    let axis = normalize_or_zero(axis);
    if axis == Vector3::zeros() {
        return Err(OperationError::InvalidInput("rotation axis must be non-zero".into()).into());
    }

    // Translate to the axis origin, rotate, translate back.
    let t_neg = Matrix4::new_translation(&(-origin.coords));
    let rot = rotation_matrix(&axis, angle);
    let t_pos = Matrix4::new_translation(&origin.coords);
    transform(curve, &(t_pos * rot * t_neg))
}

/// Builds a 4x4 rotation matrix around a unit axis by an angle (Rodrigues).
#[allow(clippy::many_single_char_names)]
fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Arc, Line};
    use crate::math::frame::Frame;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotate_line_90_around_z() {
        let l = Curve::Line(Line::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ));
        let out = rotate(&l, &Point3::origin(), &Vector3::z(), FRAC_PI_2).unwrap();
        assert!((out.start_point().unwrap() - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-9);
        assert!((out.end_point().unwrap() - Point3::new(0.0, 2.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn rotate_arc_about_off_origin_axis() {
        let frame = Frame::new(Point3::new(2.0, 0.0, 0.0), &Vector3::z(), &Vector3::x()).unwrap();
        let a = Curve::Arc(Arc::new(frame, 1.0, 0.0, FRAC_PI_2).unwrap());
        let out = rotate(&a, &Point3::new(2.0, 0.0, 0.0), &Vector3::z(), FRAC_PI_2).unwrap();
        let Curve::Arc(out) = out else {
            panic!("expected arc");
        };
        // Start (3, 0) rotates to (2, 1) around the arc's own center.
        assert!((out.start_point() - Point3::new(2.0, 1.0, 0.0)).norm() < 1e-9);
        assert!((out.radius() - 1.0).abs() < 1e-12);
        assert!((out.sweep() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn zero_axis_is_rejected() {
        let l = Curve::Line(Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0)));
        assert!(rotate(&l, &Point3::origin(), &Vector3::zeros(), 1.0).is_err());
    }
}
