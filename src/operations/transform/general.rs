use crate::error::Result;
use crate::geometry::{not_implemented, Circle, Curve, Ellipse, Line, NurbsCurve, PolyCurve, Polyline};
use crate::math::frame::Frame;
use crate::math::{normalize_or_zero, Matrix4, Point3, Tolerance, Vector3};

/// Applies an arbitrary 4x4 transformation matrix to a curve.
///
/// Point-based variants (lines, polylines, NURBS) accept any affine matrix.
/// Arcs, circles and ellipses stay exact only under conformal maps (rigid
/// motion plus uniform scale); anything else would turn them into a
/// different curve class.
///
/// # Errors
///
/// `NotImplemented` when a non-conformal matrix is applied to an arc,
/// circle or ellipse.
pub fn transform(curve: &Curve, matrix: &Matrix4) -> Result<Curve> {
    match curve {
        Curve::Line(l) => Ok(Curve::Line(Line {
            start: transform_point(matrix, &l.start),
            end: transform_point(matrix, &l.end),
            infinite: l.infinite,
        })),
        Curve::Polyline(p) => Ok(Curve::Polyline(Polyline::new(
            p.points.iter().map(|p| transform_point(matrix, p)).collect(),
        ))),
        Curve::Nurbs(n) => Ok(Curve::Nurbs(NurbsCurve {
            control_points: n
                .control_points
                .iter()
                .map(|p| transform_point(matrix, p))
                .collect(),
            weights: n.weights.clone(),
            knots: n.knots.clone(),
        })),
        Curve::PolyCurve(pc) => {
            let mut curves = Vec::with_capacity(pc.curves.len());
            for c in &pc.curves {
                curves.push(transform(c, matrix)?);
            }
            Ok(Curve::PolyCurve(PolyCurve::new(curves)))
        }
        Curve::Arc(a) => {
            let Some(scale) = uniform_scale(matrix) else {
                return Err(not_implemented("transform", curve));
            };
            let frame = transform_frame(matrix, a.frame());
            Ok(Curve::Arc(a.with_radius(a.radius() * scale)?.with_frame(frame)))
        }
        Curve::Circle(c) => {
            let Some(scale) = uniform_scale(matrix) else {
                return Err(not_implemented("transform", curve));
            };
            // Derive the new normal from transformed in-plane axes so the
            // traversal direction survives reflections.
            let frame = transform_frame(matrix, &c.frame()?);
            Ok(Curve::Circle(Circle::new(
                frame.origin,
                &frame.z,
                c.radius * scale,
            )?))
        }
        Curve::Ellipse(e) => {
            let Some(scale) = uniform_scale(matrix) else {
                return Err(not_implemented("transform", curve));
            };
            Ok(Curve::Ellipse(Ellipse::new(
                transform_frame(matrix, &e.frame),
                e.radius_1 * scale,
                e.radius_2 * scale,
            )?))
        }
    }
}

/// Transforms a point through the homogeneous matrix.
#[must_use]
pub(super) fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    matrix.transform_point(point)
}

/// Transforms a direction through the linear part of the matrix.
#[must_use]
pub(super) fn transform_vector(matrix: &Matrix4, v: &Vector3) -> Vector3 {
    matrix.transform_vector(v)
}

/// Rebuilds a frame under the matrix; `z` is recomputed from the mapped
/// in-plane axes so the frame stays right-handed and traversal-faithful.
fn transform_frame(matrix: &Matrix4, frame: &Frame) -> Frame {
    let x = normalize_or_zero(&transform_vector(matrix, &frame.x));
    let y = normalize_or_zero(&transform_vector(matrix, &frame.y));
    Frame {
        origin: transform_point(matrix, &frame.origin),
        x,
        y,
        z: x.cross(&y),
    }
}

/// The uniform scale factor of a conformal matrix, `None` when the linear
/// part skews or scales anisotropically.
fn uniform_scale(matrix: &Matrix4) -> Option<f64> {
    let cols = [
        transform_vector(matrix, &Vector3::x()),
        transform_vector(matrix, &Vector3::y()),
        transform_vector(matrix, &Vector3::z()),
    ];
    let s = cols[0].norm();
    if s <= Tolerance::DISTANCE {
        return None;
    }
    for i in 0..3 {
        if (cols[i].norm() - s).abs() > Tolerance::DISTANCE * s {
            return None;
        }
        for j in i + 1..3 {
            if cols[i].dot(&cols[j]).abs() > Tolerance::DISTANCE * s * s {
                return None;
            }
        }
    }
    Some(s)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Arc;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn uniform_scale_of_scaled_rotation() {
        let m = Matrix4::new_scaling(2.0)
            * Matrix4::from_axis_angle(&nalgebra::Unit::new_normalize(Vector3::y()), 0.7);
        let s = uniform_scale(&m).unwrap();
        assert_relative_eq!(s, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn shear_is_not_conformal() {
        let mut m = Matrix4::identity();
        m[(0, 1)] = 0.5;
        assert!(uniform_scale(&m).is_none());
    }

    #[test]
    fn scaled_arc_scales_radius() {
        let frame = Frame::new(Point3::origin(), &Vector3::z(), &Vector3::x()).unwrap();
        let a = Curve::Arc(Arc::new(frame, 2.0, 0.0, FRAC_PI_2).unwrap());
        let out = transform(&a, &Matrix4::new_scaling(3.0)).unwrap();
        let Curve::Arc(out) = out else {
            panic!("expected arc");
        };
        assert_relative_eq!(out.radius(), 6.0, epsilon = 1e-12);
        assert!((out.start_point() - Point3::new(6.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn sheared_arc_is_rejected() {
        let frame = Frame::new(Point3::origin(), &Vector3::z(), &Vector3::x()).unwrap();
        let a = Curve::Arc(Arc::new(frame, 2.0, 0.0, FRAC_PI_2).unwrap());
        let mut m = Matrix4::identity();
        m[(0, 1)] = 0.5;
        assert!(transform(&a, &m).is_err());
        // The same shear is fine on a polyline.
        let pl = Curve::Polyline(Polyline::new(vec![
            Point3::origin(),
            Point3::new(0.0, 2.0, 0.0),
        ]));
        let out = transform(&pl, &m).unwrap();
        assert!((out.end_point().unwrap() - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-12);
    }
}
