use crate::geometry::{Circle, Curve, Ellipse, Line, NurbsCurve, PolyCurve, Polyline};
use crate::math::frame::Frame;
use crate::math::plane::Plane;
use crate::math::Vector3;

/// Mirrors a curve across a plane.
///
/// Arcs and ellipses keep their angular parameterization: the mirrored
/// frame's `z` is recomputed from the mirrored in-plane axes, so the point
/// at parameter `t` is exactly the mirror image of the original point at
/// `t`. A circle's normal flips to reflect the reversed traversal.
#[must_use]
pub fn mirror(curve: &Curve, plane: &Plane) -> Curve {
    match curve {
        Curve::Line(l) => Curve::Line(Line {
            start: plane.mirror(&l.start),
            end: plane.mirror(&l.end),
            infinite: l.infinite,
        }),
        Curve::Arc(a) => Curve::Arc(a.with_frame(mirror_frame(plane, a.frame()))),
        Curve::Circle(c) => Curve::Circle(Circle {
            center: plane.mirror(&c.center),
            normal: -mirror_vector(plane, &c.normal),
            radius: c.radius,
        }),
        Curve::Ellipse(e) => Curve::Ellipse(Ellipse {
            frame: mirror_frame(plane, &e.frame),
            radius_1: e.radius_1,
            radius_2: e.radius_2,
        }),
        Curve::Polyline(p) => Curve::Polyline(Polyline::new(
            p.points.iter().map(|p| plane.mirror(p)).collect(),
        )),
        Curve::PolyCurve(pc) => Curve::PolyCurve(PolyCurve::new(
            pc.curves.iter().map(|c| mirror(c, plane)).collect(),
        )),
        Curve::Nurbs(n) => Curve::Nurbs(NurbsCurve {
            control_points: n.control_points.iter().map(|p| plane.mirror(p)).collect(),
            weights: n.weights.clone(),
            knots: n.knots.clone(),
        }),
    }
}

fn mirror_vector(plane: &Plane, v: &Vector3) -> Vector3 {
    v - plane.normal * (2.0 * v.dot(&plane.normal))
}

fn mirror_frame(plane: &Plane, frame: &Frame) -> Frame {
    let x = mirror_vector(plane, &frame.x);
    let y = mirror_vector(plane, &frame.y);
    Frame {
        origin: plane.mirror(&frame.origin),
        x,
        y,
        z: x.cross(&y),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Arc;
    use crate::math::Point3;
    use std::f64::consts::FRAC_PI_2;

    fn yz_plane() -> Plane {
        Plane::new(Point3::origin(), &Vector3::x()).unwrap()
    }

    #[test]
    fn line_mirrors_point_wise() {
        let l = Curve::Line(Line::new(
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ));
        let out = mirror(&l, &yz_plane());
        assert!((out.start_point().unwrap() - Point3::new(-1.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((out.end_point().unwrap() - Point3::new(-3.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn arc_points_are_mirror_images_parameter_wise() {
        let frame = Frame::new(Point3::new(2.0, 1.0, 0.0), &Vector3::z(), &Vector3::x()).unwrap();
        let a = Arc::new(frame, 1.5, 0.3, 0.3 + FRAC_PI_2).unwrap();
        let out = mirror(&Curve::Arc(a.clone()), &yz_plane());
        let Curve::Arc(out) = out else {
            panic!("expected arc");
        };
        let plane = yz_plane();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let expected = plane.mirror(&a.point_at(t));
            assert!((out.point_at(t) - expected).norm() < 1e-12, "t={t}");
        }
    }

    #[test]
    fn mirrored_circle_reverses_traversal() {
        let c = Circle::new(Point3::new(1.0, 0.0, 0.0), &Vector3::z(), 2.0).unwrap();
        let out = mirror(&Curve::Circle(c), &yz_plane());
        let Curve::Circle(out) = out else {
            panic!("expected circle");
        };
        assert!((out.center - Point3::new(-1.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((out.normal - (-Vector3::z())).norm() < 1e-12);
    }

    #[test]
    fn double_mirror_restores_points() {
        let frame = Frame::new(Point3::new(2.0, 1.0, 3.0), &Vector3::y(), &Vector3::x()).unwrap();
        let a = Curve::Arc(Arc::new(frame, 1.0, 0.5, 2.0).unwrap());
        let plane = Plane::new(Point3::new(0.5, 0.0, 0.0), &Vector3::new(1.0, 1.0, 0.0)).unwrap();
        let back = mirror(&mirror(&a, &plane), &plane);
        for t in [0.0, 0.5, 1.0] {
            let p0 = a.point_at_parameter(t).unwrap();
            let p1 = back.point_at_parameter(t).unwrap();
            assert!((p1 - p0).norm() < 1e-9, "t={t}");
        }
    }
}
