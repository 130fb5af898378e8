use crate::error::Result;
use crate::geometry::{not_implemented, Circle, Curve, Ellipse, Line, NurbsCurve, PolyCurve, Polyline};
use crate::math::frame::Frame;
use crate::math::plane::Plane;
use crate::math::Tolerance;

/// Orthogonally projects a curve onto a plane.
///
/// Point-based variants project point-wise. Arcs, circles and ellipses
/// project exactly only when their own plane is parallel to the target
/// plane (the projection is then a translation along the normal); an
/// oblique projection would flatten them into a different curve class.
///
/// # Errors
///
/// `NotImplemented` when an arc, circle or ellipse is not parallel to the
/// plane.
pub fn project(curve: &Curve, plane: &Plane, tol: &Tolerance) -> Result<Curve> {
    match curve {
        Curve::Line(l) => Ok(Curve::Line(Line {
            start: plane.project(&l.start),
            end: plane.project(&l.end),
            infinite: l.infinite,
        })),
        Curve::Polyline(p) => Ok(Curve::Polyline(Polyline::new(
            p.points.iter().map(|p| plane.project(p)).collect(),
        ))),
        Curve::Nurbs(n) => Ok(Curve::Nurbs(NurbsCurve {
            control_points: n.control_points.iter().map(|p| plane.project(p)).collect(),
            weights: n.weights.clone(),
            knots: n.knots.clone(),
        })),
        Curve::PolyCurve(pc) => {
            let mut curves = Vec::with_capacity(pc.curves.len());
            for c in &pc.curves {
                curves.push(project(c, plane, tol)?);
            }
            Ok(Curve::PolyCurve(PolyCurve::new(curves)))
        }
        Curve::Arc(a) => {
            if !parallel(&a.frame().z, &plane.normal, tol) {
                return Err(not_implemented("project", curve));
            }
            Ok(Curve::Arc(a.with_frame(drop_to_plane(a.frame(), plane))))
        }
        Curve::Circle(c) => {
            if !parallel(&c.normal, &plane.normal, tol) {
                return Err(not_implemented("project", curve));
            }
            Ok(Curve::Circle(Circle {
                center: plane.project(&c.center),
                normal: c.normal,
                radius: c.radius,
            }))
        }
        Curve::Ellipse(e) => {
            if !parallel(&e.frame.z, &plane.normal, tol) {
                return Err(not_implemented("project", curve));
            }
            Ok(Curve::Ellipse(Ellipse {
                frame: drop_to_plane(&e.frame, plane),
                radius_1: e.radius_1,
                radius_2: e.radius_2,
            }))
        }
    }
}

fn parallel(a: &crate::math::Vector3, b: &crate::math::Vector3, tol: &Tolerance) -> bool {
    a.cross(b).norm() <= tol.angle
}

fn drop_to_plane(frame: &Frame, plane: &Plane) -> Frame {
    Frame {
        origin: plane.project(&frame.origin),
        x: frame.x,
        y: frame.y,
        z: frame.z,
    }
}
