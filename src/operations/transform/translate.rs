use crate::geometry::{Circle, Curve, Ellipse, NurbsCurve, PolyCurve, Polyline};
use crate::math::frame::Frame;
use crate::math::Vector3;

/// Translates a curve by `v`.
#[must_use]
pub fn translate(curve: &Curve, v: &Vector3) -> Curve {
    match curve {
        Curve::Line(l) => {
            let mut l = l.clone();
            l.start += v;
            l.end += v;
            Curve::Line(l)
        }
        Curve::Arc(a) => {
            let frame = Frame {
                origin: a.frame().origin + v,
                x: a.frame().x,
                y: a.frame().y,
                z: a.frame().z,
            };
            Curve::Arc(a.with_frame(frame))
        }
        Curve::Circle(c) => Curve::Circle(Circle {
            center: c.center + v,
            normal: c.normal,
            radius: c.radius,
        }),
        Curve::Ellipse(e) => Curve::Ellipse(Ellipse {
            frame: Frame {
                origin: e.frame.origin + v,
                x: e.frame.x,
                y: e.frame.y,
                z: e.frame.z,
            },
            radius_1: e.radius_1,
            radius_2: e.radius_2,
        }),
        Curve::Polyline(p) => {
            Curve::Polyline(Polyline::new(p.points.iter().map(|p| p + v).collect()))
        }
        Curve::PolyCurve(pc) => Curve::PolyCurve(PolyCurve::new(
            pc.curves.iter().map(|c| translate(c, v)).collect(),
        )),
        Curve::Nurbs(n) => Curve::Nurbs(NurbsCurve {
            control_points: n.control_points.iter().map(|p| p + v).collect(),
            weights: n.weights.clone(),
            knots: n.knots.clone(),
        }),
    }
}
