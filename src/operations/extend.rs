//! Trims or extends curves toward target points.
//!
//! These are the low-level moves the fillet engine is built on: one side of
//! a joint is reshaped so its free end lands exactly on the chosen corner
//! point.

use std::f64::consts::TAU;

use crate::error::Result;
use crate::geometry::{not_implemented, Arc, Curve, Line, PolyCurve, Polyline};
use crate::math::{normalize_or_zero, wrap_angle, Point3, Tolerance};

/// Reshapes `curve` so its free end lands on `target`, keeping the start
/// (`keep_start`) or the end fixed.
///
/// Returns the replacement curves, in traversal order:
/// - a line simply gets its free endpoint moved;
/// - an arc is trimmed or extended along its circle when `target` lies on
///   it, or split into arc + tangent line when `tangent_extensions` is set
///   and `target` lies on the free end's tangent ray;
/// - an empty vector means the side was consumed entirely (`target`
///   coincides with the fixed endpoint);
/// - `None` means the curve cannot reach `target`.
///
/// # Errors
///
/// `UnsupportedCurveType` for anything but Line and Arc.
pub fn extend_to_point(
    curve: &Curve,
    keep_start: bool,
    target: &Point3,
    tangent_extensions: bool,
    tol: &Tolerance,
) -> Result<Option<Vec<Curve>>> {
    match curve {
        Curve::Line(line) => Ok(extend_line(line, keep_start, target, tol)),
        Curve::Arc(arc) => Ok(extend_arc(arc, keep_start, target, tangent_extensions, tol)),
        _ => Err(crate::error::OperationError::UnsupportedCurveType {
            operation: "extend_to_point",
            curve: curve.variant_name(),
        }
        .into()),
    }
}

fn extend_line(
    line: &Line,
    keep_start: bool,
    target: &Point3,
    tol: &Tolerance,
) -> Option<Vec<Curve>> {
    let fixed = if keep_start { line.start } else { line.end };
    if (target - fixed).norm_squared() <= tol.sq_dist() {
        return Some(Vec::new());
    }
    let replaced = if keep_start {
        Line::new(line.start, *target)
    } else {
        Line::new(*target, line.end)
    };
    Some(vec![Curve::Line(replaced)])
}

fn extend_arc(
    arc: &Arc,
    keep_start: bool,
    target: &Point3,
    tangent_extensions: bool,
    tol: &Tolerance,
) -> Option<Vec<Curve>> {
    let on_circle = ((target - arc.center()).norm() - arc.radius()).abs() <= tol.distance
        && arc.frame().height_of(target).abs() <= tol.distance;

    if on_circle {
        let angle = arc.angle_of(target);
        let (start, sweep) = if keep_start {
            (arc.start_angle(), wrap_angle(angle - arc.start_angle()))
        } else {
            (angle, wrap_angle(arc.end_angle() - angle))
        };
        // Target at the fixed endpoint: the side is consumed entirely.
        if sweep <= tol.angle || sweep >= TAU - tol.angle {
            let fixed = if keep_start {
                arc.start_point()
            } else {
                arc.end_point()
            };
            if (target - fixed).norm_squared() <= tol.sq_dist() {
                return Some(Vec::new());
            }
        }
        return arc
            .with_angles(start, start + sweep)
            .ok()
            .map(|a| vec![Curve::Arc(a)]);
    }

    if !tangent_extensions {
        return None;
    }

    // Tangent-ray extension: the arc is kept whole and a line continues
    // along the tangent at the free end.
    if keep_start {
        let free = arc.end_point();
        let dir = arc.tangent_at(1.0);
        on_ray(&free, &dir, target, tol)?;
        Some(vec![
            Curve::Arc(arc.clone()),
            Curve::Line(Line::new(free, *target)),
        ])
    } else {
        let free = arc.start_point();
        let dir = -arc.tangent_at(0.0);
        on_ray(&free, &dir, target, tol)?;
        Some(vec![
            Curve::Line(Line::new(*target, free)),
            Curve::Arc(arc.clone()),
        ])
    }
}

/// `Some(())` when `target` lies on the ray from `origin` along `dir`.
fn on_ray(
    origin: &Point3,
    dir: &crate::math::Vector3,
    target: &Point3,
    tol: &Tolerance,
) -> Option<()> {
    let w = target - origin;
    let along = w.dot(dir);
    if along < -tol.distance {
        return None;
    }
    let off = (w - dir * along).norm_squared();
    (off <= tol.sq_dist()).then_some(())
}

/// Lengthens a curve at one or both ends.
///
/// Lines grow along their direction; arcs grow along their circle, or by
/// tangent lines (yielding a poly-curve) when `tangent_extensions` is set;
/// polylines move their outermost points along the end segments. Negative
/// lengths shrink the curve.
///
/// # Errors
///
/// `NotImplemented` for curve types without a defined extension, and
/// degenerate-geometry errors when a shrink consumes the whole curve.
pub fn extend_tangent(
    curve: &Curve,
    start_len: f64,
    end_len: f64,
    tangent_extensions: bool,
) -> Result<Curve> {
    match curve {
        Curve::Line(line) => {
            let dir = line.direction();
            Ok(Curve::Line(Line::new(
                line.start - dir * start_len,
                line.end + dir * end_len,
            )))
        }
        Curve::Arc(arc) if !tangent_extensions => {
            let start = arc.start_angle() - start_len / arc.radius();
            let sweep = (arc.sweep() + (start_len + end_len) / arc.radius()).min(TAU);
            Ok(Curve::Arc(arc.with_angles(start, start + sweep)?))
        }
        Curve::Arc(arc) => {
            let mut parts = Vec::with_capacity(3);
            if start_len > 0.0 {
                let dir = -arc.tangent_at(0.0);
                let sp = arc.start_point();
                parts.push(Curve::Line(Line::new(sp + dir * start_len, sp)));
            }
            parts.push(Curve::Arc(arc.clone()));
            if end_len > 0.0 {
                let dir = arc.tangent_at(1.0);
                let ep = arc.end_point();
                parts.push(Curve::Line(Line::new(ep, ep + dir * end_len)));
            }
            Ok(Curve::PolyCurve(PolyCurve::new(parts)))
        }
        Curve::Polyline(pline) if pline.points.len() >= 2 => {
            let mut points = pline.points.clone();
            let n = points.len();
            let d0 = normalize_or_zero(&(points[1] - points[0]));
            let d1 = normalize_or_zero(&(points[n - 1] - points[n - 2]));
            points[0] -= d0 * start_len;
            points[n - 1] += d1 * end_len;
            Ok(Curve::Polyline(Polyline::new(points)))
        }
        _ => Err(not_implemented("extend_tangent", curve)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::frame::Frame;
    use crate::math::Vector3;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn quarter_arc() -> Arc {
        let frame = Frame::new(Point3::origin(), &Vector3::z(), &Vector3::x()).unwrap();
        Arc::new(frame, 1.0, 0.0, FRAC_PI_2).unwrap()
    }

    #[test]
    fn line_end_moves_to_target() {
        let line = Curve::Line(Line::new(p(0.0, 0.0), p(5.0, 0.0)));
        let out = extend_to_point(&line, true, &p(8.0, 0.0), false, &tol())
            .unwrap()
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0].end_point().unwrap() - p(8.0, 0.0)).norm() < 1e-12);
        assert!((out[0].start_point().unwrap() - p(0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn line_consumed_when_target_is_fixed_end() {
        let line = Curve::Line(Line::new(p(0.0, 0.0), p(5.0, 0.0)));
        let out = extend_to_point(&line, true, &p(0.0, 0.0), false, &tol())
            .unwrap()
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn arc_trims_along_its_circle() {
        // Quarter arc extended to the half-circle point (-1, 0).
        let arc = Curve::Arc(quarter_arc());
        let out = extend_to_point(&arc, true, &p(-1.0, 0.0), false, &tol())
            .unwrap()
            .unwrap();
        assert_eq!(out.len(), 1);
        let Curve::Arc(a) = &out[0] else {
            panic!("expected arc");
        };
        assert!((a.sweep() - PI).abs() < 1e-9);
        assert!((a.end_point() - p(-1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn arc_keep_end_trims_start() {
        let arc = Curve::Arc(quarter_arc());
        // Move the start forward to 45 degrees.
        let c = FRAC_PI_2.sin() / 2.0_f64.sqrt();
        let out = extend_to_point(&arc, false, &p(c, c), false, &tol())
            .unwrap()
            .unwrap();
        let Curve::Arc(a) = &out[0] else {
            panic!("expected arc");
        };
        assert!((a.sweep() - FRAC_PI_2 / 2.0).abs() < 1e-9);
        assert!((a.end_point() - p(0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn arc_off_circle_needs_tangent_extensions() {
        let arc = Curve::Arc(quarter_arc());
        // Tangent at the arc end (0, 1) points along -x.
        let target = p(-2.0, 1.0);
        assert!(extend_to_point(&arc, true, &target, false, &tol())
            .unwrap()
            .is_none());
        let out = extend_to_point(&arc, true, &target, true, &tol())
            .unwrap()
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Curve::Arc(_)));
        assert!(matches!(out[1], Curve::Line(_)));
        assert!((out[1].end_point().unwrap() - target).norm() < 1e-12);
    }

    #[test]
    fn target_behind_tangent_ray_is_rejected() {
        let arc = Curve::Arc(quarter_arc());
        let out = extend_to_point(&arc, true, &p(2.0, 1.0), true, &tol()).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn extend_tangent_grows_line_both_ways() {
        let line = Curve::Line(Line::new(p(0.0, 0.0), p(10.0, 0.0)));
        let out = extend_tangent(&line, 2.0, 3.0, false).unwrap();
        assert!((out.start_point().unwrap() - p(-2.0, 0.0)).norm() < 1e-12);
        assert!((out.end_point().unwrap() - p(13.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn extend_tangent_arc_along_curvature() {
        let arc = Curve::Arc(quarter_arc());
        // One radius of extra length at the end = one extra radian of sweep.
        let out = extend_tangent(&arc, 0.0, 1.0, false).unwrap();
        let Curve::Arc(a) = &out else {
            panic!("expected arc");
        };
        assert!((a.sweep() - (FRAC_PI_2 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn extend_tangent_arc_with_tangent_lines() {
        let arc = Curve::Arc(quarter_arc());
        let out = extend_tangent(&arc, 0.5, 0.5, true).unwrap();
        let Curve::PolyCurve(pc) = &out else {
            panic!("expected poly-curve");
        };
        assert_eq!(pc.curves.len(), 3);
        assert!((out.start_point().unwrap() - p(1.0, -0.5)).norm() < 1e-9);
        assert!((out.end_point().unwrap() - p(-0.5, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn unsupported_variant_is_rejected() {
        let c = Curve::Circle(
            crate::geometry::Circle::new(Point3::origin(), &Vector3::z(), 1.0).unwrap(),
        );
        assert!(extend_to_point(&c, true, &p(2.0, 0.0), false, &tol()).is_err());
    }
}
