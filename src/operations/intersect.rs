//! Curve-level intersection oracle.
//!
//! Bounds the raw routines from [`crate::math::intersect`] to arc sweeps and
//! recurses over composite curves. Both the fillet engine and the offset
//! post-checks are built on these queries.

use crate::error::Result;
use crate::geometry::{not_implemented, Arc, Circle, Curve, Line};
use crate::math::frame::Frame;
use crate::math::intersect::{circle_circle, line_circle, line_line};
use crate::math::{Point3, Tolerance, Vector3};

/// All intersection points between two curves.
///
/// Composite curves (polylines, poly-curves) are decomposed into their
/// atomic parts and results deduplicated within tolerance. The `infinite`
/// flag of lines is honored.
///
/// # Errors
///
/// `NotImplemented` for Ellipse and NURBS operands.
pub fn curve_intersections(a: &Curve, b: &Curve, tol: &Tolerance) -> Result<Vec<Point3>> {
    match (a, b) {
        (Curve::Ellipse(_) | Curve::Nurbs(_), _) => {
            Err(not_implemented("curve_intersections", a))
        }
        (_, Curve::Ellipse(_) | Curve::Nurbs(_)) => {
            Err(not_implemented("curve_intersections", b))
        }
        (Curve::Polyline(_) | Curve::PolyCurve(_), _)
        | (_, Curve::Polyline(_) | Curve::PolyCurve(_)) => {
            let mut points = Vec::new();
            for pa in a.sub_parts() {
                for pb in b.sub_parts() {
                    for p in curve_intersections(&pa, &pb, tol)? {
                        push_unique(&mut points, p, tol);
                    }
                }
            }
            Ok(points)
        }
        _ => primitive_intersections(a, b, tol),
    }
}

/// Self-intersection points of a composite curve.
///
/// Shared endpoints between consecutive parts (and the closing joint of a
/// closed curve) do not count; every other touch or crossing does.
///
/// # Errors
///
/// `NotImplemented` when any atomic part is an Ellipse or NURBS curve.
pub fn self_intersections(curve: &Curve, tol: &Tolerance) -> Result<Vec<Point3>> {
    let parts = curve.sub_parts();
    let n = parts.len();
    if n < 2 {
        return Ok(Vec::new());
    }
    let closed = curve.is_closed(tol.distance);

    let mut points = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (closed && i == 0 && j == n - 1);
            for p in curve_intersections(&parts[i], &parts[j], tol)? {
                if adjacent && is_shared_endpoint(&parts[i], &parts[j], &p, tol) {
                    continue;
                }
                push_unique(&mut points, p, tol);
            }
        }
    }
    Ok(points)
}

/// Whether a composite curve crosses itself anywhere.
///
/// # Errors
///
/// `NotImplemented` when any atomic part is an Ellipse or NURBS curve.
pub fn self_intersects(curve: &Curve, tol: &Tolerance) -> Result<bool> {
    Ok(!self_intersections(curve, tol)?.is_empty())
}

fn is_shared_endpoint(a: &Curve, b: &Curve, p: &Point3, tol: &Tolerance) -> bool {
    let near = |q: Result<Point3>| q.is_ok_and(|q| (q - *p).norm_squared() <= tol.sq_dist());
    (near(a.start_point()) || near(a.end_point()))
        && (near(b.start_point()) || near(b.end_point()))
}

fn push_unique(points: &mut Vec<Point3>, p: Point3, tol: &Tolerance) {
    if !points
        .iter()
        .any(|q| (*q - p).norm_squared() <= tol.sq_dist())
    {
        points.push(p);
    }
}

fn primitive_intersections(a: &Curve, b: &Curve, tol: &Tolerance) -> Result<Vec<Point3>> {
    let points = match (a, b) {
        (Curve::Line(l1), Curve::Line(l2)) => line_line(
            &l1.start,
            &l1.vector(),
            l1.infinite,
            &l2.start,
            &l2.vector(),
            l2.infinite,
            tol.distance,
        )
        .into_iter()
        .collect(),
        (Curve::Line(l), Curve::Arc(arc)) | (Curve::Arc(arc), Curve::Line(l)) => {
            let hits = line_circle(
                &l.start,
                &l.vector(),
                l.infinite,
                arc.frame(),
                arc.radius(),
                tol.distance,
            );
            filter_on_arc(hits, arc, tol)
        }
        (Curve::Line(l), Curve::Circle(c)) | (Curve::Circle(c), Curve::Line(l)) => line_circle(
            &l.start,
            &l.vector(),
            l.infinite,
            &c.frame()?,
            c.radius,
            tol.distance,
        ),
        (Curve::Arc(a1), Curve::Arc(a2)) => {
            let mut hits = coplanar_circle_hits(
                a1.frame(),
                a1.radius(),
                a2.center(),
                a2.normal(),
                a2.radius(),
                tol,
            );
            hits = filter_on_arc(hits, a1, tol);
            filter_on_arc(hits, a2, tol)
        }
        (Curve::Arc(arc), Curve::Circle(c)) | (Curve::Circle(c), Curve::Arc(arc)) => {
            let hits = coplanar_circle_hits(
                arc.frame(),
                arc.radius(),
                &c.center,
                &c.normal,
                c.radius,
                tol,
            );
            filter_on_arc(hits, arc, tol)
        }
        (Curve::Circle(c1), Curve::Circle(c2)) => coplanar_circle_hits(
            &c1.frame()?,
            c1.radius,
            &c2.center,
            &c2.normal,
            c2.radius,
            tol,
        ),
        _ => return Err(not_implemented("curve_intersections", a)),
    };
    Ok(points)
}

/// Circle-circle intersection with an explicit coplanarity gate.
fn coplanar_circle_hits(
    frame1: &Frame,
    r1: f64,
    center2: &Point3,
    normal2: &Vector3,
    r2: f64,
    tol: &Tolerance,
) -> Vec<Point3> {
    if frame1.z.dot(normal2).abs() < tol.angle.cos()
        || frame1.height_of(center2).abs() > tol.distance
    {
        return Vec::new();
    }
    circle_circle(frame1, r1, center2, r2, tol.distance)
}

/// Keeps only the hits whose angle falls inside the arc's sweep, with
/// angular slack equivalent to the distance tolerance at the arc radius.
fn filter_on_arc(hits: Vec<Point3>, arc: &Arc, tol: &Tolerance) -> Vec<Point3> {
    let slack = (tol.distance / arc.radius()).max(tol.angle);
    hits.into_iter()
        .filter(|p| arc.contains_angle(arc.angle_of(p), slack))
        .collect()
}
