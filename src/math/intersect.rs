//! Primitive intersection routines.
//!
//! These operate on raw points, directions and frames; the curve-level
//! oracle in [`crate::operations::intersect`] is responsible for bounding
//! results to arc sweeps and polyline segments.

use crate::math::frame::Frame;
use crate::math::{Point3, Vector3};

/// Intersection of two lines given by `p + t * v`, `t` in `[0, 1]` unless
/// the corresponding `infinite` flag is set.
///
/// The lines need not be coplanar: the closest-approach points are computed
/// and the intersection is accepted when they are within `tol` of each
/// other. Parallel lines return `None`.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn line_line(
    p1: &Point3,
    v1: &Vector3,
    infinite1: bool,
    p2: &Point3,
    v2: &Vector3,
    infinite2: bool,
    tol: f64,
) -> Option<Point3> {
    let a = v1.dot(v1);
    let b = v1.dot(v2);
    let c = v2.dot(v2);
    if a < tol * tol || c < tol * tol {
        return None;
    }

    let w0 = p1 - p2;
    let d = v1.dot(&w0);
    let e = v2.dot(&w0);
    let denom = a * c - b * b;
    if denom.abs() < 1e-12 * a * c {
        return None;
    }

    let t = (b * e - c * d) / denom;
    let s = (a * e - b * d) / denom;

    // Parameter slack equivalent to `tol` of arc length at each end.
    let eps1 = tol / a.sqrt();
    let eps2 = tol / c.sqrt();
    if !infinite1 && !(-eps1..=1.0 + eps1).contains(&t) {
        return None;
    }
    if !infinite2 && !(-eps2..=1.0 + eps2).contains(&s) {
        return None;
    }

    let q1 = p1 + v1 * t;
    let q2 = p2 + v2 * s;
    if (q1 - q2).norm_squared() > tol * tol {
        return None;
    }
    Some(Point3::from((q1.coords + q2.coords) * 0.5))
}

/// Intersection of a line `p0 + t * v` with a full circle described by
/// `frame` (origin = center, z = normal) and `radius`.
///
/// The line must lie in the circle's plane within `tol`; out-of-plane lines
/// return no intersections. Returned points are snapped exactly onto the
/// circle.
#[must_use]
pub fn line_circle(
    p0: &Point3,
    v: &Vector3,
    infinite: bool,
    frame: &Frame,
    radius: f64,
    tol: f64,
) -> Vec<Point3> {
    let p1 = p0 + v;
    if frame.height_of(p0).abs() > tol || frame.height_of(&p1).abs() > tol {
        return Vec::new();
    }

    let (x0, y0) = frame.local_uv(p0);
    let (x1, y1) = frame.local_uv(&p1);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    if len_sq < tol * tol {
        return Vec::new();
    }

    // Substitute the parametric line into the circle equation.
    let a = len_sq;
    let b = 2.0 * (x0 * dx + y0 * dy);
    let c = x0 * x0 + y0 * y0 - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    // Scale-aware tangency window: a chord shorter than `tol` counts as a
    // single touch point.
    let tangent_window = 4.0 * a * tol * radius.max(tol);
    if discriminant < -tangent_window {
        return Vec::new();
    }

    let roots = if discriminant < tangent_window {
        vec![-b / (2.0 * a)]
    } else {
        let s = discriminant.sqrt();
        vec![(-b - s) / (2.0 * a), (-b + s) / (2.0 * a)]
    };

    let eps = tol / len_sq.sqrt();
    let mut points = Vec::new();
    for t in roots {
        if !infinite && !(-eps..=1.0 + eps).contains(&t) {
            continue;
        }
        let u = x0 + t * dx;
        let w = y0 + t * dy;
        let angle = w.atan2(u);
        points.push(frame.point_at(radius, angle));
    }
    points
}

/// Intersection of two coplanar circles, the first described by `frame`
/// (origin = center, z = normal) and `r1`, the second by its center and
/// `r2`.
///
/// Concentric, separated and contained configurations return no points;
/// tangency returns one.
#[must_use]
pub fn circle_circle(frame: &Frame, r1: f64, center2: &Point3, r2: f64, tol: f64) -> Vec<Point3> {
    let (cx, cy) = frame.local_uv(center2);
    let dist_sq = cx * cx + cy * cy;
    let dist = dist_sq.sqrt();
    if dist < tol {
        return Vec::new();
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist > sum + tol || dist < diff - tol {
        return Vec::new();
    }

    // Distance from the first center along the center line to the radical
    // line, and the half-chord height above it.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = r1 * r1 - a * a;
    if h_sq < -tol * r1.max(tol) {
        return Vec::new();
    }
    let h = h_sq.max(0.0).sqrt();

    let mx = a * cx / dist;
    let my = a * cy / dist;
    let px = -cy / dist;
    let py = cx / dist;

    let candidates = if h < tol {
        vec![(mx, my)]
    } else {
        vec![(mx + h * px, my + h * py), (mx - h * px, my - h * py)]
    };

    candidates
        .into_iter()
        .map(|(u, v)| frame.point_at(r1, v.atan2(u)))
        .collect()
}
