use crate::geometry::Polyline;
use crate::log::EventLog;
use crate::math::{normalize_or_zero, Point3, Tolerance};

/// Removes vertices whose turning angle is below
/// `smallest_acceptable_angle`.
///
/// The scan runs left to right and rewinds one position after each removal,
/// so a removal re-exposes its left neighbor before the scan moves on; ties
/// therefore resolve in document order. Closed polylines wrap around the
/// seam and stay closed. If an angle below the threshold survives the pass
/// (removals can sharpen a neighbor past the point where removing it too
/// would distort the shape), a warning is recorded.
#[must_use]
pub fn remove_least_significant_vertices(
    polyline: &Polyline,
    smallest_acceptable_angle: f64,
    tol: &Tolerance,
    log: &mut EventLog,
) -> Polyline {
    if polyline.points.len() < 3 {
        return polyline.clone();
    }
    let closed = polyline.is_closed(tol.distance);
    let mut points = polyline.points.clone();
    if closed {
        points.pop();
    }

    if closed {
        let mut i = 0;
        while i < points.len() && points.len() > 3 {
            let n = points.len();
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            if turning_angle(&prev, &points[i], &next) < smallest_acceptable_angle {
                points.remove(i);
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }
    } else {
        let mut i = 1;
        while i + 1 < points.len() {
            if turning_angle(&points[i - 1], &points[i], &points[i + 1])
                < smallest_acceptable_angle
            {
                points.remove(i);
                i = i.max(2) - 1;
            } else {
                i += 1;
            }
        }
    }

    if has_residual_angle(&points, closed, smallest_acceptable_angle) {
        log.record_warning(
            "cleanup: a turning angle below the threshold remains after simplification",
        );
    }

    if closed {
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
    }
    Polyline::new(points)
}

/// Absolute direction change at `mid`, in radians. Degenerate (zero-length)
/// segments count as no turn.
fn turning_angle(prev: &Point3, mid: &Point3, next: &Point3) -> f64 {
    let incoming = normalize_or_zero(&(mid - prev));
    let outgoing = normalize_or_zero(&(next - mid));
    if incoming.norm_squared() == 0.0 || outgoing.norm_squared() == 0.0 {
        return 0.0;
    }
    incoming.dot(&outgoing).clamp(-1.0, 1.0).acos()
}

fn has_residual_angle(points: &[Point3], closed: bool, threshold: f64) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let indices: Vec<usize> = if closed {
        (0..n).collect()
    } else {
        (1..n - 1).collect()
    };
    indices.iter().any(|&i| {
        let prev = points[(i + n - 1) % n];
        let next = points[(i + 1) % n];
        turning_angle(&prev, &points[i], &next) < threshold
    })
}
