use crate::geometry::Polyline;
use crate::math::Tolerance;

/// Removes vertices whose distance to the next vertex is at most
/// `minimum_segment_length`.
///
/// Open polylines keep their original last point: when the final segment is
/// the short one, the vertex before it is culled instead, so the tail is
/// never redirected onto a removed neighbor. Closed polylines are unsealed
/// for the scan, re-closed afterwards, and a trailing pass culls a
/// wrap-around segment that is still too short. Idempotent.
#[must_use]
pub fn remove_short_segments(
    polyline: &Polyline,
    minimum_segment_length: f64,
    tol: &Tolerance,
) -> Polyline {
    if polyline.points.len() < 2 {
        return polyline.clone();
    }
    let closed = polyline.is_closed(tol.distance);
    let min_sq = minimum_segment_length * minimum_segment_length;
    let mut points = polyline.points.clone();
    if closed {
        points.pop();
    }

    let mut i = 0;
    while i + 1 < points.len() {
        if (points[i + 1] - points[i]).norm_squared() <= min_sq {
            if !closed && i + 1 == points.len() - 1 {
                // Final segment of an open curve: cull the inner vertex and
                // keep the original endpoint.
                points.remove(i);
            } else {
                points.remove(i + 1);
            }
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }

    if closed {
        // Wrap-around segment.
        while points.len() > 2 {
            let first = points[0];
            let Some(last) = points.last() else {
                break;
            };
            if (first - last).norm_squared() <= min_sq {
                points.pop();
            } else {
                break;
            }
        }
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
    }
    Polyline::new(points)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn near_duplicate_vertex_collapses() {
        let pl = Polyline::new(vec![p(0.0, 0.0), p(0.0, 0.0001), p(10.0, 0.0)]);
        let out = remove_short_segments(&pl, 0.001, &tol());
        assert_eq!(out.points, vec![p(0.0, 0.0), p(10.0, 0.0)]);
    }

    #[test]
    fn original_endpoint_of_open_curve_survives() {
        // The short segment is the last one; its inner vertex is culled.
        let pl = Polyline::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0001)]);
        let out = remove_short_segments(&pl, 0.001, &tol());
        assert_eq!(out.points, vec![p(0.0, 0.0), p(10.0, 0.0001)]);
    }

    #[test]
    fn idempotent() {
        let pl = Polyline::new(vec![
            p(0.0, 0.0),
            p(0.5, 0.0),
            p(0.6, 0.0),
            p(5.0, 0.0),
            p(5.0, 5.0),
        ]);
        let once = remove_short_segments(&pl, 0.2, &tol());
        let twice = remove_short_segments(&once, 0.2, &tol());
        assert_eq!(once.points, twice.points);
    }

    #[test]
    fn closed_polyline_is_resealed() {
        let pl = Polyline::new(vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
            p(0.0, 0.0001),
            p(0.0, 0.0),
        ]);
        let out = remove_short_segments(&pl, 0.001, &tol());
        assert!(out.is_closed(1e-9));
        assert_eq!(out.points.len(), 5);
    }

    #[test]
    fn long_segments_untouched() {
        let pl = Polyline::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        let out = remove_short_segments(&pl, 0.5, &tol());
        assert_eq!(out.points, pl.points);
    }
}
