//! Batch polyline offset using the slice-and-filter pipeline.
//!
//! For each distance the raw offset polyline is built segment by segment
//! with miter corners, then split at its own self-intersections; slices
//! that land closer to the original than the offset distance allows are
//! artifacts of the construction and get filtered out before the rest is
//! stitched back together.

use crate::error::{OperationError, Result};
use crate::geometry::Polyline;
use crate::log::EventLog;
use crate::math::intersect::line_line;
use crate::math::{normalize_or_zero, Point3, Tolerance, Vector3};

/// Maximum miter distance as a multiple of `|distance|`.
const MITER_LIMIT: f64 = 4.0;

/// Threshold for a flat cap: `cos(angle) < this` is a near-180° reversal.
const FLAT_CAP_COS: f64 = -0.98;

/// Slices closer to the original than this fraction of `|distance|` are
/// rejected.
const KEEP_FRACTION: f64 = 0.5;

/// Offsets a planar polyline by each of the given distances.
///
/// Positive distances displace along `tangent × normal` (outward for a
/// counter-clockwise closed polyline). Every result is its own polyline;
/// a single distance can still yield several pieces when the offset
/// self-intersects, and none at all when it collapses entirely.
///
/// # Errors
///
/// `InvalidInput` for fewer than two points or a zero normal.
pub fn multi_offset(
    polyline: &Polyline,
    distances: &[f64],
    normal: &Vector3,
    tol: &Tolerance,
    log: &mut EventLog,
) -> Result<Vec<Polyline>> {
    if polyline.points.len() < 2 {
        return Err(OperationError::InvalidInput(
            "at least 2 points required for polyline offset".to_owned(),
        )
        .into());
    }
    let normal = normalize_or_zero(normal);
    if normal == Vector3::zeros() {
        return Err(
            OperationError::InvalidInput("offset normal must be non-zero".to_owned()).into(),
        );
    }

    let closed = polyline.is_closed(tol.distance);
    let mut results = Vec::with_capacity(distances.len());

    for &distance in distances {
        if distance.abs() <= tol.distance {
            results.push(polyline.clone());
            continue;
        }
        let Some(raw) = raw_offset(polyline, distance, &normal, closed, tol) else {
            log.record_warning("offset: polyline has no usable segments");
            continue;
        };

        let intersections = find_self_intersections(&raw.points, closed, tol);
        if intersections.is_empty() {
            results.push(raw);
            continue;
        }

        let slices = build_slices(&raw.points, &intersections, closed);
        let kept = filter_slices(&slices, polyline, distance);
        results.extend(stitch(&kept, closed, tol));
    }

    Ok(results)
}

/// A self-intersection between two segments of the raw offset.
struct Intersection {
    seg_i: usize,
    t_i: f64,
    seg_j: usize,
    t_j: f64,
}

/// Builds the raw (untrimmed) offset by displacing each segment and
/// connecting consecutive segments at miter corners.
fn raw_offset(
    polyline: &Polyline,
    distance: f64,
    normal: &Vector3,
    closed: bool,
    tol: &Tolerance,
) -> Option<Polyline> {
    struct Seg {
        start: Point3,
        end: Point3,
        dir: Vector3,
    }

    let mut segs = Vec::with_capacity(polyline.points.len());
    for line in polyline.sub_lines() {
        let dir = line.direction();
        let side = normalize_or_zero(&dir.cross(normal));
        if side == Vector3::zeros() {
            continue;
        }
        let d = side * distance;
        segs.push(Seg {
            start: line.start + d,
            end: line.end + d,
            dir,
        });
    }
    if segs.is_empty() {
        return None;
    }

    let corner = |prev: &Seg, next: &Seg, out: &mut Vec<Point3>| {
        let cos_angle = prev.dir.dot(&next.dir);
        if cos_angle < FLAT_CAP_COS {
            // Near-reversal: flat cap, both corner points kept.
            out.push(prev.end);
            out.push(next.start);
            return;
        }
        let hit = line_line(
            &prev.start,
            &(prev.end - prev.start),
            true,
            &next.start,
            &(next.end - next.start),
            true,
            tol.distance,
        );
        match hit {
            Some(p) => {
                // The miter point drifts far from the joint for sharp
                // angles; bevel instead of letting it run away.
                let limit = MITER_LIMIT * distance.abs();
                if (p - prev.end).norm_squared() > limit * limit {
                    out.push(prev.end);
                    out.push(next.start);
                } else {
                    out.push(p);
                }
            }
            // Parallel continuation: the offset points coincide.
            None => out.push(prev.end),
        }
    };

    let mut points = Vec::with_capacity(polyline.points.len() + 4);
    if closed {
        let n = segs.len();
        for i in 0..n {
            let prev = if i == 0 { n - 1 } else { i - 1 };
            corner(&segs[prev], &segs[i], &mut points);
        }
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
    } else {
        points.push(segs[0].start);
        for i in 1..segs.len() {
            corner(&segs[i - 1], &segs[i], &mut points);
        }
        points.push(segs[segs.len() - 1].end);
    }
    Some(Polyline::new(points))
}

/// Finds crossings between non-adjacent segments, skipping endpoint
/// touches.
fn find_self_intersections(points: &[Point3], closed: bool, tol: &Tolerance) -> Vec<Intersection> {
    let seg_count = points.len().saturating_sub(1);
    let mut found = Vec::new();

    for i in 0..seg_count {
        for j in (i + 2)..seg_count {
            if closed && i == 0 && j == seg_count - 1 {
                continue;
            }
            let Some((t, u)) = segment_params(
                &points[i],
                &points[i + 1],
                &points[j],
                &points[j + 1],
                tol,
            ) else {
                continue;
            };
            // Parameter slack: touches at segment endpoints are vertex
            // contacts, not genuine crossings.
            let eps = 1e-4;
            if t < eps || t > 1.0 - eps || u < eps || u > 1.0 - eps {
                continue;
            }
            found.push(Intersection {
                seg_i: i,
                t_i: t,
                seg_j: j,
                t_j: u,
            });
        }
    }
    found
}

/// Bounded segment-segment intersection parameters via closest approach.
fn segment_params(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
    tol: &Tolerance,
) -> Option<(f64, f64)> {
    let va = a1 - a0;
    let vb = b1 - b0;
    let a = va.dot(&va);
    let b = va.dot(&vb);
    let c = vb.dot(&vb);
    if a < tol.sq_dist() || c < tol.sq_dist() {
        return None;
    }
    let w0 = a0 - b0;
    let d = va.dot(&w0);
    let e = vb.dot(&w0);
    let denom = a * c - b * b;
    if denom.abs() < 1e-12 * a * c {
        return None;
    }
    let t = (b * e - c * d) / denom;
    let u = (a * e - b * d) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    let pa = a0 + va * t;
    let pb = b0 + vb * u;
    ((pa - pb).norm_squared() <= tol.sq_dist()).then_some((t, u))
}

/// Splits the raw offset at every intersection, producing point-list
/// slices between consecutive split points.
fn build_slices(
    points: &[Point3],
    intersections: &[Intersection],
    closed: bool,
) -> Vec<Vec<Point3>> {
    let seg_count = points.len() - 1;

    // (segment, parameter) split positions, walked in polyline order.
    let mut splits: Vec<(usize, f64)> = Vec::with_capacity(intersections.len() * 2);
    for ix in intersections {
        splits.push((ix.seg_i, ix.t_i));
        splits.push((ix.seg_j, ix.t_j));
    }
    splits.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    let at = |seg: usize, t: f64| points[seg] + (points[seg + 1] - points[seg]) * t;
    let slice_between = |(seg_a, t_a): (usize, f64), (seg_b, t_b): (usize, f64)| {
        let mut verts = vec![at(seg_a, t_a)];
        if seg_a == seg_b && t_a <= t_b {
            verts.push(at(seg_b, t_b));
            return verts;
        }
        // Interior original vertices, wrapping for the closing slice.
        let mut seg = (seg_a + 1) % seg_count;
        loop {
            verts.push(points[seg]);
            if seg == seg_b {
                break;
            }
            seg = (seg + 1) % seg_count;
        }
        verts.push(at(seg_b, t_b));
        verts
    };

    let mut slices = Vec::with_capacity(splits.len() + 1);
    if closed {
        for k in 0..splits.len() {
            let a = splits[k];
            let b = splits[(k + 1) % splits.len()];
            slices.push(slice_between(a, b));
        }
    } else {
        slices.push(slice_between((0, 0.0), splits[0]));
        for w in splits.windows(2) {
            slices.push(slice_between(w[0], w[1]));
        }
        if let Some(&last) = splits.last() {
            slices.push(slice_between(last, (seg_count - 1, 1.0)));
        }
    }
    slices.retain(|s| s.len() >= 2);
    slices
}

/// Keeps slices whose midpoint stays at least half the offset distance
/// away from the original polyline; anything closer is a collapse
/// artifact.
fn filter_slices<'a>(
    slices: &'a [Vec<Point3>],
    original: &Polyline,
    distance: f64,
) -> Vec<&'a Vec<Point3>> {
    let threshold = distance.abs() * KEEP_FRACTION;
    slices
        .iter()
        .filter(|s| {
            let mid = Polyline::new((*s).clone()).point_at(0.5);
            match (mid, mid.and_then(|m| original.closest_point(&m))) {
                (Some(m), Some(cp)) => (m - cp).norm() >= threshold,
                _ => false,
            }
        })
        .collect()
}

/// Greedily chains slices whose endpoints coincide back into polylines.
fn stitch(slices: &[&Vec<Point3>], input_closed: bool, tol: &Tolerance) -> Vec<Polyline> {
    let n = slices.len();
    let mut used = vec![false; n];
    let mut results = Vec::new();

    for start in 0..n {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain: Vec<Point3> = slices[start].clone();

        loop {
            let Some(end) = chain.last().copied() else {
                break;
            };
            let next = (0..n).find(|&k| {
                !used[k]
                    && slices[k]
                        .first()
                        .is_some_and(|p| (p - end).norm_squared() <= tol.sq_dist())
            });
            match next {
                Some(k) => {
                    used[k] = true;
                    chain.extend_from_slice(&slices[k][1..]);
                }
                None => break,
            }
        }

        if chain.len() < 2 {
            continue;
        }
        // A chain cut out of a closed offset closes again: snap coincident
        // ends shut, or bridge the gap left by a filtered slice.
        if input_closed && chain.len() > 2 {
            let first = chain[0];
            let Some(last) = chain.last_mut() else {
                continue;
            };
            if (*last - first).norm_squared() <= tol.sq_dist() * 100.0 {
                *last = first;
            } else {
                chain.push(first);
            }
        }
        results.push(Polyline::new(chain));
    }
    results
}
