//! Offset of heterogeneous line/arc paths.
//!
//! Each atomic part is offset on its own, fragments on the wrong side of
//! the original are pruned, and the survivors are reconnected joint by
//! joint with the fillet engine. Large distances are split in half and
//! applied twice, which keeps the per-pass corner reconstruction local.

use crate::error::Result;
use crate::geometry::{Curve, PolyCurve, Polyline};
use crate::log::EventLog;
use crate::math::{Tolerance, Vector3};
use crate::operations::fillet::Fillet;
use crate::operations::intersect::{curve_intersections, self_intersects};
use crate::operations::join::join_curves;

use super::{multi_offset, offset_primitive, OffsetOptions};

/// Fraction of the total length above which the distance is halved and
/// applied in two passes.
const HALVING_FRACTION: f64 = 0.05;

/// Maximum number of halving passes.
const MAX_HALVING_DEPTH: u32 = 8;

pub(super) fn offset_polycurve(
    pc: &PolyCurve,
    distance: f64,
    normal: &Vector3,
    options: &OffsetOptions,
    tol: &Tolerance,
    log: &mut EventLog,
) -> Result<Option<Curve>> {
    offset_inner(pc, distance, normal, options, tol, log, 0)
}

#[allow(clippy::too_many_lines)]
fn offset_inner(
    pc: &PolyCurve,
    distance: f64,
    normal: &Vector3,
    options: &OffsetOptions,
    tol: &Tolerance,
    log: &mut EventLog,
    depth: u32,
) -> Result<Option<Curve>> {
    let original = Curve::PolyCurve(pc.clone());
    if pc.curves.is_empty() {
        log.record_error("offset: poly-curve has no segments");
        return Ok(None);
    }
    if !lies_in_offset_plane(&original, normal, tol) {
        log.record_error("offset: poly-curve does not lie in the offset plane");
        return Ok(None);
    }
    if self_intersects(&original, tol)? {
        log.record_error("offset: poly-curve intersects itself");
        return Ok(None);
    }

    // Full circles never take part in the reconnection: split them out and
    // offset them independently.
    let (circles, parts): (Vec<Curve>, Vec<Curve>) = original
        .sub_parts()
        .into_iter()
        .partition(|c| matches!(c, Curve::Circle(_)));
    let mut offset_circles = Vec::with_capacity(circles.len());
    for circle in &circles {
        if let Some(c) = offset_primitive(circle, distance, normal, tol, log)? {
            offset_circles.push(c);
        }
    }
    if parts.is_empty() {
        return Ok(Some(Curve::PolyCurve(PolyCurve::new(offset_circles))));
    }
    let working = PolyCurve::new(parts);
    let working_curve = Curve::PolyCurve(working.clone());

    // A distance that is large relative to the curve swallows whole
    // features in one pass; halving and offsetting twice keeps each pass
    // well-conditioned.
    let total_length = working_curve.length()?;
    if distance.abs() > HALVING_FRACTION * total_length && total_length > tol.distance {
        if depth >= MAX_HALVING_DEPTH {
            log.record_error("offset: distance is too large relative to the curve length");
            return Ok(None);
        }
        let half = distance / 2.0;
        let Some(first) = offset_inner(&working, half, normal, options, tol, log, depth + 1)?
        else {
            return Ok(None);
        };
        let first = as_polycurve(first);
        let Some(second) = offset_inner(&first, half, normal, options, tol, log, depth + 1)?
        else {
            return Ok(None);
        };
        return Ok(Some(attach_circles(second, offset_circles)));
    }

    let checkpoint = log.checkpoint();
    let closed = working_curve.is_closed(tol.distance);

    // Per-part offset; collapsed parts are recorded and dropped.
    let mut fragments = Vec::with_capacity(working.curves.len());
    for part in &working.curves {
        if let Some(f) = offset_primitive(part, distance, normal, tol, log)? {
            fragments.push(f);
        }
    }

    // Prune fragments that landed on the wrong side of the original.
    fragments.retain(|f| on_offset_side(f, &original, distance, normal, tol));
    if fragments.is_empty() {
        log.rollback(checkpoint);
        log.record_error("offset: every fragment collapsed or fell on the wrong side");
        return Ok(None);
    }

    // With only straight fragments left, the polyline pipeline handles
    // corner collapse wholesale; re-derive from the discontinuity points.
    if fragments.iter().all(|c| matches!(c, Curve::Line(_))) {
        let pline = Polyline::new(working_curve.discontinuity_points(tol.angle));
        let mut results = multi_offset(&pline, &[distance], normal, tol, log)?;
        if results.is_empty() {
            log.record_warning("offset: poly-curve offset collapsed to nothing");
            return Ok(None);
        }
        if results.len() > 1 {
            log.record_warning(
                "offset: poly-curve offset split into several pieces, keeping the longest",
            );
            results.sort_by(|a, b| {
                a.length()
                    .partial_cmp(&b.length())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        let Some(result) = results.pop().map(Curve::Polyline) else {
            return Ok(None);
        };
        return Ok(Some(attach_circles(result, offset_circles)));
    }

    // Reconnect neighbors joint by joint. An unreconcilable joint drops the
    // incoming fragment and retries once against the following one.
    let mut chain = reconnect(fragments, closed, options, tol, log)?;

    // Prune pieces that ended up closer to the original than the offset
    // distance allows, then close the gaps that pruning opened.
    let before = chain.len();
    chain.retain(|c| !too_close(c, &original, distance, tol));
    if chain.is_empty() {
        log.rollback(checkpoint);
        log.record_error("offset: result collapsed entirely onto the original");
        return Ok(None);
    }
    if chain.len() != before {
        chain = reconnect(chain, closed, options, tol, log)?;
    }

    let mut chains = join_curves(&chain, tol);
    if chains.len() > 1 {
        log.record_warning("Offset may be wrong. The result consists of disjoint pieces.");
    }
    let mut result_parts: Vec<Curve> = Vec::new();
    for c in &mut chains {
        result_parts.append(&mut c.curves);
    }
    result_parts.extend(offset_circles);
    let result = Curve::PolyCurve(PolyCurve::new(result_parts));

    // Post-checks: reported, never swallowed.
    if self_intersects(&result, tol)? {
        log.record_warning("offset: result intersects itself");
    }
    if !curve_intersections(&result, &original, tol)?.is_empty() {
        log.record_warning("offset: result intersects the original curve");
    }
    if closed && !result.is_closed(tol.distance) {
        log.record_error("offset: closed input produced an open result");
    }

    Ok(Some(result))
}

fn as_polycurve(curve: Curve) -> PolyCurve {
    match curve {
        Curve::PolyCurve(pc) => pc,
        Curve::Polyline(pl) => {
            PolyCurve::new(pl.sub_lines().into_iter().map(Curve::Line).collect())
        }
        other => PolyCurve::new(vec![other]),
    }
}

fn attach_circles(curve: Curve, circles: Vec<Curve>) -> Curve {
    if circles.is_empty() {
        return curve;
    }
    let mut parts = as_polycurve(curve).curves;
    parts.extend(circles);
    Curve::PolyCurve(PolyCurve::new(parts))
}

/// Every characteristic point must share the plane perpendicular to the
/// offset normal.
fn lies_in_offset_plane(curve: &Curve, normal: &Vector3, tol: &Tolerance) -> bool {
    let points = curve.control_points();
    let Some(first) = points.first() else {
        return true;
    };
    points
        .iter()
        .all(|p| (p - first).dot(normal).abs() <= tol.distance)
}

/// Samples a fragment at start, middle and end and checks that it lies on
/// the side of the original the signed distance selects. A fragment is
/// rejected only when every conclusive sample lands on the wrong side:
/// near a deep concave corner an endpoint sample can project onto the
/// adjacent original segment and report the wrong sign even though the
/// fragment belongs in the result. Inconclusive samples (too close to
/// call) are skipped; a fragment with no conclusive sample is kept.
fn on_offset_side(
    fragment: &Curve,
    original: &Curve,
    distance: f64,
    normal: &Vector3,
    tol: &Tolerance,
) -> bool {
    let mut conclusive = false;
    for t in [0.0, 0.5, 1.0] {
        let Ok(p) = fragment.point_at_parameter(t) else {
            continue;
        };
        let Ok(projection) = original.closest_point(&p) else {
            continue;
        };
        let v = p - projection;
        if v.norm_squared() <= tol.sq_dist() {
            continue;
        }
        let Ok(tangent) = original.tangent_at_point(&projection, tol.distance) else {
            continue;
        };
        let side = v.dot(&tangent.cross(normal));
        if side.abs() <= tol.distance {
            continue;
        }
        if side.signum() == distance.signum() {
            return true;
        }
        conclusive = true;
    }
    !conclusive
}

/// Whether any sample of `curve` is closer to the original than the offset
/// distance allows.
fn too_close(curve: &Curve, original: &Curve, distance: f64, tol: &Tolerance) -> bool {
    for t in [0.0, 0.5, 1.0] {
        let Ok(p) = curve.point_at_parameter(t) else {
            continue;
        };
        let Ok(projection) = original.closest_point(&p) else {
            continue;
        };
        if (p - projection).norm() < distance.abs() - tol.distance {
            return true;
        }
    }
    false
}

/// Fillets consecutive fragments into one contiguous run, flattening each
/// fillet's output back into the chain.
///
/// A joint that cannot be filleted drops the incoming fragment and retries
/// once against the following one; a second failure gives up on the joint
/// and leaves the discontinuity for the final join to report.
fn reconnect(
    fragments: Vec<Curve>,
    closed: bool,
    options: &OffsetOptions,
    tol: &Tolerance,
    log: &mut EventLog,
) -> Result<Vec<Curve>> {
    let mut iter = fragments.into_iter();
    let Some(first) = iter.next() else {
        return Ok(Vec::new());
    };
    let mut chain = vec![first];
    let mut retried = false;

    for fragment in iter {
        let Some(left) = chain.pop() else {
            chain.push(fragment);
            continue;
        };
        let joint = Fillet::new(left.clone(), fragment.clone(), options.tangent_extensions, true, false)
            .execute(tol, log)?;
        match joint {
            Some(pc) => {
                chain.extend(pc.curves);
                retried = false;
            }
            None if retried => {
                log.record_error("offset: cannot reconnect offset fragments at a joint");
                chain.push(left);
                chain.push(fragment);
                retried = false;
            }
            None => {
                log.record_error("offset: dropping an offset fragment that cannot be reconnected");
                chain.push(left);
                retried = true;
            }
        }
    }

    // Close the wrap-around joint of closed input.
    if closed && chain.len() >= 2 {
        let Some(last) = chain.pop() else {
            return Ok(chain);
        };
        let first = chain.remove(0);
        let joint = Fillet::new(last.clone(), first.clone(), options.tangent_extensions, true, false)
            .execute(tol, log)?;
        match joint {
            Some(pc) => chain.extend(pc.curves),
            None => {
                log.record_error("offset: cannot reconnect the closing joint");
                chain.insert(0, first);
                chain.push(last);
            }
        }
    }

    Ok(chain)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Arc, Circle, Line};
    use crate::math::frame::Frame;
    use crate::math::Point3;
    use crate::operations::offset::Offset;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    /// A 4 x 2 stadium: two horizontal lines capped by semicircular arcs,
    /// traversed counter-clockwise.
    fn stadium() -> PolyCurve {
        let right = Frame::new(p(4.0, 1.0), &Vector3::z(), &Vector3::x()).unwrap();
        let left = Frame::new(p(0.0, 1.0), &Vector3::z(), &Vector3::x()).unwrap();
        PolyCurve::new(vec![
            Curve::Line(Line::new(p(0.0, 0.0), p(4.0, 0.0))),
            Curve::Arc(Arc::new(right, 1.0, 3.0 * FRAC_PI_2, 3.0 * FRAC_PI_2 + PI).unwrap()),
            Curve::Line(Line::new(p(4.0, 2.0), p(0.0, 2.0))),
            Curve::Arc(Arc::new(left, 1.0, FRAC_PI_2, FRAC_PI_2 + PI).unwrap()),
        ])
    }

    #[test]
    fn stadium_outward_offset_stays_closed() {
        let mut log = EventLog::new();
        let out = Offset::new(Curve::PolyCurve(stadium()), 0.25, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        assert!(out.is_closed(1e-6));
        assert!(!log.has_errors());
        // Arcs grew to radius 1.25 and the straights moved out by 0.25.
        let Curve::PolyCurve(pc) = &out else {
            panic!("expected poly-curve");
        };
        for c in &pc.curves {
            if let Curve::Arc(a) = c {
                assert!((a.radius() - 1.25).abs() < 1e-9);
            }
        }
        let original = Curve::PolyCurve(stadium());
        for c in &pc.curves {
            for t in [0.0, 0.5, 1.0] {
                let q = c.point_at_parameter(t).unwrap();
                let cp = original.closest_point(&q).unwrap();
                assert!(((q - cp).norm() - 0.25).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn stadium_inward_offset_shrinks_arcs() {
        let mut log = EventLog::new();
        let out = Offset::new(Curve::PolyCurve(stadium()), -0.25, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        assert!(out.is_closed(1e-6));
        let Curve::PolyCurve(pc) = &out else {
            panic!("expected poly-curve");
        };
        for c in &pc.curves {
            if let Curve::Arc(a) = c {
                assert!((a.radius() - 0.75).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn inward_offset_past_the_cap_radius_reports() {
        // Shrinking by more than the cap radius collapses the arcs.
        let mut log = EventLog::new();
        let out = Offset::new(Curve::PolyCurve(stadium()), -1.5, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap();
        // Either nothing is left or the log explains what was dropped.
        if out.is_none() {
            assert!(log.has_errors());
        } else {
            assert!(!log.events().is_empty());
        }
    }

    #[test]
    fn side_pruning_requires_every_sample_to_disagree() {
        let original = Curve::Line(Line::new(p(0.0, 0.0), p(10.0, 0.0)));
        // Positive distance selects the side below the segment. A fragment
        // that starts slightly above but runs below survives; one entirely
        // above does not.
        let crossing = Curve::Line(Line::new(p(5.0, 0.5), p(5.0, -2.0)));
        assert!(on_offset_side(&crossing, &original, 1.0, &Vector3::z(), &tol()));
        let above = Curve::Line(Line::new(p(2.0, 1.0), p(8.0, 1.0)));
        assert!(!on_offset_side(&above, &original, 1.0, &Vector3::z(), &tol()));
    }

    #[test]
    fn outward_then_inward_offset_round_trips() {
        let mut log = EventLog::new();
        let original = Curve::PolyCurve(stadium());
        let out = Offset::new(original.clone(), 0.25, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        let back = Offset::new(out, -0.25, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        assert!(back.is_closed(1e-6));
        let Curve::PolyCurve(pc) = &back else {
            panic!("expected poly-curve");
        };
        for c in &pc.curves {
            for t in [0.0, 0.5, 1.0] {
                let q = c.point_at_parameter(t).unwrap();
                let cp = original.closest_point(&q).unwrap();
                assert!((q - cp).norm() < 2.0 * tol().distance);
            }
        }
    }

    #[test]
    fn all_line_polycurve_uses_polyline_pipeline() {
        let square = PolyCurve::new(vec![
            Curve::Line(Line::new(p(0.0, 0.0), p(10.0, 0.0))),
            Curve::Line(Line::new(p(10.0, 0.0), p(10.0, 10.0))),
            Curve::Line(Line::new(p(10.0, 10.0), p(0.0, 10.0))),
            Curve::Line(Line::new(p(0.0, 10.0), p(0.0, 0.0))),
        ]);
        let mut log = EventLog::new();
        let out = Offset::new(Curve::PolyCurve(square), 1.0, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        let Curve::Polyline(pl) = &out else {
            panic!("expected polyline result");
        };
        assert!(pl.is_closed(1e-6));
        for corner in [p(-1.0, -1.0), p(11.0, -1.0), p(11.0, 11.0), p(-1.0, 11.0)] {
            assert!(pl.points.iter().any(|q| (q - corner).norm() < 1e-9));
        }
    }

    #[test]
    fn circles_are_split_out_and_offset_alone() {
        let pc = PolyCurve::new(vec![Curve::Circle(
            Circle::new(p(0.0, 0.0), &Vector3::z(), 2.0).unwrap(),
        )]);
        let mut log = EventLog::new();
        let out = Offset::new(Curve::PolyCurve(pc), 0.5, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        let Curve::PolyCurve(pc) = &out else {
            panic!("expected poly-curve");
        };
        assert_eq!(pc.curves.len(), 1);
        let Curve::Circle(c) = &pc.curves[0] else {
            panic!("expected circle");
        };
        assert!((c.radius - 2.5).abs() < 1e-12);
    }

    #[test]
    fn self_intersecting_input_is_rejected() {
        let bowtie = PolyCurve::new(vec![
            Curve::Line(Line::new(p(0.0, 0.0), p(2.0, 2.0))),
            Curve::Line(Line::new(p(2.0, 2.0), p(2.0, 0.0))),
            Curve::Line(Line::new(p(2.0, 0.0), p(0.0, 2.0))),
            Curve::Line(Line::new(p(0.0, 2.0), p(0.0, 0.0))),
        ]);
        let mut log = EventLog::new();
        let out = Offset::new(Curve::PolyCurve(bowtie), 0.2, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap();
        assert!(out.is_none());
        assert!(log.has_errors());
    }

    #[test]
    fn non_planar_input_is_rejected() {
        let pc = PolyCurve::new(vec![
            Curve::Line(Line::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0))),
            Curve::Line(Line::new(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))),
        ]);
        let mut log = EventLog::new();
        let out = Offset::new(Curve::PolyCurve(pc), 0.2, Vector3::z())
            .execute(&tol(), &mut log)
            .unwrap();
        assert!(out.is_none());
        assert!(log.has_errors());
    }
}
