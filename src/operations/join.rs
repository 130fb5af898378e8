//! Joins loose curve fragments into contiguous chains.
//!
//! Endpoint coincidence is the only criterion: fragments are spliced and
//! flipped until no chain's endpoint matches another's. Closed fragments
//! (circles, closed polylines) never merge and come back as standalone
//! chains.

use crate::error::{OperationError, Result};
use crate::geometry::{Curve, Line, PolyCurve, Polyline};
use crate::math::{Point3, Tolerance};

/// Joins curve fragments into as few poly-curves as possible.
///
/// Every input fragment appears in exactly one output chain, flipped where
/// needed so each chain runs end-to-start contiguously. Chain order is
/// unspecified. Fragments without usable endpoints become singleton chains.
#[must_use]
pub fn join_curves(fragments: &[Curve], tol: &Tolerance) -> Vec<PolyCurve> {
    let mut chains: Vec<Vec<Curve>> = Vec::new();
    let mut standalone: Vec<Vec<Curve>> = Vec::new();

    for fragment in fragments {
        let joinable = fragment.start_point().is_ok()
            && fragment.end_point().is_ok()
            && !fragment.is_closed(tol.distance);
        if joinable {
            chains.push(vec![fragment.clone()]);
        } else {
            standalone.push(vec![fragment.clone()]);
        }
    }

    // Repeated scan: merge the first pair of chains whose endpoints meet,
    // restart until no merge applies.
    'merge: loop {
        for i in 0..chains.len() {
            for j in (i + 1)..chains.len() {
                if let Some(merged) = try_merge(&chains[i], &chains[j], tol) {
                    chains[i] = merged;
                    chains.swap_remove(j);
                    continue 'merge;
                }
            }
        }
        break;
    }

    chains.extend(standalone);
    chains.into_iter().map(PolyCurve::new).collect()
}

/// Joins line fragments into as few polylines as possible by splicing their
/// point lists. The parallel of [`join_curves`] for pure line input.
#[must_use]
pub fn join_lines(lines: &[Line], tol: &Tolerance) -> Vec<Polyline> {
    let mut chains: Vec<Vec<Point3>> = lines
        .iter()
        .map(|l| vec![l.start, l.end])
        .collect();

    'merge: loop {
        for i in 0..chains.len() {
            for j in (i + 1)..chains.len() {
                if let Some(merged) = try_merge_points(&chains[i], &chains[j], tol) {
                    chains[i] = merged;
                    chains.swap_remove(j);
                    continue 'merge;
                }
            }
        }
        break;
    }

    chains.into_iter().map(Polyline::new).collect()
}

/// Orders and orients fragments into one continuous chain.
///
/// # Errors
///
/// `OperationError::DisconnectedCurves` when the fragments do not form a
/// single chain.
pub fn sort_curves(fragments: &[Curve], tol: &Tolerance) -> Result<Vec<Curve>> {
    if fragments.is_empty() {
        return Ok(Vec::new());
    }
    let mut chains = join_curves(fragments, tol);
    if chains.len() != 1 {
        return Err(OperationError::DisconnectedCurves.into());
    }
    Ok(chains.swap_remove(0).curves)
}

fn chain_ends(chain: &[Curve]) -> Option<(Point3, Point3)> {
    let start = chain.first()?.start_point().ok()?;
    let end = chain.last()?.end_point().ok()?;
    Some((start, end))
}

fn flip_chain(chain: &[Curve]) -> Vec<Curve> {
    chain.iter().rev().map(Curve::flip).collect()
}

/// Merges two chains when any endpoint combination matches, flipping the
/// second chain as needed.
fn try_merge(a: &[Curve], b: &[Curve], tol: &Tolerance) -> Option<Vec<Curve>> {
    let (start_a, end_a) = chain_ends(a)?;
    let (start_b, end_b) = chain_ends(b)?;
    let near = |p: &Point3, q: &Point3| (p - q).norm_squared() <= tol.sq_dist();

    let mut merged;
    if near(&end_a, &start_b) {
        merged = a.to_vec();
        merged.extend_from_slice(b);
    } else if near(&end_a, &end_b) {
        merged = a.to_vec();
        merged.extend(flip_chain(b));
    } else if near(&start_a, &end_b) {
        merged = b.to_vec();
        merged.extend_from_slice(a);
    } else if near(&start_a, &start_b) {
        merged = flip_chain(b);
        merged.extend_from_slice(a);
    } else {
        return None;
    }
    Some(merged)
}

fn try_merge_points(a: &[Point3], b: &[Point3], tol: &Tolerance) -> Option<Vec<Point3>> {
    let (start_a, end_a) = (*a.first()?, *a.last()?);
    let (start_b, end_b) = (*b.first()?, *b.last()?);
    let near = |p: &Point3, q: &Point3| (p - q).norm_squared() <= tol.sq_dist();

    let mut merged;
    if near(&end_a, &start_b) {
        merged = a.to_vec();
        merged.extend_from_slice(&b[1..]);
    } else if near(&end_a, &end_b) {
        merged = a.to_vec();
        merged.extend(b[..b.len() - 1].iter().rev().copied());
    } else if near(&start_a, &end_b) {
        merged = b.to_vec();
        merged.extend_from_slice(&a[1..]);
    } else if near(&start_a, &start_b) {
        merged = b.iter().rev().copied().collect();
        merged.extend_from_slice(&a[1..]);
    } else {
        return None;
    }
    Some(merged)
}
