use crate::error::{GeometryError, Result};
use crate::geometry::{Arc, Line, Polyline};
use crate::math::frame::Frame;
use crate::math::intersect::circle_circle;
use crate::math::{Point3, Tolerance};

/// Rounds each coordinate to `decimals` decimal places.
#[must_use]
pub fn round_point(point: &Point3, decimals: i32) -> Point3 {
    let factor = 10.0_f64.powi(decimals);
    Point3::new(
        (point.x * factor).round() / factor,
        (point.y * factor).round() / factor,
        (point.z * factor).round() / factor,
    )
}

/// Rounds both endpoints of a line.
#[must_use]
pub fn round_line(line: &Line, decimals: i32) -> Line {
    Line {
        start: round_point(&line.start, decimals),
        end: round_point(&line.end, decimals),
        infinite: line.infinite,
    }
}

/// Rounds every vertex of a polyline.
#[must_use]
pub fn round_polyline(polyline: &Polyline, decimals: i32) -> Polyline {
    Polyline::new(
        polyline
            .points
            .iter()
            .map(|p| round_point(p, decimals))
            .collect(),
    )
}

/// Rounds an arc's endpoints to `decimals` decimal places while preserving
/// its total sweep angle exactly.
///
/// Rounding moves the endpoints, so radius and center are re-derived from
/// the rounded chord: the isoceles relation
/// `radius = sqrt((d / (2 tan(θ/2)))² + (d/2)²)` gives the radius for chord
/// `d` and sweep `θ`, and the center is recovered by intersecting circles of
/// that radius around both rounded endpoints, picking the intersection on
/// the same side of the chord as the original center. A 180-degree sweep
/// has (numerically) coincident intersections; the chord midpoint is used
/// directly. Full circles only round their center and radius.
///
/// # Errors
///
/// `Degenerate` when rounding collapses the endpoints onto each other.
pub fn round_arc(arc: &Arc, decimals: i32, tol: &Tolerance) -> Result<Arc> {
    let sweep = arc.sweep();
    if arc.is_closed(tol.angle) {
        let origin = round_point(arc.center(), decimals);
        let factor = 10.0_f64.powi(decimals);
        let radius = (arc.radius() * factor).round() / factor;
        let frame = Frame {
            origin,
            x: arc.frame().x,
            y: arc.frame().y,
            z: arc.frame().z,
        };
        return Ok(arc.with_radius(radius)?.with_frame(frame));
    }

    let start = round_point(&arc.start_point(), decimals);
    let end = round_point(&arc.end_point(), decimals);
    let chord = (end - start).norm();
    if chord <= tol.distance {
        return Err(GeometryError::Degenerate(
            "rounded arc endpoints coincide".into(),
        )
        .into());
    }

    let half = sweep / 2.0;
    let apothem = chord / (2.0 * half.tan());
    let radius = (apothem * apothem + chord * chord / 4.0).sqrt();

    // The original center's side of the chord decides between the two
    // circle-circle intersections.
    let original_side = (arc.end_point() - arc.start_point())
        .cross(&(arc.center() - arc.start_point()))
        .dot(arc.normal());
    let frame = Frame::from_normal(start, arc.normal())?;
    let center = circle_circle(&frame, radius, &end, radius, tol.distance)
        .into_iter()
        .find(|c| {
            let side = (end - start).cross(&(c - start)).dot(arc.normal());
            side * original_side > 0.0
        })
        .unwrap_or_else(|| Point3::from((start.coords + end.coords) / 2.0));

    let new_frame = Frame::new(center, arc.normal(), &(start - center))?;
    let new_radius = (start - center).norm();
    Arc::new(new_frame, new_radius, 0.0, sweep)
}
