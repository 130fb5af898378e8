//! Parallel-curve construction.
//!
//! The offset side convention: the displacement of a point is
//! `normalize(tangent × normal) * distance`, so for a counter-clockwise
//! closed curve (winding around `normal`) a positive distance offsets
//! outward. Arcs and circles follow the same rule through their radius:
//! it grows by `distance` when the curve's own normal agrees with the
//! offset normal and shrinks otherwise.

mod multi_offset;
mod polycurve;

pub use multi_offset::multi_offset;

use crate::error::Result;
use crate::geometry::{not_implemented, Curve, Line, Polyline};
use crate::log::EventLog;
use crate::math::{normalize_or_zero, Tolerance, Vector3};

/// Behavior switches for offsetting and filleting.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetOptions {
    /// Allow arcs to be extended by tangent lines when reconnecting offset
    /// fragments, instead of only along their own circle.
    pub tangent_extensions: bool,
}

/// Offsets a curve by a signed distance in the plane perpendicular to
/// `normal`.
#[derive(Debug)]
pub struct Offset {
    curve: Curve,
    distance: f64,
    normal: Vector3,
    options: OffsetOptions,
}

impl Offset {
    /// Creates a new offset operation with default options.
    #[must_use]
    pub fn new(curve: Curve, distance: f64, normal: Vector3) -> Self {
        Self {
            curve,
            distance,
            normal,
            options: OffsetOptions::default(),
        }
    }

    /// Replaces the behavior switches.
    #[must_use]
    pub fn with_options(mut self, options: OffsetOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the offset.
    ///
    /// Returns `None` (with recorded diagnostics) when the geometry cannot
    /// be offset: collapsed arcs, non-planar or self-intersecting input.
    /// A zero distance returns a clone silently.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a zero normal; `NotImplemented` for Ellipse and
    /// NURBS curves.
    pub fn execute(&self, tol: &Tolerance, log: &mut EventLog) -> Result<Option<Curve>> {
        if self.distance.abs() <= tol.distance {
            return Ok(Some(self.curve.clone()));
        }
        let normal = normalize_or_zero(&self.normal);
        if normal == Vector3::zeros() {
            return Err(crate::error::OperationError::InvalidInput(
                "offset normal must be non-zero".into(),
            )
            .into());
        }

        match &self.curve {
            Curve::Line(_) | Curve::Arc(_) | Curve::Circle(_) => {
                offset_primitive(&self.curve, self.distance, &normal, tol, log)
            }
            Curve::Polyline(pline) => offset_polyline(pline, self.distance, &normal, tol, log),
            Curve::PolyCurve(pc) => {
                polycurve::offset_polycurve(pc, self.distance, &normal, &self.options, tol, log)
            }
            Curve::Ellipse(_) | Curve::Nurbs(_) => Err(not_implemented("offset", &self.curve)),
        }
    }
}

/// Offset of an atomic curve: lines translate, arcs and circles change
/// radius.
pub(super) fn offset_primitive(
    curve: &Curve,
    distance: f64,
    normal: &Vector3,
    tol: &Tolerance,
    log: &mut EventLog,
) -> Result<Option<Curve>> {
    match curve {
        Curve::Line(line) => {
            let side = normalize_or_zero(&line.direction().cross(normal));
            if side == Vector3::zeros() {
                log.record_error("offset: line is parallel to the offset normal");
                return Ok(None);
            }
            let d = side * distance;
            Ok(Some(Curve::Line(Line::new(line.start + d, line.end + d))))
        }
        Curve::Arc(arc) => {
            match offset_radius(arc.radius(), arc.normal(), distance, normal, tol) {
                Some(radius) => Ok(Some(Curve::Arc(arc.with_radius(radius)?))),
                None => {
                    log.record_error("offset: arc collapsed or lies outside the offset plane");
                    Ok(None)
                }
            }
        }
        Curve::Circle(circle) => {
            match offset_radius(circle.radius, &circle.normal, distance, normal, tol) {
                Some(radius) => Ok(Some(Curve::Circle(circle.with_radius(radius)?))),
                None => {
                    log.record_error("offset: circle collapsed or lies outside the offset plane");
                    Ok(None)
                }
            }
        }
        _ => Err(not_implemented("offset", curve)),
    }
}

/// New radius for an arc/circle offset, `None` when the curve plane does
/// not match the offset plane or the radius collapses.
fn offset_radius(
    radius: f64,
    curve_normal: &Vector3,
    distance: f64,
    normal: &Vector3,
    tol: &Tolerance,
) -> Option<f64> {
    let dot = curve_normal.dot(normal);
    if dot.abs() < tol.angle.cos() {
        return None;
    }
    let new_radius = if dot > 0.0 {
        radius + distance
    } else {
        radius - distance
    };
    (new_radius > tol.distance).then_some(new_radius)
}

fn offset_polyline(
    pline: &Polyline,
    distance: f64,
    normal: &Vector3,
    tol: &Tolerance,
    log: &mut EventLog,
) -> Result<Option<Curve>> {
    if let Some(first) = pline.points.first() {
        let planar = pline
            .points
            .iter()
            .all(|p| (p - first).dot(normal).abs() <= tol.distance);
        if !planar {
            log.record_error("offset: polyline is not planar in the offset plane");
            return Ok(None);
        }
    }

    let mut results = multi_offset(pline, &[distance], normal, tol, log)?;
    if results.is_empty() {
        log.record_warning("offset: polyline offset collapsed to nothing");
        return Ok(Some(Curve::Polyline(Polyline::new(Vec::new()))));
    }
    if results.len() > 1 {
        log.record_warning(
            "offset: polyline offset split into several pieces, keeping the longest",
        );
        results.sort_by(|a, b| {
            a.length()
                .partial_cmp(&b.length())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    Ok(results.pop().map(Curve::Polyline))
}
