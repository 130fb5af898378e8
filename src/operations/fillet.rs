//! Joins two curves at a corner, trimming or extending both sides.
//!
//! The corner point is found by intersecting the curves, falling back to
//! their infinite carriers (and tangent rays) when the bounded curves miss
//! each other. Unreconcilable joints are a data-quality condition: they are
//! recorded on the [`EventLog`] and reported as `None`, never as `Err`.

use crate::error::{OperationError, Result};
use crate::geometry::{Arc, Curve, Line, PolyCurve};
use crate::log::EventLog;
use crate::math::{normalize_or_zero, Point3, Tolerance, Vector3};

use super::extend::extend_to_point;
use super::intersect::curve_intersections;

/// Corner fillet between two Line/Arc curves.
///
/// `keep_start1` / `keep_start2` select which endpoint of each curve is
/// preserved; the opposite (free) ends are reshaped to meet. The usual
/// configuration for chaining left-to-right is `keep_start1 = true`,
/// `keep_start2 = false`.
#[derive(Debug)]
pub struct Fillet {
    curve1: Curve,
    curve2: Curve,
    tangent_extensions: bool,
    keep_start1: bool,
    keep_start2: bool,
}

impl Fillet {
    /// Creates a new fillet operation.
    #[must_use]
    pub fn new(
        curve1: Curve,
        curve2: Curve,
        tangent_extensions: bool,
        keep_start1: bool,
        keep_start2: bool,
    ) -> Self {
        Self {
            curve1,
            curve2,
            tangent_extensions,
            keep_start1,
            keep_start2,
        }
    }

    /// Executes the fillet.
    ///
    /// Returns the joined path, or `None` (with a recorded warning) when no
    /// corner point exists or a side cannot reach it.
    ///
    /// # Errors
    ///
    /// `UnsupportedCurveType` for inputs other than Line and Arc.
    pub fn execute(&self, tol: &Tolerance, log: &mut EventLog) -> Result<Option<PolyCurve>> {
        for curve in [&self.curve1, &self.curve2] {
            if !matches!(curve, Curve::Line(_) | Curve::Arc(_)) {
                return Err(OperationError::UnsupportedCurveType {
                    operation: "fillet",
                    curve: curve.variant_name(),
                }
                .into());
            }
        }

        let free1 = self.free_end(&self.curve1, self.keep_start1)?;
        let free2 = self.free_end(&self.curve2, self.keep_start2)?;

        // Already contiguous: nothing to reshape.
        if (free1 - free2).norm_squared() <= tol.sq_dist() {
            return Ok(Some(PolyCurve::new(vec![
                self.curve1.clone(),
                self.curve2.clone(),
            ])));
        }

        let Some(target) = self.corner_point(&free1, &free2, tol)? else {
            log.record_warning("fillet: curves do not intersect and no extension reaches a common point");
            return Ok(None);
        };

        if !self.directions_consistent(&target, tol) {
            log.record_warning("fillet: corner point lies behind a line, joint rejected");
            return Ok(None);
        }

        let side1 = extend_to_point(
            &self.curve1,
            self.keep_start1,
            &target,
            self.tangent_extensions,
            tol,
        )?;
        let side2 = extend_to_point(
            &self.curve2,
            self.keep_start2,
            &target,
            self.tangent_extensions,
            tol,
        )?;
        let (Some(side1), Some(side2)) = (side1, side2) else {
            log.record_warning("fillet: a side cannot be extended to the corner point");
            return Ok(None);
        };

        let mut parts = side1;
        parts.extend(side2);
        Ok(Some(PolyCurve::new(parts)))
    }

    fn free_end(&self, curve: &Curve, keep_start: bool) -> Result<Point3> {
        if keep_start {
            curve.end_point()
        } else {
            curve.start_point()
        }
    }

    fn fixed_end(&self, curve: &Curve, keep_start: bool) -> Result<Point3> {
        if keep_start {
            curve.start_point()
        } else {
            curve.end_point()
        }
    }

    /// Chooses the corner point the two sides will be reshaped toward.
    fn corner_point(
        &self,
        free1: &Point3,
        free2: &Point3,
        tol: &Tolerance,
    ) -> Result<Option<Point3>> {
        let bounded = curve_intersections(&self.curve1, &self.curve2, tol)?;
        if !bounded.is_empty() {
            // Among several crossings, prefer the one that preserves the
            // most of both fixed sides.
            let fixed1 = self.fixed_end(&self.curve1, self.keep_start1)?;
            let fixed2 = self.fixed_end(&self.curve2, self.keep_start2)?;
            return Ok(nearest_to(&bounded, |p| {
                (p - fixed1).norm() + (p - fixed2).norm()
            }));
        }

        // Fall back to infinite carriers (and tangent rays, when enabled).
        let mut candidates = Vec::new();
        for p1 in self.proxies(&self.curve1, self.keep_start1)? {
            for p2 in self.proxies(&self.curve2, self.keep_start2)? {
                candidates.extend(curve_intersections(&p1, &p2, tol)?);
            }
        }
        Ok(nearest_to(&candidates, |p| {
            (p - free1).norm() + (p - free2).norm()
        }))
    }

    /// Unbounded stand-ins for a curve: the infinite line or full circle it
    /// lies on, plus the free end's tangent ray when tangent extensions are
    /// enabled.
    fn proxies(&self, curve: &Curve, keep_start: bool) -> Result<Vec<Curve>> {
        match curve {
            Curve::Line(line) => Ok(vec![Curve::Line(Line::unbounded(line.start, line.end))]),
            Curve::Arc(arc) => {
                let mut proxies = vec![Curve::Circle(arc.circle()?)];
                if self.tangent_extensions {
                    proxies.push(Curve::Line(tangent_proxy(arc, keep_start)));
                }
                Ok(proxies)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Lines must keep their traversal direction: the corner point may not
    /// fall behind the fixed endpoint.
    fn directions_consistent(&self, target: &Point3, tol: &Tolerance) -> bool {
        let sides = [
            (&self.curve1, self.keep_start1),
            (&self.curve2, self.keep_start2),
        ];
        for (curve, keep_start) in sides {
            if let Curve::Line(line) = curve {
                let dir = line.direction();
                let along = if keep_start {
                    (target - line.start).dot(&dir)
                } else {
                    (line.end - target).dot(&dir)
                };
                if along < -tol.distance {
                    return false;
                }
            }
        }
        true
    }
}

/// The infinite tangent line at an arc's free end.
fn tangent_proxy(arc: &Arc, keep_start: bool) -> Line {
    let (point, dir) = if keep_start {
        (arc.end_point(), arc.tangent_at(1.0))
    } else {
        (arc.start_point(), arc.tangent_at(0.0))
    };
    Line::unbounded(point, point + dir)
}

fn nearest_to(points: &[Point3], cost: impl Fn(&Point3) -> f64) -> Option<Point3> {
    points
        .iter()
        .min_by(|a, b| {
            cost(a)
                .partial_cmp(&cost(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .copied()
}

/// Radius-based corner fillet between two lines (`line1` running into the
/// corner, `line2` running out of it).
///
/// Replaces the sharp corner with an arc of the given radius tangent to
/// both lines, returning `[Line, Arc, Line]` (a line is dropped when the
/// arc consumes that whole side). A zero radius degenerates to a plain
/// corner trim. Parallel lines have no corner: warning + `None`.
///
/// # Errors
///
/// `InvalidInput` for a negative radius.
pub fn fillet_lines(
    line1: &Line,
    line2: &Line,
    radius: f64,
    tol: &Tolerance,
    log: &mut EventLog,
) -> Result<Option<PolyCurve>> {
    if radius < 0.0 {
        return Err(OperationError::InvalidInput("fillet radius must be non-negative".into()).into());
    }
    if radius <= tol.distance {
        return Fillet::new(
            Curve::Line(line1.clone()),
            Curve::Line(line2.clone()),
            false,
            true,
            false,
        )
        .execute(tol, log);
    }

    let d1 = line1.direction();
    let d2 = line2.direction();
    let Some(corner) = crate::math::intersect::line_line(
        &line1.start,
        &line1.vector(),
        true,
        &line2.start,
        &line2.vector(),
        true,
        tol.distance,
    ) else {
        log.record_warning("fillet: lines are parallel, no corner to fillet");
        return Ok(None);
    };

    // Unit legs pointing away from the corner along each line.
    let u = -d1;
    let w = d2;
    let cos_theta = u.dot(&w).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    if theta <= tol.angle || theta >= std::f64::consts::PI - tol.angle {
        log.record_warning("fillet: lines are collinear at the corner");
        return Ok(None);
    }

    let tangent_len = radius / (theta / 2.0).tan();
    let t1 = corner + u * tangent_len;
    let t2 = corner + w * tangent_len;
    let bisector = normalize_or_zero(&(u + w));
    let center = corner + bisector * (radius / (theta / 2.0).sin());
    let normal: Vector3 = normalize_or_zero(&d1.cross(&d2));
    let arc = Arc::from_center(center, &t1, &t2, &normal)?;

    let mut parts = Vec::with_capacity(3);
    if (t1 - line1.start).norm_squared() > tol.sq_dist() {
        parts.push(Curve::Line(Line::new(line1.start, t1)));
    }
    parts.push(Curve::Arc(arc));
    if (line2.end - t2).norm_squared() > tol.sq_dist() {
        parts.push(Curve::Line(Line::new(t2, line2.end)));
    }
    Ok(Some(PolyCurve::new(parts)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::math::frame::Frame;
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn lines_meeting_at_corner_are_trimmed() {
        // Two lines overshooting a corner at (5, 0).
        let l1 = Curve::Line(Line::new(p(0.0, 0.0), p(7.0, 0.0)));
        let l2 = Curve::Line(Line::new(p(5.0, -2.0), p(5.0, 5.0)));
        let mut log = EventLog::new();
        let out = Fillet::new(l1, l2, false, true, false)
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        assert_eq!(out.curves.len(), 2);
        assert!((out.curves[0].end_point().unwrap() - p(5.0, 0.0)).norm() < 1e-9);
        assert!((out.curves[1].start_point().unwrap() - p(5.0, 0.0)).norm() < 1e-9);
        assert!((out.start_point().unwrap() - p(0.0, 0.0)).norm() < 1e-9);
        assert!((out.end_point().unwrap() - p(5.0, 5.0)).norm() < 1e-9);
    }

    #[test]
    fn disjoint_lines_extend_to_projected_corner() {
        // Perpendicular lines stopping short of the corner at (4, 0).
        let l1 = Curve::Line(Line::new(p(0.0, 0.0), p(3.0, 0.0)));
        let l2 = Curve::Line(Line::new(p(4.0, 1.0), p(4.0, 5.0)));
        let mut log = EventLog::new();
        let out = Fillet::new(l1, l2, false, true, false)
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        assert_eq!(out.curves.len(), 2);
        assert!((out.curves[0].end_point().unwrap() - p(4.0, 0.0)).norm() < 1e-9);
        assert!(log.events().is_empty());
    }

    #[test]
    fn already_touching_curves_join_directly() {
        let l1 = Curve::Line(Line::new(p(0.0, 0.0), p(1.0, 0.0)));
        let l2 = Curve::Line(Line::new(p(1.0, 0.0), p(1.0, 1.0)));
        let mut log = EventLog::new();
        let out = Fillet::new(l1.clone(), l2.clone(), false, true, false)
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        assert_eq!(out.curves[0], l1);
        assert_eq!(out.curves[1], l2);
    }

    #[test]
    fn parallel_lines_report_warning_and_none() {
        let l1 = Curve::Line(Line::new(p(0.0, 0.0), p(1.0, 0.0)));
        let l2 = Curve::Line(Line::new(p(0.0, 1.0), p(1.0, 1.0)));
        let mut log = EventLog::new();
        let out = Fillet::new(l1, l2, false, true, false)
            .execute(&tol(), &mut log)
            .unwrap();
        assert!(out.is_none());
        assert_eq!(log.warnings().len(), 1);
    }

    #[test]
    fn reversed_corner_is_rejected() {
        // The carrier intersection lies behind the start of the first line.
        let l1 = Curve::Line(Line::new(p(1.0, 0.0), p(5.0, 0.0)));
        let l2 = Curve::Line(Line::new(p(-1.0, 1.0), p(-1.0, 5.0)));
        let mut log = EventLog::new();
        let out = Fillet::new(l1, l2, false, true, false)
            .execute(&tol(), &mut log)
            .unwrap();
        assert!(out.is_none());
        assert!(!log.warnings().is_empty());
    }

    #[test]
    fn line_joins_arc_on_its_circle() {
        // Horizontal line toward the unit circle, joined to its upper-right
        // quarter arc.
        let frame = Frame::new(Point3::origin(), &crate::math::Vector3::z(), &crate::math::Vector3::x())
            .unwrap();
        let arc = Arc::new(frame, 1.0, 0.0, FRAC_PI_2).unwrap();
        let l1 = Curve::Line(Line::new(p(3.0, 0.0), p(1.5, 0.0)));
        let mut log = EventLog::new();
        let out = Fillet::new(l1, Curve::Arc(arc), false, true, false)
            .execute(&tol(), &mut log)
            .unwrap()
            .unwrap();
        assert_eq!(out.curves.len(), 2);
        assert!((out.curves[0].end_point().unwrap() - p(1.0, 0.0)).norm() < 1e-6);
        assert!(matches!(out.curves[1], Curve::Arc(_)));
    }

    #[test]
    fn unsupported_input_is_an_error() {
        let l1 = Curve::Line(Line::new(p(0.0, 0.0), p(1.0, 0.0)));
        let c = Curve::Circle(Circle::new(Point3::origin(), &crate::math::Vector3::z(), 1.0).unwrap());
        let mut log = EventLog::new();
        assert!(Fillet::new(l1, c, false, true, false)
            .execute(&tol(), &mut log)
            .is_err());
    }

    #[test]
    fn radius_fillet_on_perpendicular_unit_lines() {
        // Radius 0.5 on perpendicular unit lines: quarter-circle arc.
        let l1 = Line::new(p(0.0, 0.0), p(1.0, 0.0));
        let l2 = Line::new(p(1.0, 0.0), p(1.0, 1.0));
        let mut log = EventLog::new();
        let out = fillet_lines(&l1, &l2, 0.5, &tol(), &mut log)
            .unwrap()
            .unwrap();
        assert_eq!(out.curves.len(), 3);
        let Curve::Arc(arc) = &out.curves[1] else {
            panic!("expected arc");
        };
        assert!((arc.radius() - 0.5).abs() < 1e-9);
        assert!((arc.sweep() - FRAC_PI_2).abs() < 1e-9);
        // Tangency: arc tangents match the line directions at both joints.
        assert!((arc.tangent_at(0.0) - l1.direction()).norm() < 1e-9);
        assert!((arc.tangent_at(1.0) - l2.direction()).norm() < 1e-9);
        // Touch points at (0.5, 0) and (1, 0.5).
        assert!((arc.start_point() - p(0.5, 0.0)).norm() < 1e-9);
        assert!((arc.end_point() - p(1.0, 0.5)).norm() < 1e-9);
    }

    #[test]
    fn radius_fillet_consuming_a_side_drops_its_line() {
        // Tangent length equals the full first line: no leading line part.
        let l1 = Line::new(p(0.5, 0.0), p(1.0, 0.0));
        let l2 = Line::new(p(1.0, 0.0), p(1.0, 1.0));
        let mut log = EventLog::new();
        let out = fillet_lines(&l1, &l2, 0.5, &tol(), &mut log)
            .unwrap()
            .unwrap();
        assert_eq!(out.curves.len(), 2);
        assert!(matches!(out.curves[0], Curve::Arc(_)));
    }
}
