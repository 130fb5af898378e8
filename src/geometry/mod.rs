mod arc;
mod circle;
mod ellipse;
mod line;
mod nurbs;
mod polycurve;
mod polyline;

pub use arc::Arc;
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;
pub use nurbs::NurbsCurve;
pub use polycurve::PolyCurve;
pub use polyline::Polyline;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::plane::{fit_plane, is_coplanar, Plane};
use crate::math::{Point3, Vector3};

/// Closed union over every curve variant the kernel understands.
///
/// All operations dispatch by exhaustive match; combinations the kernel
/// does not support surface as [`OperationError::NotImplemented`] rather
/// than a runtime lookup failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Line(Line),
    Arc(Arc),
    Circle(Circle),
    Ellipse(Ellipse),
    Polyline(Polyline),
    PolyCurve(PolyCurve),
    Nurbs(NurbsCurve),
}

/// Builds the standard "not implemented" error for a curve/operation pair.
pub(crate) fn not_implemented(operation: &'static str, curve: &Curve) -> crate::error::CurvekitError {
    OperationError::NotImplemented {
        operation,
        curve: curve.variant_name(),
    }
    .into()
}

impl Curve {
    /// Human-readable variant name, used in error reports.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Line(_) => "Line",
            Self::Arc(_) => "Arc",
            Self::Circle(_) => "Circle",
            Self::Ellipse(_) => "Ellipse",
            Self::Polyline(_) => "Polyline",
            Self::PolyCurve(_) => "PolyCurve",
            Self::Nurbs(_) => "NurbsCurve",
        }
    }

    /// Start point of the curve. Closed variants start at their seam.
    ///
    /// # Errors
    ///
    /// `NotImplemented` for NURBS curves; `Degenerate` for empty composites.
    pub fn start_point(&self) -> Result<Point3> {
        match self {
            Self::Line(l) => Ok(l.start),
            Self::Arc(a) => Ok(a.start_point()),
            Self::Circle(c) => c.point_at(0.0),
            Self::Ellipse(e) => Ok(e.point_at(0.0)),
            Self::Polyline(p) => p
                .points
                .first()
                .copied()
                .ok_or_else(|| GeometryError::Degenerate("empty polyline".into()).into()),
            Self::PolyCurve(pc) => pc
                .start_point()
                .ok_or_else(|| GeometryError::Degenerate("empty poly-curve".into()).into()),
            Self::Nurbs(_) => Err(not_implemented("start_point", self)),
        }
    }

    /// End point of the curve.
    ///
    /// # Errors
    ///
    /// `NotImplemented` for NURBS curves; `Degenerate` for empty composites.
    pub fn end_point(&self) -> Result<Point3> {
        match self {
            Self::Line(l) => Ok(l.end),
            Self::Arc(a) => Ok(a.end_point()),
            Self::Circle(c) => c.point_at(1.0),
            Self::Ellipse(e) => Ok(e.point_at(1.0)),
            Self::Polyline(p) => p
                .points
                .last()
                .copied()
                .ok_or_else(|| GeometryError::Degenerate("empty polyline".into()).into()),
            Self::PolyCurve(pc) => pc
                .end_point()
                .ok_or_else(|| GeometryError::Degenerate("empty poly-curve".into()).into()),
            Self::Nurbs(_) => Err(not_implemented("end_point", self)),
        }
    }

    /// Point at normalized parameter `t` in `[0, 1]` (arc-length based for
    /// polylines, angle based for arcs and circles).
    ///
    /// # Errors
    ///
    /// `NotImplemented` for NURBS curves; `Degenerate` for empty composites.
    pub fn point_at_parameter(&self, t: f64) -> Result<Point3> {
        match self {
            Self::Line(l) => Ok(l.point_at(t)),
            Self::Arc(a) => Ok(a.point_at(t)),
            Self::Circle(c) => c.point_at(t),
            Self::Ellipse(e) => Ok(e.point_at(t)),
            Self::Polyline(p) => p
                .point_at(t)
                .ok_or_else(|| GeometryError::Degenerate("empty polyline".into()).into()),
            Self::PolyCurve(pc) => {
                // Walk sub-curves by length fraction.
                let total = self.length()?;
                if total <= 0.0 {
                    return self.start_point();
                }
                let mut remaining = t.clamp(0.0, 1.0) * total;
                for part in &pc.curves {
                    let len = part.length()?;
                    if remaining <= len {
                        if len <= 0.0 {
                            return part.start_point();
                        }
                        return part.point_at_parameter(remaining / len);
                    }
                    remaining -= len;
                }
                self.end_point()
            }
            Self::Nurbs(_) => Err(not_implemented("point_at_parameter", self)),
        }
    }

    /// Unit tangent at normalized parameter `t`, in traversal direction.
    ///
    /// # Errors
    ///
    /// `NotImplemented` for NURBS curves and composites (use
    /// [`Curve::tangent_at_point`]).
    pub fn tangent_at_parameter(&self, t: f64) -> Result<Vector3> {
        match self {
            Self::Line(l) => Ok(l.direction()),
            Self::Arc(a) => Ok(a.tangent_at(t)),
            Self::Circle(c) => c.tangent_at(t),
            Self::Ellipse(e) => Ok(e.tangent_at(t)),
            Self::Polyline(_) | Self::PolyCurve(_) => {
                let p = self.point_at_parameter(t)?;
                self.tangent_at_point(&p, 1e-9)
            }
            Self::Nurbs(_) => Err(not_implemented("tangent_at_parameter", self)),
        }
    }

    /// Unit tangent at (the closest point to) `point`.
    ///
    /// # Errors
    ///
    /// `NotImplemented` for NURBS and Ellipse curves; `Degenerate` for
    /// empty composites.
    pub fn tangent_at_point(&self, point: &Point3, tol: f64) -> Result<Vector3> {
        match self {
            Self::Line(l) => Ok(l.direction()),
            Self::Arc(a) => {
                let cp = a.closest_point(point);
                let angle = a.angle_of(&cp);
                Ok(a.frame().tangent_at(angle))
            }
            Self::Circle(c) => {
                let cp = c.closest_point(point)?;
                let frame = c.frame()?;
                Ok(frame.tangent_at(frame.angle_of(&cp)))
            }
            Self::Polyline(p) => {
                let lines = p.sub_lines();
                nearest_part(&lines, point, Line::closest_point)
                    .map(|l| l.direction())
                    .ok_or_else(|| GeometryError::Degenerate("empty polyline".into()).into())
            }
            Self::PolyCurve(pc) => {
                let parts = pc.sub_parts();
                let mut best: Option<(f64, &Self)> = None;
                for part in &parts {
                    let cp = part.closest_point(point)?;
                    let d = (cp - point).norm_squared();
                    if best.map_or(true, |(bd, _)| d < bd) {
                        best = Some((d, part));
                    }
                }
                match best {
                    Some((_, part)) => part.tangent_at_point(point, tol),
                    None => {
                        Err(GeometryError::Degenerate("empty poly-curve".into()).into())
                    }
                }
            }
            Self::Ellipse(_) | Self::Nurbs(_) => Err(not_implemented("tangent_at_point", self)),
        }
    }

    /// Curve length.
    ///
    /// # Errors
    ///
    /// `NotImplemented` for NURBS curves.
    pub fn length(&self) -> Result<f64> {
        match self {
            Self::Line(l) => Ok(l.length()),
            Self::Arc(a) => Ok(a.length()),
            Self::Circle(c) => Ok(c.length()),
            Self::Ellipse(e) => Ok(e.length()),
            Self::Polyline(p) => Ok(p.length()),
            Self::PolyCurve(pc) => {
                let mut sum = 0.0;
                for part in &pc.curves {
                    sum += part.length()?;
                }
                Ok(sum)
            }
            Self::Nurbs(_) => Err(not_implemented("length", self)),
        }
    }

    /// Atomic sub-parts: polylines decompose into lines, composites flatten
    /// recursively, primitives yield themselves.
    #[must_use]
    pub fn sub_parts(&self) -> Vec<Self> {
        match self {
            Self::Polyline(p) => p.sub_lines().into_iter().map(Self::Line).collect(),
            Self::PolyCurve(pc) => pc.sub_parts(),
            _ => vec![self.clone()],
        }
    }

    /// The same curve traversed in the opposite direction.
    #[must_use]
    pub fn flip(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.flip()),
            Self::Arc(a) => Self::Arc(a.flip()),
            Self::Circle(c) => Self::Circle(c.flip()),
            Self::Ellipse(e) => Self::Ellipse(e.flip()),
            Self::Polyline(p) => Self::Polyline(p.flip()),
            Self::PolyCurve(pc) => Self::PolyCurve(pc.flip()),
            Self::Nurbs(n) => Self::Nurbs(n.flip()),
        }
    }

    /// Whether the curve returns to its start within `tol`.
    #[must_use]
    pub fn is_closed(&self, tol: f64) -> bool {
        match self {
            Self::Line(_) => false,
            Self::Arc(a) => a.is_closed(1e-9),
            Self::Circle(_) | Self::Ellipse(_) => true,
            Self::Polyline(p) => p.is_closed(tol),
            Self::PolyCurve(pc) => pc.is_closed(tol),
            Self::Nurbs(n) => match (n.control_points.first(), n.control_points.last()) {
                (Some(f), Some(l)) => (l - f).norm_squared() <= tol * tol,
                _ => false,
            },
        }
    }

    /// Closest point on the curve to `point`.
    ///
    /// # Errors
    ///
    /// `NotImplemented` for NURBS and Ellipse curves; `Degenerate` for
    /// empty composites.
    pub fn closest_point(&self, point: &Point3) -> Result<Point3> {
        match self {
            Self::Line(l) => Ok(l.closest_point(point)),
            Self::Arc(a) => Ok(a.closest_point(point)),
            Self::Circle(c) => c.closest_point(point),
            Self::Polyline(p) => p
                .closest_point(point)
                .ok_or_else(|| GeometryError::Degenerate("empty polyline".into()).into()),
            Self::PolyCurve(pc) => {
                let mut best: Option<Point3> = None;
                for part in pc.sub_parts() {
                    let cp = part.closest_point(point)?;
                    let better = best
                        .map_or(true, |b| (cp - point).norm_squared() < (b - point).norm_squared());
                    if better {
                        best = Some(cp);
                    }
                }
                best.ok_or_else(|| GeometryError::Degenerate("empty poly-curve".into()).into())
            }
            Self::Ellipse(_) | Self::Nurbs(_) => Err(not_implemented("closest_point", self)),
        }
    }

    /// Characteristic points used for plane fitting and planarity checks.
    #[must_use]
    pub fn control_points(&self) -> Vec<Point3> {
        match self {
            Self::Line(l) => vec![l.start, l.end],
            Self::Arc(a) => vec![
                a.start_point(),
                a.point_at(0.25),
                a.point_at(0.5),
                a.point_at(0.75),
                a.end_point(),
            ],
            Self::Circle(c) => (0..4)
                .filter_map(|i| c.point_at(f64::from(i) * 0.25).ok())
                .collect(),
            Self::Ellipse(e) => (0..4).map(|i| e.point_at(f64::from(i) * 0.25)).collect(),
            Self::Polyline(p) => p.points.clone(),
            Self::PolyCurve(pc) => pc
                .curves
                .iter()
                .flat_map(Self::control_points)
                .collect(),
            Self::Nurbs(n) => n.control_points.clone(),
        }
    }

    /// Best-fit plane through the curve's characteristic points.
    ///
    /// # Errors
    ///
    /// Returns an error for degenerate (collinear or near-empty) point sets.
    pub fn fit_plane(&self) -> Result<Plane> {
        match self {
            Self::Arc(a) => Plane::new(*a.center(), a.normal()),
            Self::Circle(c) => Plane::new(c.center, &c.normal),
            _ => fit_plane(&self.control_points()),
        }
    }

    /// Whether the curve's characteristic points share a plane within `tol`.
    #[must_use]
    pub fn is_planar(&self, tol: f64) -> bool {
        is_coplanar(&self.control_points(), tol)
    }

    /// Points where the tangent direction is discontinuous, including both
    /// endpoints. For composites these are the segment junctions.
    #[must_use]
    pub fn discontinuity_points(&self, angle_tol: f64) -> Vec<Point3> {
        match self {
            Self::Polyline(p) => p.discontinuity_points(angle_tol),
            Self::PolyCurve(pc) => {
                let mut points = Vec::new();
                for part in pc.sub_parts() {
                    if let (Ok(s), Ok(e)) = (part.start_point(), part.end_point()) {
                        if points.is_empty() {
                            points.push(s);
                        }
                        points.push(e);
                    }
                }
                points
            }
            _ => {
                let mut points = Vec::new();
                if let (Ok(s), Ok(e)) = (self.start_point(), self.end_point()) {
                    points.push(s);
                    points.push(e);
                }
                points
            }
        }
    }
}

/// Finds the element whose image under `project` is nearest to `point`.
fn nearest_part<'a, T>(
    parts: &'a [T],
    point: &Point3,
    project: impl Fn(&T, &Point3) -> Point3,
) -> Option<&'a T> {
    parts.iter().min_by(|a, b| {
        let da = (project(a, point) - point).norm_squared();
        let db = (project(b, point) - point).norm_squared();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::frame::Frame;
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn square() -> Curve {
        Curve::Polyline(Polyline::new(vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
            p(0.0, 0.0),
        ]))
    }

    #[test]
    fn flip_involution_for_all_variants() {
        let frame = Frame::new(Point3::origin(), &Vector3::z(), &Vector3::x()).unwrap();
        let curves = vec![
            Curve::Line(Line::new(p(0.0, 0.0), p(1.0, 2.0))),
            Curve::Arc(Arc::new(frame.clone(), 1.0, 0.3, 2.0).unwrap()),
            Curve::Circle(Circle::new(Point3::origin(), &Vector3::z(), 1.0).unwrap()),
            Curve::Ellipse(Ellipse::new(frame, 2.0, 1.0).unwrap()),
            square(),
        ];
        for c in curves {
            let ff = c.flip().flip();
            let s0 = c.start_point().unwrap();
            let s1 = ff.start_point().unwrap();
            assert!((s1 - s0).norm() < 1e-9, "{}", c.variant_name());
            let m0 = c.point_at_parameter(0.3).unwrap();
            let m1 = ff.point_at_parameter(0.3).unwrap();
            assert!((m1 - m0).norm() < 1e-9, "{}", c.variant_name());
        }
    }

    #[test]
    fn square_is_planar_and_closed() {
        let sq = square();
        assert!(sq.is_planar(1e-9));
        assert!(sq.is_closed(1e-6));
        assert!((sq.length().unwrap() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn polycurve_point_at_parameter_walks_parts() {
        let pc = Curve::PolyCurve(PolyCurve::new(vec![
            Curve::Line(Line::new(p(0.0, 0.0), p(2.0, 0.0))),
            Curve::Line(Line::new(p(2.0, 0.0), p(2.0, 2.0))),
        ]));
        let mid = pc.point_at_parameter(0.5).unwrap();
        assert!((mid - p(2.0, 0.0)).norm() < 1e-9);
        let q = pc.point_at_parameter(0.75).unwrap();
        assert!((q - p(2.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn tangent_at_point_picks_containing_segment() {
        let sq = square();
        let t = sq.tangent_at_point(&p(5.0, -0.1), 1e-6).unwrap();
        assert!((t - Vector3::x()).norm() < 1e-9);
        let t = sq.tangent_at_point(&p(10.1, 5.0), 1e-6).unwrap();
        assert!((t - Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn nurbs_operations_report_not_implemented() {
        let n = Curve::Nurbs(NurbsCurve::new(
            vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)],
            vec![1.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
        ));
        assert!(matches!(
            n.length(),
            Err(crate::error::CurvekitError::Operation(
                OperationError::NotImplemented { .. }
            ))
        ));
        assert!(n.start_point().is_err());
    }

    #[test]
    fn arc_tangent_at_endpoint() {
        let frame = Frame::new(Point3::origin(), &Vector3::z(), &Vector3::x()).unwrap();
        let a = Curve::Arc(Arc::new(frame, 1.0, 0.0, FRAC_PI_2).unwrap());
        let t = a.tangent_at_point(&p(1.0, 0.0), 1e-6).unwrap();
        assert!((t - Vector3::y()).norm() < 1e-9);
    }
}
