use crate::math::Point3;

/// A NURBS curve, carried as data only.
///
/// Offsetting, filleting, splitting and trimming of NURBS curves are a
/// documented gap: every modification operation reports
/// [`OperationError::NotImplemented`](crate::error::OperationError).
#[derive(Debug, Clone, PartialEq)]
pub struct NurbsCurve {
    pub control_points: Vec<Point3>,
    pub weights: Vec<f64>,
    pub knots: Vec<f64>,
}

impl NurbsCurve {
    /// Creates a NURBS curve from its defining data.
    #[must_use]
    pub fn new(control_points: Vec<Point3>, weights: Vec<f64>, knots: Vec<f64>) -> Self {
        Self {
            control_points,
            weights,
            knots,
        }
    }

    /// Control polygon traversed in the opposite direction.
    #[must_use]
    pub fn flip(&self) -> Self {
        let mut control_points = self.control_points.clone();
        control_points.reverse();
        let mut weights = self.weights.clone();
        weights.reverse();
        Self {
            control_points,
            weights,
            knots: self.knots.clone(),
        }
    }
}
