use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::frame::Frame;
use crate::math::{wrap_angle, Point3, Vector3};

use super::circle::Circle;

/// A circular arc defined by a local coordinate system, a radius and a
/// start/end angle pair.
///
/// The arc sweeps counter-clockwise around `frame.z` from `start_angle` to
/// `end_angle`; traversal direction is therefore encoded entirely by the
/// frame. Invariants: `radius > 0`, `start_angle` in `[0, 2*pi)` and sweep
/// `end_angle - start_angle` in `(0, 2*pi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    frame: Frame,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates a new arc, normalizing `start_angle` into `[0, 2*pi)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the sweep
    /// `end_angle - start_angle` is outside `(0, 2*pi]`.
    pub fn new(frame: Frame, radius: f64, start_angle: f64, end_angle: f64) -> Result<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        let sweep = end_angle - start_angle;
        if sweep <= 0.0 || sweep > TAU + 1e-9 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "sweep",
                value: sweep,
                min: 0.0,
                max: TAU,
            }
            .into());
        }
        let start = wrap_angle(start_angle);
        Ok(Self {
            frame,
            radius,
            start_angle: start,
            end_angle: start + sweep.min(TAU),
        })
    }

    /// Creates the counter-clockwise (around `normal`) arc from `start` to
    /// `end` centered at `center`.
    ///
    /// The radius is taken from `start`; `end` is only used for its angular
    /// position. An `end` at the same angle as `start` produces a full turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length or either endpoint
    /// coincides with the center.
    pub fn from_center(
        center: Point3,
        start: &Point3,
        end: &Point3,
        normal: &Vector3,
    ) -> Result<Self> {
        let radius = (start - center).norm();
        if radius <= 0.0 {
            return Err(
                GeometryError::Degenerate("arc start coincides with center".into()).into(),
            );
        }
        let frame = Frame::new(center, normal, &(start - center))?;
        let end_angle = frame.angle_of(end);
        let end_angle = if end_angle <= 1e-12 { TAU } else { end_angle };
        Self::new(frame, radius, 0.0, end_angle)
    }

    /// The arc's local coordinate system.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Center of the arc circle.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.frame.origin
    }

    /// Unit normal of the arc plane (traversal is counter-clockwise around
    /// it).
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.frame.z
    }

    /// Arc radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Start angle in `[0, 2*pi)`.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// End angle (`start_angle + sweep`).
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Swept angle, in `(0, 2*pi]`.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep()
    }

    #[must_use]
    pub fn start_point(&self) -> Point3 {
        self.frame.point_at(self.radius, self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> Point3 {
        self.frame.point_at(self.radius, self.end_angle)
    }

    /// Point at normalized parameter `t` (0 = start, 1 = end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.frame
            .point_at(self.radius, self.start_angle + t * self.sweep())
    }

    /// Unit tangent at normalized parameter `t`, in traversal direction.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector3 {
        self.frame.tangent_at(self.start_angle + t * self.sweep())
    }

    /// Angle of a point around the arc center, wrapped to `[0, 2*pi)`.
    #[must_use]
    pub fn angle_of(&self, point: &Point3) -> f64 {
        self.frame.angle_of(point)
    }

    /// Whether a wrapped angle falls inside the arc's sweep, with `slack`
    /// radians of play at both ends.
    #[must_use]
    pub fn contains_angle(&self, angle: f64, slack: f64) -> bool {
        let mut delta = angle - self.start_angle;
        while delta < -slack {
            delta += TAU;
        }
        delta <= self.sweep() + slack
    }

    /// Closest point on the arc to `point`: radial projection when the
    /// point's angle is inside the sweep, nearest endpoint otherwise.
    #[must_use]
    pub fn closest_point(&self, point: &Point3) -> Point3 {
        let (u, v) = self.frame.local_uv(point);
        if u * u + v * v < 1e-20 {
            return self.start_point();
        }
        let angle = wrap_angle(v.atan2(u));
        if self.contains_angle(angle, 0.0) {
            return self.frame.point_at(self.radius, angle);
        }
        let sp = self.start_point();
        let ep = self.end_point();
        if (point - sp).norm_squared() <= (point - ep).norm_squared() {
            sp
        } else {
            ep
        }
    }

    /// The same arc traversed in the opposite direction.
    ///
    /// Rebuilds the local coordinate system (`z` negated, `y` negated, `x`
    /// kept) so the point set is identical; applying `flip` twice restores
    /// the original arc exactly.
    #[must_use]
    pub fn flip(&self) -> Self {
        let frame = Frame {
            origin: self.frame.origin,
            x: self.frame.x,
            y: -self.frame.y,
            z: -self.frame.z,
        };
        let sweep = self.sweep();
        let start = wrap_angle(-self.end_angle);
        Self {
            frame,
            radius: self.radius,
            start_angle: start,
            end_angle: start + sweep,
        }
    }

    /// The full circle this arc lies on.
    ///
    /// # Errors
    ///
    /// Propagates construction failure for degenerate radii (cannot occur
    /// for a valid arc).
    pub fn circle(&self) -> Result<Circle> {
        Circle::new(self.frame.origin, &self.frame.z, self.radius)
    }

    /// The concentric arc with a different radius and identical sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn with_radius(&self, radius: f64) -> Result<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        Ok(Self {
            frame: self.frame.clone(),
            radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        })
    }

    /// The same arc in a different local coordinate system.
    #[must_use]
    pub fn with_frame(&self, frame: Frame) -> Self {
        Self {
            frame,
            radius: self.radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        }
    }

    /// The same arc with new start/end angles (absolute, same frame).
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting sweep is outside `(0, 2*pi]`.
    pub fn with_angles(&self, start_angle: f64, end_angle: f64) -> Result<Self> {
        Self::new(self.frame.clone(), self.radius, start_angle, end_angle)
    }

    /// Whether the arc is a full turn within `angle_tol`.
    #[must_use]
    pub fn is_closed(&self, angle_tol: f64) -> bool {
        (self.sweep() - TAU).abs() <= angle_tol
    }
}
