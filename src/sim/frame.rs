//! The rotating square and its local coordinate frame
//!
//! Local space is the square's own unrotated frame: origin at the center,
//! boundary axis-aligned at `±half_extent`. Collision tests run there, so the
//! frame's job is to keep orientation/size current and to move points and
//! vectors between global and local space.
//!
//! Angles are radians throughout.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, require_finite, require_positive};
use crate::normalize_angle;

/// Smooth periodic variation of the half-extent
///
/// `half_extent = base + amplitude * sin(phase)`, with `phase` advancing by
/// `rate` per unit time. `amplitude < base` keeps the square non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulsation {
    pub amplitude: f64,
    /// Phase advance per unit time (radians)
    pub rate: f64,
    /// Current phase (radians, normalized to [0, 2π))
    pub phase: f64,
}

impl Pulsation {
    pub fn new(amplitude: f64, rate: f64) -> Self {
        Self {
            amplitude,
            rate,
            phase: 0.0,
        }
    }

    #[inline]
    fn offset(&self) -> f64 {
        self.amplitude * self.phase.sin()
    }
}

/// A square spinning about its center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotatingFrame {
    center: DVec2,
    /// Orientation (radians, [0, 2π))
    angle: f64,
    /// Angular velocity applied by the last update (radians per unit time)
    angular_velocity: f64,
    /// Angular velocity with no external input
    base_speed: f64,
    /// Extra angular velocity per unit of external input
    input_gain: f64,
    base_half_extent: f64,
    half_extent: f64,
    pulsation: Option<Pulsation>,
}

impl RotatingFrame {
    /// Create a non-rotating square
    pub fn new(center: DVec2, half_extent: f64) -> Result<Self, SimError> {
        require_finite("center.x", center.x)?;
        require_finite("center.y", center.y)?;
        let half_extent = require_positive("half_extent", half_extent)?;

        Ok(Self {
            center,
            angle: 0.0,
            angular_velocity: 0.0,
            base_speed: 0.0,
            input_gain: 0.0,
            base_half_extent: half_extent,
            half_extent,
            pulsation: None,
        })
    }

    /// Set the base angular velocity (radians per unit time)
    pub fn with_rotation_speed(mut self, speed: f64) -> Result<Self, SimError> {
        self.base_speed = require_finite("rotation_speed", speed)?;
        self.angular_velocity = self.base_speed;
        Ok(self)
    }

    /// Set how strongly external input changes the angular velocity
    pub fn with_input_gain(mut self, gain: f64) -> Result<Self, SimError> {
        self.input_gain = require_finite("input_gain", gain)?;
        Ok(self)
    }

    /// Set the starting orientation (radians)
    pub fn with_angle(mut self, angle: f64) -> Result<Self, SimError> {
        self.angle = normalize_angle(require_finite("angle", angle)?);
        Ok(self)
    }

    /// Enable size pulsation
    pub fn with_pulsation(mut self, amplitude: f64, rate: f64) -> Result<Self, SimError> {
        require_finite("pulsation.rate", rate)?;
        if !amplitude.is_finite() || amplitude < 0.0 || amplitude >= self.base_half_extent {
            return Err(SimError::InvalidParameter {
                name: "pulsation.amplitude",
                value: amplitude,
                expected: "0 <= amplitude < half_extent",
            });
        }
        let pulsation = Pulsation::new(amplitude, rate);
        self.half_extent = self.base_half_extent + pulsation.offset();
        self.pulsation = Some(pulsation);
        Ok(self)
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.center
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    #[inline]
    pub fn half_extent(&self) -> f64 {
        self.half_extent
    }

    #[inline]
    pub fn base_half_extent(&self) -> f64 {
        self.base_half_extent
    }

    /// Smallest half-extent pulsation can produce
    pub fn min_half_extent(&self) -> f64 {
        match self.pulsation {
            Some(p) => self.base_half_extent - p.amplitude,
            None => self.base_half_extent,
        }
    }

    pub fn pulsation(&self) -> Option<&Pulsation> {
        self.pulsation.as_ref()
    }

    /// Move the rotation origin
    pub fn relocate(&mut self, center: DVec2) {
        self.center = center;
    }

    /// Angular velocity for a given external input
    pub fn angular_velocity_for(&self, input: Option<f64>) -> f64 {
        let input = input.filter(|v| v.is_finite()).unwrap_or(0.0);
        self.base_speed + input * self.input_gain
    }

    /// Advance orientation and size by `dt`
    pub fn update(&mut self, dt: f64, input: Option<f64>) {
        self.angular_velocity = self.angular_velocity_for(input);
        self.angle = normalize_angle(self.angle + self.angular_velocity * dt);

        if let Some(pulsation) = self.pulsation.as_mut() {
            pulsation.phase = normalize_angle(pulsation.phase + pulsation.rate * dt);
            self.half_extent = self.base_half_extent + pulsation.offset();
        }
    }

    /// Global point → local point (translate by -center, rotate by -angle)
    #[inline]
    pub fn to_local(&self, point: DVec2) -> DVec2 {
        self.velocity_to_local(point - self.center)
    }

    /// Local point → global point (rotate by +angle, translate by +center)
    #[inline]
    pub fn to_global(&self, point: DVec2) -> DVec2 {
        self.velocity_to_global(point) + self.center
    }

    /// Rotate a global vector into local space (no translation)
    #[inline]
    pub fn velocity_to_local(&self, v: DVec2) -> DVec2 {
        DVec2::from_angle(-self.angle).rotate(v)
    }

    /// Rotate a local vector into global space (no translation)
    #[inline]
    pub fn velocity_to_global(&self, v: DVec2) -> DVec2 {
        DVec2::from_angle(self.angle).rotate(v)
    }

    /// Largest allowed |local coordinate| for a body of this radius
    pub fn bound_for(&self, radius: f64) -> Result<f64, SimError> {
        let bound = self.half_extent - radius;
        if bound < 0.0 || !bound.is_finite() {
            return Err(SimError::BodyDoesNotFit {
                radius,
                half_extent: self.half_extent,
            });
        }
        Ok(bound)
    }

    /// Square corners in global space (counter-clockwise from local (-h, -h))
    pub fn corners(&self) -> [DVec2; 4] {
        let h = self.half_extent;
        [
            DVec2::new(-h, -h),
            DVec2::new(h, -h),
            DVec2::new(h, h),
            DVec2::new(-h, h),
        ]
        .map(|c| self.to_global(c))
    }
}
