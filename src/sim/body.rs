//! Ball integration and boundary response
//!
//! A body moves in global space but is corrected in its frame's local space.
//! Bodies only read the frame; the caller updates the frame once per tick
//! before stepping any body.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{BoundaryContact, ReflectSpace, reflect_in_frame, resolve_square_boundary};
use super::frame::RotatingFrame;
use crate::error::{SimError, require_finite, require_positive};

/// Body state - moving or stopped after a configuration fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyState {
    Free,
    /// Motion stopped (velocity zeroed) because the body cannot fit its frame
    Frozen,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: DVec2,
    pub speed: f64,
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 15;

/// A ball bouncing inside a rotating square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BouncingBody {
    pub id: u32,
    /// Global position
    pub pos: DVec2,
    /// Global velocity (units per unit time)
    pub vel: DVec2,
    radius: f64,
    /// Speed multiplier applied after each reflection, in (0, 1]
    damping: f64,
    reflect_space: ReflectSpace,
    state: BodyState,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl BouncingBody {
    pub fn new(id: u32, pos: DVec2, vel: DVec2, radius: f64) -> Result<Self, SimError> {
        require_finite("position.x", pos.x)?;
        require_finite("position.y", pos.y)?;
        require_finite("velocity.x", vel.x)?;
        require_finite("velocity.y", vel.y)?;
        let radius = require_positive("radius", radius)?;

        Ok(Self {
            id,
            pos,
            vel,
            radius,
            damping: 1.0,
            reflect_space: ReflectSpace::default(),
            state: BodyState::Free,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        })
    }

    /// Set the energy-loss factor applied on every bounce
    pub fn with_damping(mut self, damping: f64) -> Result<Self, SimError> {
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(SimError::InvalidParameter {
                name: "damping",
                value: damping,
                expected: "0 < damping <= 1",
            });
        }
        self.damping = damping;
        Ok(self)
    }

    pub fn with_reflect_space(mut self, space: ReflectSpace) -> Self {
        self.reflect_space = space;
        self
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    #[inline]
    pub fn state(&self) -> BodyState {
        self.state
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.state == BodyState::Frozen
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Position in the frame's local space
    pub fn local_pos(&self, frame: &RotatingFrame) -> DVec2 {
        frame.to_local(self.pos)
    }

    /// Stop the body in place
    pub fn freeze(&mut self) {
        self.vel = DVec2::ZERO;
        self.state = BodyState::Frozen;
    }

    /// Advance one step against `frame`
    ///
    /// Returns the contact when a wall was hit this step. A body that cannot
    /// fit the frame is left untouched and the fault is returned; the caller
    /// decides whether to freeze it.
    pub fn step(
        &mut self,
        frame: &RotatingFrame,
        dt: f64,
    ) -> Result<Option<BoundaryContact>, SimError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidTimestep { dt });
        }
        if self.is_frozen() {
            return Ok(None);
        }
        let bound = frame.bound_for(self.radius)?;

        self.pos += self.vel * dt;

        let contact = resolve_square_boundary(frame.to_local(self.pos), bound);
        if contact.hit {
            let reflected = reflect_in_frame(frame, self.vel, contact.normal, self.reflect_space)?;
            self.vel = reflected * self.damping;
        }
        self.pos = frame.to_global(contact.local);

        self.record_trail();
        Ok(contact.hit.then_some(contact))
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        let speed = self.vel.length();
        self.trail.insert(0, TrailPoint { pos: self.pos, speed });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Clear trail (on respawn)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// Rotate `base` by a uniform random angle in `[-spread, spread]` radians
pub fn randomized_launch<R: Rng + ?Sized>(base: DVec2, spread: f64, rng: &mut R) -> DVec2 {
    if spread <= 0.0 {
        return base;
    }
    let theta = rng.random_range(-spread..=spread);
    DVec2::from_angle(theta).rotate(base)
}
