//! Simulation state and snapshot types
//!
//! One rotating frame shared by any number of independent bodies.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{BodyState, BouncingBody, randomized_launch};
use super::collision::ReflectSpace;
use super::frame::RotatingFrame;
use crate::error::SimError;
use crate::settings::Settings;

/// Everything needed to spawn a ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyTemplate {
    pub radius: f64,
    /// Velocity before the random launch rotation
    pub launch_velocity: DVec2,
    /// Half-width of the launch arc (radians)
    pub launch_spread: f64,
    pub damping: f64,
    pub reflect_space: ReflectSpace,
}

/// Complete simulation state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated time (sum of all tick dts)
    pub elapsed: f64,
    pub frame: RotatingFrame,
    /// Bodies sorted by id
    pub bodies: Vec<BouncingBody>,
    rng: Pcg32,
    next_id: u32,
}

impl SimState {
    /// Create an empty simulation around `frame`
    pub fn new(frame: RotatingFrame, seed: u64) -> Self {
        Self {
            seed,
            time_ticks: 0,
            elapsed: 0.0,
            frame,
            bodies: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Build a validated simulation with `ball_count` balls at the center
    pub fn from_settings(settings: &Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let mut state = Self::new(settings.build_frame()?, settings.seed);
        let template = settings.body_template();
        for _ in 0..settings.ball_count {
            state.spawn_body(&template)?;
        }
        log::info!(
            "Simulation ready: {} ball(s), half-extent {}, seed {}",
            state.bodies.len(),
            state.frame.half_extent(),
            state.seed
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a ball at the frame center with a randomized launch direction
    pub fn spawn_body(&mut self, template: &BodyTemplate) -> Result<u32, SimError> {
        self.frame.bound_for(template.radius)?;
        let vel = randomized_launch(template.launch_velocity, template.launch_spread, &mut self.rng);
        let id = self.next_entity_id();
        let body = BouncingBody::new(id, self.frame.center(), vel, template.radius)?
            .with_damping(template.damping)?
            .with_reflect_space(template.reflect_space);
        self.bodies.push(body);
        Ok(id)
    }

    pub fn body(&self, id: u32) -> Option<&BouncingBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Bodies still moving
    pub fn active_bodies(&self) -> impl Iterator<Item = &BouncingBody> {
        self.bodies.iter().filter(|b| !b.is_frozen())
    }

    /// What a renderer needs to draw the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time_ticks: self.time_ticks,
            elapsed: self.elapsed,
            frame: FrameSnapshot {
                center: self.frame.center(),
                angle: self.frame.angle(),
                half_extent: self.frame.half_extent(),
                corners: self.frame.corners(),
            },
            bodies: self
                .bodies
                .iter()
                .map(|b| BodySnapshot {
                    id: b.id,
                    pos: b.pos,
                    vel: b.vel,
                    radius: b.radius(),
                    state: b.state(),
                })
                .collect(),
        }
    }
}

/// Frame output for a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub center: DVec2,
    /// Radians
    pub angle: f64,
    pub half_extent: f64,
    pub corners: [DVec2; 4],
}

/// Body output for a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub state: BodyState,
}

/// Serializable view of a [`SimState`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub elapsed: f64,
    pub frame: FrameSnapshot,
    pub bodies: Vec<BodySnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Preset;

    #[test]
    fn test_from_settings_spawns_at_center() {
        let settings = Settings {
            ball_count: 3,
            ..Settings::from_preset(Preset::Quantum)
        };
        let state = SimState::from_settings(&settings).unwrap();
        assert_eq!(state.bodies.len(), 3);
        let ids: Vec<u32> = state.bodies.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for body in &state.bodies {
            assert_eq!(body.pos, settings.center);
            assert_eq!(body.radius(), 25.0);
            assert_eq!(body.damping(), 0.98);
        }
        // Spread is random but seeded, so directions differ between balls
        assert_ne!(state.bodies[0].vel, state.bodies[1].vel);
    }

    #[test]
    fn test_same_seed_same_launch() {
        let settings = Settings::from_preset(Preset::Quantum);
        let a = SimState::from_settings(&settings).unwrap();
        let b = SimState::from_settings(&settings).unwrap();
        assert_eq!(a.bodies[0].vel, b.bodies[0].vel);
    }

    #[test]
    fn test_spawn_rejects_oversized_body() {
        let mut state = SimState::new(RotatingFrame::new(DVec2::ZERO, 10.0).unwrap(), 1);
        let template = BodyTemplate {
            radius: 12.0,
            launch_velocity: DVec2::X,
            launch_spread: 0.0,
            damping: 1.0,
            reflect_space: ReflectSpace::Global,
        };
        assert!(matches!(
            state.spawn_body(&template),
            Err(SimError::BodyDoesNotFit { .. })
        ));
        assert!(state.bodies.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = SimState::from_settings(&Settings::default()).unwrap();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.bodies.len(), 1);
        assert_eq!(snapshot.frame.half_extent, 200.0);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bodies[0].state, BodyState::Free);
        assert_eq!(state.body(1).map(|b| b.id), Some(1));
        assert_eq!(state.active_bodies().count(), 1);
    }
}
