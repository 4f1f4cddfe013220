//! Simulation tick
//!
//! Advances the frame once, then every body against that single orientation
//! snapshot.

use glam::DVec2;

use super::state::SimState;
use crate::consts::MAX_SUBSTEPS;
use crate::error::SimError;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// External scalar added to the spin (e.g. from pointer position)
    pub spin_input: Option<f64>,
}

/// A wall hit during a tick
#[derive(Debug, Clone)]
pub struct BounceEvent {
    pub body_id: u32,
    /// Unit normal in global space, pointing back into the square
    pub normal: DVec2,
    pub penetration: f64,
    pub corner: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub bounces: Vec<BounceEvent>,
    /// Bodies frozen this tick
    pub frozen: Vec<u32>,
}

/// Advance the simulation by one timestep
///
/// A body that faults is frozen and reported; the others keep moving.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f64) -> Result<TickReport, SimError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SimError::InvalidTimestep { dt });
    }

    state.frame.update(dt, input.spin_input);
    state.time_ticks += 1;
    state.elapsed += dt;

    let frame = &state.frame;
    let mut report = TickReport::default();

    for body in state.bodies.iter_mut().filter(|b| !b.is_frozen()) {
        match body.step(frame, dt) {
            Ok(Some(contact)) => report.bounces.push(BounceEvent {
                body_id: body.id,
                normal: frame.velocity_to_global(contact.normal),
                penetration: contact.penetration,
                corner: contact.is_corner(),
            }),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Body {} frozen at tick {}: {}", body.id, state.time_ticks, e);
                body.freeze();
                report.frozen.push(body.id);
            }
        }
    }

    Ok(report)
}

/// Turns variable frame times into fixed simulation ticks
#[derive(Debug, Clone)]
pub struct FixedStepper {
    step: f64,
    accumulator: f64,
    max_substeps: u32,
}

impl FixedStepper {
    pub fn new(step: f64) -> Result<Self, SimError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(SimError::InvalidTimestep { dt: step });
        }
        Ok(Self {
            step,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        })
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Run as many fixed ticks as `frame_dt` covers; returns the tick count
    ///
    /// Backlog beyond `MAX_SUBSTEPS` ticks is dropped.
    pub fn advance(
        &mut self,
        state: &mut SimState,
        input: &TickInput,
        frame_dt: f64,
    ) -> Result<u32, SimError> {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            tick(state, input, self.step)?;
            self.accumulator -= self.step;
            substeps += 1;
        }

        if substeps == self.max_substeps && self.accumulator >= self.step {
            log::debug!("Dropping {:.3} of simulation backlog", self.accumulator);
            self.accumulator %= self.step;
        }

        Ok(substeps)
    }
}
