//! Roto Bounce - a ball bouncing inside a spinning square
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rotating frame, collision kernel, tick loop)
//! - `settings`: Data-driven configuration and presets
//! - `error`: Configuration and numeric faults

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::{Preset, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Reference timestep: one tick of a 60 Hz display loop
    pub const SIM_DT: f64 = 1.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Square defaults
    pub const SQUARE_CENTER: (f64, f64) = (400.0, 400.0);
    pub const SQUARE_HALF_EXTENT: f64 = 200.0;
    /// Degrees per tick
    pub const ROTATION_SPEED_DEG: f64 = 0.2;
    /// Pointer distance (pixels) that maps to one unit of spin input
    pub const POINTER_SPAN: f64 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 20.0;
    pub const BALL_START_VELOCITY: (f64, f64) = (4.0, 3.0);
    /// Half-width of the random launch arc (degrees)
    pub const LAUNCH_SPREAD_DEG: f64 = 15.0;

    /// Frictionless walls
    pub const DEFAULT_DAMPING: f64 = 1.0;

    /// Tolerance used when checking containment after a step
    pub const CONTAINMENT_EPSILON: f64 = 1e-9;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert a pointer x-coordinate into a spin input
///
/// Pointer left of the center spins faster, right of it slower.
#[inline]
pub fn pointer_influence(center_x: f64, pointer_x: f64, span: f64) -> f64 {
    if span == 0.0 {
        return 0.0;
    }
    (center_x - pointer_x) / span
}
