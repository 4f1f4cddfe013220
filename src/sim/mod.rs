//! Deterministic simulation module
//!
//! All motion and collision logic lives here. This module must be pure and deterministic:
//! - Caller-controlled timestep only
//! - Seeded RNG only
//! - Frame updated once per tick, before any body
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod frame;
pub mod state;
pub mod tick;

pub use body::{BodyState, BouncingBody, TRAIL_LENGTH, TrailPoint, randomized_launch};
pub use collision::{
    BoundaryContact, ReflectSpace, reflect_in_frame, reflect_velocity, resolve_square_boundary,
    try_reflect,
};
pub use frame::{Pulsation, RotatingFrame};
pub use state::{BodySnapshot, BodyTemplate, FrameSnapshot, SimState, Snapshot};
pub use tick::{BounceEvent, FixedStepper, TickInput, TickReport, tick};
