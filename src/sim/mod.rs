//! Simulation module
//!
//! All gameplay rules live here: gate spawning and drift, player easing,
//! pass and collision detection, scoring and the difficulty ramp. This
//! module has no audio, storage or platform dependencies; it reports what
//! happened as `SimEvent`s and lets the caller apply side effects.

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{Fx, GameState, Gate, Particle, Player, Run, RunStats};
pub use tick::{GatePass, SimEvent, TickInput, autopilot_target, spawn_gate, tick};
