//! Neon Drift - a single-screen reflex game
//!
//! Core modules:
//! - `sim`: Per-tick simulation (gates, player easing, collisions, scoring)
//! - `game`: Lifecycle state machine and side effects around the simulation
//! - `bridge`: Shell handle that queues commands until the core is ready
//! - `events`: Typed stats/state broadcast for presentation layers
//! - `persistence`: Best score, daily streak and mute flag storage
//! - `audio`: Synthesized tone cues
//! - `platform`: Browser/native platform abstraction (haptics, calendar)
//! - `settings`: Effect toggles (shake, particles, haptics, volume)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod bridge;
pub mod events;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bridge::GameBridge;
pub use events::{EventBus, GamePhase, GameStats};
pub use game::{NeonDrift, Services};
pub use settings::Settings;
pub use tuning::Tuning;

/// Arena geometry constants
pub mod consts {
    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 360.0;
    pub const GAME_HEIGHT: f32 = 640.0;

    /// Player marker (square, centered on its position)
    pub const PLAYER_SIZE: f32 = 18.0;
    pub const PLAYER_Y: f32 = GAME_HEIGHT * 0.78;

    /// Barrier thickness; barriers are vertically centered on their y
    pub const GATE_HEIGHT: f32 = 26.0;
    /// Spawn line, just above the visible area
    pub const GATE_SPAWN_Y: f32 = -GATE_HEIGHT;

    /// Simulation rate the per-tick easing factors were tuned at
    pub const REFERENCE_HZ: f32 = 60.0;
}

/// Linear interpolation from `a` toward `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert a per-tick easing factor tuned at `reference_hz` into the factor
/// for a step of `dt` seconds, so that easing feels the same at any frame rate.
///
/// At `dt == 1 / reference_hz` this returns `per_tick` unchanged.
#[inline]
pub fn ease_factor(per_tick: f32, dt: f32, reference_hz: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let keep = (1.0 - per_tick.clamp(0.0, 1.0)).powf(dt * reference_hz);
    1.0 - keep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_factor_matches_reference_tick() {
        let f = ease_factor(0.35, 1.0 / 60.0, 60.0);
        assert!((f - 0.35).abs() < 1e-5);
    }

    #[test]
    fn ease_factor_compounds_over_two_ticks() {
        let one = ease_factor(0.02, 1.0 / 60.0, 60.0);
        let two = ease_factor(0.02, 2.0 / 60.0, 60.0);
        let expected = 1.0 - (1.0 - one) * (1.0 - one);
        assert!((two - expected).abs() < 1e-5);
    }

    #[test]
    fn ease_factor_zero_dt_is_noop() {
        assert_eq!(ease_factor(0.35, 0.0, 60.0), 0.0);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
    }
}
