//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be re-tuned from JSON
//! without touching the simulation.

use serde::{Deserialize, Serialize};

/// Gameplay balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ramp ===
    /// Fall speed at run start (px/s), also the floor of the target speed
    pub base_speed: f32,
    /// Target speed added per gate passed
    pub speed_per_gate: f32,
    /// Target speed added per second of run time
    pub speed_per_second: f32,
    /// Per-tick easing of speed toward its target
    pub speed_ease: f32,

    // === Player ===
    /// Per-tick easing of the player toward the pointer target
    pub player_ease: f32,
    /// Pointer targets are clamped to [margin, width - margin]
    pub pointer_margin: f32,

    // === Gates ===
    /// Seconds between spawns
    pub gate_interval: f32,
    pub gap_width_max: f32,
    pub gap_width_min: f32,
    /// Gap narrowing per gate passed
    pub gap_shrink_per_gate: f32,
    /// Gap centers stay within [margin, width - margin]
    pub gap_center_margin: f32,
    pub drift_amp_min: f32,
    pub drift_amp_max: f32,
    pub drift_speed_min: f32,
    pub drift_speed_max: f32,
    /// Gates are culled once below height + margin
    pub cull_margin: f32,

    // === Pulse gates ===
    /// Every Nth gate is a pulse gate
    pub pulse_period: u32,
    pub pulse_speed_relief: f32,
    pub pulse_speed_floor: f32,
    pub pulse_target_relief: f32,
    pub pulse_target_floor: f32,

    // === Scoring ===
    pub score_base: f32,
    pub score_combo_weight: f32,
    /// Distance to the nearer gap edge that counts as a near miss
    pub near_miss_threshold: f32,
    /// Combo cue every Nth consecutive pass
    pub combo_cue_period: u32,
    /// Combo cue tier cap
    pub combo_tier_cap: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 160.0,
            speed_per_gate: 4.0,
            speed_per_second: 6.0,
            speed_ease: 0.02,

            player_ease: 0.35,
            pointer_margin: 20.0,

            gate_interval: 0.9,
            gap_width_max: 140.0,
            gap_width_min: 78.0,
            gap_shrink_per_gate: 1.1,
            gap_center_margin: 80.0,
            drift_amp_min: 4.0,
            drift_amp_max: 12.0,
            drift_speed_min: 0.6,
            drift_speed_max: 1.2,
            cull_margin: 60.0,

            pulse_period: 6,
            pulse_speed_relief: 0.9,
            pulse_speed_floor: 120.0,
            pulse_target_relief: 0.94,
            pulse_target_floor: 160.0,

            score_base: 8.0,
            score_combo_weight: 1.4,
            near_miss_threshold: 12.0,
            combo_cue_period: 4,
            combo_tier_cap: 8,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Target fall speed for the given progress
    pub fn speed_target(&self, gates_passed: u32, run_time: f32) -> f32 {
        self.base_speed + gates_passed as f32 * self.speed_per_gate + run_time * self.speed_per_second
    }

    /// Gap width for the next spawned gate
    pub fn gap_width(&self, gates_passed: u32) -> f32 {
        (self.gap_width_max - gates_passed as f32 * self.gap_shrink_per_gate)
            .clamp(self.gap_width_min, self.gap_width_max)
    }

    /// Points awarded for a pass at the given (already incremented) combo
    pub fn pass_reward(&self, combo: u32) -> u32 {
        (self.score_base + combo as f32 * self.score_combo_weight).floor() as u32
    }

    /// Whether the gate spawned at this progress is a pulse gate
    pub fn is_pulse(&self, gates_passed: u32) -> bool {
        self.pulse_period > 0 && (gates_passed + 1) % self.pulse_period == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_reward_formula() {
        let t = Tuning::default();
        assert_eq!(t.pass_reward(1), 9);
        assert_eq!(t.pass_reward(5), 15);
    }

    #[test]
    fn test_gap_width_floor() {
        let t = Tuning::default();
        assert_eq!(t.gap_width(0), 140.0);
        assert_eq!(t.gap_width(100), 78.0);
        assert_eq!(t.gap_width(10_000), 78.0);
    }

    #[test]
    fn test_pulse_every_sixth() {
        let t = Tuning::default();
        let pulses: Vec<u32> = (0..18).filter(|&g| t.is_pulse(g)).collect();
        assert_eq!(pulses, vec![5, 11, 17]);
    }

    #[test]
    fn test_speed_target_ramp() {
        let t = Tuning::default();
        assert_eq!(t.speed_target(0, 0.0), 160.0);
        assert_eq!(t.speed_target(10, 2.0), 160.0 + 40.0 + 12.0);
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{ "gate_interval": 0.5 }"#).unwrap();
        assert_eq!(t.gate_interval, 0.5);
        assert_eq!(t.base_speed, 160.0);
    }
}
