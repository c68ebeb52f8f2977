//! Per-frame simulation tick
//!
//! Advances the run by a variable `dt`. Easing factors are tuned per tick at
//! `REFERENCE_HZ` and converted to the actual step so the feel does not
//! depend on frame rate.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Gate, GameState, Run};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{ease_factor, lerp};

/// Grid scroll speed while no run is active (px/s)
const IDLE_SCROLL_SPEED: f32 = 6.0;
/// Grid scrolls at this fraction of the fall speed during a run
const RUN_SCROLL_FACTOR: f32 = 0.2;

/// Per-tick input
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Demo mode - steer toward the next gap automatically
    pub autopilot: bool,
}

/// Outcome of one gate pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatePass {
    pub gate_id: u32,
    pub pulse: bool,
    pub near_miss: bool,
    /// Points awarded for this pass
    pub reward: u32,
    /// Counters right after this pass
    pub combo: u32,
    pub score: u32,
}

/// Something gameplay-relevant that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    GateSpawned { gate_id: u32, pulse: bool },
    GatePassed(GatePass),
    /// Player overlapped a barrier; the run is over
    Collision { gate_id: u32 },
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let dt = dt.max(0.0);

    state.time += dt as f64;
    state.fx.update(dt);

    let GameState {
        run,
        player,
        fx,
        rng,
        time,
        ..
    } = state;

    let Some(run) = run.as_mut().filter(|r| r.running) else {
        fx.scroll_offset += IDLE_SCROLL_SPEED * dt;
        return events;
    };

    run.run_time += dt;
    fx.scroll_offset += run.speed * RUN_SCROLL_FACTOR * dt;

    // Difficulty ramp
    run.speed_target = tuning.speed_target(run.stats.gates_passed, run.run_time);
    run.speed = lerp(
        run.speed,
        run.speed_target,
        ease_factor(tuning.speed_ease, dt, REFERENCE_HZ),
    );

    run.spawn_timer += dt;
    if run.spawn_timer >= tuning.gate_interval {
        run.spawn_timer = 0.0;
        let gate = spawn_gate(run, rng, tuning);
        events.push(SimEvent::GateSpawned {
            gate_id: gate.id,
            pulse: gate.pulse,
        });
        run.gates.push(gate);
    }

    if input.autopilot {
        let target = autopilot_target(&run.gates, player.target_x);
        player.set_target(target, tuning);
    }
    player.x = lerp(
        player.x,
        player.target_x,
        ease_factor(tuning.player_ease, dt, REFERENCE_HZ),
    );

    // Move gates; passes are resolved after every gate has moved. Collision
    // uses the span each barrier swept this frame, so a fast gate cannot
    // jump over the player between two frames.
    let now = *time as f32;
    let player_box = player.aabb();
    let mut passed = Vec::new();
    let mut hit = None;
    for (idx, gate) in run.gates.iter_mut().enumerate() {
        gate.drift(now, dt, tuning);
        let prev_y = gate.y;
        gate.y += gate.speed * dt;

        if !gate.passed && gate.y >= PLAYER_Y {
            gate.passed = true;
            passed.push(idx);
        }
        if hit.is_none() && gate.swept_overlaps(prev_y, &player_box) {
            hit = Some(gate.id);
        }
    }
    for idx in passed {
        let pass = resolve_gate_pass(run, idx, player.x, tuning);
        log::debug!(
            "Gate {} passed: +{} (combo {}, score {})",
            pass.gate_id,
            pass.reward,
            pass.combo,
            pass.score
        );
        events.push(SimEvent::GatePassed(pass));
    }

    // Collision is independent of the pass check and may fire on the same tick
    if let Some(gate_id) = hit {
        run.running = false;
        run.stats.combo = 0;
        events.push(SimEvent::Collision { gate_id });
    }

    let cull_line = GAME_HEIGHT + tuning.cull_margin;
    run.gates.retain(|g| g.y <= cull_line);

    events
}

/// Build the next gate for `run` (the caller pushes it)
pub fn spawn_gate(run: &mut Run, rng: &mut Pcg32, tuning: &Tuning) -> Gate {
    let gates_passed = run.stats.gates_passed;
    let gap_width = tuning.gap_width(gates_passed);
    let (lo, hi) = Gate::center_bounds(gap_width, tuning);

    Gate {
        id: run.next_gate_id(),
        y: GATE_SPAWN_Y,
        gap_center: rng.random_range(lo..=hi),
        gap_width,
        speed: run.speed,
        passed: false,
        pulse: tuning.is_pulse(gates_passed),
        drift_amp: random_between(rng, tuning.drift_amp_min, tuning.drift_amp_max),
        drift_speed: random_between(rng, tuning.drift_speed_min, tuning.drift_speed_max),
        phase: rng.random_range(0.0..std::f32::consts::TAU),
    }
}

fn random_between(rng: &mut Pcg32, a: f32, b: f32) -> f32 {
    rng.random_range(a.min(b)..=a.max(b))
}

/// Score the pass of `run.gates[idx]` and apply pulse relief
fn resolve_gate_pass(run: &mut Run, idx: usize, player_x: f32, tuning: &Tuning) -> GatePass {
    let gate = &run.gates[idx];
    let stats = &mut run.stats;

    stats.gates_passed += 1;
    stats.combo += 1;
    let reward = tuning.pass_reward(stats.combo);
    stats.score += reward;

    let near_miss = gate.edge_distance(player_x) < tuning.near_miss_threshold;
    if near_miss {
        stats.near_misses += 1;
    }

    if gate.pulse {
        run.speed = (run.speed * tuning.pulse_speed_relief).max(tuning.pulse_speed_floor);
        run.speed_target =
            (run.speed_target * tuning.pulse_target_relief).max(tuning.pulse_target_floor);
    }

    GatePass {
        gate_id: gate.id,
        pulse: gate.pulse,
        near_miss,
        reward,
        combo: run.stats.combo,
        score: run.stats.score,
    }
}

/// Demo steering: aim for the gap of the lowest gate the player has not
/// fully cleared yet
pub fn autopilot_target(gates: &[Gate], fallback: f32) -> f32 {
    let clear_line = PLAYER_Y + (PLAYER_SIZE + GATE_HEIGHT) / 2.0;
    gates
        .iter()
        .filter(|g| g.y < clear_line)
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|g| g.gap_center)
        .unwrap_or(fallback)
}
