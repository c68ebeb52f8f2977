//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Scoring counters for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u32,
    /// Consecutive passes since the run started or the last collision
    pub combo: u32,
    pub gates_passed: u32,
    pub near_misses: u32,
}

/// A pair of barriers leaving a gap the player must slide through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    /// Vertical center shared by both barriers
    pub y: f32,
    pub gap_center: f32,
    pub gap_width: f32,
    /// Descent rate, frozen at spawn
    pub speed: f32,
    /// Set once when the gate reaches the player's row
    pub passed: bool,
    /// Bonus gate (every Nth spawn)
    pub pulse: bool,
    pub drift_amp: f32,
    pub drift_speed: f32,
    pub phase: f32,
}

impl Gate {
    pub fn gap_left(&self) -> f32 {
        self.gap_center - self.gap_width / 2.0
    }

    pub fn gap_right(&self) -> f32 {
        self.gap_center + self.gap_width / 2.0
    }

    /// Width of the left barrier (from x = 0 to the gap)
    pub fn left_width(&self) -> f32 {
        self.gap_left()
    }

    /// Width of the right barrier (from the gap to the right wall)
    pub fn right_width(&self) -> f32 {
        GAME_WIDTH - self.gap_right()
    }

    pub fn left_rect(&self) -> Aabb {
        self.left_span(self.y, self.y)
    }

    pub fn right_rect(&self) -> Aabb {
        self.right_span(self.y, self.y)
    }

    /// Whether either barrier overlaps `other`
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left_rect().overlaps(other) || self.right_rect().overlaps(other)
    }

    /// Whether either barrier touched `other` anywhere on its way from
    /// `prev_y` to the current `y`
    pub fn swept_overlaps(&self, prev_y: f32, other: &Aabb) -> bool {
        let (from, to) = (prev_y.min(self.y), prev_y.max(self.y));
        self.left_span(from, to).overlaps(other) || self.right_span(from, to).overlaps(other)
    }

    fn left_span(&self, from: f32, to: f32) -> Aabb {
        Aabb::new(
            Vec2::new(0.0, from - GATE_HEIGHT / 2.0),
            Vec2::new(self.left_width(), to + GATE_HEIGHT / 2.0),
        )
    }

    fn right_span(&self, from: f32, to: f32) -> Aabb {
        Aabb::new(
            Vec2::new(GAME_WIDTH - self.right_width(), from - GATE_HEIGHT / 2.0),
            Vec2::new(GAME_WIDTH, to + GATE_HEIGHT / 2.0),
        )
    }

    /// Distance from `x` to the nearer gap edge
    pub fn edge_distance(&self, x: f32) -> f32 {
        (x - self.gap_left()).abs().min((x - self.gap_right()).abs())
    }

    /// Allowed range for the gap center so the gap stays inside the arena
    pub fn center_bounds(gap_width: f32, tuning: &Tuning) -> (f32, f32) {
        let lo = tuning.gap_center_margin.max(gap_width / 2.0);
        let hi = (GAME_WIDTH - tuning.gap_center_margin).min(GAME_WIDTH - gap_width / 2.0);
        if lo <= hi {
            (lo, hi)
        } else {
            (GAME_WIDTH / 2.0, GAME_WIDTH / 2.0)
        }
    }

    /// Integrate sinusoidal drift of the gap center over `dt`, then clamp
    pub fn drift(&mut self, now: f32, dt: f32, tuning: &Tuning) {
        let drift = (now * self.drift_speed + self.phase).sin() * self.drift_amp;
        let (lo, hi) = Self::center_bounds(self.gap_width, tuning);
        self.gap_center = (self.gap_center + drift * dt).clamp(lo, hi);
    }
}

/// The player's marker. Survives run resets so it never teleports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    /// Pointer-driven target, already clamped
    pub target_x: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: GAME_WIDTH / 2.0,
            target_x: GAME_WIDTH / 2.0,
        }
    }
}

impl Player {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, PLAYER_Y)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos(), Vec2::splat(PLAYER_SIZE))
    }

    /// Set the pointer target, clamped to the playable band
    pub fn set_target(&mut self, x: f32, tuning: &Tuning) {
        let margin = tuning.pointer_margin.clamp(0.0, GAME_WIDTH / 2.0);
        // NaN from a broken pointer event keeps the previous target
        if x.is_finite() {
            self.target_x = x.clamp(margin, GAME_WIDTH - margin);
        } else if x.is_infinite() {
            self.target_x = if x > 0.0 { GAME_WIDTH - margin } else { margin };
        }
    }
}

/// One run from start until collision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub stats: RunStats,
    pub speed: f32,
    pub speed_target: f32,
    pub spawn_timer: f32,
    /// Seconds since the run started
    pub run_time: f32,
    pub running: bool,
    /// Live gates in spawn order
    pub gates: Vec<Gate>,
    next_gate_id: u32,
}

impl Run {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            stats: RunStats::default(),
            speed: tuning.base_speed,
            speed_target: tuning.base_speed,
            spawn_timer: 0.0,
            run_time: 0.0,
            running: true,
            gates: Vec::new(),
            next_gate_id: 1,
        }
    }

    pub fn next_gate_id(&mut self) -> u32 {
        let id = self.next_gate_id;
        self.next_gate_id += 1;
        id
    }
}

/// A cosmetic particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub size: f32,
}

/// Maximum live particles
pub const MAX_PARTICLES: usize = 128;
/// Seconds a particle lives
pub const PARTICLE_LIFESPAN: f32 = 0.42;
/// Camera shake duration (seconds) and intensity (fraction of the view)
pub const SHAKE_DURATION: f32 = 0.06;
pub const SHAKE_INTENSITY: f32 = 0.002;
/// Player scale pulse: up to 1.2x and back, 120 ms each way
pub const SCALE_PULSE_PEAK: f32 = 1.2;
pub const SCALE_PULSE_HALF: f32 = 0.12;

/// Visual effects. Nothing here feeds back into gameplay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fx {
    /// Background grid scroll (px, grows downward)
    pub scroll_offset: f32,
    /// Remaining camera shake (seconds)
    pub shake_time: f32,
    pub shake_intensity: f32,
    /// Elapsed time of the current scale pulse, if any
    pub scale_pulse: Option<f32>,
    pub particles: Vec<Particle>,
}

impl Fx {
    pub fn shake(&mut self, duration: f32, intensity: f32) {
        self.shake_time = self.shake_time.max(duration);
        self.shake_intensity = intensity;
    }

    /// Current shake intensity (0 when idle)
    pub fn shake_amount(&self) -> f32 {
        if self.shake_time > 0.0 {
            self.shake_intensity
        } else {
            0.0
        }
    }

    pub fn start_scale_pulse(&mut self) {
        self.scale_pulse = Some(0.0);
    }

    /// Player scale for rendering
    pub fn player_scale(&self) -> f32 {
        let Some(t) = self.scale_pulse else {
            return 1.0;
        };
        let phase = if t < SCALE_PULSE_HALF {
            t / SCALE_PULSE_HALF
        } else {
            (2.0 * SCALE_PULSE_HALF - t) / SCALE_PULSE_HALF
        };
        // sine-out toward the peak
        let eased = (phase.clamp(0.0, 1.0) * std::f32::consts::FRAC_PI_2).sin();
        1.0 + (SCALE_PULSE_PEAK - 1.0) * eased
    }

    /// Emit `count` particles at `at`, evicting the oldest past the cap
    pub fn burst(&mut self, at: Vec2, count: usize, rng: &mut Pcg32) {
        let count = count.min(MAX_PARTICLES);
        let overflow = (self.particles.len() + count).saturating_sub(MAX_PARTICLES);
        self.particles.drain(..overflow);
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(40.0..=140.0);
            self.particles.push(Particle {
                pos: at,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                size: 0.8,
            });
        }
    }

    /// Advance effects by `dt`, whether or not a run is active
    pub fn update(&mut self, dt: f32) {
        self.shake_time = (self.shake_time - dt).max(0.0);

        if let Some(t) = self.scale_pulse {
            let t = t + dt;
            self.scale_pulse = (t < 2.0 * SCALE_PULSE_HALF).then_some(t);
        }

        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.life -= dt / PARTICLE_LIFESPAN;
            particle.size = 0.8 * particle.life.max(0.0);
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Drop everything in flight (teardown)
    pub fn clear(&mut self) {
        self.shake_time = 0.0;
        self.scale_pulse = None;
        self.particles.clear();
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng_state: RngState,
    pub rng: Pcg32,
    /// Seconds since the game was created (drives gate drift)
    pub time: f64,
    pub player: Player,
    /// `None` until the first run starts
    pub run: Option<Run>,
    pub fx: Fx,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            time: 0.0,
            player: Player::default(),
            run: None,
            fx: Fx::default(),
        }
    }

    /// Replace any current run with a fresh one (clears all gates)
    pub fn start_run(&mut self, tuning: &Tuning) {
        self.run = Some(Run::new(tuning));
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.running)
    }

    /// Counters of the current or last run (zero before the first run)
    pub fn stats(&self) -> RunStats {
        self.run.as_ref().map(|r| r.stats).unwrap_or_default()
    }

    pub fn gates(&self) -> &[Gate] {
        self.run.as_ref().map(|r| r.gates.as_slice()).unwrap_or(&[])
    }

    /// Release per-run resources and in-flight effects
    pub fn clear(&mut self) {
        self.run = None;
        self.fx.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(center: f32, width: f32, y: f32) -> Gate {
        Gate {
            id: 1,
            y,
            gap_center: center,
            gap_width: width,
            speed: 160.0,
            passed: false,
            pulse: false,
            drift_amp: 0.0,
            drift_speed: 1.0,
            phase: 0.0,
        }
    }

    #[test]
    fn test_barrier_geometry() {
        let g = gate(180.0, 100.0, 50.0);
        assert_eq!(g.left_width(), 130.0);
        assert_eq!(g.right_width(), 130.0);
        assert_eq!(g.right_rect().min.x, 230.0);
        assert_eq!(g.left_rect().height(), GATE_HEIGHT);
    }

    #[test]
    fn test_player_in_gap_does_not_collide() {
        let g = gate(180.0, 100.0, PLAYER_Y);
        let player = Player::default();
        assert!(!g.overlaps(&player.aabb()));
    }

    #[test]
    fn test_player_under_barrier_collides() {
        let g = gate(300.0, 80.0, PLAYER_Y);
        let player = Player::default();
        assert!(g.overlaps(&player.aabb()));
    }

    #[test]
    fn test_drift_is_clamped() {
        let tuning = Tuning::default();
        let mut g = gate(279.0, 140.0, 0.0);
        g.drift_amp = 12.0;
        g.phase = std::f32::consts::FRAC_PI_2;
        for _ in 0..10_000 {
            g.drift(0.0, 1.0, &tuning);
        }
        assert_eq!(g.gap_center, 280.0);
        assert!(g.gap_right() <= GAME_WIDTH);
    }

    #[test]
    fn test_pointer_target_clamped() {
        let tuning = Tuning::default();
        let mut p = Player::default();
        p.set_target(-50.0, &tuning);
        assert_eq!(p.target_x, 20.0);
        p.set_target(9999.0, &tuning);
        assert_eq!(p.target_x, 340.0);
        p.set_target(f32::NAN, &tuning);
        assert_eq!(p.target_x, 340.0);
        p.set_target(f32::NEG_INFINITY, &tuning);
        assert_eq!(p.target_x, 20.0);
    }

    #[test]
    fn test_scale_pulse_peaks_and_ends() {
        let mut fx = Fx::default();
        fx.start_scale_pulse();
        fx.update(SCALE_PULSE_HALF);
        assert!((fx.player_scale() - SCALE_PULSE_PEAK).abs() < 1e-4);
        fx.update(SCALE_PULSE_HALF + 0.01);
        assert_eq!(fx.scale_pulse, None);
        assert_eq!(fx.player_scale(), 1.0);
    }

    #[test]
    fn test_particles_expire() {
        let mut fx = Fx::default();
        let mut rng = Pcg32::seed_from_u64(7);
        fx.burst(Vec2::ZERO, 18, &mut rng);
        assert_eq!(fx.particles.len(), 18);
        fx.update(PARTICLE_LIFESPAN + 0.01);
        assert!(fx.particles.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut fx = Fx::default();
        let mut rng = Pcg32::seed_from_u64(7);
        fx.burst(Vec2::ZERO, MAX_PARTICLES + 20, &mut rng);
        assert_eq!(fx.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_burst_evicts_oldest() {
        let mut fx = Fx::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let old = Vec2::new(1.0, 1.0);
        let new = Vec2::new(2.0, 2.0);
        fx.burst(old, MAX_PARTICLES - 4, &mut rng);
        fx.burst(new, 18, &mut rng);
        assert_eq!(fx.particles.len(), MAX_PARTICLES);
        assert_eq!(fx.particles.iter().filter(|p| p.pos == new).count(), 18);
        assert_eq!(fx.particles.last().map(|p| p.pos), Some(new));
    }

    #[test]
    fn test_swept_barrier_hits_player_it_jumped_over() {
        let player = Player::default();
        let mut g = gate(300.0, 80.0, PLAYER_Y - 23.0);
        assert!(!g.overlaps(&player.aabb()));
        g.y = PLAYER_Y + 27.0;
        assert!(!g.overlaps(&player.aabb()));
        assert!(g.swept_overlaps(PLAYER_Y - 23.0, &player.aabb()));
    }

    #[test]
    fn test_swept_barrier_misses_player_in_gap() {
        let player = Player::default();
        let g = gate(180.0, 100.0, PLAYER_Y + 27.0);
        assert!(!g.swept_overlaps(PLAYER_Y - 23.0, &player.aabb()));
    }
}
