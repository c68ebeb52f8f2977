//! Game core: lifecycle, side effects and stats broadcast
//!
//! `NeonDrift` owns the simulation state and drives it once per rendered
//! frame. The simulation reports what happened; this layer turns that into
//! audio cues, haptics, persistence writes and bus snapshots.

use std::rc::Rc;

use crate::audio::{SilentSynth, ToneGenerator, ToneSynth};
use crate::events::{EventBus, GamePhase, GameStats};
use crate::persistence::{KeyValueStore, MemoryStore, PersistedProfile, ProfileStore};
use crate::platform::{Clock, Haptics, NoHaptics, SystemClock};
use crate::settings::Settings;
use crate::sim::state::{SHAKE_DURATION, SHAKE_INTENSITY};
use crate::sim::{GatePass, GameState, SimEvent, TickInput, tick};
use crate::tuning::Tuning;

/// Longest frame step simulated at once (tab switches, debugger pauses)
pub const MAX_FRAME_DT: f32 = 0.1;
/// Vibration length on a gate pass
const HAPTIC_PULSE_MS: u32 = 8;
/// Particles emitted when a pulse gate is passed
const PULSE_BURST: usize = 18;

/// Platform services the core calls into
pub struct Services {
    pub store: Box<dyn KeyValueStore>,
    pub synth: Box<dyn ToneSynth>,
    pub haptics: Box<dyn Haptics>,
    pub clock: Box<dyn Clock>,
}

impl Services {
    /// No audio, no vibration, in-memory storage
    pub fn headless() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            synth: Box::new(SilentSynth),
            haptics: Box::new(NoHaptics),
            clock: Box::new(SystemClock),
        }
    }
}

/// The simulation core
pub struct NeonDrift {
    bus: Rc<EventBus>,
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    profile: ProfileStore,
    tones: ToneGenerator,
    haptics: Box<dyn Haptics>,
    phase: GamePhase,
    best: u32,
    streak: u32,
    muted: bool,
    autopilot: bool,
    /// Last published snapshot, for dedup (streak is fixed per session)
    last_emitted: Option<GameStats>,
}

impl NeonDrift {
    /// Read the profile, advance the daily streak and publish the initial
    /// `idle` state and stats.
    pub fn new(bus: Rc<EventBus>, services: Services, tuning: Tuning, seed: u64) -> Self {
        let Services {
            store,
            synth,
            haptics,
            clock,
        } = services;

        let profile = ProfileStore::new(store);
        let settings = Settings::load(profile.store());
        let stored = profile.load();
        let streak = profile.init_daily_streak(clock.today());
        let PersistedProfile { best_score: best, muted, .. } = stored;

        let mut tones = ToneGenerator::new(synth);
        tones.set_muted(muted);
        tones.set_master_volume(settings.master_volume);

        let mut game = Self {
            bus,
            state: GameState::new(seed),
            tuning,
            settings,
            profile,
            tones,
            haptics,
            phase: GamePhase::Idle,
            best,
            streak,
            muted,
            autopilot: false,
            last_emitted: None,
        };

        log::info!("Neon Drift ready (best {}, streak {}, muted {})", best, streak, muted);
        game.emit_stats(false);
        game.bus.emit_state(GamePhase::Idle);
        game
    }

    /// Begin the first run; no-op while a run is active
    pub fn start(&mut self) {
        if self.phase == GamePhase::Running {
            return;
        }
        self.begin_run();
    }

    /// Force a fresh run from any state
    pub fn restart(&mut self) {
        self.begin_run();
    }

    /// Flip and persist the mute flag, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.profile.set_muted(self.muted);
        self.tones.set_muted(self.muted);
        log::info!("Muted: {}", self.muted);
        self.muted
    }

    /// Continuous pointer input; clamped, never rejected
    pub fn set_pointer_target(&mut self, x: f32) {
        self.state.player.set_target(x, &self.tuning);
    }

    /// Demo mode: steer automatically toward the next gap
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Replace and persist effect settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.tones.set_master_volume(settings.master_volume);
        settings.save(self.profile.store());
        self.settings = settings;
    }

    /// Advance one rendered frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let input = TickInput {
            autopilot: self.autopilot,
        };
        for event in tick(&mut self.state, &input, &self.tuning, dt) {
            match event {
                SimEvent::GateSpawned { gate_id, pulse } => {
                    log::debug!("Gate {} spawned (pulse: {})", gate_id, pulse);
                }
                SimEvent::GatePassed(pass) => self.on_gate_pass(pass),
                SimEvent::Collision { gate_id } => self.end_run(gate_id),
            }
        }
    }

    /// Release all per-run resources and in-flight effects. Bus
    /// subscriptions belong to the shell and are left alone.
    pub fn destroy(mut self) {
        self.state.clear();
        log::info!("Neon Drift destroyed");
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Simulation state, for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable simulation state, for tooling and scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Current snapshot, as it would be published
    pub fn stats(&self) -> GameStats {
        let run = self.state.stats();
        GameStats {
            score: run.score,
            best: self.best,
            combo: run.combo,
            gates: run.gates_passed,
            streak: self.streak,
            near_misses: run.near_misses,
        }
    }

    fn begin_run(&mut self) {
        self.state.start_run(&self.tuning);
        self.emit_stats(true);
        self.phase = GamePhase::Running;
        self.bus.emit_state(GamePhase::Running);
        log::info!("Run started");
    }

    fn on_gate_pass(&mut self, pass: GatePass) {
        if pass.near_miss && self.settings.effective_screen_shake() {
            self.state.fx.shake(SHAKE_DURATION, SHAKE_INTENSITY);
        }

        self.tones.play_click();
        if pass.combo > 1 && pass.combo % self.tuning.combo_cue_period.max(1) == 0 {
            self.tones
                .play_combo(pass.combo.min(self.tuning.combo_tier_cap));
        }

        if pass.pulse {
            self.tones.play_pulse();
            if self.settings.particles {
                let at = self.state.player.pos();
                self.state.fx.burst(at, PULSE_BURST, &mut self.state.rng);
            }
            if self.settings.effective_scale_pulse() {
                self.state.fx.start_scale_pulse();
            }
        }

        if self.settings.haptics {
            self.haptics.vibrate(HAPTIC_PULSE_MS);
        }

        if pass.score > self.best {
            self.best = pass.score;
            self.profile.set_best_score(self.best);
        }

        self.emit_stats(false);
    }

    fn end_run(&mut self, gate_id: u32) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.tones.play_fail();
        self.phase = GamePhase::Over;
        let stats = self.stats();
        log::info!(
            "Run over at gate {}: score {}, gates {}, best {}",
            gate_id,
            stats.score,
            stats.gates,
            stats.best
        );
        self.bus.emit_state(GamePhase::Over);
        self.emit_stats(true);
    }

    fn emit_stats(&mut self, force: bool) {
        let stats = self.stats();
        if !force && self.last_emitted == Some(stats) {
            return;
        }
        self.last_emitted = Some(stats);
        self.bus.emit_stats(&stats);
    }
}
