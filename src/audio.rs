//! Synthesized tone cues
//!
//! Every cue is one short triangle-wave tone with an exponential fade, so
//! no audio files are needed. Tones are fire-and-forget: each owns its own
//! oscillator and overlapping cues simply play together.

/// Gameplay cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Gate passed
    Click,
    /// Combo milestone, pitched by tier
    Combo { tier: u32 },
    /// Pulse gate passed
    Pulse,
    /// Collision, run over
    Fail,
}

/// One synthesized tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Seconds until the oscillator stops
    pub duration: f32,
    /// Peak gain before the fade
    pub volume: f32,
}

const DEFAULT_VOLUME: f32 = 0.08;

impl SoundEffect {
    /// The fixed tone for this cue
    pub fn tone(&self) -> Tone {
        match *self {
            SoundEffect::Click => Tone {
                frequency: 520.0,
                duration: 0.08,
                volume: DEFAULT_VOLUME,
            },
            SoundEffect::Combo { tier } => Tone {
                frequency: 620.0 + tier as f32 * 40.0,
                duration: 0.12,
                volume: DEFAULT_VOLUME,
            },
            SoundEffect::Pulse => Tone {
                frequency: 420.0,
                duration: 0.18,
                volume: 0.1,
            },
            SoundEffect::Fail => Tone {
                frequency: 180.0,
                duration: 0.25,
                volume: 0.1,
            },
        }
    }
}

/// Something that can turn a `Tone` into sound
pub trait ToneSynth {
    fn play_tone(&self, tone: &Tone);
}

/// Synth for headless runs and platforms without audio
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSynth;

impl ToneSynth for SilentSynth {
    fn play_tone(&self, _tone: &Tone) {}
}

/// Plays cues through a synth, honoring mute and master volume
pub struct ToneGenerator {
    synth: Box<dyn ToneSynth>,
    master_volume: f32,
    muted: bool,
}

impl ToneGenerator {
    pub fn new(synth: Box<dyn ToneSynth>) -> Self {
        Self {
            synth,
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a cue; silently does nothing while muted
    pub fn play(&self, effect: SoundEffect) {
        if self.muted || self.master_volume <= 0.0 {
            return;
        }
        let mut tone = effect.tone();
        tone.volume *= self.master_volume;
        self.synth.play_tone(&tone);
    }

    pub fn play_click(&self) {
        self.play(SoundEffect::Click);
    }

    pub fn play_combo(&self, tier: u32) {
        self.play(SoundEffect::Combo { tier });
    }

    pub fn play_pulse(&self) {
        self.play(SoundEffect::Pulse);
    }

    pub fn play_fail(&self) {
        self.play(SoundEffect::Fail);
    }
}

/// Web Audio synth. The context is created on first use, since browsers only
/// allow audio after a user gesture.
#[cfg(target_arch = "wasm32")]
pub struct WebAudioSynth {
    ctx: std::cell::RefCell<Option<web_sys::AudioContext>>,
}

#[cfg(target_arch = "wasm32")]
impl Default for WebAudioSynth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl WebAudioSynth {
    pub fn new() -> Self {
        Self {
            ctx: std::cell::RefCell::new(None),
        }
    }

    fn context(&self) -> Option<web_sys::AudioContext> {
        let mut slot = self.ctx.borrow_mut();
        if slot.is_none() {
            match web_sys::AudioContext::new() {
                Ok(ctx) => *slot = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    return None;
                }
            }
        }
        let ctx = slot.clone()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }
}

#[cfg(target_arch = "wasm32")]
impl ToneSynth for WebAudioSynth {
    fn play_tone(&self, tone: &Tone) {
        use web_sys::OscillatorType;

        let Some(ctx) = self.context() else { return };
        let Ok(osc) = ctx.create_oscillator() else { return };
        let Ok(gain) = ctx.create_gain() else { return };

        osc.set_type(OscillatorType::Triangle);
        osc.frequency().set_value(tone.frequency);
        gain.gain().set_value(tone.volume);
        if osc.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }

        let t = ctx.current_time();
        let end = t + tone.duration as f64;
        gain.gain().set_value_at_time(tone.volume, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.0001, end).ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(end).ok();
    }
}
