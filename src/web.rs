//! Browser bindings
//!
//! `WebGame` is what the page script holds: it wires the core to
//! LocalStorage, Web Audio and the vibration API, and forwards bus events
//! to JS callbacks. Rendering stays on the JS side.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::audio::WebAudioSynth;
use crate::bridge::GameBridge;
use crate::events::{EventBus, SubscriptionId};
use crate::game::{NeonDrift, Services};
use crate::persistence::LocalStore;
use crate::platform::{SystemClock, WebHaptics};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

#[wasm_bindgen]
pub struct WebGame {
    bus: Rc<EventBus>,
    bridge: GameBridge,
    tuning: Tuning,
    subscriptions: Vec<SubscriptionId>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create the game. `tuning_json` may override difficulty constants.
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> WebGame {
        let tuning = match tuning_json.as_deref().map(Tuning::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid tuning: {}", e);
                Tuning::default()
            }
            None => Tuning::default(),
        };
        Self {
            bus: Rc::new(EventBus::new()),
            bridge: GameBridge::new(),
            tuning,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe to stats snapshots (a plain object with camelCase keys)
    pub fn on_stats(&mut self, callback: js_sys::Function) {
        let id = self.bus.subscribe_stats(move |stats| {
            let value = serde_json::to_string(stats)
                .ok()
                .and_then(|json| js_sys::JSON::parse(&json).ok());
            if let Some(value) = value {
                if callback.call1(&JsValue::NULL, &value).is_err() {
                    log::warn!("stats listener threw");
                }
            }
        });
        self.subscriptions.push(id);
    }

    /// Subscribe to lifecycle changes ("idle", "running", "over")
    pub fn on_state(&mut self, callback: js_sys::Function) {
        let id = self.bus.subscribe_state(move |phase| {
            if callback
                .call1(&JsValue::NULL, &JsValue::from_str(phase.as_str()))
                .is_err()
            {
                log::warn!("state listener threw");
            }
        });
        self.subscriptions.push(id);
    }

    /// Drop every JS listener registered through this handle
    pub fn off_all(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
    }

    /// Attach the core. Call after registering listeners so the initial
    /// `idle` state and stats reach them.
    pub fn boot(&mut self) {
        if self.bridge.is_ready() || self.bridge.is_destroyed() {
            return;
        }
        let services = Services {
            store: Box::new(LocalStore::new()),
            synth: Box::new(WebAudioSynth::new()),
            haptics: Box::new(WebHaptics),
            clock: Box::new(SystemClock),
        };
        let seed = js_sys::Date::now() as u64;
        let core = NeonDrift::new(self.bus.clone(), services, self.tuning.clone(), seed);
        log::info!("Game initialized with seed: {}", seed);
        self.bridge.attach(core);
    }

    pub fn start(&mut self) {
        self.bridge.start();
    }

    pub fn restart(&mut self) {
        self.bridge.restart();
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.bridge.toggle_mute()
    }

    pub fn is_muted(&self) -> bool {
        self.bridge.is_muted()
    }

    /// Pointer x in arena pixels
    pub fn set_pointer_target(&mut self, x: f32) {
        self.bridge.set_pointer_target(x);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.bridge.set_autopilot(enabled);
    }

    /// Advance one animation frame, `dt_ms` as given by requestAnimationFrame
    pub fn frame(&mut self, dt_ms: f64) {
        self.bridge.frame((dt_ms / 1000.0) as f32);
    }

    /// Current simulation state as JSON, for the renderer
    pub fn snapshot(&self) -> JsValue {
        let Some(core) = self.bridge.core() else {
            return JsValue::NULL;
        };
        let state = core.state();
        let view = serde_json::json!({
            "time": state.time,
            "player": state.player,
            "playerScale": state.fx.player_scale(),
            "gates": state.gates(),
            "fx": state.fx,
        });
        js_sys::JSON::parse(&view.to_string()).unwrap_or(JsValue::NULL)
    }

    pub fn destroy(&mut self) {
        self.bridge.destroy();
    }
}
