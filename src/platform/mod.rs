//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Haptics (navigator.vibrate on web, no-op elsewhere)
//! - Calendar date for the daily streak
//!
//! Unsupported capabilities are silent no-ops, never errors.

use chrono::NaiveDate;

/// Short vibration pulses
pub trait Haptics {
    fn vibrate(&self, millis: u32);
}

/// Source of "today" for the daily streak
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Haptics for platforms without a vibration motor
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, _millis: u32) {}
}

/// Calendar date in UTC (matches ISO date keys written by earlier sessions)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// `navigator.vibrate`, when the browser exposes it
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHaptics;

#[cfg(target_arch = "wasm32")]
impl Haptics for WebHaptics {
    fn vibrate(&self, millis: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let navigator = window.navigator();
        // Safari has no vibrate at all; calling it through web-sys would throw.
        let has_vibrate = js_sys::Reflect::has(&navigator, &"vibrate".into()).unwrap_or(false);
        if has_vibrate {
            let _ = navigator.vibrate_with_duration(millis);
        }
    }
}
