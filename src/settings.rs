//! Player preferences for cosmetic effects
//!
//! Persisted as JSON next to the profile. None of these change scoring.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys};

/// Effect toggles and volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Camera shake on near misses
    pub screen_shake: bool,
    /// Vibration on gate passes
    pub haptics: bool,
    /// Particle bursts on pulse gates
    pub particles: bool,
    /// Reduced motion (no shake, no scale pulse)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            screen_shake: true,
            haptics: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective player scale pulse (respects reduced_motion)
    pub fn effective_scale_pulse(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings, falling back to defaults when missing or corrupt
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(keys::SETTINGS) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Discarding corrupt settings: {}", e),
            }
        }
        Self::default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(keys::SETTINGS, &json);
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_scale_pulse());
        assert!(Settings::default().effective_screen_shake());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let settings = Settings {
            master_volume: 0.4,
            haptics: false,
            ..Default::default()
        };
        settings.save(&store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let store = MemoryStore::with_entries([(keys::SETTINGS, "{nope")]);
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
