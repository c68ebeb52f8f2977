//! Best score, mute flag and daily streak
//!
//! Values are stored as plain strings under fixed keys so the profile stays
//! readable in browser dev tools. Unparsable values read as defaults.

use chrono::NaiveDate;

use super::storage::KeyValueStore;

/// Storage keys
pub mod keys {
    pub const BEST: &str = "nd_best";
    pub const STREAK: &str = "nd_streak";
    pub const LAST_DATE: &str = "nd_last_date";
    pub const MUTE: &str = "nd_mute";
    pub const SETTINGS: &str = "nd_settings";
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything the profile keeps across sessions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedProfile {
    pub best_score: u32,
    pub streak: u32,
    pub last_played: Option<NaiveDate>,
    pub muted: bool,
}

/// Streak after playing on `today`, given the stored streak and last date.
///
/// Same day keeps the streak (at least 1), the day after extends it, and
/// anything else (gap, missing date, date in the future) starts over at 1.
pub fn next_streak(previous: u32, last_played: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last) = last_played else {
        return 1;
    };
    match (today - last).num_days() {
        0 => previous.max(1),
        1 => previous.saturating_add(1),
        _ => 1,
    }
}

/// Profile adapter over a key-value store
pub struct ProfileStore {
    store: Box<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Underlying store (for settings and other auxiliary keys)
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn best_score(&self) -> u32 {
        self.read_u32(keys::BEST)
    }

    pub fn set_best_score(&self, score: u32) {
        self.store.set(keys::BEST, &score.to_string());
    }

    pub fn muted(&self) -> bool {
        self.store.get(keys::MUTE).as_deref() == Some("1")
    }

    pub fn set_muted(&self, muted: bool) {
        self.store.set(keys::MUTE, if muted { "1" } else { "0" });
    }

    /// Stored streak without updating it
    pub fn streak(&self) -> u32 {
        self.read_u32(keys::STREAK)
    }

    pub fn last_played(&self) -> Option<NaiveDate> {
        let raw = self.store.get(keys::LAST_DATE)?;
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                log::warn!("Ignoring unparsable last-played date '{}'", raw);
                None
            }
        }
    }

    /// Advance the daily streak for a session on `today` and persist both the
    /// new streak and today's date.
    pub fn init_daily_streak(&self, today: NaiveDate) -> u32 {
        let streak = next_streak(self.streak(), self.last_played(), today);
        self.store.set(keys::STREAK, &streak.to_string());
        self.store
            .set(keys::LAST_DATE, &today.format(DATE_FORMAT).to_string());
        log::info!("Daily streak: {}", streak);
        streak
    }

    /// Snapshot of the stored profile (does not touch the streak)
    pub fn load(&self) -> PersistedProfile {
        PersistedProfile {
            best_score: self.best_score(),
            streak: self.streak(),
            last_played: self.last_played(),
            muted: self.muted(),
        }
    }

    fn read_u32(&self, key: &str) -> u32 {
        let Some(raw) = self.store.get(key) else {
            return 0;
        };
        raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable value '{}' for '{}'", raw, key);
            0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn profile_with(entries: &[(&str, &str)]) -> (ProfileStore, MemoryStore) {
        let store = MemoryStore::with_entries(entries.iter().copied());
        (ProfileStore::new(Box::new(store.clone())), store)
    }

    #[test]
    fn test_streak_same_day_kept() {
        let (profile, _) = profile_with(&[(keys::STREAK, "3"), (keys::LAST_DATE, "2024-05-10")]);
        assert_eq!(profile.init_daily_streak(date("2024-05-10")), 3);
    }

    #[test]
    fn test_streak_same_day_at_least_one() {
        let (profile, _) = profile_with(&[(keys::STREAK, "0"), (keys::LAST_DATE, "2024-05-10")]);
        assert_eq!(profile.init_daily_streak(date("2024-05-10")), 1);
    }

    #[test]
    fn test_streak_yesterday_increments() {
        let (profile, store) =
            profile_with(&[(keys::STREAK, "3"), (keys::LAST_DATE, "2024-05-09")]);
        assert_eq!(profile.init_daily_streak(date("2024-05-10")), 4);
        assert_eq!(store.get(keys::STREAK).as_deref(), Some("4"));
        assert_eq!(store.get(keys::LAST_DATE).as_deref(), Some("2024-05-10"));
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let (profile, _) = profile_with(&[(keys::STREAK, "7"), (keys::LAST_DATE, "2024-02-29")]);
        assert_eq!(profile.init_daily_streak(date("2024-03-01")), 8);
    }

    #[test]
    fn test_streak_gap_resets() {
        let (profile, _) = profile_with(&[(keys::STREAK, "9"), (keys::LAST_DATE, "2024-05-05")]);
        assert_eq!(profile.init_daily_streak(date("2024-05-10")), 1);
    }

    #[test]
    fn test_streak_no_history_is_one() {
        let (profile, store) = profile_with(&[]);
        assert_eq!(profile.init_daily_streak(date("2024-05-10")), 1);
        assert_eq!(store.get(keys::STREAK).as_deref(), Some("1"));
    }

    #[test]
    fn test_streak_future_date_resets() {
        let (profile, _) = profile_with(&[(keys::STREAK, "4"), (keys::LAST_DATE, "2024-05-11")]);
        assert_eq!(profile.init_daily_streak(date("2024-05-10")), 1);
    }

    #[test]
    fn test_streak_garbage_date_resets() {
        let (profile, _) = profile_with(&[(keys::STREAK, "4"), (keys::LAST_DATE, "tuesday")]);
        assert_eq!(profile.init_daily_streak(date("2024-05-10")), 1);
    }

    #[test]
    fn test_best_score_roundtrip_and_garbage() {
        let (profile, store) = profile_with(&[(keys::BEST, "not a number")]);
        assert_eq!(profile.best_score(), 0);
        profile.set_best_score(120);
        assert_eq!(store.get(keys::BEST).as_deref(), Some("120"));
        assert_eq!(profile.best_score(), 120);
    }

    #[test]
    fn test_mute_flag_encoding() {
        let (profile, store) = profile_with(&[]);
        assert!(!profile.muted());
        profile.set_muted(true);
        assert_eq!(store.get(keys::MUTE).as_deref(), Some("1"));
        assert!(profile.muted());
        profile.set_muted(false);
        assert_eq!(store.get(keys::MUTE).as_deref(), Some("0"));
    }

    #[test]
    fn test_load_snapshot() {
        let (profile, _) = profile_with(&[
            (keys::BEST, "42"),
            (keys::STREAK, "2"),
            (keys::LAST_DATE, "2024-01-02"),
            (keys::MUTE, "1"),
        ]);
        assert_eq!(
            profile.load(),
            PersistedProfile {
                best_score: 42,
                streak: 2,
                last_played: Some(date("2024-01-02")),
                muted: true,
            }
        );
    }
}
