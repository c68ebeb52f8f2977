//! Durable player profile
//!
//! Features:
//! - Key-value storage abstraction (browser LocalStorage, in-memory)
//! - Best score and mute flag
//! - Daily play streak computed from calendar dates

pub mod profile;
pub mod storage;

pub use profile::{PersistedProfile, ProfileStore, keys, next_streak};
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
