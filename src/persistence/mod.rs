//! Local key-value persistence
//!
//! Features:
//! - `KeyValueStore` abstraction (in-memory, browser LocalStorage)
//! - JSON values via serde
//! - Corruption tolerance: unreadable values are treated as absent
//!
//! [`LocalStore`] layers the identity provider, session recorder and
//! high-score store on top of any key-value backend.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use thiserror::Error;

use crate::consts::{HIGH_SCORE_KEY, HISTORY_KEY, IDENTITY_KEY};
use crate::records::{
    GameResult, HighScoreStore, History, Identity, IdentityProvider, SessionRecorder,
};

/// Storage failures (always absorbed by callers, never fatal)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected write to `{0}`")]
    Rejected(String),
    #[error("corrupt value under `{key}`: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Read and decode a JSON value (`Ok(None)` when the key is absent)
pub fn read_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key) {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn write_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// Identity, history and high score backed by a key-value store
#[derive(Debug)]
pub struct LocalStore<K> {
    store: K,
    history: History,
}

impl<K: KeyValueStore> LocalStore<K> {
    /// Wrap a store, loading the play history (corrupt history starts fresh)
    pub fn new(store: K) -> Self {
        let history = match read_json::<History>(&store, HISTORY_KEY) {
            Ok(Some(history)) => {
                log::info!("Loaded {} history entries", history.len());
                history
            }
            Ok(None) => History::new(),
            Err(e) => {
                log::warn!("{}; starting with empty history", e);
                History::new()
            }
        };
        Self { store, history }
    }

    /// Persist a validated identity as the current player
    pub fn log_in(&mut self, identity: Identity) {
        log::info!("Player logged in: {}", identity.name);
        if let Err(e) = write_json(&mut self.store, IDENTITY_KEY, &identity) {
            log::warn!("Identity not saved: {}", e);
        }
    }

    pub fn log_out(&mut self) {
        self.store.remove(IDENTITY_KEY);
        log::info!("Player logged out");
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut K {
        &mut self.store
    }
}

impl<K: KeyValueStore> IdentityProvider for LocalStore<K> {
    fn current_identity(&self) -> Option<Identity> {
        match read_json(&self.store, IDENTITY_KEY) {
            Ok(identity) => identity,
            Err(e) => {
                log::warn!("{}; treating player as logged out", e);
                None
            }
        }
    }
}

impl<K: KeyValueStore> SessionRecorder for LocalStore<K> {
    fn record_result(&mut self, result: GameResult) {
        let entry = self.history.push(result);
        log::info!(
            "Recorded result {} for {}: {} ({:?})",
            entry.id,
            entry.result.player.name,
            entry.result.final_score,
            entry.result.status
        );
        if let Err(e) = write_json(&mut self.store, HISTORY_KEY, &self.history) {
            log::warn!("History not saved: {}", e);
        }
    }
}

impl<K: KeyValueStore> HighScoreStore for LocalStore<K> {
    fn load_high_score(&self) -> u32 {
        let Some(raw) = self.store.get(HIGH_SCORE_KEY) else {
            return 0;
        };
        match raw.trim().parse() {
            Ok(score) => score,
            Err(_) => {
                log::warn!("Corrupt high score `{}`, treating as 0", raw);
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u32) {
        match self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score saved: {}", score),
            Err(e) => log::warn!("High score not saved: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CompletionStatus;

    fn alice() -> Identity {
        Identity::new("Alice", "alice@example.com", "555").unwrap()
    }

    #[test]
    fn test_identity_log_in_out() {
        let mut local = LocalStore::new(MemoryStore::default());
        assert_eq!(local.current_identity(), None);

        local.log_in(alice());
        assert_eq!(local.current_identity(), Some(alice()));

        local.log_out();
        assert_eq!(local.current_identity(), None);
    }

    #[test]
    fn test_history_survives_reload() {
        let mut local = LocalStore::new(MemoryStore::default());
        local.record_result(GameResult::new(alice(), 90, CompletionStatus::Incomplete, 10.0));
        local.record_result(GameResult::new(alice(), 3000, CompletionStatus::Completed, 20.0));

        let reloaded = LocalStore::new(local.store().clone());
        assert_eq!(reloaded.history().len(), 2);
        assert_eq!(reloaded.history().entries()[1].result.final_score, 3000);
    }

    #[test]
    fn test_corrupt_values_are_absent() {
        let mut store = MemoryStore::default();
        store.set(HISTORY_KEY, "{{{").unwrap();
        store.set(HIGH_SCORE_KEY, "lots").unwrap();
        store.set(IDENTITY_KEY, "[1,2]").unwrap();

        let local = LocalStore::new(store);
        assert!(local.history().is_empty());
        assert_eq!(local.load_high_score(), 0);
        assert_eq!(local.current_identity(), None);
    }

    #[test]
    fn test_high_score_round_trip() {
        let mut local = LocalStore::new(MemoryStore::default());
        assert_eq!(local.load_high_score(), 0);
        local.save_high_score(420);
        assert_eq!(local.load_high_score(), 420);
        assert_eq!(local.store().get(HIGH_SCORE_KEY).as_deref(), Some("420"));
    }

    #[test]
    fn test_read_json_reports_corruption() {
        let mut store = MemoryStore::default();
        store.set("k", "nope").unwrap();
        let err = read_json::<u32>(&store, "k").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "k"));
        assert!(read_json::<u32>(&store, "missing").unwrap().is_none());
    }
}
