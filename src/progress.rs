//! Progress persistence boundary
//!
//! Stardust balance, unlocked planets, per-planet high scores and the
//! played-at-least-once set. The simulation core never touches this store
//! mid-tick; the shell applies deltas at terminal-event boundaries through
//! the `ProgressStore` trait. Backed by LocalStorage in the browser and by
//! an in-memory record for native/tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::sim::PlanetId;

/// The persisted progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub stardust: u32,
    pub unlocked: BTreeSet<PlanetId>,
    pub high_scores: BTreeMap<PlanetId, u64>,
    pub played: BTreeSet<PlanetId>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        // The first planet is free; the rest are bought with stardust
        let mut unlocked = BTreeSet::new();
        unlocked.insert(PlanetId::BlackHole);
        Self {
            stardust: 0,
            unlocked,
            high_scores: BTreeMap::new(),
            played: BTreeSet::new(),
        }
    }
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, planet: PlanetId) -> bool {
        self.unlocked.contains(&planet)
    }

    pub fn top_score(&self, planet: PlanetId) -> Option<u64> {
        self.high_scores.get(&planet).copied()
    }

    /// Would this score be a new personal best?
    pub fn qualifies(&self, planet: PlanetId, score: u64) -> bool {
        score > 0 && score > self.top_score(planet).unwrap_or(0)
    }
}

/// Get/set/merge access to the progress record. Implementations persist
/// however they like; callers only see the record.
pub trait ProgressStore {
    fn load(&self) -> ProgressRecord;
    fn add_stardust(&mut self, amount: u32);
    /// Returns false (and changes nothing) when the balance is short.
    fn spend_stardust(&mut self, amount: u32) -> bool;
    fn unlock(&mut self, planet: PlanetId);
    /// No-op unless `score` beats the stored max. Returns whether it did.
    fn update_high_score(&mut self, planet: PlanetId, score: u64) -> bool;
    fn mark_played(&mut self, planet: PlanetId);
}

/// In-memory store for native runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: ProgressRecord,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: ProgressRecord) -> Self {
        Self { record }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> ProgressRecord {
        self.record.clone()
    }

    fn add_stardust(&mut self, amount: u32) {
        self.record.stardust = self.record.stardust.saturating_add(amount);
    }

    fn spend_stardust(&mut self, amount: u32) -> bool {
        if self.record.stardust < amount {
            return false;
        }
        self.record.stardust -= amount;
        true
    }

    fn unlock(&mut self, planet: PlanetId) {
        self.record.unlocked.insert(planet);
    }

    fn update_high_score(&mut self, planet: PlanetId, score: u64) -> bool {
        if !self.record.qualifies(planet, score) {
            return false;
        }
        self.record.high_scores.insert(planet, score);
        true
    }

    fn mark_played(&mut self, planet: PlanetId) {
        self.record.played.insert(planet);
    }
}

/// LocalStorage-backed store (WASM only).
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{ProgressRecord, ProgressStore};
    use crate::sim::PlanetId;

    /// Load-modify-save against the browser's LocalStorage.
    #[derive(Debug, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        const STORAGE_KEY: &'static str = "orbitquest_progress";

        fn read() -> ProgressRecord {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten();
            if let Some(storage) = storage {
                if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                    if let Ok(record) = serde_json::from_str(&json) {
                        return record;
                    }
                    log::warn!("Corrupt progress record, starting fresh");
                }
            }
            ProgressRecord::default()
        }

        fn write(record: &ProgressRecord) {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten();
            if let Some(storage) = storage {
                if let Ok(json) = serde_json::to_string(record) {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                }
            }
        }

        fn modify(f: impl FnOnce(&mut ProgressRecord)) {
            let mut record = Self::read();
            f(&mut record);
            Self::write(&record);
        }
    }

    impl ProgressStore for LocalStorageStore {
        fn load(&self) -> ProgressRecord {
            Self::read()
        }

        fn add_stardust(&mut self, amount: u32) {
            Self::modify(|r| r.stardust = r.stardust.saturating_add(amount));
        }

        fn spend_stardust(&mut self, amount: u32) -> bool {
            let mut record = Self::read();
            if record.stardust < amount {
                return false;
            }
            record.stardust -= amount;
            Self::write(&record);
            true
        }

        fn unlock(&mut self, planet: PlanetId) {
            Self::modify(|r| {
                r.unlocked.insert(planet);
            });
        }

        fn update_high_score(&mut self, planet: PlanetId, score: u64) -> bool {
            let mut record = Self::read();
            if !record.qualifies(planet, score) {
                return false;
            }
            record.high_scores.insert(planet, score);
            Self::write(&record);
            log::info!("New high score for {}: {}", planet.as_str(), score);
            true
        }

        fn mark_played(&mut self, planet: PlanetId) {
            Self::modify(|r| {
                r.played.insert(planet);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_unlocks_first_planet() {
        let record = ProgressRecord::default();
        assert!(record.is_unlocked(PlanetId::BlackHole));
        assert!(!record.is_unlocked(PlanetId::MachSurfer));
    }

    #[test]
    fn test_high_score_only_improves() {
        let mut store = MemoryStore::new();
        assert!(store.update_high_score(PlanetId::StormRider, 500));
        assert!(!store.update_high_score(PlanetId::StormRider, 400));
        assert!(!store.update_high_score(PlanetId::StormRider, 500));
        assert!(store.update_high_score(PlanetId::StormRider, 501));
        assert_eq!(store.load().top_score(PlanetId::StormRider), Some(501));
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let record = ProgressRecord::default();
        assert!(!record.qualifies(PlanetId::BlackHole, 0));
    }

    #[test]
    fn test_spend_refuses_overdraft() {
        let mut store = MemoryStore::new();
        store.add_stardust(100);
        assert!(!store.spend_stardust(101));
        assert_eq!(store.load().stardust, 100);
        assert!(store.spend_stardust(100));
        assert_eq!(store.load().stardust, 0);
    }

    #[test]
    fn test_record_json_roundtrip() {
        let mut store = MemoryStore::new();
        store.add_stardust(42);
        store.unlock(PlanetId::PressureDrop);
        store.update_high_score(PlanetId::BlackHole, 9_000);
        store.mark_played(PlanetId::BlackHole);
        let record = store.load();
        let json = serde_json::to_string(&record).unwrap();
        let back: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
