//! Mission Control
//!
//! The progression hub: a static planet catalog, unlock gating against the
//! progress record, and session settlement - the one place terminal-event
//! deltas (stardust, high score, played) are applied to the store.

use crate::progress::ProgressStore;
use crate::sim::{GameEvent, PlanetId};

/// Catalog entry for one planet (static content table).
#[derive(Debug, Clone, Copy)]
pub struct PlanetInfo {
    pub id: PlanetId,
    pub title: &'static str,
    pub blurb: &'static str,
    /// Stardust price; 0 means unlocked from the start
    pub unlock_cost: u32,
}

/// Mission Control's planet roster, in hub display order.
pub static CATALOG: &[PlanetInfo] = &[
    PlanetInfo {
        id: PlanetId::BlackHole,
        title: "Event Horizon Rescue",
        blurb: "Ferry stranded astronauts clear of the singularity.",
        unlock_cost: 0,
    },
    PlanetInfo {
        id: PlanetId::StormRider,
        title: "Jovian Storm Rider",
        blurb: "Thread the jet streams, dodge the storm cells.",
        unlock_cost: 120,
    },
    PlanetInfo {
        id: PlanetId::MachSurfer,
        title: "Neptune Mach Surfer",
        blurb: "Outrun the sound barrier on a supersonic wind.",
        unlock_cost: 200,
    },
    PlanetInfo {
        id: PlanetId::PressureDrop,
        title: "Venusian Pressure Drop",
        blurb: "Sink to the furnace floor before the hull gives.",
        unlock_cost: 280,
    },
];

pub fn info(id: PlanetId) -> &'static PlanetInfo {
    CATALOG
        .iter()
        .find(|p| p.id == id)
        .expect("every PlanetId has a catalog entry")
}

/// Unlock gating: free planets and purchased ones.
pub fn is_unlocked(record: &crate::progress::ProgressRecord, id: PlanetId) -> bool {
    info(id).unlock_cost == 0 || record.is_unlocked(id)
}

/// Try to buy a planet. Spends stardust through the store; no-op (false)
/// when already unlocked is fine to surface as success.
pub fn try_unlock(store: &mut dyn ProgressStore, id: PlanetId) -> bool {
    let record = store.load();
    if is_unlocked(&record, id) {
        return true;
    }
    if !store.spend_stardust(info(id).unlock_cost) {
        return false;
    }
    store.unlock(id);
    log::info!("Unlocked {}", id.as_str());
    true
}

/// Apply terminal-event deltas to the store. Call with the events drained
/// from an engine; anything that is not a session end is ignored here.
pub fn settle_session(store: &mut dyn ProgressStore, events: &[GameEvent]) {
    for event in events {
        if let GameEvent::SessionEnded {
            planet,
            score,
            stardust,
            ..
        } = *event
        {
            store.add_stardust(stardust);
            store.update_high_score(planet, score);
            store.mark_played(planet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryStore;
    use crate::sim::Terminal;

    #[test]
    fn test_catalog_covers_every_planet() {
        for id in [
            PlanetId::BlackHole,
            PlanetId::StormRider,
            PlanetId::MachSurfer,
            PlanetId::PressureDrop,
        ] {
            assert_eq!(info(id).id, id);
        }
    }

    #[test]
    fn test_unlock_requires_stardust() {
        let mut store = MemoryStore::new();
        assert!(!try_unlock(&mut store, PlanetId::StormRider));
        store.add_stardust(120);
        assert!(try_unlock(&mut store, PlanetId::StormRider));
        assert_eq!(store.load().stardust, 0);
        // Second unlock is a cheap success, nothing spent
        store.add_stardust(10);
        assert!(try_unlock(&mut store, PlanetId::StormRider));
        assert_eq!(store.load().stardust, 10);
    }

    #[test]
    fn test_free_planet_always_unlocked() {
        let mut store = MemoryStore::new();
        assert!(try_unlock(&mut store, PlanetId::BlackHole));
    }

    #[test]
    fn test_settle_session_applies_deltas_once() {
        let mut store = MemoryStore::new();
        let events = [
            GameEvent::SessionStarted {
                planet: PlanetId::StormRider,
                session: 0,
            },
            GameEvent::TriviaAnswered { correct: true },
            GameEvent::SessionEnded {
                planet: PlanetId::StormRider,
                outcome: Terminal::Defeat,
                score: 1_234,
                stardust: 40,
            },
        ];
        settle_session(&mut store, &events);
        let record = store.load();
        assert_eq!(record.stardust, 40);
        assert_eq!(record.top_score(PlanetId::StormRider), Some(1_234));
        assert!(record.played.contains(&PlanetId::StormRider));
    }
}
