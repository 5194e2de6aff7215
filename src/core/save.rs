//! Loading and saving the tracker snapshot.
//!
//! Loading is forgiving: each top-level section is decoded on its own, and a
//! section that is missing or does not parse falls back to its default
//! without discarding the others.

use super::constants::STATE_KEY;
use super::game_state::TrackerState;
use crate::utils::persistence::{save_json, StateStore};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::io;

/// Decode one section of the snapshot, falling back to `fallback`.
fn merge_section<T: DeserializeOwned>(root: &Map<String, Value>, name: &str, fallback: T) -> T {
    let Some(raw) = root.get(name) else {
        return fallback;
    };
    match serde_json::from_value(raw.clone()) {
        Ok(section) => section,
        Err(e) => {
            log::warn!("Saved section `{}` is malformed, using defaults: {}", name, e);
            fallback
        }
    }
}

/// Rebuild a state from a JSON snapshot. `now_ms` seeds the enforcement
/// clock when the daily section has to be defaulted.
pub fn state_from_json(json: &str, now_ms: i64) -> TrackerState {
    let fresh = TrackerState::new(now_ms);
    let root = match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(root)) => root,
        Ok(_) => {
            log::warn!("Saved state is not a JSON object, starting fresh");
            return fresh;
        }
        Err(e) => {
            log::warn!("Saved state is not valid JSON, starting fresh: {}", e);
            return fresh;
        }
    };

    TrackerState {
        player: merge_section(&root, "player", fresh.player),
        daily: merge_section(&root, "daily", fresh.daily),
        quests: merge_section(&root, "quests", fresh.quests),
        ui: merge_section(&root, "ui", fresh.ui),
        bosses: merge_section(&root, "bosses", fresh.bosses),
    }
}

/// Load the snapshot from `store`, or a fresh state if there is none or it
/// cannot be read.
pub fn load_state(store: &dyn StateStore, now_ms: i64) -> TrackerState {
    match store.read(STATE_KEY) {
        Ok(Some(json)) => state_from_json(&json, now_ms),
        Ok(None) => {
            log::info!("No saved state found, starting fresh");
            TrackerState::new(now_ms)
        }
        Err(e) => {
            log::warn!("Could not read saved state, starting fresh: {}", e);
            TrackerState::new(now_ms)
        }
    }
}

/// Overwrite the stored snapshot.
pub fn save_state(store: &dyn StateStore, state: &TrackerState) -> io::Result<()> {
    save_json(store, STATE_KEY, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::persistence::MemoryStore;

    #[test]
    fn test_missing_snapshot_is_fresh() {
        let store = MemoryStore::new();
        let state = load_state(&store, 123);

        assert_eq!(state, TrackerState::new(123));
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut state = TrackerState::new(0);
        state.player.xp = 420;
        state.player.streak = 4;
        state.bosses.last_boss_week = Some("2026-W43".to_string());

        save_state(&store, &state).unwrap();

        assert_eq!(load_state(&store, 999), state);
    }

    #[test]
    fn test_malformed_section_falls_back_alone() {
        let json = r#"{
            "player": { "xp": 77, "current_rank": "b1", "streak": 2 },
            "daily": "garbage",
            "bosses": { "last_boss_week": "2026-W40" }
        }"#;

        let state = state_from_json(json, 5_000);

        assert_eq!(state.player.xp, 77);
        assert_eq!(state.player.streak, 2);
        assert_eq!(state.daily, TrackerState::new(5_000).daily);
        assert_eq!(state.bosses.last_boss_week.as_deref(), Some("2026-W40"));
        assert!(state.quests.active_timed.is_empty());
    }

    #[test]
    fn test_partial_section_fills_missing_fields() {
        let json = r#"{ "player": { "xp": 5 } }"#;

        let state = state_from_json(json, 0);

        assert_eq!(state.player.xp, 5);
        assert_eq!(state.player.current_rank, "b1");
        assert_eq!(state.player.unlocked_ranks, vec!["b1"]);
    }

    #[test]
    fn test_unparseable_snapshot_is_fresh() {
        assert_eq!(state_from_json("{not json", 7), TrackerState::new(7));
        assert_eq!(state_from_json("[1,2,3]", 7), TrackerState::new(7));
    }
}
