//! Rank ladder, streak multiplier and main quest board.

use super::constants::{
    STREAK_TIER_1_DAYS, STREAK_TIER_1_MULTIPLIER, STREAK_TIER_2_DAYS, STREAK_TIER_2_MULTIPLIER,
};
use super::events::TrackerEvent;
use super::game_state::TrackerState;
use crate::catalog::{Catalog, RankDef};

/// XP multiplier for daily quests at a given streak.
///
/// - 7+ days: x1.5
/// - 3-6 days: x1.2
/// - otherwise: x1.0
pub fn xp_multiplier(streak: u32) -> f64 {
    if streak >= STREAK_TIER_2_DAYS {
        STREAK_TIER_2_MULTIPLIER
    } else if streak >= STREAK_TIER_1_DAYS {
        STREAK_TIER_1_MULTIPLIER
    } else {
        1.0
    }
}

/// XP credited for a daily quest worth `base_xp` at the given streak.
pub fn multiplied_xp(base_xp: u64, streak: u32) -> u64 {
    (base_xp as f64 * xp_multiplier(streak)).round() as u64
}

pub fn current_rank<'a>(state: &TrackerState, catalog: &'a Catalog) -> Option<&'a RankDef> {
    catalog.rank(&state.player.current_rank)
}

pub fn next_rank<'a>(state: &TrackerState, catalog: &'a Catalog) -> Option<&'a RankDef> {
    catalog.rank_after(&state.player.current_rank)
}

/// Whether the player has enough XP and a rank to move up to.
pub fn can_unlock_next_rank(state: &TrackerState, catalog: &Catalog) -> bool {
    match (current_rank(state, catalog), next_rank(state, catalog)) {
        (Some(rank), Some(_)) => state.player.xp >= rank.max_xp,
        _ => false,
    }
}

/// Trial text for the next rank, shown only while the player is eligible
/// but has not unlocked it yet.
pub fn pending_rank_trial<'a>(state: &TrackerState, catalog: &'a Catalog) -> Option<&'a str> {
    if !can_unlock_next_rank(state, catalog) {
        return None;
    }
    let next = next_rank(state, catalog)?;
    if state.player.unlocked_ranks.contains(&next.id) {
        return None;
    }
    catalog.rank_trial(&next.id)
}

/// Moves the player to the next rank once the XP threshold is met.
pub fn unlock_next_rank(state: &mut TrackerState, catalog: &Catalog) -> Vec<TrackerEvent> {
    if !can_unlock_next_rank(state, catalog) {
        return Vec::new();
    }
    let Some(next) = next_rank(state, catalog) else {
        return Vec::new();
    };

    state.player.current_rank = next.id.clone();
    if !state.player.unlocked_ranks.contains(&next.id) {
        state.player.unlocked_ranks.push(next.id.clone());
    }

    vec![TrackerEvent::RankUnlocked {
        rank_id: next.id.clone(),
        rank_name: next.name.clone(),
    }]
}

/// True if the player's current rank is at or past `required`. A missing
/// requirement is always satisfied; an unknown one never is.
pub fn has_unlocked_rank(state: &TrackerState, catalog: &Catalog, required: Option<&str>) -> bool {
    let Some(required) = required else {
        return true;
    };
    match (
        catalog.rank_index(&state.player.current_rank),
        catalog.rank_index(required),
    ) {
        (Some(player), Some(required)) => player >= required,
        _ => false,
    }
}

/// XP progress inside the current rank as `(xp_into_rank, rank_span)`,
/// with XP capped at the rank's ceiling.
pub fn rank_progress(state: &TrackerState, catalog: &Catalog) -> (u64, u64) {
    match current_rank(state, catalog) {
        Some(rank) => {
            let capped = state.player.xp.min(rank.max_xp);
            (
                capped.saturating_sub(rank.min_xp),
                rank.max_xp.saturating_sub(rank.min_xp),
            )
        }
        None => (0, 0),
    }
}

pub fn main_quest_key(rank_id: &str, index: usize) -> String {
    format!("{}-{}", rank_id, index)
}

pub fn is_main_quest_done(state: &TrackerState, rank_id: &str, index: usize) -> bool {
    state
        .player
        .main_quest_progress
        .get(&main_quest_key(rank_id, index))
        .copied()
        .unwrap_or(false)
}

/// Flips a checkbox on the current rank's main quest board.
pub fn toggle_main_quest(
    state: &mut TrackerState,
    catalog: &Catalog,
    index: usize,
) -> Vec<TrackerEvent> {
    let rank_id = state.player.current_rank.clone();
    if index >= catalog.main_quests_for(&rank_id).len() {
        return Vec::new();
    }

    let key = main_quest_key(&rank_id, index);
    let done = !is_main_quest_done(state, &rank_id, index);
    state.player.main_quest_progress.insert(key.clone(), done);

    vec![TrackerEvent::MainQuestToggled { key, done }]
}

/// Restores rank invariants after loading: an unknown current rank falls
/// back to the first rank, and the unlocked list is rebuilt as the ladder
/// prefix ending at the current rank. Returns true if anything changed.
pub fn repair_ranks(state: &mut TrackerState, catalog: &Catalog) -> bool {
    let Some(first) = catalog.first_rank() else {
        return false;
    };

    let mut changed = false;
    let index = match catalog.rank_index(&state.player.current_rank) {
        Some(i) => i,
        None => {
            log::warn!(
                "Unknown rank `{}` in saved state, falling back to `{}`",
                state.player.current_rank,
                first.id
            );
            state.player.current_rank = first.id.clone();
            changed = true;
            0
        }
    };

    let prefix: Vec<String> = catalog.ranks[..=index].iter().map(|r| r.id.clone()).collect();
    if state.player.unlocked_ranks != prefix {
        state.player.unlocked_ranks = prefix;
        changed = true;
    }
    changed
}
