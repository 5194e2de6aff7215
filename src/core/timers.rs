//! Periodic enforcement of quest deadlines and the daily time bank.

use super::constants::FAILURE_PENALTY_XP;
use super::events::TrackerEvent;
use super::game_state::TrackerState;

/// Runs one enforcement pass at `now_ms`.
///
/// The time bank drains by the wall-clock time since the previous pass, but
/// only while some quest is running, so tick cadence does not matter.
/// Running quests whose deadline has passed fail and cost the penalty.
/// A clock that jumped backwards drains nothing.
pub fn enforce_quest_timers(state: &mut TrackerState, now_ms: i64) -> Vec<TrackerEvent> {
    let mut events = Vec::new();

    let delta = now_ms.saturating_sub(state.daily.last_time_tick).max(0) as u64;
    state.daily.last_time_tick = now_ms;

    if state.has_running_timer() && state.daily.time_bank_ms > 0 {
        state.daily.time_bank_ms = state.daily.time_bank_ms.saturating_sub(delta);
        if state.daily.time_bank_ms == 0 {
            events.push(TrackerEvent::TimeBankExhausted);
        }
    }

    let expired: Vec<String> = state
        .quests
        .active_timed
        .iter()
        .filter(|(_, timer)| !timer.failed && now_ms > timer.day_deadline)
        .map(|(id, _)| id.clone())
        .collect();
    events.extend(expired.iter().filter_map(|id| fail_quest(state, id)));

    events
}

/// Marks a running quest as failed and deducts the penalty, flooring XP at
/// zero. Returns `None` if the quest is not running.
pub(crate) fn fail_quest(state: &mut TrackerState, quest_id: &str) -> Option<TrackerEvent> {
    let timer = state.quests.active_timed.get_mut(quest_id)?;
    if timer.failed {
        return None;
    }
    timer.failed = true;
    let penalty = state.deduct_xp(FAILURE_PENALTY_XP);
    Some(TrackerEvent::QuestFailed {
        quest_id: quest_id.to_string(),
        penalty,
    })
}
