//! Daily and side quest lifecycle.
//!
//! A daily quest moves `NotStarted → Active → Completed | Failed` and stays
//! in its terminal state until the next daily reset. Failing only happens in
//! [`reset`](super::reset) and [`timers`](super::timers).

use super::constants::SIDE_QUEST_DAILY_CAP;
use super::events::TrackerEvent;
use super::game_state::{ActiveQuestTimer, TrackerState};
use super::progression::{has_unlocked_rank, multiplied_xp, xp_multiplier};
use super::time::end_of_today;
use crate::catalog::{Catalog, SideQuestDef};
use chrono::{DateTime, TimeZone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    NotStarted,
    Active,
    Completed,
    Failed,
}

pub fn quest_status(state: &TrackerState, quest_id: &str) -> QuestStatus {
    if state.daily.completed_quests.get(quest_id).copied().unwrap_or(false) {
        return QuestStatus::Completed;
    }
    match state.quests.active_timed.get(quest_id) {
        Some(timer) if timer.failed => QuestStatus::Failed,
        Some(_) => QuestStatus::Active,
        None => QuestStatus::NotStarted,
    }
}

/// Starts the timer for a daily quest. The deadline is the end of the
/// current local day.
pub fn accept_quest<Tz: TimeZone>(
    state: &mut TrackerState,
    catalog: &Catalog,
    quest_id: &str,
    now: &DateTime<Tz>,
) -> Vec<TrackerEvent> {
    if catalog.daily_quest(quest_id).is_none() {
        return Vec::new();
    }
    if quest_status(state, quest_id) != QuestStatus::NotStarted {
        return Vec::new();
    }

    let deadline = end_of_today(now);
    state.quests.active_timed.insert(
        quest_id.to_string(),
        ActiveQuestTimer {
            start: now.timestamp_millis(),
            day_deadline: deadline,
            failed: false,
            accounted: false,
        },
    );

    vec![TrackerEvent::QuestAccepted {
        quest_id: quest_id.to_string(),
        deadline,
    }]
}

/// Completes a running daily quest and credits its streak-multiplied XP.
///
/// The timer's `accounted` flag is set before anything is credited, so a
/// repeated call can never pay out twice.
pub fn complete_quest(state: &mut TrackerState, catalog: &Catalog, quest_id: &str) -> Vec<TrackerEvent> {
    let Some(quest) = catalog.daily_quest(quest_id) else {
        return Vec::new();
    };
    let Some(timer) = state.quests.active_timed.get_mut(quest_id) else {
        return Vec::new();
    };
    if timer.failed || timer.accounted {
        return Vec::new();
    }
    timer.accounted = true;

    let multiplier = xp_multiplier(state.player.streak);
    let gained = multiplied_xp(quest.xp, state.player.streak);
    state.player.xp += gained;
    state.daily.xp_gained += gained;
    state.daily.completed_quests.insert(quest_id.to_string(), true);
    state.quests.active_timed.remove(quest_id);
    state.ui.expanded_quests.remove(quest_id);

    vec![TrackerEvent::QuestCompleted {
        quest_id: quest_id.to_string(),
        xp_awarded: gained,
        multiplier,
    }]
}

/// Side quests visible at the player's current rank.
pub fn available_side_quests<'a>(state: &TrackerState, catalog: &'a Catalog) -> Vec<&'a SideQuestDef> {
    catalog
        .side_quests
        .iter()
        .filter(|q| has_unlocked_rank(state, catalog, q.rank.as_deref()))
        .collect()
}

pub fn side_quest_uses(state: &TrackerState, quest_id: &str) -> u32 {
    state
        .daily
        .side_quest_usage
        .get(quest_id)
        .copied()
        .unwrap_or(0)
}

/// Records one side quest completion if the rank gate and daily cap allow.
///
/// Side quests credit their base XP: the streak multiplier only applies to
/// daily quests.
pub fn complete_side_quest(
    state: &mut TrackerState,
    catalog: &Catalog,
    quest_id: &str,
) -> Vec<TrackerEvent> {
    let Some(quest) = catalog.side_quest(quest_id) else {
        return Vec::new();
    };
    if !has_unlocked_rank(state, catalog, quest.rank.as_deref()) {
        return Vec::new();
    }
    let used = side_quest_uses(state, quest_id);
    if used >= SIDE_QUEST_DAILY_CAP {
        return Vec::new();
    }

    state.player.xp += quest.xp;
    state.daily.xp_gained += quest.xp;
    state
        .daily
        .side_quest_usage
        .insert(quest_id.to_string(), used + 1);

    vec![TrackerEvent::SideQuestCompleted {
        quest_id: quest_id.to_string(),
        xp_awarded: quest.xp,
        uses_today: used + 1,
    }]
}

/// Shows or hides a quest's description.
pub fn toggle_quest_details(
    state: &mut TrackerState,
    catalog: &Catalog,
    quest_id: &str,
) -> Vec<TrackerEvent> {
    if catalog.daily_quest(quest_id).is_none() && catalog.side_quest(quest_id).is_none() {
        return Vec::new();
    }
    let expanded = !state
        .ui
        .expanded_quests
        .get(quest_id)
        .copied()
        .unwrap_or(false);
    state
        .ui
        .expanded_quests
        .insert(quest_id.to_string(), expanded);

    vec![TrackerEvent::QuestDetailsToggled {
        quest_id: quest_id.to_string(),
        expanded,
    }]
}

pub fn is_expanded(state: &TrackerState, quest_id: &str) -> bool {
    state
        .ui
        .expanded_quests
        .get(quest_id)
        .copied()
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use chrono::FixedOffset;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-18T09:00:00+02:00").unwrap()
    }

    #[test]
    fn test_accept_creates_timer_until_end_of_day() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);

        let events = accept_quest(&mut state, &catalog, "reading", &now());

        let timer = state.quests.active_timed["reading"];
        assert_eq!(timer.start, now().timestamp_millis());
        assert_eq!(timer.day_deadline, end_of_today(&now()));
        assert!(!timer.failed);
        assert!(!timer.accounted);
        assert_eq!(events.len(), 1);
        assert_eq!(quest_status(&state, "reading"), QuestStatus::Active);
    }

    #[test]
    fn test_accept_twice_keeps_original_timer() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        accept_quest(&mut state, &catalog, "reading", &now());
        let later = now() + chrono::Duration::minutes(30);

        assert!(accept_quest(&mut state, &catalog, "reading", &later).is_empty());
        assert_eq!(
            state.quests.active_timed["reading"].start,
            now().timestamp_millis()
        );
    }

    #[test]
    fn test_accept_unknown_or_side_quest_rejected() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        assert!(accept_quest(&mut state, &catalog, "nope", &now()).is_empty());
        assert!(accept_quest(&mut state, &catalog, "focus", &now()).is_empty());
        assert!(state.quests.active_timed.is_empty());
    }

    #[test]
    fn test_complete_awards_base_xp_below_streak_three() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        state.player.streak = 2;
        accept_quest(&mut state, &catalog, "reading", &now());

        complete_quest(&mut state, &catalog, "reading");

        assert_eq!(state.player.xp, 10);
        assert_eq!(state.daily.xp_gained, 10);
        assert_eq!(quest_status(&state, "reading"), QuestStatus::Completed);
        assert!(!state.quests.active_timed.contains_key("reading"));
    }

    #[test]
    fn test_complete_applies_streak_multiplier() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        state.player.streak = 7;
        accept_quest(&mut state, &catalog, "reading", &now());

        let events = complete_quest(&mut state, &catalog, "reading");

        assert_eq!(state.player.xp, 15);
        assert_eq!(
            events,
            vec![TrackerEvent::QuestCompleted {
                quest_id: "reading".to_string(),
                xp_awarded: 15,
                multiplier: 1.5
            }]
        );
    }

    #[test]
    fn test_complete_twice_awards_once() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        accept_quest(&mut state, &catalog, "speaking", &now());

        complete_quest(&mut state, &catalog, "speaking");
        let second = complete_quest(&mut state, &catalog, "speaking");

        assert!(second.is_empty());
        assert_eq!(state.player.xp, 25);
    }

    #[test]
    fn test_accounted_timer_is_not_credited() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        accept_quest(&mut state, &catalog, "reading", &now());
        if let Some(timer) = state.quests.active_timed.get_mut("reading") {
            timer.accounted = true;
        }

        assert!(complete_quest(&mut state, &catalog, "reading").is_empty());
        assert_eq!(state.player.xp, 0);
    }

    #[test]
    fn test_failed_quest_cannot_complete_or_restart() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        accept_quest(&mut state, &catalog, "reading", &now());
        if let Some(timer) = state.quests.active_timed.get_mut("reading") {
            timer.failed = true;
        }

        assert_eq!(quest_status(&state, "reading"), QuestStatus::Failed);
        assert!(complete_quest(&mut state, &catalog, "reading").is_empty());
        assert!(accept_quest(&mut state, &catalog, "reading", &now()).is_empty());
        assert_eq!(state.player.xp, 0);
    }

    #[test]
    fn test_completed_quest_cannot_be_accepted_again_today() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        accept_quest(&mut state, &catalog, "reading", &now());
        complete_quest(&mut state, &catalog, "reading");

        assert!(accept_quest(&mut state, &catalog, "reading", &now()).is_empty());
        assert!(state.quests.active_timed.is_empty());
    }

    #[test]
    fn test_complete_clears_expansion() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        toggle_quest_details(&mut state, &catalog, "reading");
        assert!(is_expanded(&state, "reading"));
        accept_quest(&mut state, &catalog, "reading", &now());

        complete_quest(&mut state, &catalog, "reading");

        assert!(!is_expanded(&state, "reading"));
        assert!(!state.ui.expanded_quests.contains_key("reading"));
    }

    #[test]
    fn test_side_quest_cap() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);

        assert_eq!(complete_side_quest(&mut state, &catalog, "focus").len(), 1);
        assert_eq!(complete_side_quest(&mut state, &catalog, "focus").len(), 1);
        assert!(complete_side_quest(&mut state, &catalog, "focus").is_empty());

        assert_eq!(side_quest_uses(&state, "focus"), 2);
        assert_eq!(state.player.xp, 40);
        assert_eq!(state.daily.xp_gained, 40);
    }

    #[test]
    fn test_side_quest_ignores_streak_multiplier() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        state.player.streak = 10;

        complete_side_quest(&mut state, &catalog, "focus");

        assert_eq!(state.player.xp, 20);
        assert_eq!(state.daily.xp_gained, 20);
    }

    #[test]
    fn test_side_quest_rank_gate() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        assert!(complete_side_quest(&mut state, &catalog, "lecture").is_empty());

        let visible: Vec<&str> = available_side_quests(&state, &catalog)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(visible, vec!["focus"]);

        state.player.current_rank = "b2".to_string();
        assert_eq!(complete_side_quest(&mut state, &catalog, "lecture").len(), 1);
        assert_eq!(available_side_quests(&state, &catalog).len(), 2);
    }

    #[test]
    fn test_toggle_details_unknown_quest() {
        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        assert!(toggle_quest_details(&mut state, &catalog, "ghost").is_empty());
        assert!(state.ui.expanded_quests.is_empty());
    }

    #[test]
    fn test_deadline_covers_repeated_hour_when_clocks_go_back() {
        use crate::core::time::test_zone::berlin;
        use crate::core::timers::enforce_quest_timers;

        let catalog = builtin_catalog();
        let mut state = TrackerState::new(0);
        state.player.xp = 20;
        accept_quest(&mut state, &catalog, "reading", &berlin(2026, 10, 25, 1, 0));

        // 23:30 local is already past the naive 24h-after-midnight deadline
        enforce_quest_timers(&mut state, berlin(2026, 10, 25, 23, 30).timestamp_millis());
        assert_eq!(quest_status(&state, "reading"), QuestStatus::Active);
        assert_eq!(state.player.xp, 20);

        enforce_quest_timers(&mut state, berlin(2026, 10, 26, 0, 0).timestamp_millis());
        assert_eq!(quest_status(&state, "reading"), QuestStatus::Failed);
        assert_eq!(state.player.xp, 15);
    }
}
