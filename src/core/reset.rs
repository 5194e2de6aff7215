//! Daily and weekly boundaries.

use super::constants::DAILY_TIME_BANK_MS;
use super::events::TrackerEvent;
use super::game_state::TrackerState;
use super::time::{current_week, today};
use super::timers::fail_quest;
use chrono::{DateTime, TimeZone};

/// Closes the previous day and opens today if the calendar day changed.
///
/// Archives the closing day's XP, updates the streak, fails any quest still
/// running (an unfinished quest carried past midnight costs the penalty),
/// and clears all per-day state. Calling it again on the same day does
/// nothing. A clock that moved backwards is ignored so `last_day` never
/// decreases.
pub fn reset_if_new_day<Tz: TimeZone>(state: &mut TrackerState, now: &DateTime<Tz>) -> Vec<TrackerEvent> {
    let today = today(now);
    let closed_day = state.daily.last_day;

    match closed_day {
        Some(last) if last == today => return Vec::new(),
        Some(last) if last > today => {
            log::warn!(
                "Clock is behind the last processed day ({} < {}), skipping reset",
                today,
                last
            );
            return Vec::new();
        }
        _ => {}
    }

    let mut events = Vec::new();
    let xp_archived = state.daily.xp_gained;

    if let Some(last) = closed_day {
        state.daily.xp_history.insert(last, xp_archived);
    }

    if xp_archived > 0 {
        state.player.streak += 1;
        state.daily.weekly_active_days += 1;
    } else {
        state.player.streak = 0;
    }

    let running: Vec<String> = state.quests.active_timed.keys().cloned().collect();
    events.extend(running.iter().filter_map(|id| fail_quest(state, id)));

    state.quests.active_timed.clear();
    state.daily.completed_quests.clear();
    state.daily.side_quest_usage.clear();
    state.daily.time_bank_ms = DAILY_TIME_BANK_MS;
    state.daily.last_day = Some(today);
    state.daily.xp_gained = 0;

    events.push(TrackerEvent::DayRolledOver {
        closed_day,
        xp_archived,
        streak: state.player.streak,
        today,
    });
    events
}

/// Lifts last week's boss lock once the week identifier changes.
///
/// Boss progress is keyed per week and is never cleared here. The weekly
/// active-day counter restarts when a new week identifier is first seen.
pub fn reset_if_new_week<Tz: TimeZone>(state: &mut TrackerState, now: &DateTime<Tz>) -> Vec<TrackerEvent> {
    let week = current_week(now);
    let mut events = Vec::new();

    if state.bosses.last_seen_week.as_deref() != Some(week.as_str()) {
        // The first observation only records the week
        if state.bosses.last_seen_week.is_some() {
            state.daily.weekly_active_days = 0;
        }
        state.bosses.last_seen_week = Some(week.clone());
        events.push(TrackerEvent::WeekStarted { week: week.clone() });
    }

    if let Some(previous) = &state.bosses.last_boss_week {
        if *previous != week {
            events.push(TrackerEvent::BossLockCleared {
                previous_week: previous.clone(),
            });
            state.bosses.last_boss_week = None;
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game_state::ActiveQuestTimer;
    use chrono::{FixedOffset, NaiveDate};

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn running_timer() -> ActiveQuestTimer {
        ActiveQuestTimer {
            start: 0,
            day_deadline: i64::MAX,
            failed: false,
            accounted: false,
        }
    }

    #[test]
    fn test_first_run_sets_day_without_history() {
        let mut state = TrackerState::new(0);
        let events = reset_if_new_day(&mut state, &at("2026-10-18T08:00:00+02:00"));

        assert_eq!(state.daily.last_day, Some(date(2026, 10, 18)));
        assert!(state.daily.xp_history.is_empty());
        assert_eq!(state.player.streak, 0);
        assert!(matches!(
            events.as_slice(),
            [TrackerEvent::DayRolledOver { closed_day: None, .. }]
        ));
    }

    #[test]
    fn test_same_day_is_noop() {
        let mut state = TrackerState::new(0);
        let now = at("2026-10-18T08:00:00+02:00");
        reset_if_new_day(&mut state, &now);
        state.daily.xp_gained = 25;
        state.daily.completed_quests.insert("reading".into(), true);
        let snapshot = state.clone();

        let events = reset_if_new_day(&mut state, &at("2026-10-18T23:59:00+02:00"));

        assert!(events.is_empty());
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_rollover_archives_and_extends_streak() {
        let mut state = TrackerState::new(0);
        state.daily.last_day = Some(date(2026, 10, 17));
        state.daily.xp_gained = 35;
        state.player.streak = 2;
        state.daily.completed_quests.insert("reading".into(), true);
        state.daily.side_quest_usage.insert("focus".into(), 2);
        state.daily.time_bank_ms = 1_000;

        reset_if_new_day(&mut state, &at("2026-10-18T00:00:05+02:00"));

        assert_eq!(state.daily.xp_history.get(&date(2026, 10, 17)), Some(&35));
        assert_eq!(state.player.streak, 3);
        assert_eq!(state.daily.weekly_active_days, 1);
        assert_eq!(state.daily.xp_gained, 0);
        assert!(state.daily.completed_quests.is_empty());
        assert!(state.daily.side_quest_usage.is_empty());
        assert_eq!(state.daily.time_bank_ms, DAILY_TIME_BANK_MS);
        assert_eq!(state.daily.last_day, Some(date(2026, 10, 18)));
    }

    #[test]
    fn test_idle_day_breaks_streak() {
        let mut state = TrackerState::new(0);
        state.daily.last_day = Some(date(2026, 10, 17));
        state.player.streak = 9;

        reset_if_new_day(&mut state, &at("2026-10-18T10:00:00+02:00"));

        assert_eq!(state.player.streak, 0);
        assert_eq!(state.daily.xp_history.get(&date(2026, 10, 17)), Some(&0));
    }

    #[test]
    fn test_running_quest_fails_with_penalty_on_rollover() {
        let mut state = TrackerState::new(0);
        state.daily.last_day = Some(date(2026, 10, 17));
        state.player.xp = 12;
        state.quests.active_timed.insert("reading".into(), running_timer());

        let events = reset_if_new_day(&mut state, &at("2026-10-18T07:00:00+02:00"));

        assert_eq!(state.player.xp, 7);
        assert!(state.quests.active_timed.is_empty());
        assert_eq!(
            events[0],
            TrackerEvent::QuestFailed {
                quest_id: "reading".to_string(),
                penalty: 5
            }
        );
    }

    #[test]
    fn test_already_failed_quest_not_penalized_twice() {
        let mut state = TrackerState::new(0);
        state.daily.last_day = Some(date(2026, 10, 17));
        state.player.xp = 20;
        let mut timer = running_timer();
        timer.failed = true;
        state.quests.active_timed.insert("writing".into(), timer);

        reset_if_new_day(&mut state, &at("2026-10-18T07:00:00+02:00"));

        assert_eq!(state.player.xp, 20);
        assert!(state.quests.active_timed.is_empty());
    }

    #[test]
    fn test_penalty_floors_xp_at_zero() {
        let mut state = TrackerState::new(0);
        state.daily.last_day = Some(date(2026, 10, 17));
        state.player.xp = 3;
        state.quests.active_timed.insert("reading".into(), running_timer());
        state.quests.active_timed.insert("writing".into(), running_timer());

        let events = reset_if_new_day(&mut state, &at("2026-10-18T07:00:00+02:00"));

        assert_eq!(state.player.xp, 0);
        let penalties: u64 = events
            .iter()
            .filter_map(|e| match e {
                TrackerEvent::QuestFailed { penalty, .. } => Some(*penalty),
                _ => None,
            })
            .sum();
        assert_eq!(penalties, 3);
    }

    #[test]
    fn test_clock_going_backwards_is_ignored() {
        let mut state = TrackerState::new(0);
        state.daily.last_day = Some(date(2026, 10, 18));
        state.daily.xp_gained = 10;

        let events = reset_if_new_day(&mut state, &at("2026-10-17T12:00:00+02:00"));

        assert!(events.is_empty());
        assert_eq!(state.daily.last_day, Some(date(2026, 10, 18)));
        assert_eq!(state.daily.xp_gained, 10);
    }

    #[test]
    fn test_weekly_reset_clears_stale_boss_lock() {
        let mut state = TrackerState::new(0);
        state.bosses.last_boss_week = Some("2026-W42".to_string());
        state
            .bosses
            .weekly_progress
            .insert("2026-W42".to_string(), vec![true; 5]);

        let events = reset_if_new_week(&mut state, &at("2026-10-19T09:00:00+00:00"));

        assert!(state.bosses.last_boss_week.is_none());
        assert!(state.bosses.weekly_progress.contains_key("2026-W42"));
        assert!(events.contains(&TrackerEvent::BossLockCleared {
            previous_week: "2026-W42".to_string()
        }));
    }

    #[test]
    fn test_weekly_reset_keeps_current_week_lock() {
        let mut state = TrackerState::new(0);
        let now = at("2026-10-19T09:00:00+00:00");
        state.bosses.last_boss_week = Some(current_week(&now));

        reset_if_new_week(&mut state, &now);
        let snapshot = state.clone();
        let events = reset_if_new_week(&mut state, &now);

        assert!(events.is_empty());
        assert_eq!(state, snapshot);
        assert!(state.bosses.last_boss_week.is_some());
    }

    #[test]
    fn test_weekly_active_days_restart_on_new_week() {
        let mut state = TrackerState::new(0);
        reset_if_new_week(&mut state, &at("2026-10-19T09:00:00+00:00"));
        state.daily.weekly_active_days = 4;

        // Same week: untouched
        reset_if_new_week(&mut state, &at("2026-10-22T09:00:00+00:00"));
        assert_eq!(state.daily.weekly_active_days, 4);

        // Next week
        reset_if_new_week(&mut state, &at("2026-10-26T09:00:00+00:00"));
        assert_eq!(state.daily.weekly_active_days, 0);
    }
}
