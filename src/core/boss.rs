//! Weekly boss checklist.
//!
//! Progress is stored per week identifier. The checklist for a week is
//! created on demand from the current rank's boss, and a boss can be
//! defeated once per week.

use super::events::TrackerEvent;
use super::game_state::{BossRecord, TrackerState};
use super::time::current_week;
use crate::catalog::{BossDef, Catalog};
use chrono::{DateTime, TimeZone};

pub fn current_boss<'a>(state: &TrackerState, catalog: &'a Catalog) -> Option<&'a BossDef> {
    catalog.boss_for(&state.player.current_rank)
}

/// Makes sure `week` has a checklist sized to the current boss.
///
/// A missing record is created all-false. A record created under a boss
/// with a different task count (the player ranked up mid-week) is padded
/// or trimmed so indexes line up with the tasks shown.
pub fn ensure_week_record(state: &mut TrackerState, catalog: &Catalog, week: &str) -> Vec<TrackerEvent> {
    let Some(boss) = current_boss(state, catalog) else {
        return Vec::new();
    };
    let tasks = boss.tasks.len();

    match state.bosses.weekly_progress.get_mut(week) {
        Some(progress) => {
            if progress.len() != tasks {
                progress.resize(tasks, false);
            }
            Vec::new()
        }
        None => {
            state
                .bosses
                .weekly_progress
                .insert(week.to_string(), vec![false; tasks]);
            vec![TrackerEvent::WeekRecordCreated {
                week: week.to_string(),
                tasks,
            }]
        }
    }
}

/// Checklist for the week containing `now`, if one exists.
pub fn week_progress<'a, Tz: TimeZone>(state: &'a TrackerState, now: &DateTime<Tz>) -> Option<&'a [bool]> {
    state
        .bosses
        .weekly_progress
        .get(&current_week(now))
        .map(Vec::as_slice)
}

pub fn is_boss_defeated_this_week<Tz: TimeZone>(state: &TrackerState, now: &DateTime<Tz>) -> bool {
    state.bosses.last_boss_week.as_deref() == Some(current_week(now).as_str())
}

/// Flips one task on this week's checklist.
pub fn toggle_boss_task<Tz: TimeZone>(
    state: &mut TrackerState,
    catalog: &Catalog,
    index: usize,
    now: &DateTime<Tz>,
) -> Vec<TrackerEvent> {
    let week = current_week(now);
    let mut events = ensure_week_record(state, catalog, &week);

    let Some(task) = state
        .bosses
        .weekly_progress
        .get_mut(&week)
        .and_then(|progress| progress.get_mut(index))
    else {
        return events;
    };
    *task = !*task;

    events.push(TrackerEvent::BossTaskToggled {
        week,
        index,
        done: *task,
    });
    events
}

/// All tasks checked and the boss not yet beaten this week.
pub fn can_defeat_boss<Tz: TimeZone>(state: &TrackerState, catalog: &Catalog, now: &DateTime<Tz>) -> bool {
    if current_boss(state, catalog).is_none() || is_boss_defeated_this_week(state, now) {
        return false;
    }
    match week_progress(state, now) {
        Some(progress) => !progress.is_empty() && progress.iter().all(|done| *done),
        None => false,
    }
}

/// Defeats the current boss: awards its XP, locks the boss for the rest of
/// the week and appends to the history.
///
/// Boss XP counts toward the player total but not toward the day's
/// `xp_gained`, so it does not by itself keep a streak alive.
pub fn defeat_boss<Tz: TimeZone>(
    state: &mut TrackerState,
    catalog: &Catalog,
    now: &DateTime<Tz>,
) -> Vec<TrackerEvent> {
    if !can_defeat_boss(state, catalog, now) {
        return Vec::new();
    }
    let Some(boss) = current_boss(state, catalog) else {
        return Vec::new();
    };
    let week = current_week(now);

    state.player.xp += boss.xp;
    state.bosses.last_boss_week = Some(week.clone());
    state.bosses.history.push(BossRecord {
        week: week.clone(),
        title: boss.title.clone(),
    });

    vec![TrackerEvent::BossDefeated {
        week,
        title: boss.title.clone(),
        xp_awarded: boss.xp,
    }]
}
