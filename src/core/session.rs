//! The tracker session: owns the state, catalog, store and clock, and runs
//! every command and tick through the same reset-then-act-then-save cycle.

use super::boss::{defeat_boss, ensure_week_record, toggle_boss_task};
use super::events::TrackerEvent;
use super::game_state::TrackerState;
use super::progression::{repair_ranks, toggle_main_quest, unlock_next_rank};
use super::quests::{accept_quest, complete_quest, complete_side_quest, toggle_quest_details};
use super::reset::{reset_if_new_day, reset_if_new_week};
use super::save::{load_state, save_state};
use super::time::{current_week, Clock};
use super::timers::enforce_quest_timers;
use crate::catalog::Catalog;
use crate::utils::persistence::StateStore;
use chrono::DateTime;
use std::io;

/// User intents the presentation layer can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AcceptQuest(String),
    CompleteQuest(String),
    CompleteSideQuest(String),
    ToggleQuestDetails(String),
    /// Index into the current rank's main quest list
    ToggleMainQuest(usize),
    /// Index into the current boss's task list
    ToggleBossTask(usize),
    UnlockNextRank,
    DefeatBoss,
}

pub struct Session<S: StateStore, C: Clock> {
    state: TrackerState,
    catalog: Catalog,
    store: S,
    clock: C,
}

impl<S: StateStore, C: Clock> Session<S, C> {
    /// Load the saved state, repair it against the catalog, apply any
    /// pending day/week boundaries and persist the result.
    ///
    /// Returns the session along with the events produced while catching
    /// up (e.g. quests failed because the app was closed over midnight).
    pub fn open(store: S, clock: C, catalog: Catalog) -> (Self, Vec<TrackerEvent>) {
        let (session, events) = Self::load(store, clock, catalog);
        session.persist();
        (session, events)
    }

    /// Like [`Session::open`] but leaves the store untouched. The caught-up
    /// state is only written by the first command or tick.
    pub fn load(store: S, clock: C, catalog: Catalog) -> (Self, Vec<TrackerEvent>) {
        let state = load_state(&store, clock.now_ms());
        let mut session = Self {
            state,
            catalog,
            store,
            clock,
        };

        if repair_ranks(&mut session.state, &session.catalog) {
            log::info!("Repaired rank data in saved state");
        }
        let now = session.clock.now();
        let events = session.apply_boundaries(&now);
        session.record(&events);
        (session, events)
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> DateTime<C::Zone> {
        self.clock.now()
    }

    /// Run one user command. An empty result means the command was a no-op.
    pub fn execute(&mut self, command: Command) -> Vec<TrackerEvent> {
        let now = self.clock.now();
        let mut events = self.apply_boundaries(&now);

        let state = &mut self.state;
        let catalog = &self.catalog;
        let outcome = match &command {
            Command::AcceptQuest(id) => accept_quest(state, catalog, id, &now),
            Command::CompleteQuest(id) => complete_quest(state, catalog, id),
            Command::CompleteSideQuest(id) => complete_side_quest(state, catalog, id),
            Command::ToggleQuestDetails(id) => toggle_quest_details(state, catalog, id),
            Command::ToggleMainQuest(index) => toggle_main_quest(state, catalog, *index),
            Command::ToggleBossTask(index) => toggle_boss_task(state, catalog, *index, &now),
            Command::UnlockNextRank => unlock_next_rank(state, catalog),
            Command::DefeatBoss => defeat_boss(state, catalog, &now),
        };
        if outcome.is_empty() {
            log::debug!("Command {:?} had no effect", command);
        }
        events.extend(outcome);

        self.record(&events);
        self.persist();
        events
    }

    /// Scheduler tick: boundaries first, then deadline and time-bank
    /// enforcement.
    pub fn tick(&mut self) -> Vec<TrackerEvent> {
        let now = self.clock.now();
        let mut events = self.apply_boundaries(&now);
        events.extend(enforce_quest_timers(
            &mut self.state,
            now.timestamp_millis(),
        ));

        self.record(&events);
        self.persist();
        events
    }

    /// Save now, surfacing the error instead of logging it.
    pub fn flush(&self) -> io::Result<()> {
        save_state(&self.store, &self.state)
    }

    fn apply_boundaries(&mut self, now: &DateTime<C::Zone>) -> Vec<TrackerEvent> {
        let mut events = reset_if_new_day(&mut self.state, now);
        events.extend(reset_if_new_week(&mut self.state, now));
        events.extend(ensure_week_record(
            &mut self.state,
            &self.catalog,
            &current_week(now),
        ));
        events
    }

    fn record(&self, events: &[TrackerEvent]) {
        for event in events {
            if event.is_notable() {
                log::info!("{}", event.message());
            } else {
                log::debug!("{}", event.message());
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            log::warn!("Failed to save state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use crate::core::constants::STATE_KEY;
    use crate::core::time::FixedClock;
    use crate::utils::persistence::MemoryStore;

    fn open_at(rfc3339: &str) -> (Session<MemoryStore, FixedClock>, FixedClock) {
        let clock = FixedClock::parse(rfc3339).unwrap();
        let (session, _) = Session::open(MemoryStore::new(), clock.clone(), builtin_catalog());
        (session, clock)
    }

    #[test]
    fn test_open_fresh_initializes_day_and_week() {
        let (session, _) = open_at("2026-10-18T09:00:00+02:00");

        let state = session.state();
        assert_eq!(state.daily.last_day.map(|d| d.to_string()).as_deref(), Some("2026-10-18"));
        assert_eq!(state.bosses.last_seen_week.as_deref(), Some("2026-W43"));
        assert!(state.bosses.weekly_progress.contains_key("2026-W43"));
        assert!(session.store().get(STATE_KEY).is_some());
    }

    #[test]
    fn test_commands_persist() {
        let (mut session, _) = open_at("2026-10-18T09:00:00+02:00");

        session.execute(Command::AcceptQuest("reading".into()));
        let events = session.execute(Command::CompleteQuest("reading".into()));

        assert_eq!(events.len(), 1);
        let saved = session.store().get(STATE_KEY).unwrap();
        assert!(saved.contains("\"xp\": 10"));
    }

    #[test]
    fn test_noop_command_returns_nothing() {
        let (mut session, _) = open_at("2026-10-18T09:00:00+02:00");
        assert!(session.execute(Command::CompleteQuest("reading".into())).is_empty());
        assert!(session.execute(Command::DefeatBoss).is_empty());
    }

    #[test]
    fn test_tick_drains_bank_while_running() {
        let (mut session, clock) = open_at("2026-10-18T09:00:00+02:00");
        session.execute(Command::AcceptQuest("writing".into()));
        session.tick();
        let before = session.state().daily.time_bank_ms;

        clock.advance_ms(60_000);
        session.tick();

        assert_eq!(session.state().daily.time_bank_ms, before - 60_000);
    }

    #[test]
    fn test_tick_across_midnight_fails_running_quest() {
        let (mut session, clock) = open_at("2026-10-18T23:00:00+02:00");
        session.execute(Command::CompleteSideQuest("focus".into()));
        session.execute(Command::AcceptQuest("reading".into()));

        clock.advance_ms(2 * 60 * 60 * 1000);
        let events = session.tick();

        assert!(events
            .iter()
            .any(|e| matches!(e, TrackerEvent::QuestFailed { penalty: 5, .. })));
        assert_eq!(session.state().player.xp, 15);
        assert_eq!(session.state().player.streak, 1);
        assert!(session.state().quests.active_timed.is_empty());
    }

    #[test]
    fn test_reopen_restores_state() {
        let clock = FixedClock::parse("2026-10-18T09:00:00+02:00").unwrap();
        let (mut first, _) = Session::open(MemoryStore::new(), clock.clone(), builtin_catalog());
        first.execute(Command::ToggleMainQuest(0));
        let saved = first.store().get(STATE_KEY).unwrap();

        let (second, events) = Session::open(
            MemoryStore::with_entry(STATE_KEY, &saved),
            clock,
            builtin_catalog(),
        );

        assert!(events.is_empty());
        assert_eq!(second.state(), first.state());
    }

    #[test]
    fn test_tick_uses_clock_zone_for_deadline() {
        use crate::core::time::test_zone::berlin;

        let clock = FixedClock::new(berlin(2026, 10, 25, 1, 0));
        let (mut session, _) = Session::open(MemoryStore::new(), clock.clone(), builtin_catalog());
        session.execute(Command::AcceptQuest("reading".into()));

        clock.set(berlin(2026, 10, 25, 23, 30));
        let events = session.tick();

        assert!(!events
            .iter()
            .any(|e| matches!(e, TrackerEvent::QuestFailed { .. })));
        let completed = session.execute(Command::CompleteQuest("reading".into()));
        assert!(matches!(
            completed.as_slice(),
            [TrackerEvent::QuestCompleted { .. }]
        ));
    }

    #[test]
    fn test_load_catches_up_without_saving() {
        let clock = FixedClock::parse("2026-10-18T21:00:00+02:00").unwrap();
        let (mut first, _) = Session::open(MemoryStore::new(), clock.clone(), builtin_catalog());
        first.execute(Command::AcceptQuest("reading".into()));
        let saved = first.store().get(STATE_KEY).unwrap();

        clock.advance_ms(12 * 60 * 60 * 1000);
        let (preview, events) = Session::load(
            MemoryStore::with_entry(STATE_KEY, &saved),
            clock,
            builtin_catalog(),
        );

        assert!(events
            .iter()
            .any(|e| matches!(e, TrackerEvent::QuestFailed { .. })));
        assert!(preview.state().quests.active_timed.is_empty());
        assert_eq!(preview.store().get(STATE_KEY), Some(saved));
    }
}
