//! Keyboard handling and the presentation-only view state.

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use projekt_rpg::catalog::Catalog;
use projekt_rpg::core::boss::current_boss;
use projekt_rpg::core::quests::{available_side_quests, quest_status, QuestStatus};
use projekt_rpg::core::{Command, TrackerEvent, TrackerState};
use std::collections::VecDeque;

const ACTIVITY_CAPACITY: usize = 50;

/// Which list the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dailies,
    SideQuests,
    MainQuests,
    Boss,
}

impl Focus {
    const ORDER: [Focus; 4] = [
        Focus::Dailies,
        Focus::SideQuests,
        Focus::MainQuests,
        Focus::Boss,
    ];

    fn index(self) -> usize {
        match self {
            Focus::Dailies => 0,
            Focus::SideQuests => 1,
            Focus::MainQuests => 2,
            Focus::Boss => 3,
        }
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct ActivityEntry {
    pub time: String,
    pub message: String,
    pub notable: bool,
}

/// What the main loop should do after a key press.
pub enum InputAction {
    Run(Command),
    Quit,
    None,
}

/// Cursor positions and the activity log. Never persisted.
pub struct ViewState {
    pub focus: Focus,
    cursors: [usize; 4],
    pub activity: VecDeque<ActivityEntry>,
    pub show_help: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Dailies,
            cursors: [0; 4],
            activity: VecDeque::new(),
            show_help: false,
        }
    }

    pub fn cursor(&self, focus: Focus) -> usize {
        self.cursors[focus.index()]
    }

    /// Push events into the activity log, newest first.
    pub fn record(&mut self, events: &[TrackerEvent], now: &DateTime<Local>) {
        for event in events {
            if matches!(event, TrackerEvent::QuestDetailsToggled { .. }) {
                continue;
            }
            self.activity.push_front(ActivityEntry {
                time: now.format("%H:%M").to_string(),
                message: event.message(),
                notable: event.is_notable(),
            });
        }
        self.activity.truncate(ACTIVITY_CAPACITY);
    }

    fn move_cursor(&mut self, delta: isize, len: usize) {
        let slot = &mut self.cursors[self.focus.index()];
        if len == 0 {
            *slot = 0;
            return;
        }
        *slot = (*slot as isize + delta).rem_euclid(len as isize) as usize;
    }

    /// Keeps cursors inside their lists after a rank change shrank one.
    pub fn clamp_cursors(&mut self, state: &TrackerState, catalog: &Catalog) {
        for focus in Focus::ORDER {
            let len = list_len(focus, state, catalog);
            let slot = &mut self.cursors[focus.index()];
            *slot = (*slot).min(len.saturating_sub(1));
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

fn list_len(focus: Focus, state: &TrackerState, catalog: &Catalog) -> usize {
    match focus {
        Focus::Dailies => catalog.daily_quests.len(),
        Focus::SideQuests => available_side_quests(state, catalog).len(),
        Focus::MainQuests => catalog.main_quests_for(&state.player.current_rank).len(),
        Focus::Boss => current_boss(state, catalog).map_or(0, |b| b.tasks.len()),
    }
}

/// Id of the quest under the cursor, for the two quest lists.
fn selected_quest_id(view: &ViewState, state: &TrackerState, catalog: &Catalog) -> Option<String> {
    let index = view.cursor(view.focus);
    match view.focus {
        Focus::Dailies => catalog.daily_quests.get(index).map(|q| q.id.clone()),
        Focus::SideQuests => available_side_quests(state, catalog)
            .get(index)
            .map(|q| q.id.clone()),
        Focus::MainQuests | Focus::Boss => None,
    }
}

/// Primary action for the selected row: accept or complete a daily quest,
/// log a side quest, or tick a checklist item.
fn activate(view: &ViewState, state: &TrackerState, catalog: &Catalog) -> InputAction {
    let index = view.cursor(view.focus);
    match view.focus {
        Focus::Dailies => match selected_quest_id(view, state, catalog) {
            Some(id) => match quest_status(state, &id) {
                QuestStatus::NotStarted => InputAction::Run(Command::AcceptQuest(id)),
                QuestStatus::Active => InputAction::Run(Command::CompleteQuest(id)),
                QuestStatus::Completed | QuestStatus::Failed => InputAction::None,
            },
            None => InputAction::None,
        },
        Focus::SideQuests => selected_quest_id(view, state, catalog)
            .map_or(InputAction::None, |id| {
                InputAction::Run(Command::CompleteSideQuest(id))
            }),
        Focus::MainQuests => InputAction::Run(Command::ToggleMainQuest(index)),
        Focus::Boss => InputAction::Run(Command::ToggleBossTask(index)),
    }
}

pub fn handle_key(
    code: KeyCode,
    view: &mut ViewState,
    state: &TrackerState,
    catalog: &Catalog,
) -> InputAction {
    if view.show_help {
        view.show_help = false;
        return InputAction::None;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,
        KeyCode::Tab | KeyCode::Right => {
            view.focus = view.focus.next();
            InputAction::None
        }
        KeyCode::BackTab | KeyCode::Left => {
            view.focus = view.focus.prev();
            InputAction::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let len = list_len(view.focus, state, catalog);
            view.move_cursor(-1, len);
            InputAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let len = list_len(view.focus, state, catalog);
            view.move_cursor(1, len);
            InputAction::None
        }
        KeyCode::Enter | KeyCode::Char(' ') => activate(view, state, catalog),
        KeyCode::Char('d') | KeyCode::Char('D') => selected_quest_id(view, state, catalog)
            .map_or(InputAction::None, |id| {
                InputAction::Run(Command::ToggleQuestDetails(id))
            }),
        KeyCode::Char('u') | KeyCode::Char('U') => InputAction::Run(Command::UnlockNextRank),
        KeyCode::Char('b') | KeyCode::Char('B') => InputAction::Run(Command::DefeatBoss),
        KeyCode::Char('?') | KeyCode::Char('h') => {
            view.show_help = true;
            InputAction::None
        }
        _ => InputAction::None,
    }
}
