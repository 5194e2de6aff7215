mod boss_panel;
mod journey_panel;
mod quest_board;
mod status_panel;

use crate::input::ViewState;
use chrono::{DateTime, Local};
use projekt_rpg::catalog::Catalog;
use projekt_rpg::core::TrackerState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders},
    Frame,
};

/// Everything a frame needs from the session.
pub struct Snapshot<'a> {
    pub state: &'a TrackerState,
    pub catalog: &'a Catalog,
    pub now: DateTime<Local>,
}

/// Main UI drawing function
pub fn draw_ui(frame: &mut Frame, snapshot: &Snapshot, view: &ViewState) {
    let size = frame.size();

    // Header, main content, activity log, footer
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Rank / XP / streak / time bank
            Constraint::Min(0),    // Quest board + journey
            Constraint::Length(7), // Activity
            Constraint::Length(3), // Footer
        ])
        .split(size);

    status_panel::draw_header(frame, v_chunks[0], snapshot);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50), // Daily + side quests
            Constraint::Percentage(50), // Rank, main quests, boss, history
        ])
        .split(v_chunks[1]);

    quest_board::draw_quest_board(frame, columns[0], snapshot, view);
    draw_right_panel(frame, columns[1], snapshot, view);

    status_panel::draw_activity(frame, v_chunks[2], view);
    status_panel::draw_footer(frame, v_chunks[3], snapshot, view);

    if view.show_help {
        status_panel::draw_help_overlay(frame, size);
    }
}

/// Rank and main quests on top, boss checklist in the middle, history below.
fn draw_right_panel(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Rank + main quests
            Constraint::Min(9),     // Boss
            Constraint::Length(9),  // XP history + boss history
        ])
        .split(area);

    journey_panel::draw_rank_panel(frame, chunks[0], snapshot, view);
    boss_panel::draw_boss_panel(frame, chunks[1], snapshot, view);
    journey_panel::draw_history_panel(frame, chunks[2], snapshot);
}

/// Bordered block, highlighted when its list has the cursor.
fn panel_block(title: &str, focused: bool, accent: Color) -> Block<'_> {
    let border = if focused {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

/// Background for the row under the cursor.
fn highlight(mut line: Line<'_>, selected: bool) -> Line<'_> {
    if selected {
        line.style = Style::default().bg(Color::Rgb(40, 40, 60));
    }
    line
}
