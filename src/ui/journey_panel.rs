use super::{highlight, panel_block, Snapshot};
use crate::input::{Focus, ViewState};
use projekt_rpg::core::constants::XP_HISTORY_DISPLAY_DAYS;
use projekt_rpg::core::progression::{
    can_unlock_next_rank, current_rank, is_main_quest_done, next_rank, pending_rank_trial,
    rank_progress,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Draws the rank gauge, the rank timeline and the main quest board
pub fn draw_rank_panel(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewState) {
    let focused = view.focus == Focus::MainQuests;
    let state = snapshot.state;
    let catalog = snapshot.catalog;

    let rank_name = current_rank(state, catalog).map_or("?", |r| r.name.as_str());
    let block = panel_block(" Journey ", focused, Color::Green);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Timeline
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Trial / unlock hint
            Constraint::Min(0),    // Main quests
        ])
        .split(inner);

    // Timeline: unlocked ranks in green, the rest dimmed
    let mut timeline: Vec<Span> = Vec::new();
    for (i, rank) in catalog.ranks.iter().enumerate() {
        if i > 0 {
            timeline.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }
        let style = if rank.id == state.player.current_rank {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if state.player.unlocked_ranks.contains(&rank.id) {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        timeline.push(Span::styled(rank.name.clone(), style));
    }
    frame.render_widget(Paragraph::new(Line::from(timeline)), chunks[0]);

    let (into_rank, span) = rank_progress(state, catalog);
    let ratio = if span > 0 {
        (into_rank as f64 / span as f64).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(ratio)
        .label(format!("{} · {}/{} XP", rank_name, into_rank, span));
    frame.render_widget(gauge, chunks[1]);

    let hint = match (pending_rank_trial(state, catalog), next_rank(state, catalog)) {
        (Some(trial), Some(next)) => Line::from(vec![
            Span::styled(
                format!("Trial for {}: ", next.name),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(trial.to_string()),
            Span::styled("  [u] unlock", Style::default().fg(Color::DarkGray)),
        ]),
        (None, Some(next)) if can_unlock_next_rank(state, catalog) => Line::from(Span::styled(
            format!("{} ready  [u] unlock", next.name),
            Style::default().fg(Color::Yellow),
        )),
        (_, Some(next)) => Line::from(Span::styled(
            format!("Next: {} at {} XP", next.name, next.min_xp),
            Style::default().fg(Color::DarkGray),
        )),
        (_, None) => Line::from(Span::styled(
            "Highest rank reached",
            Style::default().fg(Color::Green),
        )),
    };
    frame.render_widget(Paragraph::new(hint), chunks[2]);

    let mut lines: Vec<Line> = Vec::new();
    for (i, text) in catalog
        .main_quests_for(&state.player.current_rank)
        .iter()
        .enumerate()
    {
        let selected = focused && view.cursor(Focus::MainQuests) == i;
        let done = is_main_quest_done(state, &state.player.current_rank, i);
        let (mark, style) = if done {
            ("[✓] ", Style::default().fg(Color::Green))
        } else {
            ("[ ] ", Style::default())
        };
        lines.push(highlight(
            Line::from(vec![
                Span::raw(if selected { "▶ " } else { "  " }),
                Span::styled(mark, style),
                Span::styled(text.clone(), style),
            ]),
            selected,
        ));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[3]);
}

/// Draws recent daily XP as bars, next to the defeated-boss history
pub fn draw_history_panel(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let history = snapshot.state.recent_xp_history(XP_HISTORY_DISPLAY_DAYS);
    let max_xp = history.iter().map(|(_, xp)| *xp).max().unwrap_or(0).max(1);
    let bar_width = chunks[0].width.saturating_sub(16) as u64;

    let mut lines: Vec<Line> = Vec::new();
    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "No finished days yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (day, xp) in &history {
        let filled = (xp * bar_width / max_xp) as usize;
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", day.format("%a %d"))),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
            Span::raw(format!(" {}", xp)),
        ]));
    }
    let xp_panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Last Days "));
    frame.render_widget(xp_panel, chunks[0]);

    let mut bosses: Vec<Line> = snapshot
        .state
        .bosses
        .history
        .iter()
        .rev()
        .map(|record| {
            Line::from(vec![
                Span::styled(format!("{} ", record.week), Style::default().fg(Color::DarkGray)),
                Span::styled(record.title.clone(), Style::default().fg(Color::Red)),
            ])
        })
        .collect();
    if bosses.is_empty() {
        bosses.push(Line::from(Span::styled(
            "No bosses defeated",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let boss_panel = Paragraph::new(bosses)
        .block(Block::default().borders(Borders::ALL).title(" Trophies "));
    frame.render_widget(boss_panel, chunks[1]);
}
