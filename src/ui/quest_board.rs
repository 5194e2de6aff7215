use super::{highlight, panel_block, Snapshot};
use crate::input::{Focus, ViewState};
use projekt_rpg::core::constants::SIDE_QUEST_DAILY_CAP;
use projekt_rpg::core::progression::{multiplied_xp, xp_multiplier};
use projekt_rpg::core::quests::{available_side_quests, is_expanded, quest_status, side_quest_uses, QuestStatus};
use projekt_rpg::core::time::format_elapsed;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draws daily quests (top) and side quests (bottom)
pub fn draw_quest_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_daily_quests(frame, chunks[0], snapshot, view);
    draw_side_quests(frame, chunks[1], snapshot, view);
}

fn status_span(snapshot: &Snapshot, quest_id: &str) -> Span<'static> {
    match quest_status(snapshot.state, quest_id) {
        QuestStatus::NotStarted => Span::styled("[ ] open", Style::default().fg(Color::Gray)),
        QuestStatus::Active => {
            let started = snapshot
                .state
                .quests
                .active_timed
                .get(quest_id)
                .map_or(0, |t| t.start);
            let elapsed = snapshot.now.timestamp_millis() - started;
            Span::styled(
                format!("[⏱] {}", format_elapsed(elapsed)),
                Style::default().fg(Color::Yellow),
            )
        }
        QuestStatus::Completed => Span::styled(
            "[✓] done",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        QuestStatus::Failed => Span::styled("[✗] failed", Style::default().fg(Color::Red)),
    }
}

fn draw_daily_quests(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewState) {
    let focused = view.focus == Focus::Dailies;
    let streak = snapshot.state.player.streak;
    let multiplier = xp_multiplier(streak);
    let title = if multiplier > 1.0 {
        format!(" Daily Quests (x{}) ", multiplier)
    } else {
        " Daily Quests ".to_string()
    };

    let mut lines: Vec<Line> = Vec::new();
    for (i, quest) in snapshot.catalog.daily_quests.iter().enumerate() {
        let selected = focused && view.cursor(Focus::Dailies) == i;
        lines.push(highlight(
            Line::from(vec![
                Span::raw(if selected { "▶ " } else { "  " }),
                Span::styled(
                    format!("{:<24}", quest.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("+{:<4}", multiplied_xp(quest.xp, streak)),
                    Style::default().fg(Color::Cyan),
                ),
                status_span(snapshot, &quest.id),
            ]),
            selected,
        ));
        if is_expanded(snapshot.state, &quest.id) && !quest.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", quest.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(panel_block(&title, focused, Color::Cyan))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_side_quests(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewState) {
    let focused = view.focus == Focus::SideQuests;
    let quests = available_side_quests(snapshot.state, snapshot.catalog);

    let mut lines: Vec<Line> = Vec::new();
    if quests.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No side quests at this rank",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, quest) in quests.iter().enumerate() {
        let selected = focused && view.cursor(Focus::SideQuests) == i;
        let uses = side_quest_uses(snapshot.state, &quest.id);
        let uses_style = if uses >= SIDE_QUEST_DAILY_CAP {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Magenta)
        };
        lines.push(highlight(
            Line::from(vec![
                Span::raw(if selected { "▶ " } else { "  " }),
                Span::styled(
                    format!("{:<24}", quest.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("+{:<4}", quest.xp), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{}/{} today", uses, SIDE_QUEST_DAILY_CAP), uses_style),
            ]),
            selected,
        ));
        if is_expanded(snapshot.state, &quest.id) && !quest.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", quest.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(panel_block(" Side Quests ", focused, Color::Magenta))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
