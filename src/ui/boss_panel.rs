use super::{highlight, panel_block, Snapshot};
use crate::input::{Focus, ViewState};
use projekt_rpg::core::boss::{can_defeat_boss, current_boss, is_boss_defeated_this_week, week_progress};
use projekt_rpg::core::time::current_week;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draws this week's boss checklist
pub fn draw_boss_panel(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewState) {
    let focused = view.focus == Focus::Boss;
    let state = snapshot.state;
    let title = format!(" Weekly Boss · {} ", current_week(&snapshot.now));

    let Some(boss) = current_boss(state, snapshot.catalog) else {
        let empty = Paragraph::new("No boss for this rank")
            .block(panel_block(&title, focused, Color::Red));
        frame.render_widget(empty, area);
        return;
    };

    let defeated = is_boss_defeated_this_week(state, &snapshot.now);
    let progress = week_progress(state, &snapshot.now).unwrap_or_default();
    let done = progress.iter().filter(|d| **d).count();

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(
                boss.title.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  +{} XP", boss.xp), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            format!(
                "Active days {}/{} · tasks {}/{}",
                state.daily.weekly_active_days,
                boss.min_dailies,
                done,
                boss.tasks.len()
            ),
            Style::default().fg(Color::Gray),
        )),
    ];

    for (i, task) in boss.tasks.iter().enumerate() {
        let selected = focused && view.cursor(Focus::Boss) == i;
        let checked = progress.get(i).copied().unwrap_or(false);
        let (mark, style) = if checked {
            ("[✓] ", Style::default().fg(Color::Green))
        } else {
            ("[ ] ", Style::default())
        };
        lines.push(highlight(
            Line::from(vec![
                Span::raw(if selected { "▶ " } else { "  " }),
                Span::styled(mark, style),
                Span::styled(task.clone(), style),
            ]),
            selected,
        ));
    }

    let status = if defeated {
        Span::styled(
            "Defeated this week",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else if can_defeat_boss(state, snapshot.catalog, &snapshot.now) {
        Span::styled(
            "[b] Defeat boss",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        )
    } else {
        Span::styled("Finish every task to fight", Style::default().fg(Color::DarkGray))
    };
    lines.push(Line::from(status));

    let paragraph = Paragraph::new(lines)
        .block(panel_block(&title, focused, Color::Red))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
