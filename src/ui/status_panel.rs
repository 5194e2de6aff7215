use super::Snapshot;
use crate::input::{Focus, ViewState};
use projekt_rpg::core::progression::{current_rank, xp_multiplier};
use projekt_rpg::core::time::{current_week, format_time_bank};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Draws the header with rank, XP, streak and time bank
pub fn draw_header(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let state = snapshot.state;
    let rank = current_rank(state, snapshot.catalog).map_or("?", |r| r.name.as_str());
    let streak = state.player.streak;
    let bank_style = if state.daily.time_bank_ms == 0 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let header_text = vec![Line::from(vec![
        Span::styled(
            format!("Rank {}", rank),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("XP: {} (+{} today)", state.player.xp, state.daily.xp_gained),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("Streak: {}d x{}", streak, xp_multiplier(streak)),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("Time bank: {}", format_time_bank(state.daily.time_bank_ms)),
            bank_style,
        ),
    ])];

    let title = format!(
        " Projekt RPG · {} · {} ",
        snapshot.now.format("%a %Y-%m-%d %H:%M"),
        current_week(&snapshot.now)
    );
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Draws the activity log, newest first
pub fn draw_activity(frame: &mut Frame, area: Rect, view: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Activity ");
    let inner = block.inner(area);

    let lines: Vec<Line> = view
        .activity
        .iter()
        .take(inner.height as usize)
        .map(|entry| {
            let style = if entry.notable {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(format!("{} ", entry.time), Style::default().fg(Color::DarkGray)),
                Span::styled(entry.message.clone(), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draws the footer with the keys that apply to the focused list
pub fn draw_footer(frame: &mut Frame, area: Rect, snapshot: &Snapshot, view: &ViewState) {
    let action = match view.focus {
        Focus::Dailies => "[Enter] start/finish  [d] details",
        Focus::SideQuests => "[Enter] log  [d] details",
        Focus::MainQuests => "[Enter] check",
        Focus::Boss => "[Enter] check  [b] defeat",
    };
    let mut spans = vec![
        Span::styled(action, Style::default().fg(Color::White)),
        Span::styled(
            "  [Tab] panel  [↑↓] move  [u] rank up  [?] help  [q] quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if snapshot.state.has_running_timer() {
        spans.push(Span::styled(
            "  ⏱ quest running",
            Style::default().fg(Color::Yellow),
        ));
    }

    let footer = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Centered help box over everything else
pub fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 60.min(area.width);
    let height = 16.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let lines = vec![
        Line::from(Span::styled(
            "How it works",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Start a daily quest to run its timer until midnight."),
        Line::from("Finish it before the day ends or lose 5 XP."),
        Line::from("The time bank drains while any quest is running."),
        Line::from("Side quests count twice per day at most."),
        Line::from("Days with XP extend the streak:"),
        Line::from("  3+ days x1.2, 7+ days x1.5 on daily quests."),
        Line::from("Reach the rank ceiling, pass the trial, press [u]."),
        Line::from("Check every boss task, then press [b] once a week."),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Help "),
        ),
        popup,
    );
}
