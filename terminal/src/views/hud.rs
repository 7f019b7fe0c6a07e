use crate::app::App;
use common::{RoundPhase, UI_TEXT_COLOR};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

fn rgb(color: common::Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// Score line plus combo, frenzy and power-up timers.
pub fn hud(app: &App) -> Paragraph<'static> {
    let round = &app.round;
    let text_style = Style::default().fg(rgb(UI_TEXT_COLOR));

    let mut status = vec![
        Span::styled(format!("Score: {}", round.score()), text_style.add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(format!("High Score: {}", round.high_score()), text_style),
    ];

    let combo = round.combo();
    if combo.count > 1 {
        status.push(Span::raw("   "));
        status.push(Span::styled(
            format!("Combo: x{} ({:.1}s)", combo.count, combo.time_remaining.max(0.0)),
            Style::default().fg(Color::Rgb(255, 200, 100)),
        ));
    }

    let frenzy = round.frenzy();
    if frenzy.active {
        // Flash between two reds
        let bright = (frenzy.time_remaining * 4.0) as i32 % 2 == 0;
        let color = if bright {
            Color::Rgb(255, 80, 80)
        } else {
            Color::Rgb(255, 160, 60)
        };
        status.push(Span::raw("   "));
        status.push(Span::styled(
            format!("FRENZY! {:.1}s", frenzy.time_remaining),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let mut details = Vec::new();
    for (kind, remaining) in round.arena().player.power_ups.active() {
        details.push(Span::styled(
            format!("{}: {:.1}s  ", kind.name().to_uppercase(), remaining),
            Style::default().fg(rgb(kind.color())),
        ));
    }
    if round.phase() == RoundPhase::Playing && !round.arena().competitor.is_alive {
        details.push(Span::styled("Rival eliminated  ", Style::default().fg(Color::DarkGray)));
    }
    if let Some(cue) = app.effects.last_cue() {
        details.push(Span::styled(format!("♪ {}", cue.name()), Style::default().fg(Color::DarkGray)));
    }
    if app.autopilot {
        details.push(Span::styled("  [autopilot]", Style::default().fg(Color::Cyan)));
    }

    Paragraph::new(vec![Line::from(status), Line::from(details)])
        .block(Block::default().borders(Borders::ALL))
}

pub fn controls() -> Paragraph<'static> {
    Paragraph::new(Line::from(
        "Arrows/WASD: Move | Space/Enter: Start | q/Esc: Quit",
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL))
}
