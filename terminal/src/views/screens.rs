use common::RoundController;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Rect of `width` x `height` cells centered in `area`, clamped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width.min(area.width)),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

pub fn render_menu(frame: &mut Frame, area: Rect, high_score: u32) {
    let lines = vec![
        Line::from(""),
        Line::styled(
            "Bio-luminescent Snake",
            Style::default().fg(Color::Rgb(150, 255, 150)).add_modifier(Modifier::BOLD),
        ),
        Line::styled("Battle!", Style::default().fg(Color::Rgb(255, 150, 150)).add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("Press SPACE or ENTER to Start"),
        Line::styled("Arrow Keys or WASD to Move", Style::default().fg(Color::DarkGray)),
        Line::from(""),
        Line::from(format!("High Score: {high_score}")),
    ];

    let popup = centered_rect(44, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

pub fn render_game_over(frame: &mut Frame, area: Rect, round: &RoundController) {
    let mut lines = vec![
        Line::styled(
            "GAME OVER",
            Style::default().fg(Color::Rgb(255, 80, 80)).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(reason) = round.game_over_reason() {
        lines.push(Line::styled(reason.reason(), Style::default().fg(Color::DarkGray)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Final Score: {}", round.score())));
    if round.is_new_high_score() {
        lines.push(Line::styled(
            "New High Score!",
            Style::default().fg(Color::Rgb(255, 255, 100)).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Press SPACE or ENTER to Restart"));

    let popup = centered_rect(40, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}
