pub mod board;
pub mod hud;
pub mod screens;

use crate::app::App;
use common::RoundPhase;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // HUD
            Constraint::Min(10),   // Board
            Constraint::Length(3), // Controls help
        ])
        .split(frame.area());

    frame.render_widget(hud::hud(app), chunks[0]);

    match app.round.phase() {
        RoundPhase::Menu => screens::render_menu(frame, chunks[1], app.round.high_score()),
        RoundPhase::Playing => board::render_board(frame, chunks[1], app),
        RoundPhase::GameOver => {
            board::render_board(frame, chunks[1], app);
            screens::render_game_over(frame, chunks[1], &app.round);
        }
    }

    frame.render_widget(hud::controls(), chunks[2]);
}
