use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::Frame;
use std::time::Duration;

use crate::effects::ParticleField;
use crate::views;
use common::{Direction, InputIntent, RoundController, RoundPhase};

/// Longest frame the simulation is stepped with; slower frames are clamped.
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, PartialEq, Eq)]
pub enum AppCommand {
    Quit,
}

pub struct App {
    pub round: RoundController,
    pub effects: ParticleField,
    /// Player steered by the same greedy policy as the competitor
    pub autopilot: bool,
    shake_offset: (i16, i16),
    shake_rng: StdRng,
}

impl App {
    pub fn new(round: RoundController, effects: ParticleField, autopilot: bool) -> Self {
        Self {
            round,
            effects,
            autopilot,
            shake_offset: (0, 0),
            shake_rng: StdRng::from_entropy(),
        }
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let intent = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Some(AppCommand::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(AppCommand::Quit)
            }
            KeyCode::Up | KeyCode::Char('w') => InputIntent::Turn(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') => InputIntent::Turn(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') => InputIntent::Turn(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') => InputIntent::Turn(Direction::Right),
            KeyCode::Char(' ') | KeyCode::Enter => InputIntent::Start,
            _ => return None,
        };

        self.apply(intent);
        None
    }

    pub fn apply(&mut self, intent: InputIntent) -> bool {
        let starting = intent == InputIntent::Start && self.round.phase() != RoundPhase::Playing;
        let accepted = self.round.handle_input(intent);
        if starting && accepted {
            self.effects.clear();
        }
        accepted
    }

    pub fn update(&mut self, dt: Duration) {
        self.tick(dt.as_secs_f32().min(MAX_FRAME_DT));
    }

    /// One simulation frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.autopilot {
            if let Some(direction) = self.round.suggest_player_turn() {
                self.round.handle_input(InputIntent::Turn(direction));
            }
        }
        self.round.update(dt, &mut self.effects);
        self.shake_offset = self.roll_shake();
    }

    /// Board offset in (columns, rows) while the game-over shake lasts.
    pub fn shake_offset(&self) -> (i16, i16) {
        self.shake_offset
    }

    fn roll_shake(&mut self) -> (i16, i16) {
        let shake = self.round.screen_shake();
        let settings = self.round.settings();
        if self.round.phase() != RoundPhase::GameOver
            || shake.time_remaining <= 0.0
            || settings.game_over_shake_duration <= 0.0
        {
            return (0, 0);
        }

        // Pixel intensity fades with the timer, then maps onto 2x1 character cells
        let intensity = shake.intensity * (shake.time_remaining / settings.game_over_shake_duration);
        let cell = settings.grid.cell_size.max(1) as f32;
        let mut jitter = |scale: f32| {
            let pixels = self.shake_rng.gen_range(-intensity..=intensity);
            (pixels / cell * scale).round() as i16
        };
        (jitter(2.0), jitter(1.0))
    }

    pub fn render(&self, frame: &mut Frame) {
        views::render(frame, self);
    }
}
