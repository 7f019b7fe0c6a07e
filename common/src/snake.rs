use std::collections::VecDeque;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ai::calculate_ai_move;
use crate::constants::GameSettings;
use crate::entities::{Hazard, PowerUpKind};
use crate::geometry::{Direction, Position, ScreenPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeRole {
    Player,
    Competitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    SelfCollision,
    Hazard,
    /// Both heads entered the same cell; both snakes die.
    HeadOn,
    /// Ran into the other snake's body.
    Opponent,
}

impl DeathCause {
    pub fn reason(&self) -> &'static str {
        match self {
            DeathCause::Wall => "wall",
            DeathCause::SelfCollision => "self",
            DeathCause::Hazard => "hazard: bomb",
            DeathCause::HeadOn => "head-on collision",
            DeathCause::Opponent => "collision with competitor",
        }
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Remaining seconds per power-up kind; `None` means inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTimers {
    pub phase: Option<f32>,
    pub magnet: Option<f32>,
    pub multiplier: Option<f32>,
    pub burst: Option<f32>,
}

impl PowerUpTimers {
    fn slot(&self, kind: PowerUpKind) -> &Option<f32> {
        match kind {
            PowerUpKind::Phase => &self.phase,
            PowerUpKind::Magnet => &self.magnet,
            PowerUpKind::Multiplier => &self.multiplier,
            PowerUpKind::Burst => &self.burst,
        }
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> &mut Option<f32> {
        match kind {
            PowerUpKind::Phase => &mut self.phase,
            PowerUpKind::Magnet => &mut self.magnet,
            PowerUpKind::Multiplier => &mut self.multiplier,
            PowerUpKind::Burst => &mut self.burst,
        }
    }

    pub fn remaining(&self, kind: PowerUpKind) -> Option<f32> {
        *self.slot(kind)
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn activate(&mut self, kind: PowerUpKind, duration: f32) {
        *self.slot_mut(kind) = Some(duration);
    }

    pub fn deactivate(&mut self, kind: PowerUpKind) {
        *self.slot_mut(kind) = None;
    }

    /// Counts every active timer down by `dt`. Returns the kinds that ran out.
    pub fn tick(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = self.slot_mut(kind);
            if let Some(remaining) = *slot {
                let left = remaining - dt;
                if left <= 0.0 {
                    *slot = None;
                    expired.push(kind);
                } else {
                    *slot = Some(left);
                }
            }
        }
        expired
    }

    pub fn active(&self) -> impl Iterator<Item = (PowerUpKind, f32)> + '_ {
        PowerUpKind::ALL
            .into_iter()
            .filter_map(move |kind| self.remaining(kind).map(|left| (kind, left)))
    }
}

/// What a snake can see of the rest of the round while it moves.
pub struct StepContext<'a> {
    pub settings: &'a GameSettings,
    pub opponent: Option<&'a Snake>,
    pub hazards: &'a [Hazard],
    pub food: Option<Position>,
}

impl<'a> StepContext<'a> {
    /// The opponent, only while it is alive.
    pub fn live_opponent(&self) -> Option<&'a Snake> {
        self.opponent.filter(|snake| snake.is_alive)
    }

    pub fn is_lethal_hazard(&self, pos: &Position) -> bool {
        self.hazards.iter().any(|hazard| hazard.is_lethal_at(pos))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    pub role: SnakeRole,
    /// Head first
    pub body: VecDeque<Position>,
    /// One screen point per body segment, trailing the grid.
    pub visual: Vec<ScreenPoint>,
    pub direction: Direction,
    pub pending_direction: Direction,
    /// Target size; the body grows until it matches.
    pub length: usize,
    pub growth_debt: usize,
    /// Discrete steps per second
    pub speed: f32,
    pub step_accumulator: f32,
    pub is_alive: bool,
    pub death: Option<DeathCause>,
    pub start: Position,
    pub power_ups: PowerUpTimers,
}

impl Snake {
    pub fn new(role: SnakeRole, start: Position, direction: Direction, settings: &GameSettings) -> Self {
        let speed = match role {
            SnakeRole::Player => settings.player_speed,
            SnakeRole::Competitor => settings.competitor_speed,
        };
        Snake {
            role,
            body: VecDeque::from([start]),
            visual: vec![settings.grid.grid_to_screen(&start)],
            direction,
            pending_direction: direction,
            length: settings.snake_start_len,
            growth_debt: 0,
            speed,
            step_accumulator: 0.0,
            is_alive: true,
            death: None,
            start,
            power_ups: PowerUpTimers::default(),
        }
    }

    /// Default spawn points: a quarter in from the left for the player, from the right for the competitor.
    pub fn start_position(role: SnakeRole, settings: &GameSettings) -> Position {
        let grid = &settings.grid;
        let x = match role {
            SnakeRole::Player => grid.width / 4,
            SnakeRole::Competitor => grid.width * 3 / 4,
        };
        Position::new(x, grid.height / 2)
    }

    /// Back to the start cell with a fresh heading, keeping role and speed.
    pub fn reset(&mut self, direction: Direction, settings: &GameSettings) {
        *self = Snake::new(self.role, self.start, direction, settings);
    }

    pub fn is_player(&self) -> bool {
        self.role == SnakeRole::Player
    }

    pub fn head(&self) -> Position {
        self.body.front().copied().unwrap_or(self.start)
    }

    pub fn contains_point(&self, pos: &Position) -> bool {
        self.body.contains(pos)
    }

    pub fn body_contains(&self, pos: &Position) -> bool {
        self.body.iter().skip(1).any(|segment| segment == pos)
    }

    /// Buffers a turn for the next discrete step. Reversing into the neck is ignored.
    pub fn request_turn(&mut self, direction: Direction) {
        if !self.direction.is_opposite(&direction) {
            self.pending_direction = direction;
        }
    }

    pub fn grow(&mut self) {
        self.length += 1;
        self.growth_debt += 1;
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_ups.is_active(kind)
    }

    pub fn activate_power_up(&mut self, kind: PowerUpKind, duration: f32) {
        if !self.is_player() {
            return;
        }
        debug!("Power-up {} active for {:.1}s", kind.name(), duration);
        self.power_ups.activate(kind, duration);
    }

    pub fn deactivate_power_up(&mut self, kind: PowerUpKind) {
        if !self.is_player() {
            return;
        }
        self.power_ups.deactivate(kind);
    }

    /// One-way transition to dead. The first cause sticks.
    pub fn kill(&mut self, cause: DeathCause) {
        if self.is_alive {
            debug!("{:?} snake died: {}", self.role, cause);
            self.is_alive = false;
            self.death = Some(cause);
        }
    }

    /// Advances the snake by `dt` seconds. `speed_multiplier` only applies to the player.
    /// Returns the cause if the snake died during this call.
    pub fn tick(&mut self, dt: f32, speed_multiplier: f32, ctx: &StepContext) -> Option<DeathCause> {
        if !self.is_alive {
            return None;
        }

        if self.role == SnakeRole::Competitor {
            if let Some(direction) = calculate_ai_move(self, ctx) {
                self.request_turn(direction);
            }
        }

        let scaled_dt = if self.is_player() { dt * speed_multiplier } else { dt };
        self.step_accumulator += scaled_dt;

        if self.is_player() {
            for kind in self.power_ups.tick(dt) {
                debug!("Power-up {} expired", kind.name());
            }
        }

        let interval = 1.0 / self.speed;
        while self.step_accumulator >= interval {
            self.step_accumulator -= interval;

            let steps = if self.has_power_up(PowerUpKind::Burst) { 2 } else { 1 };
            for _ in 0..steps {
                if let Err(cause) = self.step(ctx) {
                    self.kill(cause);
                    return Some(cause);
                }
            }
        }

        self.interpolate(dt, ctx.settings);
        None
    }

    /// One grid move. Collision checks run in a fixed order and the first hit wins.
    fn step(&mut self, ctx: &StepContext) -> Result<(), DeathCause> {
        self.direction = self.pending_direction;
        let new_head = self.head().step(self.direction);

        if !ctx.settings.grid.in_bounds(&new_head) {
            return Err(DeathCause::Wall);
        }

        if !self.has_power_up(PowerUpKind::Phase) && self.body_contains(&new_head) {
            return Err(DeathCause::SelfCollision);
        }

        if ctx.is_lethal_hazard(&new_head) {
            return Err(DeathCause::Hazard);
        }

        if let Some(other) = ctx.live_opponent() {
            if other.head() == new_head {
                return Err(DeathCause::HeadOn);
            }
            if other.body_contains(&new_head) {
                return Err(DeathCause::Opponent);
            }
        }

        self.body.push_front(new_head);
        if self.growth_debt > 0 {
            self.growth_debt -= 1;
        } else if self.body.len() > self.length {
            self.body.pop_back();
        }

        Ok(())
    }

    /// Eases every segment toward its cell center; a damping factor per frame, not a velocity.
    fn interpolate(&mut self, dt: f32, settings: &GameSettings) {
        let len = self.body.len();
        if let Some(&last) = self.visual.last() {
            self.visual.resize(len, last);
        }

        let factor = (settings.interpolation_speed * dt * settings.fps as f32).min(1.0);
        for (point, cell) in self.visual.iter_mut().zip(self.body.iter()) {
            let target = settings.grid.grid_to_screen(cell);
            *point = point.lerp(target, factor);
        }
    }
}
