use serde::{Deserialize, Serialize};

use crate::constants::GameSettings;
use crate::entities::{Food, Hazard, PowerUp};
use crate::geometry::{Direction, Position};
use crate::snake::{Snake, SnakeRole, StepContext};
use crate::util::RandomGenerator;

/// Every entity of a round. Owned by the round controller; everything else gets `&Arena`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub player: Snake,
    pub competitor: Snake,
    pub food: Option<Food>,
    pub power_ups: Vec<PowerUp>,
    pub hazards: Vec<Hazard>,
}

impl Arena {
    /// Both snakes at their start cells with random headings, nothing else on the board.
    pub fn new(settings: &GameSettings, rng: &mut dyn RandomGenerator) -> Self {
        let player_start = Snake::start_position(SnakeRole::Player, settings);
        let competitor_start = Snake::start_position(SnakeRole::Competitor, settings);
        Arena {
            player: Snake::new(SnakeRole::Player, player_start, Direction::random(rng), settings),
            competitor: Snake::new(
                SnakeRole::Competitor,
                competitor_start,
                Direction::random(rng),
                settings,
            ),
            food: None,
            power_ups: Vec::new(),
            hazards: Vec::new(),
        }
    }

    pub fn food_position(&self) -> Option<Position> {
        self.food.as_ref().map(|food| food.position)
    }

    /// Read-only view for moving (or planning for) the snake with `role`.
    pub fn step_context<'a>(&'a self, role: SnakeRole, settings: &'a GameSettings) -> StepContext<'a> {
        let opponent = match role {
            SnakeRole::Player => &self.competitor,
            SnakeRole::Competitor => &self.player,
        };
        StepContext {
            settings,
            opponent: Some(opponent),
            hazards: &self.hazards,
            food: self.food_position(),
        }
    }
}
