use crate::geometry::{Direction, Position};
use crate::snake::{Snake, StepContext};

/// Greedy competitor policy: step toward the food, never into a known obstacle.
///
/// Candidates are the four directions minus the reverse of the current heading. A candidate
/// is dropped if it leaves the board, lands on the snake's own body (head excluded), on any
/// cell of the live opponent, or on a lethal hazard. The survivor closest to the food by
/// Manhattan distance wins; ties prefer the current heading, then the first in
/// `Direction::ALL` order. With no food every survivor ties.
///
/// Returns `None` when every candidate is blocked: the snake is trapped and keeps going.
pub fn calculate_ai_move(snake: &Snake, ctx: &StepContext) -> Option<Direction> {
    if !snake.is_alive {
        return None;
    }

    let head = snake.head();
    let grid = &ctx.settings.grid;
    let opponent = ctx.live_opponent();

    let mut best: Option<(Direction, u32)> = None;
    let mut heading_is_best = false;

    for direction in Direction::ALL {
        if snake.direction.is_opposite(&direction) {
            continue;
        }

        let next = head.step(direction);
        if !grid.in_bounds(&next)
            || snake.body_contains(&next)
            || opponent.is_some_and(|other| other.contains_point(&next))
            || ctx.is_lethal_hazard(&next)
        {
            continue;
        }

        let distance = food_distance(&next, ctx.food);
        match best {
            Some((_, best_distance)) if distance > best_distance => {}
            Some((_, best_distance)) if distance == best_distance => {
                if direction == snake.direction {
                    heading_is_best = true;
                }
            }
            _ => {
                best = Some((direction, distance));
                heading_is_best = direction == snake.direction;
            }
        }
    }

    best.map(|(direction, _)| if heading_is_best { snake.direction } else { direction })
}

fn food_distance(pos: &Position, food: Option<Position>) -> u32 {
    food.map_or(u32::MAX, |food| pos.manhattan_distance(&food))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GameSettings;
    use crate::entities::{Hazard, HazardKind};
    use crate::snake::SnakeRole;
    use std::collections::VecDeque;

    fn competitor(settings: &GameSettings, head: Position, direction: Direction) -> Snake {
        Snake::new(SnakeRole::Competitor, head, direction, settings)
    }

    #[test]
    fn test_moves_toward_food() {
        let settings = GameSettings::with_grid(10, 10);
        let snake = competitor(&settings, Position::new(5, 5), Direction::Right);
        let ctx = StepContext {
            settings: &settings,
            opponent: None,
            hazards: &[],
            food: Some(Position::new(5, 1)),
        };
        assert_eq!(calculate_ai_move(&snake, &ctx), Some(Direction::Up));
    }

    #[test]
    fn test_tie_prefers_current_heading() {
        let settings = GameSettings::with_grid(10, 10);
        // Food diagonal: Up and Right both close the gap by one
        let snake = competitor(&settings, Position::new(5, 5), Direction::Right);
        let ctx = StepContext {
            settings: &settings,
            opponent: None,
            hazards: &[],
            food: Some(Position::new(7, 3)),
        };
        assert_eq!(calculate_ai_move(&snake, &ctx), Some(Direction::Right));
    }

    #[test]
    fn test_tie_without_heading_takes_enumeration_order() {
        let settings = GameSettings::with_grid(10, 10);
        let snake = competitor(&settings, Position::new(5, 5), Direction::Right);
        // Heading blocked, Up and Down tie
        let hazards = [Hazard {
            kind: HazardKind::Bomb,
            position: Some(Position::new(6, 5)),
            age: 0.0,
            lifetime: 5.0,
        }];
        let ctx = StepContext {
            settings: &settings,
            opponent: None,
            hazards: &hazards,
            food: Some(Position::new(9, 5)),
        };
        assert_eq!(calculate_ai_move(&snake, &ctx), Some(Direction::Up));
    }

    #[test]
    fn test_no_food_keeps_heading() {
        let settings = GameSettings::with_grid(10, 10);
        let snake = competitor(&settings, Position::new(5, 5), Direction::Down);
        let ctx = StepContext {
            settings: &settings,
            opponent: None,
            hazards: &[],
            food: None,
        };
        assert_eq!(calculate_ai_move(&snake, &ctx), Some(Direction::Down));
    }

    #[test]
    fn test_avoids_hazard_and_opponent() {
        let settings = GameSettings::with_grid(10, 10);
        let snake = competitor(&settings, Position::new(5, 5), Direction::Right);
        let mut player = Snake::new(SnakeRole::Player, Position::new(5, 4), Direction::Up, &settings);
        player.body = VecDeque::from([Position::new(5, 4), Position::new(4, 4)]);
        let hazards = [Hazard {
            kind: HazardKind::Bomb,
            position: Some(Position::new(6, 5)),
            age: 0.0,
            lifetime: 5.0,
        }];
        let ctx = StepContext {
            settings: &settings,
            opponent: Some(&player),
            hazards: &hazards,
            food: Some(Position::new(9, 0)),
        };
        assert_eq!(calculate_ai_move(&snake, &ctx), Some(Direction::Down));
    }

    #[test]
    fn test_dead_opponent_is_not_an_obstacle() {
        let settings = GameSettings::with_grid(10, 10);
        let snake = competitor(&settings, Position::new(5, 5), Direction::Right);
        let mut player = Snake::new(SnakeRole::Player, Position::new(6, 5), Direction::Up, &settings);
        player.is_alive = false;
        let ctx = StepContext {
            settings: &settings,
            opponent: Some(&player),
            hazards: &[],
            food: Some(Position::new(9, 5)),
        };
        assert_eq!(calculate_ai_move(&snake, &ctx), Some(Direction::Right));
    }

    #[test]
    fn test_trapped_returns_none() {
        let settings = GameSettings::with_grid(10, 10);
        // Corner, facing the wall, own body below
        let mut snake = competitor(&settings, Position::new(0, 0), Direction::Up);
        snake.body = VecDeque::from([Position::new(0, 0), Position::new(0, 1), Position::new(1, 1), Position::new(1, 0)]);
        snake.length = 4;
        let ctx = StepContext {
            settings: &settings,
            opponent: None,
            hazards: &[],
            food: Some(Position::new(5, 5)),
        };
        assert_eq!(calculate_ai_move(&snake, &ctx), None);
    }
}
