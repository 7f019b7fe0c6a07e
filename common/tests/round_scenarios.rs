use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use common::{
    Cue, DeathCause, Direction, Food, GameSettings, Hazard, HazardKind, HighScoreStore,
    InputIntent, MemoryHighScore, NullEffects, Position, PowerUp, PowerUpKind, PseudoRandom, RecordedEffects,
    RoundController, RoundPhase, ScriptedRandom,
};

/// One player step at the default 10.5 cells/s.
const STEP_DT: f32 = 0.1;

/// Every roll reads as 0.3 and every position draw as (12, 4) on the default board.
const ROLL_POINT_THREE: u32 = 0x4CCC_CCCC;

#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryHighScore>>);

impl HighScoreStore for SharedStore {
    fn load(&mut self) -> Result<u32> {
        self.0.borrow_mut().load()
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.0.borrow_mut().save(score)
    }
}

struct BrokenStore;

impl HighScoreStore for BrokenStore {
    fn load(&mut self) -> Result<u32> {
        Err(anyhow!("disk on fire"))
    }

    fn save(&mut self, _score: u32) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
}

fn quiet_settings() -> GameSettings {
    GameSettings {
        hazard_spawn_chance: 0.0,
        powerup_spawn_chance: 0.0,
        frenzy_food_respawn_chance: 0.0,
        ..GameSettings::default()
    }
}

fn started(settings: GameSettings, store: Box<dyn HighScoreStore>) -> RoundController {
    let mut round = RoundController::new(settings, Box::new(PseudoRandom::new(42)), store);
    round.start_new_game().unwrap();
    round
}

/// Player alone on the board as a single cell at `head`.
fn solo_round(settings: GameSettings, head: Position, direction: Direction) -> RoundController {
    let mut round = started(settings, Box::new(MemoryHighScore::default()));
    round.arena_mut().competitor.is_alive = false;
    place(&mut round.arena_mut().player, head, direction);
    round
}

fn place(snake: &mut common::Snake, head: Position, direction: Direction) {
    let visual = GameSettings::default().grid.grid_to_screen(&head);
    snake.body = [head].into_iter().collect();
    snake.visual = vec![visual];
    snake.direction = direction;
    snake.pending_direction = direction;
    snake.step_accumulator = 0.0;
}

fn put_food(round: &mut RoundController, position: Position) {
    let visual = round.settings().grid.grid_to_screen(&position);
    round.arena_mut().food = Some(Food { position, visual });
}

fn bomb(x: i16, y: i16) -> Hazard {
    Hazard {
        kind: HazardKind::Bomb,
        position: Some(Position::new(x, y)),
        age: 0.0,
        lifetime: 100.0,
    }
}

fn eat_ahead(round: &mut RoundController, effects: &mut RecordedEffects) {
    let player = &round.arena().player;
    let target = player.head().step(player.direction);
    put_food(round, target);
    round.update(STEP_DT, effects);
    assert_eq!(round.arena().player.head(), target);
}

#[test]
fn test_three_quick_eats_build_combo() {
    let mut round = solo_round(quiet_settings(), Position::new(5, 5), Direction::Right);
    let mut effects = RecordedEffects::default();

    eat_ahead(&mut round, &mut effects);
    assert_eq!(round.score(), 10);
    assert_eq!(round.combo().count, 1);

    eat_ahead(&mut round, &mut effects);
    assert_eq!(round.score(), 25);
    assert_eq!(round.combo().count, 2);

    eat_ahead(&mut round, &mut effects);
    assert_eq!(round.score(), 45);
    assert_eq!(round.combo().count, 3);

    let cues = effects.cues();
    assert_eq!(cues.iter().filter(|cue| **cue == Cue::Eat).count(), 3);
    assert!(cues.contains(&Cue::Combo(2)));
    assert!(cues.contains(&Cue::Combo(3)));
    assert_eq!(effects.bursts(), 3);
}

#[test]
fn test_late_eat_restarts_combo_at_one() {
    let settings = GameSettings {
        combo_time_limit: 0.15,
        ..quiet_settings()
    };
    let mut round = solo_round(settings, Position::new(5, 5), Direction::Right);
    let mut effects = RecordedEffects::default();

    eat_ahead(&mut round, &mut effects);
    assert_eq!(round.combo().count, 1);

    put_food(&mut round, Position::new(0, 20));
    round.update(STEP_DT, &mut effects);
    assert_eq!(round.combo().count, 0);

    eat_ahead(&mut round, &mut effects);
    assert_eq!(round.combo().count, 1);
    assert_eq!(round.score(), 20);
    assert!(!effects.cues().iter().any(|cue| matches!(cue, Cue::Combo(_))));
}

#[test]
fn test_multiplier_doubles_points() {
    let mut round = solo_round(quiet_settings(), Position::new(5, 5), Direction::Right);
    round
        .arena_mut()
        .player
        .activate_power_up(PowerUpKind::Multiplier, 10.0);
    let mut effects = RecordedEffects::default();

    eat_ahead(&mut round, &mut effects);
    eat_ahead(&mut round, &mut effects);
    assert_eq!(round.score(), 20 + 30);
}

#[test]
fn test_frenzy_starts_at_threshold_and_expires() {
    let settings = GameSettings {
        frenzy_threshold: 3,
        frenzy_duration: 0.25,
        ..quiet_settings()
    };
    let mut round = solo_round(settings, Position::new(3, 5), Direction::Right);
    let mut effects = RecordedEffects::default();

    eat_ahead(&mut round, &mut effects);
    eat_ahead(&mut round, &mut effects);
    assert!(!round.frenzy().active);
    eat_ahead(&mut round, &mut effects);
    assert!(round.frenzy().active);
    assert_eq!(round.frenzy().time_remaining, 0.25);

    put_food(&mut round, Position::new(0, 20));
    round.update(0.125, &mut effects);
    assert!(round.frenzy().active);
    assert!((round.effective_speed_multiplier() - 1.3).abs() < 1e-6);

    round.update(0.125, &mut effects);
    assert!(!round.frenzy().active);
    assert_eq!(round.effective_speed_multiplier(), 1.0);
}

/// Player eats once with every draw pinned to `ROLL_POINT_THREE`.
fn scripted_round_after_eat(settings: GameSettings) -> RoundController {
    let mut round = RoundController::new(
        settings,
        Box::new(ScriptedRandom::constant(ROLL_POINT_THREE)),
        Box::new(MemoryHighScore::default()),
    );
    round.start_new_game().unwrap();
    round.arena_mut().competitor.is_alive = false;
    place(&mut round.arena_mut().player, Position::new(5, 5), Direction::Right);

    let mut effects = RecordedEffects::default();
    eat_ahead(&mut round, &mut effects);
    assert!(round.arena().hazards.is_empty());
    assert_eq!(round.arena().food_position(), Some(Position::new(12, 4)));
    // Free (12,4) for the hazard draw
    put_food(&mut round, Position::new(0, 20));
    round
}

#[test]
fn test_frenzy_doubles_hazard_chance() {
    // 0.3 misses a 0.2 chance but hits the doubled 0.4
    let calm = GameSettings {
        hazard_spawn_chance: 0.2,
        frenzy_threshold: 100,
        ..quiet_settings()
    };
    let mut round = scripted_round_after_eat(calm.clone());
    assert!(!round.frenzy().active);
    round.update(0.01, &mut RecordedEffects::default());
    assert!(round.arena().hazards.is_empty());

    let frantic = GameSettings {
        frenzy_threshold: 1,
        ..calm
    };
    let mut round = scripted_round_after_eat(frantic);
    assert!(round.frenzy().active);
    round.update(0.01, &mut RecordedEffects::default());
    let hazards = &round.arena().hazards;
    assert_eq!(hazards.len(), 1);
    assert_eq!(hazards[0].position, Some(Position::new(12, 4)));
    assert!((hazards[0].lifetime - 8.0).abs() < 1e-3);
}

fn count_food_moves(round: &mut RoundController, frames: usize) -> usize {
    let mut effects = RecordedEffects::default();
    let mut moves = 0;
    for _ in 0..frames {
        let before = round.arena().food_position();
        round.update(0.01, &mut effects);
        let arena = round.arena();
        let food = arena.food_position().unwrap();
        assert!(!arena.player.contains_point(&food));
        if Some(food) != before {
            moves += 1;
        }
    }
    moves
}

#[test]
fn test_frenzy_churns_food() {
    let settings = GameSettings {
        frenzy_threshold: 1,
        frenzy_food_respawn_chance: 1.0,
        ..quiet_settings()
    };
    let mut round = solo_round(settings.clone(), Position::new(5, 5), Direction::Right);
    let mut effects = RecordedEffects::default();
    eat_ahead(&mut round, &mut effects);
    assert!(round.frenzy().active);
    assert_eq!(round.score(), 10);

    // Short frames, so no step can reach the food; a fresh cell may repeat the old one
    let moves = count_food_moves(&mut round, 5);
    assert!(moves >= 4, "food moved on {moves} of 5 frames");
    assert_eq!(round.score(), 10);

    let calm = GameSettings {
        frenzy_threshold: 100,
        ..settings
    };
    let mut round = solo_round(calm, Position::new(5, 5), Direction::Right);
    eat_ahead(&mut round, &mut effects);
    assert!(!round.frenzy().active);
    assert_eq!(count_food_moves(&mut round, 5), 0);
}

#[test]
fn test_reverse_turn_is_ignored() {
    let mut round = solo_round(quiet_settings(), Position::new(5, 5), Direction::Right);
    put_food(&mut round, Position::new(0, 20));
    round.handle_input(InputIntent::Turn(Direction::Left));
    round.update(STEP_DT, &mut RecordedEffects::default());
    assert_eq!(round.arena().player.head(), Position::new(6, 5));
    assert_eq!(round.arena().player.direction, Direction::Right);
}

#[test]
fn test_head_on_kills_both() {
    let mut round = started(quiet_settings(), Box::new(MemoryHighScore::default()));
    put_food(&mut round, Position::new(0, 20));
    let arena = round.arena_mut();
    place(&mut arena.player, Position::new(5, 5), Direction::Right);
    place(&mut arena.competitor, Position::new(7, 5), Direction::Left);
    // Competitor can only go left, into the player's new head
    arena.hazards = vec![bomb(7, 4), bomb(7, 6)];

    let mut effects = RecordedEffects::default();
    round.update(0.13, &mut effects);

    assert!(!round.arena().player.is_alive);
    assert!(!round.arena().competitor.is_alive);
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert_eq!(round.game_over_reason(), Some(DeathCause::HeadOn));
    assert_eq!(
        effects.cues().iter().filter(|cue| **cue == Cue::GameOver).count(),
        1
    );
}

#[test]
fn test_trapped_competitor_dies_and_round_goes_on() {
    let mut round = started(quiet_settings(), Box::new(MemoryHighScore::default()));
    put_food(&mut round, Position::new(10, 20));
    let arena = round.arena_mut();
    place(&mut arena.player, Position::new(15, 15), Direction::Down);
    place(&mut arena.competitor, Position::new(0, 5), Direction::Left);
    arena.hazards = vec![bomb(0, 4), bomb(0, 6)];

    round.update(0.13, &mut RecordedEffects::default());

    assert!(!round.arena().competitor.is_alive);
    assert_eq!(round.arena().competitor.death, Some(DeathCause::Wall));
    assert_eq!(round.phase(), RoundPhase::Playing);
    assert!(round.arena().player.is_alive);
}

#[test]
fn test_wall_ends_round_once() {
    let mut round = solo_round(quiet_settings(), Position::new(31, 5), Direction::Right);
    put_food(&mut round, Position::new(0, 20));
    let mut effects = RecordedEffects::default();

    round.update(STEP_DT, &mut effects);
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert_eq!(round.game_over_reason(), Some(DeathCause::Wall));

    round.trigger_game_over(DeathCause::Hazard, &mut effects);
    round.update(STEP_DT, &mut effects);
    assert_eq!(round.game_over_reason(), Some(DeathCause::Wall));
    assert_eq!(effects.cues(), vec![Cue::GameOver]);
    assert!(!round.handle_input(InputIntent::Turn(Direction::Up)));
}

#[test]
fn test_record_is_saved_and_restart_clears_state() {
    let store = SharedStore::default();
    store.0.borrow_mut().best = 15;
    let mut round = started(quiet_settings(), Box::new(store.clone()));
    assert_eq!(round.high_score(), 15);
    round.arena_mut().competitor.is_alive = false;
    place(&mut round.arena_mut().player, Position::new(5, 5), Direction::Right);

    let mut effects = RecordedEffects::default();
    eat_ahead(&mut round, &mut effects);
    eat_ahead(&mut round, &mut effects);
    round.trigger_game_over(DeathCause::SelfCollision, &mut effects);

    assert_eq!(round.high_score(), 25);
    assert!(round.is_new_high_score());
    assert_eq!(store.0.borrow().best, 25);
    assert_eq!(store.0.borrow().saves, 1);
    assert!(round.screen_shake().time_remaining > 0.0);

    assert!(round.handle_input(InputIntent::Start));
    assert_eq!(round.score(), 0);
    assert_eq!(round.combo().count, 0);
    assert!(!round.is_new_high_score());
    assert!(round.arena().player.is_alive);
    assert!(round.arena().competitor.is_alive);
    assert_eq!(round.arena().player.body.len(), 1);
    assert_eq!(round.high_score(), 25);
}

#[test]
fn test_lower_score_keeps_record() {
    let store = SharedStore::default();
    store.0.borrow_mut().best = 500;
    let mut round = started(quiet_settings(), Box::new(store.clone()));
    round.trigger_game_over(DeathCause::Wall, &mut RecordedEffects::default());
    assert!(!round.is_new_high_score());
    assert_eq!(store.0.borrow().saves, 0);
}

#[test]
fn test_broken_store_does_not_stop_play() {
    let mut round = started(quiet_settings(), Box::new(BrokenStore));
    assert_eq!(round.high_score(), 0);
    round.arena_mut().competitor.is_alive = false;
    place(&mut round.arena_mut().player, Position::new(5, 5), Direction::Right);
    let mut effects = RecordedEffects::default();
    eat_ahead(&mut round, &mut effects);
    round.trigger_game_over(DeathCause::Wall, &mut effects);
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert_eq!(round.high_score(), 10);
}

#[test]
fn test_power_up_pickup_activates_timer() {
    let mut round = solo_round(quiet_settings(), Position::new(5, 5), Direction::Right);
    put_food(&mut round, Position::new(0, 20));
    let cell = Position::new(6, 5);
    let visual = round.settings().grid.grid_to_screen(&cell);
    round.arena_mut().power_ups.push(PowerUp {
        position: cell,
        kind: PowerUpKind::Phase,
        visual,
        pulse_phase: 0.0,
    });

    let mut effects = RecordedEffects::default();
    round.update(STEP_DT, &mut effects);

    assert!(round.arena().power_ups.is_empty());
    assert!(round.arena().player.has_power_up(PowerUpKind::Phase));
    assert_eq!(effects.cues(), vec![Cue::PowerUp]);
    assert_eq!(effects.bursts(), 1);
}

#[test]
fn test_magnet_pulls_food_visual_only() {
    let mut round = solo_round(quiet_settings(), Position::new(5, 5), Direction::Right);
    round
        .arena_mut()
        .player
        .activate_power_up(PowerUpKind::Magnet, 10.0);
    put_food(&mut round, Position::new(5, 8));
    let before = round.arena().food.clone().unwrap();

    round.update(0.01, &mut RecordedEffects::default());
    let after = round.arena().food.clone().unwrap();

    assert_eq!(after.position, before.position);
    assert!(after.visual.y < before.visual.y);
    assert_eq!(after.visual.x, before.visual.x);
}

#[test]
fn test_magnet_ignores_far_food() {
    let mut round = solo_round(quiet_settings(), Position::new(5, 5), Direction::Right);
    round
        .arena_mut()
        .player
        .activate_power_up(PowerUpKind::Magnet, 10.0);
    put_food(&mut round, Position::new(5, 20));
    round.update(0.01, &mut RecordedEffects::default());
    let food = round.arena().food.clone().unwrap();
    assert_eq!(food.visual, round.settings().grid.grid_to_screen(&food.position));
}

#[test]
fn test_mist_slows_player() {
    let mut round = solo_round(quiet_settings(), Position::new(5, 5), Direction::Right);
    put_food(&mut round, Position::new(0, 20));
    round.arena_mut().hazards.push(Hazard {
        kind: HazardKind::Mist,
        ..bomb(5, 5)
    });
    round.update(0.01, &mut RecordedEffects::default());
    assert!((round.effective_speed_multiplier() - 0.6).abs() < 1e-6);
    assert!(round.arena().player.is_alive);
}

/// Autopilot runs over many seeds with every spawner active.
#[test]
fn test_invariants_hold_under_autopilot() {
    for seed in 1..=8u64 {
        let settings = GameSettings {
            hazard_spawn_chance: 0.05,
            powerup_spawn_chance: 0.05,
            ..GameSettings::default()
        };
        let mut round = RoundController::new(
            settings.clone(),
            Box::new(PseudoRandom::new(seed)),
            Box::new(MemoryHighScore::default()),
        );
        let mut effects = NullEffects;
        let dt = settings.frame_dt();
        let mut last_score = 0;
        let mut phased_this_round = false;

        for _ in 0..3000 {
            if round.phase() != RoundPhase::Playing {
                round.start_new_game().unwrap();
                last_score = 0;
                phased_this_round = false;
            }
            if let Some(direction) = round.suggest_player_turn() {
                round.handle_input(InputIntent::Turn(direction));
            }
            let food_before = round.arena().food_position();
            round.update(dt, &mut effects);

            let arena = round.arena();
            assert!(round.score() >= last_score);
            last_score = round.score();
            assert!(arena.hazards.len() <= settings.hazard_max_count);
            assert!(arena.power_ups.len() <= settings.powerup_max_count);
            assert!(arena.hazards.iter().all(|hazard| hazard.is_spawned()));

            for snake in [&arena.player, &arena.competitor] {
                if !snake.is_alive {
                    continue;
                }
                assert!(snake.body.len() <= snake.length);
                assert!(snake.body.iter().all(|cell| settings.grid.in_bounds(cell)));
            }

            // Fresh food lands off both snakes. A burst double step may later pass over it.
            let food = arena.food_position();
            if food != food_before && !arena.player.has_power_up(PowerUpKind::Burst) {
                if let Some(food) = food {
                    for snake in [&arena.player, &arena.competitor] {
                        assert!(!snake.is_alive || !snake.contains_point(&food));
                    }
                }
            }

            if arena.competitor.is_alive {
                let cells: HashSet<_> = arena.competitor.body.iter().collect();
                assert_eq!(cells.len(), arena.competitor.body.len());
            }

            // Overlap from a phase pass lingers until the tail clears it
            phased_this_round |= arena.player.has_power_up(PowerUpKind::Phase);
            if arena.player.is_alive && !phased_this_round {
                let cells: HashSet<_> = arena.player.body.iter().collect();
                assert_eq!(cells.len(), arena.player.body.len());
            }
        }
    }
}
