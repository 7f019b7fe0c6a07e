use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::ai::calculate_ai_move;
use crate::arena::Arena;
use crate::constants::{GameSettings, FOOD_COLOR};
use crate::effects::{Cue, EffectSink};
use crate::entities::PowerUpKind;
use crate::geometry::{lerp, Direction};
use crate::high_score::HighScoreStore;
use crate::snake::{DeathCause, SnakeRole, StepContext};
use crate::spawner::{spawn_food, spawn_hazard, spawn_power_up};
use crate::util::RandomGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Menu,
    Playing,
    GameOver,
}

/// Discrete input the host delivers. Anything not valid for the current phase is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputIntent {
    Turn(Direction),
    Start,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    /// Visual countdown; the streak drops to 0 when it runs out.
    pub time_remaining: f32,
    /// Round clock of the previous player eat
    pub last_eat_at: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrenzyState {
    pub active: bool,
    pub time_remaining: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    pub time_remaining: f32,
    pub intensity: f32,
}

/// Read-only view handed to renderers and tooling.
#[derive(Debug, Serialize)]
pub struct RoundSnapshot<'a> {
    pub phase: RoundPhase,
    pub score: u32,
    pub high_score: u32,
    pub combo: &'a ComboState,
    pub frenzy: &'a FrenzyState,
    pub effective_speed_multiplier: f32,
    pub game_over_reason: Option<DeathCause>,
    pub new_high_score: bool,
    pub arena: &'a Arena,
}

/// Owns all round state and advances it one frame at a time.
pub struct RoundController {
    settings: GameSettings,
    rng: Box<dyn RandomGenerator>,
    store: Box<dyn HighScoreStore>,

    arena: Arena,
    phase: RoundPhase,
    score: u32,
    high_score: u32,
    combo: ComboState,
    frenzy: FrenzyState,
    effective_speed_multiplier: f32,
    /// Seconds of play since the round started
    clock: f32,
    screen_shake: ScreenShake,
    game_over_reason: Option<DeathCause>,
    new_high_score: bool,
}

impl RoundController {
    pub fn new(
        settings: GameSettings,
        mut rng: Box<dyn RandomGenerator>,
        mut store: Box<dyn HighScoreStore>,
    ) -> Self {
        let high_score = match store.load() {
            Ok(score) => score,
            Err(err) => {
                warn!("Could not load high score, starting from 0: {err:#}");
                0
            }
        };
        let arena = Arena::new(&settings, &mut *rng);

        RoundController {
            settings,
            rng,
            store,
            arena,
            phase: RoundPhase::Menu,
            score: 0,
            high_score,
            combo: ComboState::default(),
            frenzy: FrenzyState::default(),
            effective_speed_multiplier: 1.0,
            clock: 0.0,
            screen_shake: ScreenShake::default(),
            game_over_reason: None,
            new_high_score: false,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Direct entity access for scripted setups.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn combo(&self) -> &ComboState {
        &self.combo
    }

    pub fn frenzy(&self) -> &FrenzyState {
        &self.frenzy
    }

    pub fn effective_speed_multiplier(&self) -> f32 {
        self.effective_speed_multiplier
    }

    pub fn screen_shake(&self) -> &ScreenShake {
        &self.screen_shake
    }

    pub fn game_over_reason(&self) -> Option<DeathCause> {
        self.game_over_reason
    }

    /// Set by the game over that beat the stored record, cleared on restart.
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn snapshot(&self) -> RoundSnapshot<'_> {
        RoundSnapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            combo: &self.combo,
            frenzy: &self.frenzy,
            effective_speed_multiplier: self.effective_speed_multiplier,
            game_over_reason: self.game_over_reason,
            new_high_score: self.new_high_score,
            arena: &self.arena,
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        serde_json::to_string(&self.snapshot()).context("Failed to serialize round snapshot")
    }

    /// Returns whether the intent was accepted.
    pub fn handle_input(&mut self, intent: InputIntent) -> bool {
        match intent {
            InputIntent::Turn(direction) => {
                if self.phase != RoundPhase::Playing || !self.arena.player.is_alive {
                    return false;
                }
                self.arena.player.request_turn(direction);
                true
            }
            InputIntent::Start => self.start_new_game().is_ok(),
        }
    }

    /// The competitor's policy applied to the player, for autopilot hosts.
    pub fn suggest_player_turn(&self) -> Option<Direction> {
        if self.phase != RoundPhase::Playing {
            return None;
        }
        let ctx = self.arena.step_context(SnakeRole::Player, &self.settings);
        calculate_ai_move(&self.arena.player, &ctx)
    }

    /// Resets every piece of round state and enters Playing. Only valid from Menu or GameOver.
    pub fn start_new_game(&mut self) -> Result<()> {
        if self.phase == RoundPhase::Playing {
            bail!("Cannot start a new round while one is in progress");
        }

        let player_heading = Direction::random(&mut *self.rng);
        let competitor_heading = Direction::random(&mut *self.rng);
        self.arena.player.reset(player_heading, &self.settings);
        self.arena.competitor.reset(competitor_heading, &self.settings);
        self.arena.power_ups.clear();
        self.arena.hazards.clear();
        self.arena.food = None;

        self.score = 0;
        self.combo = ComboState::default();
        self.frenzy = FrenzyState::default();
        self.effective_speed_multiplier = 1.0;
        self.clock = 0.0;
        self.screen_shake = ScreenShake::default();
        self.game_over_reason = None;
        self.new_high_score = false;

        // Snakes first so the food avoids them
        self.respawn_food();
        self.phase = RoundPhase::Playing;
        info!("Round started, high score {}", self.high_score);
        Ok(())
    }

    /// Advances the round by `dt` seconds. Outside Playing only effects and shake keep moving.
    pub fn update(&mut self, dt: f32, effects: &mut dyn EffectSink) {
        if self.phase != RoundPhase::Playing {
            effects.advance(dt);
            self.decay_screen_shake(dt);
            return;
        }

        self.clock += dt;

        self.maybe_spawn_hazard();
        self.maybe_spawn_power_up();

        let hazard_multiplier = self.hazard_speed_multiplier();
        self.age_hazards(dt);
        self.update_frenzy(dt);

        let frenzy_multiplier = if self.frenzy.active {
            self.settings.frenzy_speed_multiplier
        } else {
            1.0
        };
        self.effective_speed_multiplier = hazard_multiplier * frenzy_multiplier;

        self.tick_snakes(dt, effects);
        self.resolve_food_pickup(effects);
        self.decay_combo(dt);
        self.resolve_power_up_pickup(dt, effects);
        self.apply_magnet(dt);

        effects.advance(dt);
        self.decay_screen_shake(dt);
    }

    /// Ends the round. Only the first call while Playing has any effect.
    pub fn trigger_game_over(&mut self, cause: DeathCause, effects: &mut dyn EffectSink) {
        if self.phase != RoundPhase::Playing {
            return;
        }

        self.phase = RoundPhase::GameOver;
        effects.play_cue(Cue::GameOver);

        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_high_score = true;
            if let Err(err) = self.store.save(self.score) {
                warn!("Could not save high score {}: {err:#}", self.score);
            }
        }

        self.screen_shake = ScreenShake {
            time_remaining: self.settings.game_over_shake_duration,
            intensity: self.settings.game_over_shake_intensity,
        };
        self.game_over_reason = Some(cause);
        info!("Game over: {}, score {}", cause, self.score);
    }

    fn respawn_food(&mut self) {
        let food = spawn_food(&self.arena, &self.settings, &mut *self.rng);
        self.arena.food = Some(food);
    }

    fn maybe_spawn_hazard(&mut self) {
        let chance = if self.frenzy.active {
            self.settings.hazard_spawn_chance * 2.0
        } else {
            self.settings.hazard_spawn_chance
        };
        if !self.rng.chance(chance) || self.arena.hazards.len() >= self.settings.hazard_max_count {
            return;
        }

        let hazard = spawn_hazard(&self.arena, &self.settings, &mut *self.rng);
        if hazard.is_spawned() {
            self.arena.hazards.push(hazard);
        } else {
            debug!("Hazard spawn found no free cell");
        }
    }

    fn maybe_spawn_power_up(&mut self) {
        if !self.rng.chance(self.settings.powerup_spawn_chance)
            || self.arena.power_ups.len() >= self.settings.powerup_max_count
        {
            return;
        }

        let power_up = spawn_power_up(&self.arena, &self.settings, &mut *self.rng);
        self.arena.power_ups.push(power_up);
    }

    /// Product of the speed factors of every hazard under the player's head.
    fn hazard_speed_multiplier(&self) -> f32 {
        let player = &self.arena.player;
        if !player.is_alive {
            return 1.0;
        }
        let head = player.head();
        self.arena
            .hazards
            .iter()
            .filter(|hazard| hazard.occupies(&head))
            .map(|hazard| hazard.kind.speed_factor())
            .product()
    }

    fn age_hazards(&mut self, dt: f32) {
        self.arena.hazards.retain_mut(|hazard| hazard.advance(dt));
    }

    fn update_frenzy(&mut self, dt: f32) {
        if !self.frenzy.active {
            return;
        }

        self.frenzy.time_remaining -= dt;
        if self.frenzy.time_remaining <= 0.0 {
            self.frenzy = FrenzyState::default();
            debug!("Frenzy over");
        }

        // Extra food churn
        if self.rng.chance(self.settings.frenzy_food_respawn_chance) {
            self.respawn_food();
        }
    }

    fn tick_snakes(&mut self, dt: f32, effects: &mut dyn EffectSink) {
        let settings = &self.settings;
        let arena = &mut self.arena;
        let food = arena.food_position();

        let player_ctx = StepContext {
            settings,
            opponent: Some(&arena.competitor),
            hazards: &arena.hazards,
            food,
        };
        let player_death = arena.player.tick(dt, self.effective_speed_multiplier, &player_ctx);
        if player_death == Some(DeathCause::HeadOn) {
            arena.competitor.kill(DeathCause::HeadOn);
        }

        let competitor_ctx = StepContext {
            settings,
            opponent: Some(&arena.player),
            hazards: &arena.hazards,
            food,
        };
        let competitor_death = arena.competitor.tick(dt, 1.0, &competitor_ctx);
        if competitor_death == Some(DeathCause::HeadOn) {
            arena.player.kill(DeathCause::HeadOn);
        }

        // Only the player's death ends the round
        let ended_by = match (player_death, competitor_death) {
            (Some(cause), _) => Some(cause),
            (None, Some(DeathCause::HeadOn)) => Some(DeathCause::HeadOn),
            _ => None,
        };
        if let Some(cause) = ended_by {
            self.trigger_game_over(cause, effects);
        }
    }

    fn resolve_food_pickup(&mut self, effects: &mut dyn EffectSink) {
        let Some(food) = self.arena.food.as_ref() else {
            return;
        };
        let cell = food.position;
        let visual = food.visual;

        let player = &self.arena.player;
        let competitor = &self.arena.competitor;
        let eater = if player.is_alive && player.head() == cell {
            SnakeRole::Player
        } else if competitor.is_alive && competitor.head() == cell {
            SnakeRole::Competitor
        } else {
            return;
        };

        match eater {
            SnakeRole::Player => self.arena.player.grow(),
            SnakeRole::Competitor => self.arena.competitor.grow(),
        }
        effects.spawn_burst(visual, self.settings.food_burst_count, FOOD_COLOR);
        effects.play_cue(Cue::Eat);

        if eater == SnakeRole::Player {
            self.score_player_eat(effects);
        }

        self.respawn_food();
    }

    fn score_player_eat(&mut self, effects: &mut dyn EffectSink) {
        let settings = &self.settings;
        let multiplier = if self.arena.player.has_power_up(PowerUpKind::Multiplier) {
            settings.multiplier_factor
        } else {
            1
        };
        let points =
            (settings.base_food_points + self.combo.count * settings.combo_bonus_points) * multiplier;
        self.score += points;

        let within_window = self
            .combo
            .last_eat_at
            .is_some_and(|last| self.clock - last <= settings.combo_time_limit);
        if within_window {
            self.combo.count += 1;
            effects.play_cue(Cue::Combo(self.combo.count.min(5)));
        } else {
            self.combo.count = 1;
        }
        self.combo.last_eat_at = Some(self.clock);
        self.combo.time_remaining = settings.combo_time_limit;

        if !self.frenzy.active && self.combo.count >= settings.frenzy_threshold {
            self.frenzy = FrenzyState {
                active: true,
                time_remaining: settings.frenzy_duration,
            };
            debug!("Frenzy at combo {}", self.combo.count);
        }
    }

    fn decay_combo(&mut self, dt: f32) {
        if self.combo.time_remaining > 0.0 {
            self.combo.time_remaining -= dt;
            if self.combo.time_remaining <= 0.0 {
                self.combo.count = 0;
            }
        }
    }

    fn resolve_power_up_pickup(&mut self, dt: f32, effects: &mut dyn EffectSink) {
        if !self.arena.player.is_alive {
            return;
        }

        let head = self.arena.player.head();
        let mut collected = Vec::new();
        self.arena.power_ups.retain_mut(|power_up| {
            power_up.advance_pulse(dt);
            if power_up.position == head {
                collected.push(power_up.clone());
                false
            } else {
                true
            }
        });

        for power_up in collected {
            self.arena
                .player
                .activate_power_up(power_up.kind, self.settings.powerup_duration);
            effects.spawn_burst(
                power_up.visual,
                self.settings.powerup_burst_count,
                power_up.kind.color(),
            );
            effects.play_cue(Cue::PowerUp);
        }
    }

    /// Drags the food's visual point toward the player's head; the food cell stays put.
    fn apply_magnet(&mut self, dt: f32) {
        let player = &self.arena.player;
        if !player.is_alive || !player.has_power_up(PowerUpKind::Magnet) {
            return;
        }
        let Some(head) = player.visual.first().copied() else {
            return;
        };
        let Some(food) = self.arena.food.as_mut() else {
            return;
        };

        let range = self.settings.magnet_range_px();
        let dx = head.x - food.visual.x;
        let dy = head.y - food.visual.y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq <= 0.0 || dist_sq >= range * range {
            return;
        }

        let dist = dist_sq.sqrt();
        let normalized = (dist / range).min(1.0);
        let speed = lerp(
            self.settings.magnet_pull_speed_close,
            self.settings.magnet_pull_speed_far,
            normalized,
        );
        food.visual.x += dx / dist * speed * dt;
        food.visual.y += dy / dist * speed * dt;
    }

    fn decay_screen_shake(&mut self, dt: f32) {
        if self.screen_shake.time_remaining > 0.0 {
            self.screen_shake.time_remaining = (self.screen_shake.time_remaining - dt).max(0.0);
        }
    }
}
