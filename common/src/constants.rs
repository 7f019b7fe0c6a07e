use serde::{Deserialize, Serialize};

use crate::geometry::Grid;

/// 8-bit RGB color handed to the effect sink and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend between two colors, `t` clamped to [0, 1].
    pub fn blend(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

pub const DARK_BG: Rgb = Rgb(5, 10, 20);
pub const SNAKE_HEAD_COLOR: Rgb = Rgb(150, 255, 150);
pub const SNAKE_BODY_COLOR_START: Rgb = Rgb(80, 200, 80);
pub const SNAKE_BODY_COLOR_END: Rgb = Rgb(40, 100, 40);
pub const COMPETITOR_HEAD_COLOR: Rgb = Rgb(255, 150, 150);
pub const COMPETITOR_BODY_COLOR_START: Rgb = Rgb(200, 80, 80);
pub const COMPETITOR_BODY_COLOR_END: Rgb = Rgb(100, 40, 40);
pub const FOOD_COLOR: Rgb = Rgb(255, 180, 50);
pub const PHASE_COLOR: Rgb = Rgb(150, 150, 255);
pub const MAGNET_COLOR: Rgb = Rgb(255, 100, 255);
pub const MULTIPLIER_COLOR: Rgb = Rgb(255, 255, 100);
pub const BURST_COLOR: Rgb = Rgb(255, 100, 100);
pub const HAZARD_BOMB_COLOR: Rgb = Rgb(200, 50, 50);
pub const UI_TEXT_COLOR: Rgb = Rgb(220, 220, 240);

/// Default frame rate the host loop targets
pub const DEFAULT_FPS: u32 = 60;

/// Fixed rule set of a round. Read by the core, never mutated while a round runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub grid: Grid,
    pub fps: u32,

    pub snake_start_len: usize,
    pub player_speed: f32,
    pub competitor_speed: f32,
    pub interpolation_speed: f32,

    pub combo_time_limit: f32,
    pub frenzy_threshold: u32,
    pub frenzy_duration: f32,
    pub frenzy_speed_multiplier: f32,
    pub frenzy_food_respawn_chance: f32,

    pub powerup_duration: f32,
    pub powerup_spawn_chance: f32,
    pub powerup_max_count: usize,

    pub hazard_spawn_chance: f32,
    pub hazard_lifetime_min: f32,
    pub hazard_lifetime_max: f32,
    pub hazard_max_count: usize,
    pub hazard_spawn_attempts: u32,

    /// Magnet reach in grid cells
    pub magnet_range_cells: f32,
    pub magnet_pull_speed_close: f32,
    pub magnet_pull_speed_far: f32,

    pub min_scale: f32,
    pub max_scale: f32,

    pub base_food_points: u32,
    pub combo_bonus_points: u32,
    pub multiplier_factor: u32,

    pub game_over_shake_duration: f32,
    pub game_over_shake_intensity: f32,
    pub food_burst_count: usize,
    pub powerup_burst_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            grid: Grid::default(),
            fps: DEFAULT_FPS,
            snake_start_len: 3,
            player_speed: 10.5,
            competitor_speed: 8.0,
            interpolation_speed: 0.3,
            combo_time_limit: 2.0,
            frenzy_threshold: 10,
            frenzy_duration: 8.0,
            frenzy_speed_multiplier: 1.3,
            frenzy_food_respawn_chance: 0.05,
            powerup_duration: 10.0,
            powerup_spawn_chance: 0.003,
            powerup_max_count: 3,
            hazard_spawn_chance: 0.005,
            hazard_lifetime_min: 5.0,
            hazard_lifetime_max: 15.0,
            hazard_max_count: 5,
            hazard_spawn_attempts: 50,
            magnet_range_cells: 7.0,
            magnet_pull_speed_close: 150.0,
            magnet_pull_speed_far: 30.0,
            min_scale: 0.8,
            max_scale: 1.2,
            base_food_points: 10,
            combo_bonus_points: 5,
            multiplier_factor: 2,
            game_over_shake_duration: 0.5,
            game_over_shake_intensity: 8.0,
            food_burst_count: 20,
            powerup_burst_count: 15,
        }
    }
}

impl GameSettings {
    /// Same rules on a different board, mostly for tests.
    pub fn with_grid(width: i16, height: i16) -> Self {
        GameSettings {
            grid: Grid {
                width,
                height,
                ..Grid::default()
            },
            ..Default::default()
        }
    }

    /// Fixed frame delta the host steps with.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Magnet reach in screen pixels.
    pub fn magnet_range_px(&self) -> f32 {
        self.grid.cell_size as f32 * self.magnet_range_cells
    }
}
