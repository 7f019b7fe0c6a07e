use super::types::{CharGrid, CharPattern};
use crate::effects::Particle;
use common::{Direction, GameSettings, Grid, HazardKind, PowerUpKind, Rgb};

pub trait GameObjectRenderer {
    fn render_snake_segment(
        &self,
        direction: Option<Direction>,
        is_head: bool,
        color: Rgb,
    ) -> CharPattern;

    fn render_food(&self) -> CharPattern;

    fn render_power_up(&self, kind: PowerUpKind, pulse: f32) -> CharPattern;

    fn render_hazard(&self, kind: HazardKind, fade: f32) -> CharPattern;

    fn render_particle(&self, particle: &Particle) -> CharPattern;
}

/// Anything the scene can paint. Drawn back to front by `sort_y`.
pub trait Drawable {
    /// Screen-space y used for depth ordering
    fn sort_y(&self, grid: &Grid) -> f32;

    fn draw(&self, canvas: &mut CharGrid, settings: &GameSettings, renderer: &dyn GameObjectRenderer);
}
