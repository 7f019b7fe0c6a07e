use super::traits::{Drawable, GameObjectRenderer};
use super::types::{CharGrid, CharPattern, RenderConfig};
use crate::effects::Particle;
use common::{Arena, Food, GameSettings, Grid, Hazard, PowerUp, ScreenPoint};

fn draw_at(
    canvas: &mut CharGrid,
    settings: &GameSettings,
    point: &ScreenPoint,
    pattern: &CharPattern,
) {
    let cell = settings.grid.screen_to_grid(point);
    canvas.set_logical_point(cell.x as i32, cell.y as i32, pattern);
}

/// Things lower on the board are closer to the viewer and drawn heavier.
fn is_near(settings: &GameSettings, y: f32) -> bool {
    settings
        .grid
        .perspective_scale(y, settings.min_scale, settings.max_scale)
        > 1.0
}

impl Drawable for Food {
    fn sort_y(&self, _grid: &Grid) -> f32 {
        self.visual.y
    }

    fn draw(&self, canvas: &mut CharGrid, settings: &GameSettings, renderer: &dyn GameObjectRenderer) {
        let mut pattern = renderer.render_food();
        if is_near(settings, self.visual.y) {
            pattern = pattern.bold();
        }
        draw_at(canvas, settings, &self.visual, &pattern);
    }
}

impl Drawable for PowerUp {
    fn sort_y(&self, _grid: &Grid) -> f32 {
        self.visual.y
    }

    fn draw(&self, canvas: &mut CharGrid, settings: &GameSettings, renderer: &dyn GameObjectRenderer) {
        let pattern = renderer.render_power_up(self.kind, self.pulse());
        draw_at(canvas, settings, &self.visual, &pattern);
    }
}

impl Drawable for Hazard {
    fn sort_y(&self, grid: &Grid) -> f32 {
        // Unplaced hazards sort last and draw nothing
        self.position.map_or(f32::MAX, |cell| grid.grid_to_screen(&cell).y)
    }

    fn draw(&self, canvas: &mut CharGrid, _settings: &GameSettings, renderer: &dyn GameObjectRenderer) {
        if let Some(cell) = self.position {
            let pattern = renderer.render_hazard(self.kind, self.fade());
            canvas.set_logical_point(cell.x as i32, cell.y as i32, &pattern);
        }
    }
}

impl Drawable for Particle {
    fn sort_y(&self, _grid: &Grid) -> f32 {
        self.position.y
    }

    fn draw(&self, canvas: &mut CharGrid, settings: &GameSettings, renderer: &dyn GameObjectRenderer) {
        draw_at(canvas, settings, &self.position, &renderer.render_particle(self));
    }
}

pub struct ArenaRenderer<R: GameObjectRenderer> {
    renderer: R,
}

impl<R: GameObjectRenderer> ArenaRenderer<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Paints the board back to front, particles on top.
    pub fn render(
        &self,
        arena: &Arena,
        particles: &[Particle],
        settings: &GameSettings,
        config: &RenderConfig,
    ) -> CharGrid {
        let mut grid = CharGrid::new(
            settings.grid.width.max(0) as usize,
            settings.grid.height.max(0) as usize,
            config.chars_per_point,
        );

        let mut drawables: Vec<&dyn Drawable> = Vec::new();
        drawables.extend(arena.hazards.iter().map(|hazard| hazard as &dyn Drawable));
        if let Some(food) = &arena.food {
            drawables.push(food);
        }
        drawables.extend(arena.power_ups.iter().map(|power_up| power_up as &dyn Drawable));
        drawables.push(&arena.player);
        drawables.push(&arena.competitor);

        let board = &settings.grid;
        drawables.sort_by(|a, b| a.sort_y(board).total_cmp(&b.sort_y(board)));

        for drawable in drawables {
            drawable.draw(&mut grid, settings, &self.renderer);
        }
        for particle in particles {
            particle.draw(&mut grid, settings, &self.renderer);
        }

        grid
    }
}
