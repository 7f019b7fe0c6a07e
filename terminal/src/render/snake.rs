use super::traits::{Drawable, GameObjectRenderer};
use super::types::CharGrid;
use common::{
    GameSettings, Grid, Position, Rgb, Snake, SnakeRole, COMPETITOR_BODY_COLOR_END,
    COMPETITOR_BODY_COLOR_START, COMPETITOR_HEAD_COLOR, DARK_BG, SNAKE_BODY_COLOR_END,
    SNAKE_BODY_COLOR_START, SNAKE_HEAD_COLOR,
};

pub struct SnakeRenderer;

impl SnakeRenderer {
    /// Cell and color of every visual segment, head first. Segments still stacked on
    /// the tail after growth land on the same cell.
    pub fn segments(snake: &Snake, grid: &Grid) -> Vec<(Position, Rgb)> {
        let (head, start, end) = match snake.role {
            SnakeRole::Player => (SNAKE_HEAD_COLOR, SNAKE_BODY_COLOR_START, SNAKE_BODY_COLOR_END),
            SnakeRole::Competitor => (
                COMPETITOR_HEAD_COLOR,
                COMPETITOR_BODY_COLOR_START,
                COMPETITOR_BODY_COLOR_END,
            ),
        };
        let last = snake.visual.len().saturating_sub(1).max(1) as f32;

        snake
            .visual
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let mut color = if i == 0 {
                    head
                } else {
                    start.blend(end, i as f32 / last)
                };
                if !snake.is_alive {
                    color = color.blend(DARK_BG, 0.6);
                }
                (grid.screen_to_grid(point), color)
            })
            .collect()
    }
}

impl Drawable for Snake {
    fn sort_y(&self, _grid: &Grid) -> f32 {
        self.visual.first().map_or(f32::MAX, |head| head.y)
    }

    fn draw(&self, canvas: &mut CharGrid, settings: &GameSettings, renderer: &dyn GameObjectRenderer) {
        let segments = SnakeRenderer::segments(self, &settings.grid);
        // Tail first so the head ends up on top
        for (i, (cell, color)) in segments.iter().enumerate().rev() {
            let is_head = i == 0;
            let direction = if is_head { Some(self.direction) } else { None };
            let pattern = renderer.render_snake_segment(direction, is_head, *color);
            canvas.set_logical_point(cell.x as i32, cell.y as i32, &pattern);
        }
    }
}
