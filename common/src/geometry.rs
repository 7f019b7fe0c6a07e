use serde::{Deserialize, Serialize};

use crate::util::RandomGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Position { x, y }
    }

    /// Neighbouring cell one step in `direction`. May lie outside the grid.
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        ((self.x as i32 - other.x as i32).abs() + (self.y as i32 - other.y as i32).abs()) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used wherever directions are scanned.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(&self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    pub fn random(rng: &mut dyn RandomGenerator) -> Direction {
        Direction::ALL[rng.below(Direction::ALL.len() as u32) as usize]
    }
}

/// Continuous screen-space point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        ScreenPoint { x, y }
    }

    pub fn lerp(&self, target: ScreenPoint, t: f32) -> ScreenPoint {
        ScreenPoint {
            x: lerp(self.x, target.x, t),
            y: lerp(self.y, target.y, t),
        }
    }

    pub fn distance_sq(&self, other: &ScreenPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The board: `width` x `height` cells, origin top-left, `cell_size` pixels per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i16,
    pub height: i16,
    pub cell_size: u16,
}

impl Default for Grid {
    fn default() -> Self {
        // 960x720 screen in 30px cells
        Grid {
            width: 32,
            height: 24,
            cell_size: 30,
        }
    }
}

impl Grid {
    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize
    }

    pub fn screen_height(&self) -> f32 {
        self.height as f32 * self.cell_size as f32
    }

    /// Center of the cell in screen space.
    pub fn grid_to_screen(&self, pos: &Position) -> ScreenPoint {
        let size = self.cell_size as f32;
        ScreenPoint {
            x: pos.x as f32 * size + (self.cell_size / 2) as f32,
            y: pos.y as f32 * size + (self.cell_size / 2) as f32,
        }
    }

    /// Cell containing the screen point. Not clamped to the board.
    pub fn screen_to_grid(&self, point: &ScreenPoint) -> Position {
        let size = self.cell_size.max(1) as f32;
        Position {
            x: (point.x / size).floor() as i16,
            y: (point.y / size).floor() as i16,
        }
    }

    /// Depth scale for a screen y coordinate: `min_scale` at the top edge, `max_scale` at the bottom.
    pub fn perspective_scale(&self, y: f32, min_scale: f32, max_scale: f32) -> f32 {
        let height = self.screen_height();
        let t = if height > 0.0 {
            (y / height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        lerp(min_scale, max_scale, t)
    }

    pub fn random_position(&self, rng: &mut dyn RandomGenerator) -> Position {
        Position {
            x: rng.below(self.width.max(0) as u32) as i16,
            y: rng.below(self.height.max(0) as u32) as i16,
        }
    }
}
