use super::traits::GameObjectRenderer;
use super::types::{CharDimensions, CharPattern};
use crate::effects::Particle;
use common::{Direction, HazardKind, PowerUpKind, Rgb, DARK_BG, FOOD_COLOR};

pub struct StandardRenderer {
    char_dims: CharDimensions,
}

impl StandardRenderer {
    pub fn new(char_dims: CharDimensions) -> Self {
        Self { char_dims }
    }

    fn fill(&self, ch: char) -> CharPattern {
        CharPattern::single(ch, self.char_dims)
    }

    /// `ch` in the first column only, leaving the rest of the cell untouched.
    fn dot(&self, ch: char) -> CharPattern {
        CharPattern::new(vec![vec![ch]])
    }
}

impl GameObjectRenderer for StandardRenderer {
    fn render_snake_segment(
        &self,
        direction: Option<Direction>,
        is_head: bool,
        color: Rgb,
    ) -> CharPattern {
        if !is_head {
            return self.fill('▓').colored(color);
        }

        // 2x1 heads show which way they face
        let pattern = if self.char_dims == CharDimensions::new(2, 1) {
            let chars = match direction {
                Some(Direction::Left) => ['◀', '█'],
                Some(Direction::Right) => ['█', '▶'],
                Some(Direction::Up) => ['▲', '▲'],
                Some(Direction::Down) => ['▼', '▼'],
                None => ['█', '█'],
            };
            CharPattern::new(vec![chars.to_vec()])
        } else {
            self.fill('█')
        };
        pattern.colored(color).bold()
    }

    fn render_food(&self) -> CharPattern {
        self.fill('●').colored(FOOD_COLOR)
    }

    fn render_power_up(&self, kind: PowerUpKind, pulse: f32) -> CharPattern {
        let symbol = match kind {
            PowerUpKind::Phase => 'Φ',
            PowerUpKind::Magnet => 'M',
            PowerUpKind::Multiplier => 'x',
            PowerUpKind::Burst => '»',
        };
        let color = kind.color().blend(Rgb(255, 255, 255), pulse * 0.5);
        let pattern = self.fill(symbol).colored(color);
        if pulse > 0.5 {
            pattern.bold()
        } else {
            pattern
        }
    }

    fn render_hazard(&self, kind: HazardKind, fade: f32) -> CharPattern {
        let symbol = match kind {
            HazardKind::Bomb => '✸',
            HazardKind::Mist => '░',
            HazardKind::Current => '≈',
        };
        // Faded hazards sink into the background
        let color = DARK_BG.blend(kind.color(), fade);
        self.fill(symbol).colored(color)
    }

    fn render_particle(&self, particle: &Particle) -> CharPattern {
        let ch = if particle.strength() > 0.5 { '*' } else { '·' };
        self.dot(ch).colored(particle.color)
    }
}
