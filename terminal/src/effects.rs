use common::{Cue, EffectSink, Rgb, ScreenPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Per-frame downward pull, in pixels per frame per frame
const GRAVITY: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: ScreenPoint,
    /// Pixels per frame at the reference frame rate
    pub velocity: ScreenPoint,
    pub color: Rgb,
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Remaining life as 0..1
    pub fn strength(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Particle bursts plus a short memory of the last cue, for the HUD.
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: StdRng,
    fps: f32,
    last_cue: Option<(Cue, f32)>,
}

impl ParticleField {
    pub fn new(fps: u32) -> Self {
        Self::with_rng(StdRng::from_entropy(), fps)
    }

    pub fn with_seed(seed: u64, fps: u32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), fps)
    }

    fn with_rng(rng: StdRng, fps: u32) -> Self {
        Self {
            particles: Vec::new(),
            rng,
            fps: fps.max(1) as f32,
            last_cue: None,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Most recent cue while it is still fresh (one second).
    pub fn last_cue(&self) -> Option<Cue> {
        self.last_cue.map(|(cue, _)| cue)
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.last_cue = None;
    }
}

impl EffectSink for ParticleField {
    fn spawn_burst(&mut self, at: ScreenPoint, count: usize, color: Rgb) {
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..TAU);
            let speed = self.rng.gen_range(1.0..5.0);
            let life = self.rng.gen_range(0.5..1.2);
            self.particles.push(Particle {
                position: at,
                velocity: ScreenPoint::new(angle.cos() * speed, angle.sin() * speed),
                color,
                life,
                max_life: life,
            });
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        tracing::debug!(cue = %cue.name(), "Cue");
        self.last_cue = Some((cue, 1.0));
    }

    fn advance(&mut self, dt: f32) {
        let frames = dt * self.fps;
        self.particles.retain_mut(|particle| {
            particle.life -= dt;
            particle.velocity.y += GRAVITY;
            particle.position.x += particle.velocity.x * frames;
            particle.position.y += particle.velocity.y * frames;
            particle.life > 0.0
        });

        if let Some((_, remaining)) = self.last_cue.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.last_cue = None;
            }
        }
    }
}
