use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Rgb, BURST_COLOR, HAZARD_BOMB_COLOR, MAGNET_COLOR, MULTIPLIER_COLOR, PHASE_COLOR,
};
use crate::geometry::{Position, ScreenPoint};
use crate::util::RandomGenerator;

/// The single piece of food on the board. `visual` can drift from the cell center
/// (magnet pull) without the grid cell changing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub position: Position,
    pub visual: ScreenPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Phase,
    Magnet,
    Multiplier,
    Burst,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Phase,
        PowerUpKind::Magnet,
        PowerUpKind::Multiplier,
        PowerUpKind::Burst,
    ];

    pub fn random(rng: &mut dyn RandomGenerator) -> PowerUpKind {
        PowerUpKind::ALL[rng.below(PowerUpKind::ALL.len() as u32) as usize]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Phase => "phase",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::Multiplier => "multiplier",
            PowerUpKind::Burst => "burst",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            PowerUpKind::Phase => PHASE_COLOR,
            PowerUpKind::Magnet => MAGNET_COLOR,
            PowerUpKind::Multiplier => MULTIPLIER_COLOR,
            PowerUpKind::Burst => BURST_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub position: Position,
    pub kind: PowerUpKind,
    pub visual: ScreenPoint,
    /// Radians, wraps at 2π
    pub pulse_phase: f32,
}

impl PowerUp {
    pub fn advance_pulse(&mut self, dt: f32) {
        self.pulse_phase = (self.pulse_phase + dt * 4.0).rem_euclid(TAU);
    }

    /// 0..1 pulse for the renderer
    pub fn pulse(&self) -> f32 {
        (self.pulse_phase.sin() + 1.0) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Bomb,
    /// Slows the player while its head is inside. Never spawned.
    Mist,
    /// Speeds the player up while its head is inside. Never spawned.
    Current,
}

impl HazardKind {
    pub fn is_lethal(&self) -> bool {
        matches!(self, HazardKind::Bomb)
    }

    /// Player speed factor while the head sits in this hazard.
    pub fn speed_factor(&self) -> f32 {
        match self {
            HazardKind::Bomb => 1.0,
            HazardKind::Mist => 0.6,
            HazardKind::Current => 1.5,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            HazardKind::Bomb => HAZARD_BOMB_COLOR,
            HazardKind::Mist => Rgb(100, 100, 150),
            HazardKind::Current => Rgb(180, 220, 255),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    /// `None` when spawning found no free cell.
    pub position: Option<Position>,
    pub age: f32,
    pub lifetime: f32,
}

impl Hazard {
    /// A failed spawn has zero lifetime and must not enter the live set.
    pub fn is_spawned(&self) -> bool {
        self.lifetime > 0.0 && self.position.is_some()
    }

    pub fn occupies(&self, pos: &Position) -> bool {
        self.position.as_ref() == Some(pos)
    }

    pub fn is_lethal_at(&self, pos: &Position) -> bool {
        self.kind.is_lethal() && self.occupies(pos)
    }

    /// Ages the hazard. Returns whether it is still alive.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.age < self.lifetime
    }

    /// Opacity ramp: fades in over the first second and out over the last.
    pub fn fade(&self) -> f32 {
        const FADE_TIME: f32 = 1.0;
        let remaining = self.lifetime - self.age;
        if self.age < FADE_TIME {
            (self.age / FADE_TIME).clamp(0.0, 1.0)
        } else if remaining < FADE_TIME {
            (remaining / FADE_TIME).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
