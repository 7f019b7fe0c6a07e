use serde::{Deserialize, Serialize};

use crate::constants::Rgb;
use crate::geometry::ScreenPoint;

/// Sound cue names the host may map to audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Eat,
    /// In-window eat, level capped at 5
    Combo(u32),
    PowerUp,
    GameOver,
}

impl Cue {
    pub fn name(&self) -> String {
        match self {
            Cue::Eat => "eat".to_string(),
            Cue::Combo(level) => format!("combo_{level}"),
            Cue::PowerUp => "powerup".to_string(),
            Cue::GameOver => "gameover".to_string(),
        }
    }
}

/// Fire-and-forget receiver for particles and sound. The simulation never reads anything back.
pub trait EffectSink {
    fn spawn_burst(&mut self, at: ScreenPoint, count: usize, color: Rgb);

    fn play_cue(&mut self, cue: Cue);

    /// Advance and prune whatever transient visuals the sink keeps.
    fn advance(&mut self, _dt: f32) {}
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn spawn_burst(&mut self, _at: ScreenPoint, _count: usize, _color: Rgb) {}

    fn play_cue(&mut self, _cue: Cue) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectEvent {
    Burst {
        at: ScreenPoint,
        count: usize,
        color: Rgb,
    },
    Cue(Cue),
}

/// Keeps every event in order. Used by headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordedEffects {
    pub events: Vec<EffectEvent>,
    pub elapsed: f32,
}

impl RecordedEffects {
    pub fn cues(&self) -> Vec<Cue> {
        self.events
            .iter()
            .filter_map(|event| match event {
                EffectEvent::Cue(cue) => Some(*cue),
                EffectEvent::Burst { .. } => None,
            })
            .collect()
    }

    pub fn bursts(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, EffectEvent::Burst { .. }))
            .count()
    }
}

impl EffectSink for RecordedEffects {
    fn spawn_burst(&mut self, at: ScreenPoint, count: usize, color: Rgb) {
        self.events.push(EffectEvent::Burst { at, count, color });
    }

    fn play_cue(&mut self, cue: Cue) {
        self.events.push(EffectEvent::Cue(cue));
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}
