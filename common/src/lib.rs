mod ai;
mod arena;
mod constants;
mod effects;
mod entities;
mod geometry;
mod high_score;
mod occupancy;
mod round;
mod snake;
mod spawner;

pub mod util;

pub use ai::*;
pub use arena::*;
pub use constants::*;
pub use effects::*;
pub use entities::*;
pub use geometry::*;
pub use high_score::*;
pub use occupancy::*;
pub use round::*;
pub use snake::*;
pub use spawner::*;
pub use util::{PseudoRandom, RandomGenerator, ScriptedRandom};
