use std::collections::HashSet;
use std::f32::consts::TAU;

use log::warn;

use crate::arena::Arena;
use crate::constants::GameSettings;
use crate::entities::{Food, Hazard, HazardKind, PowerUp, PowerUpKind};
use crate::geometry::{Grid, Position};
use crate::occupancy::{occupied_cells, SpawnTarget};
use crate::util::RandomGenerator;

/// Rejection-samples a cell outside `occupied`. Unbounded while a free cell exists.
pub fn random_free_cell(
    grid: &Grid,
    occupied: &HashSet<Position>,
    rng: &mut dyn RandomGenerator,
) -> Position {
    let blocked = occupied.iter().filter(|pos| grid.in_bounds(pos)).count();
    if blocked >= grid.cell_count() {
        warn!("No free cell left on a {}x{} board", grid.width, grid.height);
        return grid.random_position(rng);
    }

    loop {
        let candidate = grid.random_position(rng);
        if !occupied.contains(&candidate) {
            return candidate;
        }
    }
}

/// Up to `attempts` draws; `None` if every one landed on an occupied cell.
pub fn try_free_cell(
    grid: &Grid,
    occupied: &HashSet<Position>,
    attempts: u32,
    rng: &mut dyn RandomGenerator,
) -> Option<Position> {
    (0..attempts)
        .map(|_| grid.random_position(rng))
        .find(|candidate| !occupied.contains(candidate))
}

pub fn spawn_food(arena: &Arena, settings: &GameSettings, rng: &mut dyn RandomGenerator) -> Food {
    let occupied = occupied_cells(arena, SpawnTarget::Food);
    let position = random_free_cell(&settings.grid, &occupied, rng);
    Food {
        position,
        visual: settings.grid.grid_to_screen(&position),
    }
}

pub fn spawn_power_up(
    arena: &Arena,
    settings: &GameSettings,
    rng: &mut dyn RandomGenerator,
) -> PowerUp {
    let kind = PowerUpKind::random(rng);
    let occupied = occupied_cells(arena, SpawnTarget::PowerUp);
    let position = random_free_cell(&settings.grid, &occupied, rng);
    PowerUp {
        position,
        kind,
        visual: settings.grid.grid_to_screen(&position),
        pulse_phase: rng.range_f32(0.0, TAU),
    }
}

/// Places a bomb with a random lifetime. When no free cell turns up within
/// `hazard_spawn_attempts` draws the bomb comes back with zero lifetime and no cell;
/// callers keep it only if `Hazard::is_spawned`.
pub fn spawn_hazard(arena: &Arena, settings: &GameSettings, rng: &mut dyn RandomGenerator) -> Hazard {
    let lifetime = rng.range_f32(settings.hazard_lifetime_min, settings.hazard_lifetime_max);
    let occupied = occupied_cells(arena, SpawnTarget::Hazard);

    match try_free_cell(&settings.grid, &occupied, settings.hazard_spawn_attempts, rng) {
        Some(position) => Hazard {
            kind: HazardKind::Bomb,
            position: Some(position),
            age: 0.0,
            lifetime,
        },
        None => Hazard {
            kind: HazardKind::Bomb,
            position: None,
            age: 0.0,
            lifetime: 0.0,
        },
    }
}
