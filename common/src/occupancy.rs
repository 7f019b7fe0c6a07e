use std::collections::HashSet;

use crate::arena::Arena;
use crate::geometry::Position;

/// What is about to be placed. Food never blocks its own respawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTarget {
    Food,
    PowerUp,
    Hazard,
}

/// Cells a new entity must not be placed on: live snake bodies, hazard cells, power-up cells,
/// and the food cell unless the food itself is being placed.
pub fn occupied_cells(arena: &Arena, target: SpawnTarget) -> HashSet<Position> {
    let mut occupied = HashSet::new();

    for snake in [&arena.player, &arena.competitor] {
        if snake.is_alive {
            occupied.extend(snake.body.iter().copied());
        }
    }

    occupied.extend(arena.hazards.iter().filter_map(|hazard| hazard.position));
    occupied.extend(arena.power_ups.iter().map(|power_up| power_up.position));

    if target != SpawnTarget::Food {
        if let Some(food) = arena.food_position() {
            occupied.insert(food);
        }
    }

    occupied
}
