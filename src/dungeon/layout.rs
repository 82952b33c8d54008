//! Slot layout source and stage progression.

use bevy::prelude::*;
use rand::Rng;

use super::components::LayoutReady;
use super::config::DungeonConfig;
use super::plugin::DungeonState;
use crate::core::RegenerateDungeon;

/// Game progress counter; raises the odds of epic rooms and the room count.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage(pub u32);

impl Default for Stage {
    fn default() -> Self {
        Self(1)
    }
}

/// Random walk over the grid, collecting `room_count` distinct cells.
///
/// The walk starts at the origin, so the first slot is always `(0, 0)`.
/// Cells are scaled by `spacing` to world units.
pub fn random_walk_layout(room_count: usize, spacing: i32, rng: &mut impl Rng) -> Vec<IVec2> {
    const STEPS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

    if room_count == 0 {
        return Vec::new();
    }
    let mut cells = vec![IVec2::ZERO];
    let mut current = IVec2::ZERO;
    while cells.len() < room_count {
        current += STEPS[rng.gen_range(0..STEPS.len())];
        if !cells.contains(&current) {
            cells.push(current);
        }
    }
    cells.into_iter().map(|cell| cell * spacing).collect()
}

/// Generate a fresh layout whenever a new floor is requested.
pub fn generate_layout(
    mut requests: EventReader<RegenerateDungeon>,
    mut layouts: EventWriter<LayoutReady>,
    config: Res<DungeonConfig>,
    stage: Res<Stage>,
    mut state: ResMut<DungeonState>,
) {
    if requests.read().count() == 0 {
        return;
    }
    let room_count = config.room_count_for(stage.0);
    let slots = random_walk_layout(room_count, config.room_spacing, &mut state.rng);
    info!("Stage {}: generated layout with {} rooms", stage.0, slots.len());
    layouts.send(LayoutReady { slots });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn walk_starts_at_origin_with_distinct_cells() {
        let mut rng = StdRng::seed_from_u64(42);
        let slots = random_walk_layout(10, 20, &mut rng);
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[0], IVec2::ZERO);
        for (i, a) in slots.iter().enumerate() {
            assert_eq!(a.x % 20, 0);
            assert_eq!(a.y % 20, 0);
            assert!(!slots[i + 1..].contains(a));
        }
    }

    #[test]
    fn consecutive_new_cells_are_grid_connected() {
        let mut rng = StdRng::seed_from_u64(7);
        let slots = random_walk_layout(8, 1, &mut rng);
        // Every cell after the first touches some earlier cell.
        for (i, cell) in slots.iter().enumerate().skip(1) {
            assert!(slots[..i]
                .iter()
                .any(|other| (*cell - *other).abs().element_sum() == 1));
        }
    }

    #[test]
    fn zero_rooms_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_walk_layout(0, 20, &mut rng).is_empty());
    }
}
