//! Door connectivity: tag each door with the room kind behind it.

use bevy::prelude::*;

use super::host::{DoorSample, DungeonHost};

/// Index of the closest other door for every door.
///
/// Ties keep the first door encountered. A lone door has no neighbour.
pub fn nearest_doors(positions: &[Vec3]) -> Vec<Option<usize>> {
    positions
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let mut closest = None;
            let mut shortest = f32::INFINITY;
            for (j, other) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let distance = current.distance(*other);
                if distance < shortest {
                    shortest = distance;
                    closest = Some(j);
                }
            }
            closest
        })
        .collect()
}

/// Tag every door with its nearest neighbour's room kind, then probe and
/// refresh all of them. Returns how many doors were tagged.
pub fn resolve_doors<H: DungeonHost>(host: &mut H) -> usize {
    let doors: Vec<DoorSample<H::Door>> = host.doors();
    let positions: Vec<Vec3> = doors.iter().map(|d| d.position).collect();

    let mut tagged = 0;
    for (sample, nearest) in doors.iter().zip(nearest_doors(&positions)) {
        let Some(nearest) = nearest else {
            continue;
        };
        // Doors whose owner is unknown on either side are left untouched.
        if sample.owner_kind.is_none() {
            warn!("Door without owning room, skipping connection");
            continue;
        }
        let Some(kind) = doors[nearest].owner_kind else {
            warn!("Nearest door has no owning room, skipping connection");
            continue;
        };
        host.connect_door(sample.door, kind);
        tagged += 1;
    }

    for sample in &doors {
        host.probe_door(sample.door);
        host.refresh_door(sample.door);
    }

    tagged
}
