//! Active-room detection for clearing and progression.

use bevy::prelude::*;

use super::archetype::RoomPlacement;

/// Indices of placements lying within `threshold` of an original slot.
///
/// Slots are visited in layout order and placements in placement order for
/// each slot. A placement near several slots appears once per slot unless
/// `dedupe` is set.
pub fn locate_active_rooms<R>(
    original: &[Vec3],
    placements: &[RoomPlacement<R>],
    threshold: f32,
    dedupe: bool,
) -> Vec<usize> {
    let mut active = Vec::new();
    for slot in original {
        for (index, placement) in placements.iter().enumerate() {
            if placement.position.distance(*slot) < threshold {
                if dedupe && active.contains(&index) {
                    continue;
                }
                active.push(index);
            }
        }
    }
    active
}
