//! Room archetypes and placement records.

use bevy::prelude::*;
use serde::Deserialize;

/// The category of a placed room.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum RoomKind {
    /// Where the player starts a floor.
    Entry,
    /// Filler room, one of several templates.
    Normal,
    /// Farthest room from the entry.
    Boss,
    /// Epic room selling items.
    Shop,
    /// Epic room holding a single epic item.
    Treasure,
}

impl RoomKind {
    /// Shop and treasure rooms are "epic": rolled once per floor, at most one each.
    pub fn is_epic(&self) -> bool {
        matches!(self, RoomKind::Shop | RoomKind::Treasure)
    }
}

/// A room placed by the populator for the current floor.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomPlacement<R> {
    /// World position of the room origin (slot embedded on the XZ plane).
    pub position: Vec3,
    pub kind: RoomKind,
    /// Template index among the normal rooms; 0 for every other kind.
    pub variant: usize,
    /// Host handle of the instantiated room.
    pub handle: R,
}

/// Embed a grid slot on the ground plane.
pub fn slot_to_world(slot: IVec2) -> Vec3 {
    Vec3::new(slot.x as f32, 0.0, slot.y as f32)
}
