//! Dungeon-related components and events.

use bevy::prelude::*;

use super::archetype::RoomKind;

/// Marker for everything torn down when a new floor is generated.
#[derive(Component)]
pub struct DungeonRoom;

/// A placed room.
#[derive(Component, Debug, Clone)]
pub struct Room {
    pub kind: RoomKind,
    pub variant: usize,
    pub half_extent: f32,
    /// Set once the room has been opened.
    pub cleared: bool,
    /// Local offsets where items can be placed.
    pub item_spots: Vec<Vec3>,
}

impl Room {
    /// Whether a world-space point lies over this room's floor.
    pub fn contains(&self, room_origin: Vec3, point: Vec3) -> bool {
        (point.x - room_origin.x).abs() <= self.half_extent
            && (point.z - room_origin.z).abs() <= self.half_extent
    }
}

/// A door on one side of a room.
#[derive(Component, Debug, Clone)]
pub struct Door {
    /// Kind of the room this door belongs to.
    pub current_room_type: RoomKind,
    /// Kind of the room behind the nearest other door.
    pub connect_room_type: Option<RoomKind>,
    /// Outward direction.
    pub facing: Vec3,
    pub world_position: Vec3,
    /// Something solid was found on the other side.
    pub adjoining: bool,
    pub open: bool,
}

/// Door is waiting for its adjoining-geometry ray cast.
#[derive(Component)]
pub struct DoorProbe;

/// Door needs its visual updated.
#[derive(Component)]
pub struct DoorVisualDirty;

/// Presented state of a door.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorVisual {
    /// Dead end, rendered as wall.
    Sealed,
    /// Passage, tinted by the room behind it.
    Passage(RoomKind),
}

/// Exit to the next floor, hidden until its room is cleared.
#[derive(Component, Default)]
pub struct Portal {
    pub active: bool,
}

/// Geometry the navigation service should bake.
#[derive(Component)]
pub struct NavSurface;

/// A new slot layout is available.
#[derive(Event, Debug, Clone)]
pub struct LayoutReady {
    pub slots: Vec<IVec2>,
}

/// Progression logic asks to clear the active room at `index`.
#[derive(Event, Debug, Clone, Copy)]
pub struct ClearRoomRequest {
    pub index: usize,
}

/// Ask the navigation service to bake one surface.
#[derive(Event, Debug, Clone, Copy)]
pub struct NavBakeRequest {
    pub room: Entity,
    pub surface: Entity,
}

/// All navigation data was dropped.
#[derive(Event, Debug, Clone, Copy)]
pub struct NavigationCleared;
