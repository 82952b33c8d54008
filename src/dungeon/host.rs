//! The collaborator surface the populator drives.
//!
//! The populator never touches the ECS directly. Everything it needs from the
//! engine (spawning rooms, reading doors, baking navigation, opening rooms)
//! goes through [`DungeonHost`], implemented for the Bevy `World` in
//! `spawning.rs` and by a recording mock in tests.

use bevy::prelude::*;

use super::archetype::RoomKind;

/// One door as seen by the connectivity resolver.
#[derive(Debug, Clone, Copy)]
pub struct DoorSample<D> {
    pub door: D,
    pub position: Vec3,
    /// Kind of the room owning this door; `None` when the owner is unknown.
    pub owner_kind: Option<RoomKind>,
}

pub trait DungeonHost {
    /// Handle to an instantiated room.
    type Room: Copy + PartialEq + std::fmt::Debug;
    /// Handle to a door entity.
    type Door: Copy;

    /// Destroy every room (and its doors) from previous floors.
    fn despawn_rooms(&mut self);

    /// Drop all baked navigation data.
    fn clear_navigation(&mut self);

    /// Instantiate a room at `position`. `None` if the room could not be built.
    fn spawn_room(&mut self, kind: RoomKind, variant: usize, position: Vec3) -> Option<Self::Room>;

    /// Every door currently in the world.
    fn doors(&mut self) -> Vec<DoorSample<Self::Door>>;

    /// Record which kind of room lies behind `door`.
    fn connect_door(&mut self, door: Self::Door, kind: RoomKind);

    /// Cast the door's ray to detect adjoining geometry.
    fn probe_door(&mut self, door: Self::Door);

    /// Update the door's visual state after connection and probing.
    fn refresh_door(&mut self, door: Self::Door);

    /// Request a navigation bake for every bakeable surface in `room`.
    fn bake_navigation(&mut self, room: Self::Room);

    /// Open the room's doors.
    fn open_room(&mut self, room: Self::Room);

    /// Activate the room's portal, if it has one.
    fn portal_on(&mut self, room: Self::Room);
}
