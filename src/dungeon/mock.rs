//! Recording host used by the populator tests.

use bevy::prelude::*;

use super::archetype::RoomKind;
use super::host::{DoorSample, DungeonHost};

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    DespawnRooms,
    ClearNavigation,
    Spawn(u32, RoomKind, Vec3),
    Connect(u32, RoomKind),
    Probe(u32),
    Refresh(u32),
    Bake(u32),
    Open(u32),
    PortalOn(u32),
}

/// A door owned by a mock room, or an orphan when `room` is `None`.
#[derive(Debug, Clone)]
pub struct MockDoor {
    pub room: Option<u32>,
    pub position: Vec3,
}

/// Rooms get one door on each side, `door_offset` from their centre.
#[derive(Debug, Default)]
pub struct MockHost {
    pub calls: Vec<MockCall>,
    pub rooms: Vec<(u32, RoomKind)>,
    pub doors: Vec<MockDoor>,
    pub door_offset: f32,
    pub refuse: Option<RoomKind>,
    next_id: u32,
}

impl MockHost {
    pub fn live_rooms(&self) -> usize {
        self.rooms.len()
    }

    fn kind_of(&self, room: u32) -> Option<RoomKind> {
        self.rooms.iter().find(|(id, _)| *id == room).map(|(_, kind)| *kind)
    }
}

impl DungeonHost for MockHost {
    type Room = u32;
    type Door = usize;

    fn despawn_rooms(&mut self) {
        self.calls.push(MockCall::DespawnRooms);
        self.rooms.clear();
        self.doors.retain(|d| d.room.is_none());
    }

    fn clear_navigation(&mut self) {
        self.calls.push(MockCall::ClearNavigation);
    }

    fn spawn_room(&mut self, kind: RoomKind, _variant: usize, position: Vec3) -> Option<u32> {
        if self.refuse == Some(kind) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.calls.push(MockCall::Spawn(id, kind, position));
        self.rooms.push((id, kind));
        if self.door_offset > 0.0 {
            for dir in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
                self.doors.push(MockDoor {
                    room: Some(id),
                    position: position + dir * self.door_offset,
                });
            }
        }
        Some(id)
    }

    fn doors(&mut self) -> Vec<DoorSample<usize>> {
        self.doors
            .iter()
            .enumerate()
            .map(|(i, d)| DoorSample {
                door: i,
                position: d.position,
                owner_kind: d.room.and_then(|room| self.kind_of(room)),
            })
            .collect()
    }

    fn connect_door(&mut self, door: usize, kind: RoomKind) {
        self.calls.push(MockCall::Connect(door as u32, kind));
    }

    fn probe_door(&mut self, door: usize) {
        self.calls.push(MockCall::Probe(door as u32));
    }

    fn refresh_door(&mut self, door: usize) {
        self.calls.push(MockCall::Refresh(door as u32));
    }

    fn bake_navigation(&mut self, room: u32) {
        self.calls.push(MockCall::Bake(room));
    }

    fn open_room(&mut self, room: u32) {
        self.calls.push(MockCall::Open(room));
    }

    fn portal_on(&mut self, room: u32) {
        self.calls.push(MockCall::PortalOn(room));
    }
}
