//! Global events used for cross-system communication.
//!
//! Floor progression crosses module boundaries: the dungeon announces a
//! finished floor, the player and boss react to it, the UI fades around it.
//! Events keep those modules from reaching into each other's state.

use bevy::prelude::*;

/// Ask for a new floor layout.
#[derive(Event, Debug, Clone, Copy)]
pub struct RegenerateDungeon;

/// The player stepped through a portal.
#[derive(Event, Debug, Clone, Copy)]
pub struct FloorCompleted;

/// Population finished; the floor is playable.
#[derive(Event, Debug, Clone, Copy)]
pub struct DungeonReady {
    /// Where the player should start.
    pub entry: Vec3,
    pub boss_room: Option<Entity>,
    pub shop_room: Option<Entity>,
    pub treasure_room: Option<Entity>,
}

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Base damage amount
    pub amount: f32,
}

/// Sent when the player picks up an item.
#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    /// Registry id of the picked item
    pub item_id: String,
    /// The player entity
    pub player: Entity,
}

/// Entities carrying this marker ignore [`DamageEvent`]s.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Invulnerable;
