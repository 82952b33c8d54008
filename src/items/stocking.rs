//! Placing items in shop and treasure rooms.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{ItemSpawner, WorldItem};
use super::data::{ItemRegistry, ItemTier};
use crate::core::DungeonReady;
use crate::dungeon::Room;

/// Radius of the sensor around an item.
const INTERACT_RADIUS: f32 = 1.5;

/// One item to place in a room.
#[derive(Debug, Clone, PartialEq)]
pub struct StockEntry {
    pub item_id: String,
    pub index: usize,
    pub offset: Vec3,
}

/// A treasure room gets one random epic on its first spot.
pub fn treasure_stock(room: &Room, spawner: &ItemSpawner, rng: &mut impl rand::Rng) -> Vec<StockEntry> {
    let Some(&offset) = room.item_spots.first() else {
        return Vec::new();
    };
    spawner
        .random_epic(rng)
        .map(|(index, item_id)| StockEntry {
            item_id: item_id.to_string(),
            index,
            offset,
        })
        .into_iter()
        .collect()
}

/// A shop gets a weighted non-epic item on every spot.
pub fn shop_stock(room: &Room, registry: &ItemRegistry, rng: &mut impl rand::Rng) -> Vec<StockEntry> {
    room.item_spots
        .iter()
        .enumerate()
        .filter_map(|(index, &offset)| {
            registry.random_stock(rng).map(|item_id| StockEntry {
                item_id: item_id.to_string(),
                index,
                offset,
            })
        })
        .collect()
}

/// Stock the shop and treasure rooms of a freshly populated floor.
pub fn stock_rooms_on_ready(
    mut commands: Commands,
    mut ready: EventReader<DungeonReady>,
    registry: Res<ItemRegistry>,
    spawner: Res<ItemSpawner>,
    rooms: Query<&Room>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let Some(event) = ready.read().last().copied() else {
        return;
    };
    let mut rng = rand::thread_rng();

    let mut plans = Vec::new();
    if let Some(room) = event.treasure_room {
        if let Ok(data) = rooms.get(room) {
            plans.push((room, treasure_stock(data, &spawner, &mut rng)));
        }
    }
    if let Some(room) = event.shop_room {
        if let Ok(data) = rooms.get(room) {
            plans.push((room, shop_stock(data, &registry, &mut rng)));
        }
    }

    for (room, stock) in plans {
        let Some(mut room_commands) = commands.get_entity(room) else {
            continue;
        };
        let count = stock.len();
        room_commands.with_children(|parent| {
            for entry in stock {
                let tier = registry.get(&entry.item_id).map_or(ItemTier::Common, |d| d.tier);
                let mut item = parent.spawn((
                    WorldItem {
                        item_id: entry.item_id,
                        index: entry.index,
                        enabled: true,
                    },
                    Transform::from_translation(entry.offset),
                    Visibility::default(),
                    Collider::ball(INTERACT_RADIUS),
                    Sensor,
                    ActiveEvents::COLLISION_EVENTS,
                    // The player is kinematic and the item has no body
                    ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
                ));
                if let (Some(meshes), Some(materials)) = (meshes.as_mut(), materials.as_mut()) {
                    item.insert((
                        Mesh3d(meshes.add(Cuboid::new(0.4, 0.4, 0.4))),
                        MeshMaterial3d(materials.add(tier_color(tier))),
                    ));
                }
            }
        });
        info!("Stocked {} items in room {:?}", count, room);
    }
}

fn tier_color(tier: ItemTier) -> Color {
    match tier {
        ItemTier::Common => Color::srgb(0.7, 0.7, 0.7),
        ItemTier::Rare => Color::srgb(0.3, 0.5, 0.95),
        ItemTier::Epic => Color::srgb(0.75, 0.3, 0.95),
    }
}
