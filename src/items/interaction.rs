//! Walking up to items and using them.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{InteractList, Inventory, ItemSpawner, WorldItem};
use super::data::{ItemRegistry, ItemTier};
use crate::core::ItemPickupEvent;
use crate::player::{Player, PlayerVitals};
use crate::ui::Popups;

/// Give a newly spawned player somewhere to keep items.
pub fn equip_player(mut commands: Commands, players: Query<Entity, Added<Player>>) {
    for player in players.iter() {
        commands.entity(player).insert((Inventory::default(), InteractList::default()));
    }
}

/// Update the player's interact list from sensor contacts.
pub fn track_item_contacts(
    mut collisions: EventReader<CollisionEvent>,
    registry: Res<ItemRegistry>,
    mut popups: ResMut<Popups>,
    mut players: Query<&mut InteractList, With<Player>>,
    items: Query<&WorldItem>,
) {
    for event in collisions.read() {
        let (a, b, started) = match *event {
            CollisionEvent::Started(a, b, _) => (a, b, true),
            CollisionEvent::Stopped(a, b, _) => (a, b, false),
        };
        // Either side may be the player
        let (player, item) = if players.contains(a) { (a, b) } else { (b, a) };
        if !items.contains(item) {
            continue;
        }
        let Ok(mut list) = players.get_mut(player) else {
            continue;
        };

        if started {
            list.add(item);
        } else {
            list.remove(item);
        }
        refresh_hint(&list, &items, &registry, &mut popups);
    }
}

/// Use the most recently entered item when E is pressed.
pub fn interact_with_items(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    registry: Res<ItemRegistry>,
    mut spawner: ResMut<ItemSpawner>,
    mut popups: ResMut<Popups>,
    mut players: Query<(Entity, &mut InteractList, &mut Inventory, &mut PlayerVitals), With<Player>>,
    items: Query<&WorldItem>,
    mut pickups: EventWriter<ItemPickupEvent>,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    let Ok((player, mut list, mut inventory, mut vitals)) = players.get_single_mut() else {
        return;
    };
    let Some(entity) = list.latest() else {
        return;
    };
    let Ok(item) = items.get(entity) else {
        // Already gone
        list.remove(entity);
        refresh_hint(&list, &items, &registry, &mut popups);
        return;
    };
    if !item.enabled {
        return;
    }
    let Some(data) = registry.get(&item.item_id) else {
        warn!("Unknown item id {}", item.item_id);
        return;
    };

    if data.pick_up {
        inventory.add(item.item_id.clone());
    }
    vitals.gold += data.gold;
    if data.tier == ItemTier::Epic {
        spawner.disable(item.index);
    }

    info!("Player used {}", data.name);
    popups.popup(format!("Got {}", data.name));
    pickups.send(ItemPickupEvent {
        item_id: item.item_id.clone(),
        player,
    });

    commands.entity(entity).despawn_recursive();
    list.remove(entity);
    refresh_hint(&list, &items, &registry, &mut popups);
}

fn refresh_hint(
    list: &InteractList,
    items: &Query<&WorldItem>,
    registry: &ItemRegistry,
    popups: &mut Popups,
) {
    let name = list
        .latest()
        .and_then(|entity| items.get(entity).ok())
        .and_then(|item| registry.get(&item.item_id))
        .map(|data| data.name.as_str());
    match name {
        Some(name) => popups.show_interact(format!("Use {name}")),
        None => popups.hide_interact(),
    }
}
