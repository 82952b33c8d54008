//! Item plugin - registers item systems.

use bevy::prelude::*;

use super::components::ItemSpawner;
use super::data::ItemRegistry;
use super::interaction::{equip_player, interact_with_items, track_item_contacts};
use super::stocking::stock_rooms_on_ready;
use crate::core::GameState;

/// Item plugin - loads item data, stocks rooms, and handles pickups.
pub struct ItemPlugin;

impl Plugin for ItemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_items)
            .add_systems(OnEnter(GameState::MainMenu), restock_epics)
            .add_systems(
            Update,
            (
                equip_player,
                stock_rooms_on_ready,
                track_item_contacts,
                interact_with_items,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
    }
}

fn load_items(mut commands: Commands) {
    let registry = ItemRegistry::load();
    commands.insert_resource(ItemSpawner::from_registry(&registry));
    commands.insert_resource(registry);
}

/// A new run offers every epic again.
fn restock_epics(registry: Option<Res<ItemRegistry>>, mut commands: Commands) {
    if let Some(registry) = registry {
        commands.insert_resource(ItemSpawner::from_registry(&registry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::data::{ItemData, ItemTier};
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn new_run_reenables_taken_epics() {
        let mut world = World::new();
        let mut registry = ItemRegistry::default();
        registry.items.insert(
            "crown".to_string(),
            ItemData {
                name: "Crown".to_string(),
                weight: 1.0,
                tier: ItemTier::Epic,
                pick_up: true,
                gold: 0,
            },
        );
        let mut spawner = ItemSpawner::from_registry(&registry);
        spawner.disable(0);
        world.insert_resource(spawner);
        world.insert_resource(registry);

        let _ = world.run_system_once(restock_epics);

        assert!(world.resource::<ItemSpawner>().slots()[0].enabled);
    }
}
