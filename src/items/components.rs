//! Item entities, the player's inventory, and the epic item spawner.

use bevy::prelude::*;
use rand::Rng;

use super::data::ItemRegistry;

/// An item lying in the world.
#[derive(Component, Debug, Clone)]
pub struct WorldItem {
    pub item_id: String,
    /// Slot in the [`ItemSpawner`] for epic items
    pub index: usize,
    /// Disabled items cannot be interacted with
    pub enabled: bool,
}

/// Items the player is close enough to use, oldest first.
#[derive(Component, Debug, Default)]
pub struct InteractList(pub Vec<Entity>);

impl InteractList {
    pub fn add(&mut self, entity: Entity) {
        self.remove(entity);
        self.0.push(entity);
    }

    pub fn remove(&mut self, entity: Entity) {
        self.0.retain(|e| *e != entity);
    }

    /// The most recently entered item.
    pub fn latest(&self) -> Option<Entity> {
        self.0.last().copied()
    }
}

/// Items the player carries.
#[derive(Component, Debug, Default)]
pub struct Inventory {
    pub items: Vec<String>,
}

impl Inventory {
    pub fn add(&mut self, item_id: impl Into<String>) {
        self.items.push(item_id.into());
    }

    pub fn count(&self, item_id: &str) -> usize {
        self.items.iter().filter(|id| *id == item_id).count()
    }
}

/// One epic item and whether it can still appear.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerSlot {
    pub item_id: String,
    pub enabled: bool,
}

/// Hands out epic items; once picked up an epic never appears again.
#[derive(Resource, Debug, Default)]
pub struct ItemSpawner {
    slots: Vec<SpawnerSlot>,
}

impl ItemSpawner {
    pub fn from_registry(registry: &ItemRegistry) -> Self {
        Self {
            slots: registry
                .epic_ids()
                .into_iter()
                .map(|item_id| SpawnerSlot { item_id, enabled: true })
                .collect(),
        }
    }

    /// Uniform pick among enabled slots, as `(index, item_id)`.
    pub fn random_epic(&self, rng: &mut impl Rng) -> Option<(usize, &str)> {
        let enabled: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.enabled)
            .map(|(i, _)| i)
            .collect();
        if enabled.is_empty() {
            return None;
        }
        let index = enabled[rng.gen_range(0..enabled.len())];
        Some((index, self.slots[index].item_id.as_str()))
    }

    /// Stop offering the item at `index`. Out-of-range indices are ignored.
    pub fn disable(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.enabled = false;
        }
    }

    pub fn slots(&self) -> &[SpawnerSlot] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::data::{ItemData, ItemTier};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> ItemRegistry {
        let mut registry = ItemRegistry::default();
        for (id, tier) in [("a", ItemTier::Epic), ("b", ItemTier::Common), ("c", ItemTier::Epic)] {
            registry.items.insert(
                id.to_string(),
                ItemData {
                    name: id.to_uppercase(),
                    weight: 1.0,
                    tier,
                    pick_up: true,
                    gold: 0,
                },
            );
        }
        registry
    }

    #[test]
    fn spawner_holds_only_epics() {
        let spawner = ItemSpawner::from_registry(&registry());
        let ids: Vec<&str> = spawner.slots().iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn disabled_epics_are_not_offered() {
        let mut spawner = ItemSpawner::from_registry(&registry());
        let mut rng = StdRng::seed_from_u64(4);
        spawner.disable(0);
        for _ in 0..20 {
            assert_eq!(spawner.random_epic(&mut rng), Some((1, "c")));
        }
        spawner.disable(1);
        assert_eq!(spawner.random_epic(&mut rng), None);
        spawner.disable(7);
    }

    #[test]
    fn interact_list_tracks_latest_entry() {
        let mut list = InteractList::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        list.add(a);
        list.add(b);
        assert_eq!(list.latest(), Some(b));
        list.add(a);
        assert_eq!(list.0, vec![b, a]);
        list.remove(a);
        assert_eq!(list.latest(), Some(b));
    }

    #[test]
    fn inventory_counts_duplicates() {
        let mut inventory = Inventory::default();
        inventory.add("herb");
        inventory.add("herb");
        inventory.add("key");
        assert_eq!(inventory.count("herb"), 2);
        assert_eq!(inventory.count("sword"), 0);
    }
}
