//! Item definitions loaded from RON.

use std::collections::BTreeMap;

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::dungeon::load_ron;

const ITEMS_PATH: &str = "assets/data/items.ron";

/// Rarity of an item.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemTier {
    #[default]
    Common,
    Rare,
    /// Found once per run; never restocked after pickup.
    Epic,
}

/// Static data for one item type.
#[derive(Deserialize, Clone, Debug)]
pub struct ItemData {
    pub name: String,
    /// Relative chance of being stocked
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default)]
    pub tier: ItemTier,
    /// Goes into the inventory on interact
    #[serde(default)]
    pub pick_up: bool,
    /// Gold granted on interact
    #[serde(default)]
    pub gold: u32,
}

fn default_weight() -> f32 {
    1.0
}

/// All known items, keyed by id.
#[derive(Resource, Deserialize, Clone, Debug, Default)]
pub struct ItemRegistry {
    pub items: BTreeMap<String, ItemData>,
}

impl ItemRegistry {
    pub fn get(&self, id: &str) -> Option<&ItemData> {
        self.items.get(id)
    }

    /// Ids of every epic item, in id order.
    pub fn epic_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|(_, data)| data.tier == ItemTier::Epic)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Weighted pick among non-epic items.
    pub fn random_stock(&self, rng: &mut impl Rng) -> Option<&str> {
        weighted_pick(
            self.items
                .iter()
                .filter(|(_, data)| data.tier != ItemTier::Epic)
                .map(|(id, data)| (id.as_str(), data.weight)),
            rng,
        )
    }

    fn builtin() -> Self {
        let mut items = BTreeMap::new();
        for (id, name, weight, tier, pick_up, gold) in [
            ("healing_herb", "Healing Herb", 4.0, ItemTier::Common, true, 0),
            ("gold_pouch", "Gold Pouch", 3.0, ItemTier::Common, false, 25),
            ("iron_key", "Iron Key", 2.0, ItemTier::Rare, true, 0),
            ("moonlit_blade", "Moonlit Blade", 1.0, ItemTier::Epic, true, 0),
            ("warden_crown", "Warden's Crown", 1.0, ItemTier::Epic, true, 100),
        ] {
            items.insert(
                id.to_string(),
                ItemData {
                    name: name.to_string(),
                    weight,
                    tier,
                    pick_up,
                    gold,
                },
            );
        }
        Self { items }
    }

    /// Load from disk, falling back to the built-in items.
    pub fn load() -> Self {
        match load_ron::<ItemRegistry>(ITEMS_PATH) {
            Ok(registry) => {
                info!("Loaded {} item definitions", registry.items.len());
                registry
            }
            Err(e) => {
                warn!("{}. Using built-in items.", e);
                Self::builtin()
            }
        }
    }
}

/// Weighted random choice; entries with non-positive weight are skipped.
pub fn weighted_pick<T: Copy>(entries: impl Iterator<Item = (T, f32)>, rng: &mut impl Rng) -> Option<T> {
    let entries: Vec<(T, f32)> = entries.filter(|(_, weight)| *weight > 0.0).collect();
    let total: f32 = entries.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.gen_range(0.0..total);
    for (value, weight) in &entries {
        if roll < *weight {
            return Some(*value);
        }
        roll -= weight;
    }
    entries.last().map(|(value, _)| *value)
}
