//! Dungeon configuration loaded from external RON file.
//!
//! Room templates and population tunables live in
//! `assets/data/dungeon.ron` so floors can be tweaked without recompiling.

use bevy::prelude::*;
use serde::Deserialize;

use super::archetype::RoomKind;
use super::error::load_ron;
use super::populator::PopulationSettings;

const CONFIG_PATH: &str = "assets/data/dungeon.ron";

/// Shape and contents of one room archetype.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoomTemplate {
    pub name: String,
    /// Half the side length of the square floor.
    pub half_extent: f32,
    pub floor_color: (f32, f32, f32),
    /// Floor is a navigation surface.
    pub walkable: bool,
    /// Room gets a portal to the next floor.
    pub portal: bool,
    /// Local offsets where items can be placed.
    pub item_spots: Vec<(f32, f32, f32)>,
}

impl Default for RoomTemplate {
    fn default() -> Self {
        Self {
            name: "room".to_string(),
            half_extent: 8.0,
            floor_color: (0.3, 0.3, 0.32),
            walkable: true,
            portal: false,
            item_spots: Vec::new(),
        }
    }
}

impl RoomTemplate {
    fn named(name: &str, floor_color: (f32, f32, f32)) -> Self {
        Self {
            name: name.to_string(),
            floor_color,
            ..default()
        }
    }
}

/// Dungeon configuration loaded from assets/data/dungeon.ron.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    // Population
    pub active_room_distance: f32,
    pub shop_roll_range: u32,
    pub treasure_roll_range: u32,
    pub dedupe_active_rooms: bool,
    // Layout
    pub room_spacing: i32,
    pub room_count: usize,
    pub rooms_per_stage: usize,
    pub max_room_count: usize,
    /// Fixed seed for reproducible floors; entropy when absent.
    pub seed: Option<u64>,
    // Doors
    pub door_probe_range: f32,
    // Templates
    pub entry: RoomTemplate,
    pub boss: RoomTemplate,
    pub shop: RoomTemplate,
    pub treasure: RoomTemplate,
    pub normal: Vec<RoomTemplate>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            active_room_distance: 5.0,
            shop_roll_range: 3,
            treasure_roll_range: 2,
            dedupe_active_rooms: false,
            room_spacing: 20,
            room_count: 6,
            rooms_per_stage: 2,
            max_room_count: 16,
            seed: None,
            door_probe_range: 6.0,
            entry: RoomTemplate::named("entry", (0.35, 0.35, 0.4)),
            boss: RoomTemplate {
                portal: true,
                ..RoomTemplate::named("boss", (0.4, 0.15, 0.15))
            },
            shop: RoomTemplate {
                item_spots: vec![(-3.0, 0.5, 0.0), (0.0, 0.5, 0.0), (3.0, 0.5, 0.0)],
                ..RoomTemplate::named("shop", (0.2, 0.3, 0.45))
            },
            treasure: RoomTemplate {
                item_spots: vec![(0.0, 0.5, 0.0)],
                ..RoomTemplate::named("treasure", (0.5, 0.42, 0.15))
            },
            normal: vec![
                RoomTemplate::named("crypt", (0.3, 0.3, 0.32)),
                RoomTemplate::named("cellar", (0.28, 0.25, 0.22)),
            ],
        }
    }
}

impl DungeonConfig {
    /// Load dungeon config from RON file.
    pub fn load() -> Self {
        match load_ron::<DungeonConfig>(CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded dungeon config from {}", CONFIG_PATH);
                config
            }
            Err(e) => {
                warn!("{}. Using default dungeon config.", e);
                Self::default()
            }
        }
    }

    /// Template for a room kind; `variant` only matters for normal rooms.
    pub fn template(&self, kind: RoomKind, variant: usize) -> Option<&RoomTemplate> {
        match kind {
            RoomKind::Entry => Some(&self.entry),
            RoomKind::Boss => Some(&self.boss),
            RoomKind::Shop => Some(&self.shop),
            RoomKind::Treasure => Some(&self.treasure),
            RoomKind::Normal => self.normal.get(variant),
        }
    }

    pub fn population_settings(&self) -> PopulationSettings {
        PopulationSettings {
            active_room_distance: self.active_room_distance,
            shop_roll_range: self.shop_roll_range,
            treasure_roll_range: self.treasure_roll_range,
            normal_variants: self.normal.len(),
            dedupe_active_rooms: self.dedupe_active_rooms,
        }
    }

    /// Rooms on a floor for the given stage.
    pub fn room_count_for(&self, stage_level: u32) -> usize {
        let extra = stage_level.saturating_sub(1) as usize * self.rooms_per_stage;
        (self.room_count + extra).min(self.max_room_count)
    }
}

/// System to load dungeon config at startup.
pub fn load_dungeon_config(mut commands: Commands) {
    commands.insert_resource(DungeonConfig::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_falls_back_to_defaults() {
        let config: DungeonConfig = ron::from_str(
            "(room_count: 9, dedupe_active_rooms: true, normal: [(name: \"hall\", half_extent: 6.0)])",
        )
        .unwrap();
        assert_eq!(config.room_count, 9);
        assert!(config.dedupe_active_rooms);
        assert_eq!(config.active_room_distance, 5.0);
        assert_eq!(config.normal.len(), 1);
        assert_eq!(config.normal[0].half_extent, 6.0);
        assert!(config.normal[0].walkable);
    }

    #[test]
    fn settings_follow_config() {
        let config = DungeonConfig::default();
        let settings = config.population_settings();
        assert_eq!(settings.normal_variants, 2);
        assert_eq!(settings.shop_roll_range, 3);
        assert_eq!(settings.treasure_roll_range, 2);
    }

    #[test]
    fn templates_by_kind() {
        let config = DungeonConfig::default();
        assert!(config.template(RoomKind::Boss, 0).unwrap().portal);
        assert_eq!(config.template(RoomKind::Normal, 1).unwrap().name, "cellar");
        assert!(config.template(RoomKind::Normal, 5).is_none());
    }

    #[test]
    fn room_count_grows_with_stage_up_to_cap() {
        let config = DungeonConfig::default();
        assert_eq!(config.room_count_for(1), 6);
        assert_eq!(config.room_count_for(3), 10);
        assert_eq!(config.room_count_for(50), 16);
        assert_eq!(config.room_count_for(0), 6);
    }
}
