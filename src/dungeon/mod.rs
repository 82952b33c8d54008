//! Dungeon module - procedural floors, room population, and progression.

mod active;
mod archetype;
mod components;
mod config;
mod doors;
mod error;
mod host;
mod layout;
#[cfg(test)]
mod mock;
mod plugin;
mod populator;
mod progression;
mod slots;
mod spawning;

pub use active::locate_active_rooms;
pub use archetype::{slot_to_world, RoomKind, RoomPlacement};
pub use components::*;
pub use config::{DungeonConfig, RoomTemplate};
pub use doors::{nearest_doors, resolve_doors};
pub use error::{load_ron, DataLoadError, DungeonError};
pub use host::{DoorSample, DungeonHost};
pub use layout::{random_walk_layout, Stage};
pub use plugin::{drive_population, DungeonPlugin, DungeonState};
pub use populator::{DungeonPopulator, PipelineStage, PopulationSettings};
pub use slots::SlotPool;
pub use spawning::WorldHost;
