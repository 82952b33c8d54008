//! Rogue Dungeon - a first-person action RPG built on procedurally populated floors.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, tweening
//! - **Dungeon**: Layouts, room population, doors, floor progression
//! - **Player**: First-person locomotion, camera, vitals
//! - **Boss**: Boss data and pattern brain
//! - **Items**: Item data, pickups, shop and treasure stock
//! - **UI**: Menus, HUD, fade screen, popups

pub mod boss;
pub mod core;
pub mod dungeon;
pub mod items;
pub mod player;
pub mod ui;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct RogueDungeonPlugin;

impl Plugin for RogueDungeonPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Floors and progression
            .add_plugins(dungeon::DungeonPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Boss systems
            .add_plugins(boss::BossPlugin)

            // Items
            .add_plugins(items::ItemPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
