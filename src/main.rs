//! Rogue Dungeon - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Shift: Sprint
//! - Space: Jump
//! - Left Ctrl: Roll
//! - E: Use item
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Rogue Dungeon".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(rogue_dungeon::RogueDungeonPlugin)

        .run();
}
