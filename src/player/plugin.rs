//! Player plugin - movement, camera, and player-related systems.

use bevy::prelude::*;

use super::components::PlayerConfig;
use super::movement;

/// Player plugin - handles player spawning, movement, and camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PlayerConfig::load());

        movement::setup_movement_systems(app);
    }
}
