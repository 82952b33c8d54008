//! Player module - player entity, locomotion, and camera control.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{spawn_player, PlayerCamera};
pub use plugin::PlayerPlugin;
