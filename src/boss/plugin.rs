//! Boss plugin - registers boss systems.

use bevy::prelude::*;

use super::ai;
use super::components::{BossPatternFinished, BossPatternStarted};
use super::data::load_boss_definition;
use super::spawning::spawn_boss_on_ready;
use crate::core::GameState;

/// Boss plugin - loads the definition and runs the pattern brain.
pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BossPatternStarted>()
            .add_event::<BossPatternFinished>()
            .add_systems(Startup, load_boss_definition)
            .add_systems(
                Update,
                (
                    spawn_boss_on_ready,
                    ai::handle_pattern_finished,
                    ai::boss_think,
                    ai::run_patterns,
                    ai::face_player_while_attacking,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
