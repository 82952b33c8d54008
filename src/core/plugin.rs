//! Game states, global events, and tweening.

use bevy::prelude::*;

use super::events::*;
use super::states::*;
use super::tween::*;

/// Shared state and events; add before the other game plugins.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_event::<RegenerateDungeon>()
            .add_event::<FloorCompleted>()
            .add_event::<DungeonReady>()
            .add_event::<DamageEvent>()
            .add_event::<ItemPickupEvent>()
            // Data files are read synchronously at startup
            .add_systems(OnEnter(GameState::Loading), finish_loading)
            .add_systems(Update, (toggle_pause, update_smooth_transforms));
    }
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    if let Some(target) = state.get().pause_toggled() {
        next_state.set(target);
    }
}
