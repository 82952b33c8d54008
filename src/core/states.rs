//! Top-level game flow.

use bevy::prelude::*;

/// Where the game is in a session.
///
/// `Loading -> MainMenu -> InGame <-> Paused`, and `Paused -> MainMenu` when a
/// run is abandoned. Entering `MainMenu` always ends the current run.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Data files are read; lasts a single frame
    #[default]
    Loading,
    /// Title screen, no run in progress
    MainMenu,
    /// A run is being played
    InGame,
    /// Run frozen under the pause menu
    Paused,
}

impl GameState {
    /// The state Escape switches to, if any.
    pub fn pause_toggled(self) -> Option<GameState> {
        match self {
            GameState::InGame => Some(GameState::Paused),
            GameState::Paused => Some(GameState::InGame),
            GameState::Loading | GameState::MainMenu => None,
        }
    }
}
