//! Full-screen fade used around floor transitions.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::DungeonReady;

/// Alpha changes by one hundredth per step.
const FADE_STEPS: u32 = 100;
const STEP_SECONDS: f32 = 0.01;

/// Where the fade currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FadeState {
    /// Overlay hidden
    #[default]
    None,
    /// Black going clear
    FadingIn,
    /// Fully black
    Fade,
    /// Clear going black
    FadingOut,
}

/// Fade overlay state.
///
/// Fading out always starts from clear and fading in from black; starting
/// one direction cancels the other.
#[derive(Resource, Debug)]
pub struct FadeScreen {
    state: FadeState,
    level: u32,
    step: Timer,
}

impl Default for FadeScreen {
    fn default() -> Self {
        Self {
            state: FadeState::None,
            level: 0,
            step: Timer::from_seconds(STEP_SECONDS, TimerMode::Repeating),
        }
    }
}

impl FadeScreen {
    pub fn state(&self) -> FadeState {
        self.state
    }

    /// Overlay opacity in `0.0..=1.0`.
    pub fn alpha(&self) -> f32 {
        self.level as f32 / FADE_STEPS as f32
    }

    pub fn start_fade_out(&mut self) {
        self.state = FadeState::FadingOut;
        self.level = 0;
        self.step.reset();
    }

    pub fn start_fade_in(&mut self) {
        self.state = FadeState::FadingIn;
        self.level = FADE_STEPS;
        self.step.reset();
    }

    /// Advance by `delta`, one alpha step per elapsed step interval.
    pub fn tick(&mut self, delta: Duration) {
        if !matches!(self.state, FadeState::FadingIn | FadeState::FadingOut) {
            return;
        }
        self.step.tick(delta);
        for _ in 0..self.step.times_finished_this_tick() {
            match self.state {
                FadeState::FadingOut => {
                    self.level += 1;
                    if self.level >= FADE_STEPS {
                        self.state = FadeState::Fade;
                        return;
                    }
                }
                FadeState::FadingIn => {
                    self.level = self.level.saturating_sub(1);
                    if self.level == 0 {
                        self.state = FadeState::None;
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}

/// Marker for the fade overlay node.
#[derive(Component)]
pub struct FadeOverlay;

/// Spawn the overlay once; it lives for the whole session.
pub fn spawn_fade_overlay(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(100),
        Visibility::Hidden,
        FadeOverlay,
    ));
}

pub fn tick_fade(time: Res<Time>, mut fade: ResMut<FadeScreen>) {
    fade.tick(time.delta());
}

/// Reveal a freshly populated floor.
pub fn fade_in_on_ready(mut ready: EventReader<DungeonReady>, mut fade: ResMut<FadeScreen>) {
    if ready.read().count() > 0 {
        fade.start_fade_in();
    }
}

/// Mirror the fade state onto the overlay.
pub fn update_fade_overlay(
    fade: Res<FadeScreen>,
    mut overlay: Query<(&mut BackgroundColor, &mut Visibility), With<FadeOverlay>>,
) {
    if !fade.is_changed() {
        return;
    }
    let Ok((mut color, mut visibility)) = overlay.get_single_mut() else {
        return;
    };
    color.0 = Color::srgba(0.0, 0.0, 0.0, fade.alpha());
    *visibility = if fade.state() == FadeState::None {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };
}
