//! UI plugin - title and pause menus, HUD, and screen effects.

use bevy::prelude::*;

use super::fade::{self, FadeScreen};
use super::hud;
use super::popup::{self, Popups};
use crate::core::GameState;
use crate::dungeon::Stage;

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.init_resource::<FadeScreen>()
            .init_resource::<Popups>()
            // Fade overlay lives for the whole session
            .add_systems(Startup, fade::spawn_fade_overlay)
            .add_systems(
                Update,
                (fade::fade_in_on_ready, fade::tick_fade, popup::tick_popups)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(Update, (fade::update_fade_overlay, popup::sync_popups))
            .add_systems(
                OnEnter(GameState::MainMenu),
                (reset_screen_effects, spawn_title_menu),
            )
            .add_systems(OnEnter(GameState::Paused), spawn_pause_menu)
            .add_systems(
                Update,
                menu_input.run_if(in_state(GameState::MainMenu).or(in_state(GameState::Paused))),
            )
            .add_systems(OnExit(GameState::MainMenu), despawn_menu)
            .add_systems(OnExit(GameState::Paused), despawn_menu);
    }
}

/// Root of whichever menu is showing, plus the title screen camera.
#[derive(Component)]
struct MenuRoot;

/// What a menu button does.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Descend,
    Resume,
    Abandon,
    Quit,
}

impl MenuAction {
    fn label(self) -> &'static str {
        match self {
            MenuAction::Descend => "Enter Dungeon",
            MenuAction::Resume => "Resume",
            MenuAction::Abandon => "Abandon Run",
            MenuAction::Quit => "Quit",
        }
    }

    /// State the button leads to; `None` quits the game.
    fn target(self) -> Option<GameState> {
        match self {
            MenuAction::Descend | MenuAction::Resume => Some(GameState::InGame),
            MenuAction::Abandon => Some(GameState::MainMenu),
            MenuAction::Quit => None,
        }
    }
}

fn pause_subtitle(stage: Stage) -> String {
    format!("Floor {}", stage.0)
}

/// Screen effects left over from an abandoned run.
fn reset_screen_effects(mut fade: ResMut<FadeScreen>, mut popups: ResMut<Popups>) {
    *fade = FadeScreen::default();
    *popups = Popups::default();
}

fn spawn_title_menu(mut commands: Commands) {
    // The player camera is gone outside a run
    commands.spawn((Camera2d, MenuRoot));
    spawn_menu(
        &mut commands,
        "ROGUE DUNGEON",
        "Descend. Clear the rooms. Find the portal.",
        Color::srgb(0.05, 0.05, 0.08),
        &[MenuAction::Descend, MenuAction::Quit],
    );
}

fn spawn_pause_menu(mut commands: Commands, stage: Option<Res<Stage>>) {
    let stage = stage.map_or(Stage::default(), |stage| *stage);
    spawn_menu(
        &mut commands,
        "PAUSED",
        &pause_subtitle(stage),
        Color::srgba(0.0, 0.0, 0.0, 0.7),
        &[MenuAction::Resume, MenuAction::Abandon],
    );
}

/// A centred column: title, subtitle, then one button per action.
fn spawn_menu(
    commands: &mut Commands,
    title: &str,
    subtitle: &str,
    backdrop: Color,
    actions: &[MenuAction],
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(backdrop),
            MenuRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.7, 0.6)),
                Node {
                    margin: UiRect::bottom(Val::Px(24.0)),
                    ..default()
                },
            ));
            parent.spawn((
                Text::new(subtitle),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.5, 0.55)),
                Node {
                    margin: UiRect::bottom(Val::Px(48.0)),
                    ..default()
                },
            ));

            for &action in actions {
                parent
                    .spawn((
                        Button,
                        Node {
                            width: Val::Px(220.0),
                            height: Val::Px(50.0),
                            margin: UiRect::all(Val::Px(8.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_IDLE),
                        action,
                    ))
                    .with_child((
                        Text::new(action.label()),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.8, 0.8, 0.85)),
                    ));
            }
        });
}

fn menu_input(
    mut buttons: Query<
        (&Interaction, &MenuAction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, action, mut color) in buttons.iter_mut() {
        color.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        };
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action.target() {
            Some(state) => next_state.set(state),
            None => {
                exit.send(AppExit::Success);
            }
        }
    }
}

fn despawn_menu(mut commands: Commands, roots: Query<Entity, With<MenuRoot>>) {
    for entity in roots.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
