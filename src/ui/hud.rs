//! In-game HUD - health, vitality, gold, and popups.

use bevy::prelude::*;

use super::popup::{InteractHint, PopupMessage};
use crate::core::GameState;
use crate::player::{Player, PlayerVitals};

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for vitality bar fill.
#[derive(Component)]
pub struct VitalityBar;

/// Marker for the gold counter.
#[derive(Component)]
pub struct GoldText;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (update_vital_bars, update_gold_text).run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Bars and gold, bottom-left corner
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("0G"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.8, 0.3)),
                Node {
                    margin: UiRect::bottom(Val::Px(8.0)),
                    ..default()
                },
                GoldText,
            ));
            spawn_bar(parent, "Vitality", Color::srgb(0.2, 0.8, 0.3), VitalityBar);
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);
        });

    // Popups, lower middle of the screen
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Center,
                padding: UiRect::bottom(Val::Px(120.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::default(),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Visibility::Hidden,
                PopupMessage,
            ));
            parent.spawn((
                Text::default(),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.75, 0.75, 0.8)),
                Node {
                    margin: UiRect::top(Val::Px(10.0)),
                    ..default()
                },
                Visibility::Hidden,
                InteractHint,
            ));
        });

    // Crosshair (center of screen)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));
        });
}

/// Helper to spawn a labelled status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            // Background, then fill
            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Fill fraction for a bar; empty when the maximum is not positive.
pub fn bar_fraction(current: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (current / max).clamp(0.0, 1.0)
    }
}

/// Gold counter text.
pub fn gold_label(gold: u32) -> String {
    format!("{gold}G")
}

/// Resize both bars from the player's vitals.
fn update_vital_bars(
    player_query: Query<&PlayerVitals, With<Player>>,
    mut health_bars: Query<&mut Node, (With<HealthBar>, Without<VitalityBar>)>,
    mut vitality_bars: Query<&mut Node, (With<VitalityBar>, Without<HealthBar>)>,
) {
    let Ok(vitals) = player_query.get_single() else {
        return;
    };
    if let Ok(mut bar) = health_bars.get_single_mut() {
        bar.width = Val::Percent(bar_fraction(vitals.hp, vitals.max_hp) * 100.0);
    }
    if let Ok(mut bar) = vitality_bars.get_single_mut() {
        bar.width = Val::Percent(bar_fraction(vitals.vitality, vitals.max_vitality) * 100.0);
    }
}

fn update_gold_text(
    player_query: Query<&PlayerVitals, With<Player>>,
    mut text_query: Query<&mut Text, With<GoldText>>,
) {
    let Ok(vitals) = player_query.get_single() else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    let label = gold_label(vitals.gold);
    if text.0 != label {
        text.0 = label;
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
