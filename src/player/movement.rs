//! First-person player movement, rolling, and camera control.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::{DamageEvent, DungeonReady, GameState, Invulnerable};
use crate::dungeon::drive_population;

/// Height above the entry room floor where the player is placed.
const SPAWN_HEIGHT: f32 = 1.0;

/// The player's camera.
#[derive(Component, Default)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
}

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app
        .add_systems(OnEnter(GameState::InGame), (spawn_player, grab_cursor))
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(OnEnter(GameState::MainMenu), despawn_player)
        .add_systems(
            Update,
            // A new floor's entry must be applied before room tracking looks at the player
            place_player_at_entry
                .before(drive_population)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            (
                mouse_look,
                update_locomotion_timers,
                player_movement,
                apply_damage,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

/// Grab and hide cursor when entering gameplay.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Handle mouse movement for looking around.
///
/// Rotates the player entity horizontally (yaw) and the camera vertically (pitch).
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    player_transform.rotate_y(-delta.x * sensitivity);

    // Clamped to about 80 degrees so the view never flips
    camera.pitch = (camera.pitch - delta.y * sensitivity * y_invert).clamp(-1.4, 1.4);
    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// Ground check and timeout bookkeeping.
pub fn update_locomotion_timers(
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<(Entity, &Transform, &mut MovementState, &mut LocomotionTimers), With<Player>>,
) {
    let Ok((entity, transform, mut movement_state, mut timers)) = player_query.get_single_mut() else {
        return;
    };

    // Capsule is capsule_y(0.5, 0.3), so the bottom is 0.8 units below center
    let is_grounded = match rapier_context.get_single() {
        Ok(context) => context
            .cast_ray(
                transform.translation - Vec3::Y * 0.75,
                Vec3::NEG_Y,
                0.15,
                true,
                QueryFilter::default().exclude_collider(entity),
            )
            .is_some(),
        Err(_) => true,
    };

    movement_state.is_grounded = is_grounded;
    timers.tick(is_grounded, time.delta_secs());
}

/// Handle WASD movement, sprinting, jumping, and rolling.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<
        (
            &Transform,
            &mut MovementState,
            &mut LocomotionTimers,
            &mut KinematicCharacterController,
        ),
        With<Player>,
    >,
) {
    let Ok((transform, mut movement_state, mut timers, mut controller)) = player_query.get_single_mut() else {
        return;
    };
    let dt = time.delta_secs();
    let grounded = movement_state.is_grounded;

    if grounded {
        if movement_state.vertical_velocity < 0.0 {
            movement_state.vertical_velocity = 0.0;
        }
        if keyboard.just_pressed(KeyCode::Space) && timers.can_jump(grounded) {
            movement_state.vertical_velocity = config.jump_force;
        }
    } else {
        movement_state.vertical_velocity -= config.gravity * dt;
    }

    if keyboard.just_pressed(KeyCode::ControlLeft) && timers.can_roll(grounded) {
        timers.start_roll();
    }

    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let rotation = Quat::from_rotation_y(yaw);

    let horizontal = if timers.is_rolling() {
        // Rolls always go forward
        rotation * Vec3::NEG_Z * config.roll_speed * dt
    } else {
        let mut direction = Vec3::ZERO;
        if keyboard.pressed(KeyCode::KeyW) {
            direction.z -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyS) {
            direction.z += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyA) {
            direction.x -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) {
            direction.x += 1.0;
        }

        let speed = if keyboard.pressed(KeyCode::ShiftLeft) {
            config.sprint_speed
        } else {
            config.move_speed
        };
        rotation * direction.normalize_or_zero() * speed * dt
    };

    let vertical = Vec3::Y * movement_state.vertical_velocity * dt;
    controller.translation = Some(horizontal + vertical);
}

/// Move the player to the entry room of a freshly populated floor.
pub fn place_player_at_entry(
    mut ready: EventReader<DungeonReady>,
    mut player_query: Query<(&mut Transform, &mut MovementState), With<Player>>,
) {
    let Some(event) = ready.read().last() else {
        return;
    };
    let Ok((mut transform, mut movement_state)) = player_query.get_single_mut() else {
        return;
    };
    transform.translation = event.entry + Vec3::Y * SPAWN_HEIGHT;
    movement_state.vertical_velocity = 0.0;
    info!("Player placed at entry {:?}", event.entry);
}

/// Apply damage events to the player's vitals.
pub fn apply_damage(
    mut damage_events: EventReader<DamageEvent>,
    invulnerable: Query<(), With<Invulnerable>>,
    mut vitals_query: Query<&mut PlayerVitals>,
) {
    for event in damage_events.read() {
        if invulnerable.contains(event.target) {
            debug!("Ignoring damage to invulnerable {:?}", event.target);
            continue;
        }
        if let Ok(mut vitals) = vitals_query.get_mut(event.target) {
            vitals.take_damage(event.amount);
            debug!("Player took {} damage, hp {}", event.amount, vitals.hp);
        }
    }
}

/// Spawn the player entity with camera, once per session.
///
/// Re-entering gameplay after a pause keeps the existing player.
pub fn spawn_player(
    mut commands: Commands,
    config: Res<PlayerConfig>,
    existing: Query<(), With<Player>>,
) {
    if !existing.is_empty() {
        return;
    }

    commands
        .spawn((
            Player,
            Name::new("Player"),
            PlayerVitals::new(config.max_hp, config.max_vitality),
            MovementState::default(),
            config.locomotion_timers(),
            Transform::from_translation(Vec3::Y * SPAWN_HEIGHT),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            // Item sensors have no body, so kinematic-static pairs must report
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(0.4),
                    min_width: CharacterLength::Absolute(0.3),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Camera3d::default(),
                PlayerCamera::default(),
                // Eye level
                Transform::from_xyz(0.0, 0.4, 0.0),
            ));
            // Torch
            parent.spawn((
                PointLight {
                    color: Color::srgb(1.0, 0.85, 0.6),
                    intensity: 400_000.0,
                    range: 25.0,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_xyz(0.0, 0.6, 0.0),
            ));
        });

    info!("Spawned player");
}

/// Remove the player, camera included, when the run is abandoned.
pub fn despawn_player(mut commands: Commands, player_query: Query<Entity, With<Player>>) {
    for entity in player_query.iter() {
        commands.entity(entity).despawn_recursive();
        info!("Despawned player");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn invulnerable_targets_ignore_damage() {
        let mut world = World::new();
        world.init_resource::<Events<DamageEvent>>();
        let player = world.spawn(PlayerVitals::new(50.0, 10.0)).id();
        let shielded = world.spawn((PlayerVitals::new(50.0, 10.0), Invulnerable)).id();

        world.send_event(DamageEvent { target: player, amount: 20.0 });
        world.send_event(DamageEvent { target: shielded, amount: 20.0 });
        let _ = world.run_system_once(apply_damage);

        assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.hp), Some(30.0));
        assert_eq!(world.get::<PlayerVitals>(shielded).map(|v| v.hp), Some(50.0));
    }

    #[test]
    fn ready_floor_moves_player_to_entry() {
        let mut world = World::new();
        world.init_resource::<Events<DungeonReady>>();
        let player = world
            .spawn((Player, Transform::default(), MovementState { is_grounded: false, vertical_velocity: -4.0 }))
            .id();

        world.send_event(DungeonReady {
            entry: Vec3::new(40.0, 0.0, -20.0),
            boss_room: None,
            shop_room: None,
            treasure_room: None,
        });
        let _ = world.run_system_once(place_player_at_entry);

        let transform = world.get::<Transform>(player).copied().unwrap_or_default();
        assert_eq!(transform.translation, Vec3::new(40.0, SPAWN_HEIGHT, -20.0));
        assert_eq!(world.get::<MovementState>(player).map(|m| m.vertical_velocity), Some(0.0));
    }

    #[test]
    fn leaving_for_the_menu_removes_player_and_camera() {
        let mut world = World::new();
        let player = world.spawn((Player, Transform::default())).id();
        let camera = world.spawn(PlayerCamera::default()).id();
        world.entity_mut(player).add_child(camera);
        let bystander = world.spawn(Transform::default()).id();

        let _ = world.run_system_once(despawn_player);

        assert!(world.get_entity(player).is_err());
        assert!(world.get_entity(camera).is_err());
        assert!(world.get_entity(bystander).is_ok());
    }
}
