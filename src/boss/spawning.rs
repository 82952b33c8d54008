//! Placing the boss in its room once a floor is ready.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{Boss, BossBrain};
use super::data::BossDefinition;
use crate::core::{DungeonReady, Invulnerable};

/// Spawn the boss as a child of the boss room.
///
/// The boss goes away with its room when the floor is regenerated.
pub fn spawn_boss_on_ready(
    mut commands: Commands,
    mut ready: EventReader<DungeonReady>,
    definition: Res<BossDefinition>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let Some(room) = ready.read().filter_map(|event| event.boss_room).last() else {
        return;
    };

    let visuals = meshes.zip(materials).map(|(mut meshes, mut materials)| {
        (
            meshes.add(Capsule3d::new(definition.radius, definition.half_height * 2.0)),
            materials.add(Color::srgb(0.35, 0.05, 0.08)),
        )
    });

    let Some(mut room_commands) = commands.get_entity(room) else {
        warn!("Boss room {:?} no longer exists", room);
        return;
    };
    let height = definition.half_height + definition.radius;
    room_commands.with_children(|parent| {
        let mut boss = parent.spawn((
            Boss,
            Invulnerable,
            BossBrain::new(&definition),
            Name::new(definition.name.clone()),
            Transform::from_xyz(0.0, height, 0.0),
            Visibility::default(),
            Collider::capsule_y(definition.half_height, definition.radius),
        ));
        if let Some((mesh, material)) = visuals {
            boss.insert((Mesh3d(mesh), MeshMaterial3d(material)));
        }
    });

    info!("Spawned boss {} in room {:?}", definition.name, room);
}
