//! Room construction and the Bevy side of [`DungeonHost`].

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::archetype::RoomKind;
use super::components::{
    Door, DoorProbe, DoorVisualDirty, DungeonRoom, NavBakeRequest, NavSurface, NavigationCleared,
    Portal, Room,
};
use super::config::{DungeonConfig, RoomTemplate};
use super::host::{DoorSample, DungeonHost};
use crate::core::SmoothTransform;

/// Door panel size.
const DOOR_WIDTH: f32 = 3.0;
const DOOR_HEIGHT: f32 = 3.0;
const DOOR_THICKNESS: f32 = 0.3;
/// How far an opened door sinks below the floor.
const DOOR_SINK_DEPTH: f32 = 3.5;

/// Shared meshes and materials for room geometry.
#[derive(Resource, Clone)]
pub struct RoomVisuals {
    pub door_mesh: Handle<Mesh>,
    pub portal_mesh: Handle<Mesh>,
    pub portal_material: Handle<StandardMaterial>,
    pub sealed_door: Handle<StandardMaterial>,
    pub passage_doors: HashMap<RoomKind, Handle<StandardMaterial>>,
}

/// Build shared meshes and materials once at startup.
pub fn setup_room_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Dim everywhere; the player's torch does the rest
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.55, 0.5, 0.6),
        brightness: 60.0,
    });

    let mut passage_doors = HashMap::new();
    for (kind, color) in [
        (RoomKind::Entry, Color::srgb(0.6, 0.6, 0.65)),
        (RoomKind::Normal, Color::srgb(0.45, 0.35, 0.25)),
        (RoomKind::Boss, Color::srgb(0.7, 0.1, 0.1)),
        (RoomKind::Shop, Color::srgb(0.2, 0.4, 0.8)),
        (RoomKind::Treasure, Color::srgb(0.9, 0.75, 0.2)),
    ] {
        passage_doors.insert(kind, materials.add(color));
    }

    commands.insert_resource(RoomVisuals {
        door_mesh: meshes.add(Cuboid::new(DOOR_WIDTH, DOOR_HEIGHT, DOOR_THICKNESS)),
        portal_mesh: meshes.add(Cylinder::new(1.2, 0.1)),
        portal_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.4, 0.2, 0.9),
            emissive: LinearRgba::new(0.6, 0.3, 1.0, 1.0),
            ..default()
        }),
        sealed_door: materials.add(Color::srgb(0.2, 0.2, 0.22)),
        passage_doors,
    });
}

/// [`DungeonHost`] backed directly by the ECS world.
///
/// Rooms and doors are spawned immediately, so later pipeline stages see them
/// without waiting for a command flush.
pub struct WorldHost<'w> {
    world: &'w mut World,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    /// Mark a door open and slide it into the floor.
    fn sink_door(&mut self, door: Entity) {
        let Some(mut state) = self.world.get_mut::<Door>(door) else {
            return;
        };
        state.open = true;
        let Some(transform) = self.world.get::<Transform>(door) else {
            return;
        };
        let target = transform.translation - Vec3::Y * DOOR_SINK_DEPTH;
        self.world
            .entity_mut(door)
            .insert(SmoothTransform::slide_to(target, 3.0));
    }

    fn children_of(&self, entity: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(entity)
            .map(|children| children.iter().copied().collect())
            .unwrap_or_default()
    }

    fn spawn_from_template(
        &mut self,
        kind: RoomKind,
        variant: usize,
        template: &RoomTemplate,
        position: Vec3,
        spacing: f32,
    ) -> Entity {
        let half = template.half_extent;
        // Walkway from each door to the midpoint between grid cells
        let gap = (spacing / 2.0 - half).max(0.0);
        let visuals = self.world.get_resource::<RoomVisuals>().cloned();
        let floor_mesh = self
            .world
            .get_resource_mut::<Assets<Mesh>>()
            .map(|mut meshes| meshes.add(Cuboid::new(half * 2.0, 0.2, half * 2.0)));
        let floor_material = self.world.get_resource_mut::<Assets<StandardMaterial>>().map(
            |mut materials| {
                let (r, g, b) = template.floor_color;
                materials.add(Color::srgb(r, g, b))
            },
        );

        let mut room = self.world.spawn((
            DungeonRoom,
            Room {
                kind,
                variant,
                half_extent: half,
                cleared: false,
                item_spots: template
                    .item_spots
                    .iter()
                    .map(|&(x, y, z)| Vec3::new(x, y, z))
                    .collect(),
            },
            Name::new(format!("{} room", template.name)),
            Transform::from_translation(position),
            Visibility::default(),
        ));

        room.with_children(|parent| {
            // Floor
            let mut floor = parent.spawn((
                Transform::from_xyz(0.0, -0.1, 0.0),
                Visibility::default(),
                Collider::cuboid(half, 0.1, half),
            ));
            if let (Some(mesh), Some(material)) = (floor_mesh, floor_material) {
                floor.insert((Mesh3d(mesh), MeshMaterial3d(material)));
            }
            if template.walkable {
                floor.insert(NavSurface);
            }

            // One door per side
            for facing in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
                let offset = facing * half;
                let rotation = if facing.x != 0.0 {
                    Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)
                } else {
                    Quat::IDENTITY
                };
                let mut door = parent.spawn((
                    Door {
                        current_room_type: kind,
                        connect_room_type: None,
                        facing,
                        world_position: position + offset,
                        adjoining: false,
                        open: false,
                    },
                    Transform::from_translation(offset + Vec3::Y * DOOR_HEIGHT / 2.0)
                        .with_rotation(rotation),
                    Visibility::default(),
                    Collider::cuboid(DOOR_WIDTH / 2.0, DOOR_HEIGHT / 2.0, DOOR_THICKNESS / 2.0),
                ));
                if let Some(visuals) = &visuals {
                    door.insert((
                        Mesh3d(visuals.door_mesh.clone()),
                        MeshMaterial3d(visuals.sealed_door.clone()),
                    ));
                }

                if gap > 0.0 {
                    parent.spawn((
                        Transform::from_translation(offset + facing * gap / 2.0 - Vec3::Y * 0.1)
                            .with_rotation(rotation),
                        Collider::cuboid(DOOR_WIDTH / 2.0, 0.1, gap / 2.0),
                    ));
                }
            }

            if template.portal {
                let mut portal = parent.spawn((
                    Portal::default(),
                    Transform::from_xyz(0.0, 0.05, 0.0),
                    Visibility::Hidden,
                ));
                if let Some(visuals) = &visuals {
                    portal.insert((
                        Mesh3d(visuals.portal_mesh.clone()),
                        MeshMaterial3d(visuals.portal_material.clone()),
                    ));
                }
            }
        });

        room.id()
    }
}

impl DungeonHost for WorldHost<'_> {
    type Room = Entity;
    type Door = Entity;

    fn despawn_rooms(&mut self) {
        let rooms: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<DungeonRoom>>()
            .iter(self.world)
            .collect();
        let count = rooms.len();
        for room in rooms {
            if let Ok(entity) = self.world.get_entity_mut(room) {
                entity.despawn_recursive();
            }
        }
        debug!("Despawned {} rooms", count);
    }

    fn clear_navigation(&mut self) {
        self.world.send_event(NavigationCleared);
    }

    fn spawn_room(&mut self, kind: RoomKind, variant: usize, position: Vec3) -> Option<Entity> {
        let config = self.world.get_resource::<DungeonConfig>()?;
        let spacing = config.room_spacing as f32;
        let template = config.template(kind, variant)?.clone();
        let room = self.spawn_from_template(kind, variant, &template, position, spacing);
        debug!("Spawned {} room at {}", template.name, position);
        Some(room)
    }

    fn doors(&mut self) -> Vec<DoorSample<Entity>> {
        let mut query = self.world.query::<(Entity, &Door, Option<&Parent>)>();
        let world: &World = self.world;
        query
            .iter(world)
            .map(|(entity, door, parent)| DoorSample {
                door: entity,
                position: door.world_position,
                owner_kind: parent
                    .and_then(|p| world.get::<Room>(p.get()))
                    .map(|room| room.kind),
            })
            .collect()
    }

    fn connect_door(&mut self, door: Entity, kind: RoomKind) {
        if let Some(mut door) = self.world.get_mut::<Door>(door) {
            door.connect_room_type = Some(kind);
        }
    }

    fn probe_door(&mut self, door: Entity) {
        if let Ok(mut entity) = self.world.get_entity_mut(door) {
            entity.insert(DoorProbe);
        }
    }

    fn refresh_door(&mut self, door: Entity) {
        if let Ok(mut entity) = self.world.get_entity_mut(door) {
            entity.insert(DoorVisualDirty);
        }
    }

    fn bake_navigation(&mut self, room: Entity) {
        for child in self.children_of(room) {
            if self.world.get::<NavSurface>(child).is_some() {
                self.world.send_event(NavBakeRequest { room, surface: child });
            }
        }
    }

    fn open_room(&mut self, room: Entity) {
        match self.world.get_mut::<Room>(room) {
            Some(mut state) if !state.cleared => state.cleared = true,
            Some(_) => return,
            None => {
                warn!("Cannot open {:?}: not a room", room);
                return;
            }
        }

        let mut opened = Vec::new();
        for child in self.children_of(room) {
            let Some(door) = self.world.get::<Door>(child) else {
                continue;
            };
            if door.adjoining && !door.open {
                opened.push((door.world_position, door.facing));
                self.sink_door(child);
            }
        }

        // The neighbour's door on the other side of each passage opens too
        let reach = self
            .world
            .get_resource::<DungeonConfig>()
            .map_or(0.0, |config| config.door_probe_range);
        let facing_doors: Vec<Entity> = self
            .world
            .query::<(Entity, &Door)>()
            .iter(self.world)
            .filter(|(_, door)| {
                !door.open
                    && opened.iter().any(|(position, facing)| {
                        door.facing.dot(*facing) < -0.9 && door.world_position.distance(*position) <= reach
                    })
            })
            .map(|(entity, _)| entity)
            .collect();
        for door in facing_doors {
            self.sink_door(door);
        }
    }

    fn portal_on(&mut self, room: Entity) {
        for child in self.children_of(room) {
            let Some(mut portal) = self.world.get_mut::<Portal>(child) else {
                continue;
            };
            portal.active = true;
            self.world.entity_mut(child).insert(Visibility::Visible);
            info!("Portal opened in {:?}", room);
        }
    }
}
