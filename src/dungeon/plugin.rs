//! Dungeon plugin - floor generation, room population, and door state.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::archetype::RoomKind;
use super::components::{
    ClearRoomRequest, Door, DoorProbe, DoorVisual, DoorVisualDirty, LayoutReady, NavBakeRequest,
    NavigationCleared,
};
use super::config::{load_dungeon_config, DungeonConfig};
use super::layout::{generate_layout, Stage};
use super::populator::{DungeonPopulator, PipelineStage};
use super::progression::{
    abandon_run, advance_stage, enter_portal, regenerate_after_fade, request_first_floor,
    track_room_progress, PendingFloor,
};
use super::spawning::{setup_room_visuals, RoomVisuals, WorldHost};
use crate::core::{DungeonReady, GameState};

/// Dungeon plugin - turns layouts into rooms and drives floor progression.
pub struct DungeonPlugin;

impl Plugin for DungeonPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Stage>()
            .init_resource::<PendingFloor>()
            .add_event::<LayoutReady>()
            .add_event::<ClearRoomRequest>()
            .add_event::<NavBakeRequest>()
            .add_event::<NavigationCleared>()
            .add_systems(
                Startup,
                (load_dungeon_config, setup_dungeon_state, setup_room_visuals).chain(),
            )
            .add_systems(OnEnter(GameState::InGame), request_first_floor)
            .add_systems(OnEnter(GameState::MainMenu), abandon_run)
            .add_systems(
                Update,
                (
                    advance_stage,
                    regenerate_after_fade,
                    generate_layout,
                    drive_population,
                    probe_doors,
                    refresh_door_visuals,
                    track_room_progress,
                    enter_portal,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

/// The populator for the current floor and the generator's RNG.
#[derive(Resource)]
pub struct DungeonState {
    pub populator: DungeonPopulator<Entity>,
    pub rng: StdRng,
}

impl DungeonState {
    pub fn new(config: &DungeonConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            populator: DungeonPopulator::new(config.population_settings()),
            rng,
        }
    }
}

fn setup_dungeon_state(mut commands: Commands, config: Res<DungeonConfig>) {
    commands.insert_resource(DungeonState::new(&config));
}

/// Feed new layouts to the populator and run one pipeline stage per frame.
///
/// Exclusive so rooms spawned by one stage are visible to the next without a
/// command flush. Clear requests are only honoured while the populator is
/// idle, since their indices refer to the finished floor.
pub fn drive_population(world: &mut World) {
    let layouts: Vec<LayoutReady> = world.resource_mut::<Events<LayoutReady>>().drain().collect();
    let clears: Vec<ClearRoomRequest> = world
        .resource_mut::<Events<ClearRoomRequest>>()
        .drain()
        .collect();
    let stage_level = world.get_resource::<Stage>().map_or(1, |stage| stage.0);

    let ready = world.resource_scope(|world, mut state: Mut<DungeonState>| {
        let state = &mut *state;

        for layout in &layouts {
            if let Err(e) = state.populator.begin(&layout.slots) {
                warn!("Ignoring layout with {} slots: {}", layout.slots.len(), e);
            }
        }

        let mut host = WorldHost::new(world);
        if state.populator.is_busy() {
            let next = state.populator.advance(&mut host, &mut state.rng, stage_level);
            if next == PipelineStage::Idle {
                let populator = &state.populator;
                return Some(DungeonReady {
                    entry: populator
                        .find(RoomKind::Entry)
                        .map_or(Vec3::ZERO, |room| room.position),
                    boss_room: populator.find(RoomKind::Boss).map(|room| room.handle),
                    shop_room: populator.find(RoomKind::Shop).map(|room| room.handle),
                    treasure_room: populator.find(RoomKind::Treasure).map(|room| room.handle),
                });
            }
            if !clears.is_empty() {
                debug!("Dropping {} clear requests during population", clears.len());
            }
            return None;
        }

        for request in &clears {
            match state.populator.clear_room(request.index, &mut host) {
                Ok(()) => info!("Cleared active room {}", request.index),
                Err(e) => warn!("Cannot clear room: {}", e),
            }
        }
        None
    });

    if let Some(ready) = ready {
        world.send_event(ready);
    }
}

/// Cast each pending door's ray to find adjoining geometry.
fn probe_doors(
    mut commands: Commands,
    rapier_context: Query<&RapierContext>,
    config: Res<DungeonConfig>,
    mut doors: Query<(Entity, &mut Door), With<DoorProbe>>,
) {
    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    for (entity, mut door) in doors.iter_mut() {
        // Start just outside the panel, at chest height
        let origin = door.world_position + Vec3::Y * 1.5 + door.facing * 0.5;
        door.adjoining = context
            .cast_ray(
                origin,
                door.facing,
                config.door_probe_range,
                true,
                QueryFilter::default().exclude_collider(entity),
            )
            .is_some();
        commands.entity(entity).remove::<DoorProbe>();
    }
}

/// Pick each door's look once its probe has finished.
fn refresh_door_visuals(
    mut commands: Commands,
    visuals: Option<Res<RoomVisuals>>,
    mut doors: Query<
        (Entity, &Door, Option<&mut MeshMaterial3d<StandardMaterial>>),
        (With<DoorVisualDirty>, Without<DoorProbe>),
    >,
) {
    for (entity, door, material) in doors.iter_mut() {
        let visual = match (door.adjoining, door.connect_room_type) {
            (true, Some(kind)) => DoorVisual::Passage(kind),
            _ => DoorVisual::Sealed,
        };

        if let (Some(visuals), Some(mut material)) = (&visuals, material) {
            material.0 = match visual {
                DoorVisual::Passage(kind) => visuals
                    .passage_doors
                    .get(&kind)
                    .cloned()
                    .unwrap_or_else(|| visuals.sealed_door.clone()),
                DoorVisual::Sealed => visuals.sealed_door.clone(),
            };
        }

        commands
            .entity(entity)
            .insert(visual)
            .remove::<DoorVisualDirty>();
    }
}
