//! Floor progression: clearing rooms, portals, and moving to the next stage.

use bevy::prelude::*;

use super::components::{ClearRoomRequest, Portal, Room};
use super::layout::Stage;
use super::plugin::DungeonState;
use super::spawning::WorldHost;
use crate::core::{DungeonReady, FloorCompleted, RegenerateDungeon};
use crate::player::Player;
use crate::ui::{FadeScreen, FadeState};

/// Distance at which the player steps into an active portal.
const PORTAL_RADIUS: f32 = 1.5;

/// A floor was completed and the next one waits for the fade out.
#[derive(Resource, Default)]
pub struct PendingFloor(pub bool);

/// Request the first floor when gameplay starts.
///
/// Resuming from pause re-enters gameplay too; an existing floor is kept.
pub fn request_first_floor(state: Res<DungeonState>, mut requests: EventWriter<RegenerateDungeon>) {
    if state.populator.is_busy() || !state.populator.placements().is_empty() {
        return;
    }
    requests.send(RegenerateDungeon);
}

/// Tear the current run down when returning to the main menu.
///
/// The next "Enter Dungeon" then starts over on a fresh first floor.
pub fn abandon_run(world: &mut World) {
    if world.contains_resource::<DungeonState>() {
        world.resource_scope(|world, mut state: Mut<DungeonState>| {
            state.populator.reset(&mut WorldHost::new(world));
        });
    }
    world.insert_resource(Stage::default());
    world.insert_resource(PendingFloor::default());
    info!("Run abandoned, back to stage 1");
}

/// Bump the stage and fade out when a floor is completed.
pub fn advance_stage(
    mut completed: EventReader<FloorCompleted>,
    mut stage: ResMut<Stage>,
    mut pending: ResMut<PendingFloor>,
    mut fade: ResMut<FadeScreen>,
) {
    if completed.read().count() == 0 || pending.0 {
        return;
    }
    stage.0 += 1;
    pending.0 = true;
    fade.start_fade_out();
    info!("Floor completed, advancing to stage {}", stage.0);
}

/// Once the screen is black, ask for the next floor.
pub fn regenerate_after_fade(
    mut pending: ResMut<PendingFloor>,
    fade: Res<FadeScreen>,
    mut requests: EventWriter<RegenerateDungeon>,
) {
    if pending.0 && fade.state() == FadeState::Fade {
        pending.0 = false;
        requests.send(RegenerateDungeon);
    }
}

/// Clear the active room the player is standing in.
///
/// Skipped on the frame a floor becomes ready: the player still stands where
/// the previous floor left them until they are moved to the new entry.
pub fn track_room_progress(
    state: Res<DungeonState>,
    mut ready: EventReader<DungeonReady>,
    rooms: Query<&Room>,
    player_query: Query<&Transform, With<Player>>,
    mut clears: EventWriter<ClearRoomRequest>,
) {
    if ready.read().count() > 0 || state.populator.is_busy() {
        return;
    }
    let Ok(player) = player_query.get_single() else {
        return;
    };

    for (index, placement) in state.populator.active_rooms().enumerate() {
        let Ok(room) = rooms.get(placement.handle) else {
            continue;
        };
        if !room.cleared && room.contains(placement.position, player.translation) {
            clears.send(ClearRoomRequest { index });
            return;
        }
    }
}

/// Complete the floor when the player steps onto an active portal.
pub fn enter_portal(
    mut portals: Query<(&GlobalTransform, &mut Portal)>,
    player_query: Query<&Transform, With<Player>>,
    mut completed: EventWriter<FloorCompleted>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };

    for (transform, mut portal) in portals.iter_mut() {
        if !portal.active {
            continue;
        }
        let offset = transform.translation() - player.translation;
        if Vec2::new(offset.x, offset.z).length() <= PORTAL_RADIUS {
            portal.active = false;
            completed.send(FloorCompleted);
        }
    }
}
