//! Boss behaviour systems.

use bevy::prelude::*;

use super::components::{Boss, BossBrain, BossPatternFinished, BossPatternStarted, GroundState};
use super::data::BossDefinition;
use crate::player::Player;

/// End patterns whose finish event arrived.
///
/// Stale events for a pattern that is no longer running are ignored.
pub fn handle_pattern_finished(
    mut finished: EventReader<BossPatternFinished>,
    definition: Res<BossDefinition>,
    mut bosses: Query<&mut BossBrain, With<Boss>>,
) {
    for event in finished.read() {
        let Ok(mut brain) = bosses.get_mut(event.boss) else {
            continue;
        };
        if brain.running.is_some_and(|r| r.index == event.pattern) {
            brain.end_pattern(&definition.patterns);
            debug!("Boss pattern {} ended", event.pattern);
        }
    }
}

/// Tick cooldowns and, every think interval, let patrolling bosses pick a pattern.
pub fn boss_think(
    time: Res<Time>,
    definition: Res<BossDefinition>,
    mut bosses: Query<(Entity, &mut BossBrain), With<Boss>>,
    mut started: EventWriter<BossPatternStarted>,
) {
    let mut rng = rand::thread_rng();

    for (entity, mut brain) in bosses.iter_mut() {
        brain.tick_cooldowns(time.delta_secs());
        brain.think.tick(time.delta());
        if !brain.think.just_finished() {
            continue;
        }

        if let Some(index) = brain.think(&definition.patterns, &mut rng) {
            let name = definition.patterns[index].name.clone();
            info!("Boss starts pattern {}", name);
            started.send(BossPatternStarted {
                boss: entity,
                pattern: index,
                name,
            });
        }
    }
}

/// Run active patterns and signal when their duration is up.
pub fn run_patterns(
    time: Res<Time>,
    definition: Res<BossDefinition>,
    mut bosses: Query<(Entity, &mut BossBrain), With<Boss>>,
    mut finished: EventWriter<BossPatternFinished>,
) {
    for (entity, mut brain) in bosses.iter_mut() {
        if let Some(index) = brain.advance_pattern(time.delta_secs(), &definition.patterns) {
            brain.end_pattern(&definition.patterns);
            finished.send(BossPatternFinished {
                boss: entity,
                pattern: index,
            });
        }
    }
}

/// Turn attacking bosses toward the player.
pub fn face_player_while_attacking(
    player_query: Query<&GlobalTransform, (With<Player>, Without<Boss>)>,
    mut bosses: Query<(&mut Transform, &GlobalTransform, &BossBrain), (With<Boss>, Without<Player>)>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let player_pos = player.translation();

    for (mut transform, global, brain) in bosses.iter_mut() {
        if brain.ground != GroundState::Attack {
            continue;
        }
        // Horizontal only; rooms are never rotated so local yaw equals world yaw
        let offset = player_pos - global.translation();
        let flat = Vec2::new(offset.x, offset.z);
        if flat.length_squared() > 0.01 {
            transform.rotation = Quat::from_rotation_y(f32::atan2(-flat.x, -flat.y));
        }
    }
}
