//! Transform tweening used for door slides and camera follow.

use bevy::prelude::*;

/// Distance below which a translation tween snaps to its target.
const SETTLE_DISTANCE: f32 = 0.001;

/// Component for smooth transform interpolation.
#[derive(Component, Debug, Clone)]
pub struct SmoothTransform {
    /// Target translation (None = don't animate)
    pub target_translation: Option<Vec3>,
    /// Target rotation (None = don't animate)
    pub target_rotation: Option<Quat>,
    /// Interpolation speed multiplier (higher = faster)
    pub translation_speed: f32,
    pub rotation_speed: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            target_rotation: None,
            translation_speed: 12.0,
            rotation_speed: 12.0,
        }
    }
}

impl SmoothTransform {
    pub fn new(translation_speed: f32, rotation_speed: f32) -> Self {
        Self {
            translation_speed,
            rotation_speed,
            ..default()
        }
    }

    /// Slide toward `target` at `speed`.
    pub fn slide_to(target: Vec3, speed: f32) -> Self {
        Self {
            target_translation: Some(target),
            translation_speed: speed,
            ..default()
        }
    }
}

/// One exponential step from `current` to `target`; snaps once close enough.
pub fn approach(current: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    let t = (speed * dt).clamp(0.0, 1.0);
    let next = current.lerp(target, t);
    if next.distance(target) < SETTLE_DISTANCE {
        target
    } else {
        next
    }
}

/// System that interpolates transforms toward their targets.
///
/// Translation targets are dropped once reached so finished tweens stop
/// touching the transform.
pub fn update_smooth_transforms(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &mut SmoothTransform)>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut smooth) in query.iter_mut() {
        if let Some(target) = smooth.target_translation {
            transform.translation = approach(transform.translation, target, smooth.translation_speed, dt);
            if transform.translation == target {
                smooth.target_translation = None;
            }
        }

        if let Some(target) = smooth.target_rotation {
            let t = (smooth.rotation_speed * dt).min(1.0);
            transform.rotation = transform.rotation.slerp(target, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_moves_part_way() {
        let next = approach(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0, 0.25);
        assert!((next.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn approach_snaps_when_close() {
        let target = Vec3::new(0.0, -3.0, 0.0);
        let next = approach(Vec3::new(0.0, -2.9995, 0.0), target, 1.0, 0.1);
        assert_eq!(next, target);
    }

    #[test]
    fn large_step_lands_on_target() {
        let target = Vec3::ONE;
        assert_eq!(approach(Vec3::ZERO, target, 100.0, 1.0), target);
    }
}
