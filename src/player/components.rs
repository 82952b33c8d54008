//! Player-related components and configuration.

use bevy::prelude::*;
use serde::Deserialize;

use crate::dungeon::load_ron;

const CONFIG_PATH: &str = "assets/data/player.ron";

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Health, vitality, and money.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerVitals {
    pub hp: f32,
    pub max_hp: f32,
    pub vitality: f32,
    pub max_vitality: f32,
    pub gold: u32,
}

impl PlayerVitals {
    pub fn new(max_hp: f32, max_vitality: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            vitality: max_vitality,
            max_vitality,
            gold: 0,
        }
    }

    /// Subtract damage, never going below zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Tracks player movement state for physics.
#[derive(Component, Default)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
}

/// Jump, fall, and roll timeouts.
///
/// Grounded frames reset the fall timeout and count the jump timeout down.
/// Airborne frames reset the jump timeout and count the fall timeout down;
/// once it runs out the player is in free fall.
#[derive(Component, Debug, Clone)]
pub struct LocomotionTimers {
    jump_timeout: f32,
    fall_timeout: f32,
    roll_timeout: f32,
    jump: f32,
    fall: f32,
    roll: f32,
    rolling: bool,
    free_fall: bool,
}

impl LocomotionTimers {
    pub fn new(jump_timeout: f32, fall_timeout: f32, roll_timeout: f32) -> Self {
        Self {
            jump_timeout,
            fall_timeout,
            roll_timeout,
            jump: jump_timeout,
            fall: fall_timeout,
            roll: -1.0,
            rolling: false,
            free_fall: false,
        }
    }

    pub fn can_jump(&self, grounded: bool) -> bool {
        grounded && self.jump <= 0.0
    }

    pub fn can_roll(&self, grounded: bool) -> bool {
        grounded && self.roll <= 0.0 && !self.rolling
    }

    pub fn start_roll(&mut self) {
        self.roll = self.roll_timeout;
        self.rolling = true;
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    pub fn is_free_falling(&self) -> bool {
        self.free_fall
    }

    /// Advance every timeout by `dt`.
    pub fn tick(&mut self, grounded: bool, dt: f32) {
        if grounded {
            self.fall = self.fall_timeout;
            self.free_fall = false;
            if self.jump >= 0.0 {
                self.jump -= dt;
            }
        } else {
            self.jump = self.jump_timeout;
            if self.fall >= 0.0 {
                self.fall -= dt;
            } else {
                self.free_fall = true;
            }
        }

        if self.rolling {
            self.roll -= dt;
            if self.roll <= 0.0 {
                self.rolling = false;
            }
        }
    }
}

/// Player tuning loaded from `assets/data/player.ron`.
#[derive(Resource, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PlayerConfig {
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y-axis for mouse look
    pub invert_y: bool,
    /// Walk speed in units per second
    pub move_speed: f32,
    /// Speed while Shift is held
    pub sprint_speed: f32,
    /// Forward speed during a roll
    pub roll_speed: f32,
    /// Jump velocity
    pub jump_force: f32,
    /// Gravity acceleration
    pub gravity: f32,
    /// Seconds grounded before another jump
    pub jump_timeout: f32,
    /// Seconds airborne before free fall
    pub fall_timeout: f32,
    /// Seconds a roll lasts
    pub roll_timeout: f32,
    pub max_hp: f32,
    pub max_vitality: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.5,
            invert_y: false,
            move_speed: 2.0,
            sprint_speed: 5.335,
            roll_speed: 10.0,
            jump_force: 6.0,
            gravity: 15.0,
            jump_timeout: 0.5,
            fall_timeout: 0.15,
            roll_timeout: 1.0,
            max_hp: 100.0,
            max_vitality: 100.0,
        }
    }
}

impl PlayerConfig {
    /// Load from disk, falling back to defaults.
    pub fn load() -> Self {
        match load_ron::<PlayerConfig>(CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded player config from {}", CONFIG_PATH);
                config
            }
            Err(e) => {
                warn!("{}. Using default player config.", e);
                Self::default()
            }
        }
    }

    pub fn locomotion_timers(&self) -> LocomotionTimers {
        LocomotionTimers::new(self.jump_timeout, self.fall_timeout, self.roll_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timers() -> LocomotionTimers {
        LocomotionTimers::new(0.5, 0.15, 1.0)
    }

    #[test]
    fn jump_waits_for_timeout_after_landing() {
        let mut t = timers();
        assert!(!t.can_jump(true));
        t.tick(true, 0.3);
        assert!(!t.can_jump(true));
        t.tick(true, 0.3);
        assert!(t.can_jump(true));
        assert!(!t.can_jump(false));
    }

    #[test]
    fn airborne_resets_jump_timeout() {
        let mut t = timers();
        t.tick(true, 0.6);
        assert!(t.can_jump(true));
        t.tick(false, 0.01);
        assert!(!t.can_jump(true));
    }

    #[test]
    fn free_fall_after_fall_timeout() {
        let mut t = timers();
        t.tick(false, 0.1);
        assert!(!t.is_free_falling());
        t.tick(false, 0.1);
        assert!(!t.is_free_falling());
        t.tick(false, 0.1);
        assert!(t.is_free_falling());

        t.tick(true, 0.01);
        assert!(!t.is_free_falling());
    }

    #[test]
    fn roll_lasts_its_timeout() {
        let mut t = timers();
        assert!(t.can_roll(true));
        assert!(!t.can_roll(false));

        t.start_roll();
        assert!(t.is_rolling());
        assert!(!t.can_roll(true));

        t.tick(true, 0.6);
        assert!(t.is_rolling());
        t.tick(true, 0.6);
        assert!(!t.is_rolling());
        assert!(t.can_roll(true));
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut vitals = PlayerVitals::new(30.0, 10.0);
        vitals.take_damage(12.0);
        assert_eq!(vitals.hp, 18.0);
        vitals.take_damage(-5.0);
        assert_eq!(vitals.hp, 18.0);
        vitals.take_damage(100.0);
        assert_eq!(vitals.hp, 0.0);
        assert!(vitals.is_dead());
    }

    #[test]
    fn config_parses_partial_ron() {
        let config: PlayerConfig = ron::from_str("(roll_speed: 12.0, max_hp: 80.0)").unwrap();
        assert_eq!(config.roll_speed, 12.0);
        assert_eq!(config.max_hp, 80.0);
        assert_eq!(config.jump_timeout, 0.5);
    }
}
