//! Boss components and the pattern-selection brain.

use bevy::prelude::*;
use rand::Rng;

use super::data::{BossDefinition, PatternDefinition};

/// Marker component for the floor boss.
#[derive(Component)]
pub struct Boss;

/// Top-level movement mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BossMode {
    #[default]
    Grounded,
    /// Airborne phase; no behaviour yet.
    Flying,
}

/// State machine while grounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroundState {
    /// Waiting for a pattern to become available.
    #[default]
    Patrol,
    Track,
    /// Running a pattern.
    Attack,
    Groggy,
    Sleep,
}

/// A pattern currently being performed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunningPattern {
    pub index: usize,
    pub elapsed: f32,
}

/// Decision state for a boss.
#[derive(Component, Debug)]
pub struct BossBrain {
    pub mode: BossMode,
    pub ground: GroundState,
    /// Fires every think interval
    pub think: Timer,
    pub running: Option<RunningPattern>,
    /// Remaining cooldown per pattern, in seconds
    pub cooldowns: Vec<f32>,
}

impl BossBrain {
    pub fn new(definition: &BossDefinition) -> Self {
        Self {
            mode: BossMode::Grounded,
            ground: GroundState::Patrol,
            think: Timer::from_seconds(definition.think_interval, TimerMode::Repeating),
            running: None,
            cooldowns: vec![0.0; definition.patterns.len()],
        }
    }

    /// Count every pattern cooldown down by `dt`.
    pub fn tick_cooldowns(&mut self, dt: f32) {
        for cooldown in &mut self.cooldowns {
            *cooldown = (*cooldown - dt).max(0.0);
        }
    }

    /// One brain update. Returns the pattern that was started, if any.
    ///
    /// Only a grounded boss in Patrol picks patterns; a new pattern replaces
    /// whatever was running.
    pub fn think(&mut self, patterns: &[PatternDefinition], rng: &mut impl Rng) -> Option<usize> {
        if self.mode != BossMode::Grounded || self.ground != GroundState::Patrol {
            return None;
        }
        let index = select_pattern(patterns, &self.cooldowns, rng)?;
        self.ground = GroundState::Attack;
        self.running = Some(RunningPattern { index, elapsed: 0.0 });
        Some(index)
    }

    /// Advance the running pattern. Returns its index once its duration is up.
    pub fn advance_pattern(&mut self, dt: f32, patterns: &[PatternDefinition]) -> Option<usize> {
        let running = self.running.as_mut()?;
        running.elapsed += dt;
        let duration = patterns.get(running.index).map_or(0.0, |p| p.duration);
        (running.elapsed >= duration).then_some(running.index)
    }

    /// Finish the running pattern: back to Patrol and start its cooldown.
    pub fn end_pattern(&mut self, patterns: &[PatternDefinition]) {
        if let Some(running) = self.running.take() {
            if let (Some(cooldown), Some(pattern)) = (
                self.cooldowns.get_mut(running.index),
                patterns.get(running.index),
            ) {
                *cooldown = pattern.cooldown;
            }
        }
        self.ground = GroundState::Patrol;
    }
}

/// Weighted random choice among patterns whose cooldown has elapsed.
///
/// Patterns with a non-positive weight never get picked. Returns `None`
/// when nothing is ready.
pub fn select_pattern(
    patterns: &[PatternDefinition],
    cooldowns: &[f32],
    rng: &mut impl Rng,
) -> Option<usize> {
    let ready = |i: usize| cooldowns.get(i).copied().unwrap_or(0.0) <= 0.0;
    let total: f32 = patterns
        .iter()
        .enumerate()
        .filter(|(i, p)| ready(*i) && p.weight > 0.0)
        .map(|(_, p)| p.weight)
        .sum();
    if total <= 0.0 {
        return None;
    }

    let mut roll = rng.gen_range(0.0..total);
    let mut last = None;
    for (i, pattern) in patterns.iter().enumerate() {
        if !ready(i) || pattern.weight <= 0.0 {
            continue;
        }
        if roll < pattern.weight {
            return Some(i);
        }
        roll -= pattern.weight;
        last = Some(i);
    }
    // Float rounding can leave a sliver past the last bucket
    last
}

/// Sent when the boss starts a pattern.
#[derive(Event, Debug, Clone)]
pub struct BossPatternStarted {
    pub boss: Entity,
    pub pattern: usize,
    pub name: String,
}

/// Ends a boss pattern. Sent when the duration runs out; may also be sent by
/// animation hooks to cut a pattern short.
#[derive(Event, Debug, Clone, Copy)]
pub struct BossPatternFinished {
    pub boss: Entity,
    pub pattern: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::data::PatternKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pattern(name: &str, weight: f32, cooldown: f32, duration: f32) -> PatternDefinition {
        PatternDefinition {
            name: name.to_string(),
            kind: PatternKind::Normal,
            weight,
            cooldown,
            duration,
        }
    }

    fn definition(patterns: Vec<PatternDefinition>) -> BossDefinition {
        BossDefinition {
            patterns,
            ..BossDefinition::default()
        }
    }

    #[test]
    fn only_ready_patterns_are_selected() {
        let patterns = vec![pattern("a", 1.0, 1.0, 1.0), pattern("b", 1.0, 1.0, 1.0)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(select_pattern(&patterns, &[5.0, 0.0], &mut rng), Some(1));
        }
        assert_eq!(select_pattern(&patterns, &[5.0, 0.5], &mut rng), None);
    }

    #[test]
    fn zero_weight_is_never_selected() {
        let patterns = vec![pattern("never", 0.0, 0.0, 1.0), pattern("always", 2.0, 0.0, 1.0)];
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(select_pattern(&patterns, &[0.0, 0.0], &mut rng), Some(1));
        }
    }

    #[test]
    fn weights_bias_selection() {
        let patterns = vec![pattern("rare", 1.0, 0.0, 1.0), pattern("common", 9.0, 0.0, 1.0)];
        let mut rng = StdRng::seed_from_u64(5);
        let common = (0..1000)
            .filter(|_| select_pattern(&patterns, &[0.0, 0.0], &mut rng) == Some(1))
            .count();
        assert!(common > 800, "common picked {common} times");
    }

    #[test]
    fn think_starts_pattern_from_patrol_only() {
        let def = definition(vec![pattern("a", 1.0, 2.0, 1.0)]);
        let mut brain = BossBrain::new(&def);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(brain.think(&def.patterns, &mut rng), Some(0));
        assert_eq!(brain.ground, GroundState::Attack);
        assert_eq!(brain.running.map(|r| r.index), Some(0));

        // Already attacking
        assert_eq!(brain.think(&def.patterns, &mut rng), None);
    }

    #[test]
    fn flying_boss_does_not_think() {
        let def = definition(vec![pattern("a", 1.0, 0.0, 1.0)]);
        let mut brain = BossBrain::new(&def);
        brain.mode = BossMode::Flying;
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(brain.think(&def.patterns, &mut rng), None);
        assert_eq!(brain.ground, GroundState::Patrol);
    }

    #[test]
    fn pattern_runs_for_duration_then_cools_down() {
        let def = definition(vec![pattern("a", 1.0, 2.0, 1.0)]);
        let mut brain = BossBrain::new(&def);
        let mut rng = StdRng::seed_from_u64(0);
        brain.think(&def.patterns, &mut rng);

        assert_eq!(brain.advance_pattern(0.6, &def.patterns), None);
        assert_eq!(brain.advance_pattern(0.6, &def.patterns), Some(0));

        brain.end_pattern(&def.patterns);
        assert_eq!(brain.ground, GroundState::Patrol);
        assert!(brain.running.is_none());
        assert_eq!(brain.cooldowns[0], 2.0);

        // On cooldown, nothing else to pick
        assert_eq!(brain.think(&def.patterns, &mut rng), None);
        brain.tick_cooldowns(2.5);
        assert_eq!(brain.cooldowns[0], 0.0);
        assert_eq!(brain.think(&def.patterns, &mut rng), Some(0));
    }

    #[test]
    fn end_pattern_without_running_returns_to_patrol() {
        let def = definition(vec![pattern("a", 1.0, 2.0, 1.0)]);
        let mut brain = BossBrain::new(&def);
        brain.ground = GroundState::Attack;
        brain.end_pattern(&def.patterns);
        assert_eq!(brain.ground, GroundState::Patrol);
        assert_eq!(brain.cooldowns[0], 0.0);
    }
}
