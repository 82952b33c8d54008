//! Boss definition loading from RON.

use bevy::prelude::*;
use serde::Deserialize;

use crate::dungeon::load_ron;

const BOSS_PATH: &str = "assets/data/boss.ron";

/// Broad category of a pattern.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatternKind {
    /// Regular attack
    #[default]
    Normal,
    /// Signature attack
    Special,
}

/// One selectable boss attack.
#[derive(Deserialize, Clone, Debug)]
pub struct PatternDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: PatternKind,
    /// Relative selection weight among ready patterns
    pub weight: f32,
    /// Seconds before the pattern can be selected again
    pub cooldown: f32,
    /// Seconds the pattern runs
    pub duration: f32,
}

/// Boss definition loaded from `assets/data/boss.ron`.
#[derive(Resource, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BossDefinition {
    pub name: String,
    /// Seconds between brain updates
    pub think_interval: f32,
    pub half_height: f32,
    pub radius: f32,
    pub patterns: Vec<PatternDefinition>,
}

impl Default for BossDefinition {
    fn default() -> Self {
        Self {
            name: "Warden".to_string(),
            think_interval: 0.1,
            half_height: 1.2,
            radius: 0.8,
            patterns: vec![
                PatternDefinition {
                    name: "Sweep".to_string(),
                    kind: PatternKind::Normal,
                    weight: 3.0,
                    cooldown: 2.0,
                    duration: 1.5,
                },
                PatternDefinition {
                    name: "Slam".to_string(),
                    kind: PatternKind::Normal,
                    weight: 2.0,
                    cooldown: 4.0,
                    duration: 2.0,
                },
                PatternDefinition {
                    name: "Howl".to_string(),
                    kind: PatternKind::Special,
                    weight: 1.0,
                    cooldown: 10.0,
                    duration: 3.0,
                },
            ],
        }
    }
}

impl BossDefinition {
    /// Load from disk, falling back to the built-in definition.
    pub fn load() -> Self {
        match load_ron::<BossDefinition>(BOSS_PATH) {
            Ok(definition) => {
                info!(
                    "Loaded boss definition: {} ({} patterns)",
                    definition.name,
                    definition.patterns.len()
                );
                definition
            }
            Err(e) => {
                warn!("{}. Using default boss definition.", e);
                Self::default()
            }
        }
    }
}

/// Insert the boss definition resource.
pub fn load_boss_definition(mut commands: Commands) {
    commands.insert_resource(BossDefinition::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_definition() {
        let text = r#"(
            name: "Gatekeeper",
            patterns: [
                (name: "Bite", weight: 1.0, cooldown: 0.5, duration: 1.0),
                (name: "Roar", kind: Special, weight: 2.0, cooldown: 5.0, duration: 2.0),
            ],
        )"#;
        let definition: BossDefinition = ron::from_str(text).unwrap();
        assert_eq!(definition.name, "Gatekeeper");
        assert_eq!(definition.think_interval, 0.1);
        assert_eq!(definition.patterns.len(), 2);
        assert_eq!(definition.patterns[0].kind, PatternKind::Normal);
        assert_eq!(definition.patterns[1].kind, PatternKind::Special);
    }
}
