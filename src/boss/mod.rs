//! Boss module - floor boss data, pattern brain, and spawning.

mod ai;
mod components;
mod data;
mod plugin;
mod spawning;

pub use components::*;
pub use data::{BossDefinition, PatternDefinition, PatternKind};
pub use plugin::BossPlugin;
