//! UI module - menus, HUD, fade screen, and popups.

mod fade;
mod hud;
mod plugin;
mod popup;

pub use fade::{FadeScreen, FadeState};
pub use hud::{bar_fraction, gold_label};
pub use plugin::UiPlugin;
pub use popup::Popups;
