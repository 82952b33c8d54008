//! Items module - item data, world pickups, and room stocking.

mod components;
mod data;
mod interaction;
mod plugin;
mod stocking;

pub use components::*;
pub use data::{weighted_pick, ItemData, ItemRegistry, ItemTier};
pub use plugin::ItemPlugin;
pub use stocking::{shop_stock, treasure_stock, StockEntry};
