//! Combat module - health, damage from impacts, death.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
