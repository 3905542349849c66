//! Weapons module - weapon table, weapons carried by characters, projectiles.

mod components;
mod data;
mod error;
mod plugin;
mod projectile;
mod systems;

pub use components::*;
pub use data::{load_registry, parse_weapon, WeaponRegistry, WEAPONS_DIR};
pub use error::WeaponError;
pub use plugin::WeaponsPlugin;
pub use projectile::{spawn_projectile, Lifetime, Projectile, ProjectileAssets};
pub use systems::{attack_char_event, init_weapon, spread_direction, try_reload_weapon, WeaponAssets};
