//! TDS - gameplay for a top-down shooter in Bevy.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, simulation ordering
//! - **Player**: Character controller, stamina, camera boom, cursor
//! - **Weapons**: Weapon data table, fire-rate loop, reload, projectiles
//! - **Combat**: Health and damage from projectile impacts
//! - **World**: The arena and its targets
//! - **UI**: Menus and HUD
//!
//! Locomotion, weapons and physics all run in `FixedUpdate`; input and
//! presentation run in `Update`.

pub mod combat;
pub mod core;
pub mod player;
pub mod ui;
pub mod weapons;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct TdsPlugin;

impl Plugin for TdsPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Weapon and projectile systems
            .add_plugins(weapons::WeaponsPlugin)

            // Damage handling
            .add_plugins(combat::CombatPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
