//! Weapons plugin - weapon table, fire loop and projectiles.

use bevy::prelude::*;

use super::data::{load_weapon_definitions, WeaponRegistry};
use super::projectile;
use super::systems;
use crate::core::SimulationSet;

/// Weapons plugin - handles weapon data, firing and projectile lifetimes.
pub struct WeaponsPlugin;

impl Plugin for WeaponsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeaponRegistry>()
            .add_systems(
                Startup,
                (
                    load_weapon_definitions,
                    systems::setup_weapon_assets,
                    projectile::setup_projectile_assets,
                ),
            )
            .add_systems(
                FixedUpdate,
                (
                    projectile::handle_projectile_collisions,
                    projectile::expire_projectiles,
                )
                    .chain()
                    .in_set(SimulationSet::Impacts),
            );

        systems::setup_weapon_systems(app);
    }
}
