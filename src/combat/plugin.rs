//! Combat plugin - health, damage and death.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - turns impacts into damage and removes what dies.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
