//! Error types for weapon handling.

use bevy::prelude::Entity;
use thiserror::Error;

/// Reasons a weapon request could not be carried out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeaponError {
    /// No row with this name exists in the weapon table.
    #[error("No weapon named '{0}' in the weapon table")]
    UnknownWeapon(String),

    /// The character is not carrying a weapon.
    #[error("Character {0} has no current weapon")]
    NoCurrentWeapon(Entity),

    /// The current weapon entity no longer exists.
    #[error("Weapon entity {0} is gone")]
    WeaponMissing(Entity),
}
