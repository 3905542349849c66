//! Global events used for cross-system communication.
//!
//! The character never calls into its weapon directly: a movement state
//! change is broadcast and the weapon systems react to it. Projectiles do
//! the same with their impacts.

use bevy::prelude::*;

use crate::player::MovementState;

/// Sent whenever a character settles into a new movement state.
#[derive(Event, Debug, Clone, Copy)]
pub struct MovementStateChanged {
    pub entity: Entity,
    pub state: MovementState,
}

/// Sent each time a weapon releases a shot.
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponFired {
    pub weapon: Entity,
    pub owner: Option<Entity>,
}

/// Sent when a projectile's body first touches another collider.
#[derive(Event, Debug, Clone, Copy)]
pub struct ProjectileImpact {
    pub projectile: Entity,
    /// Character that fired the projectile
    pub owner: Option<Entity>,
    /// Entity that was hit
    pub other: Entity,
    /// World position of the projectile at impact
    pub position: Vec3,
    pub damage: f32,
    /// Bombs damage everything within `radius`
    pub is_bomb: bool,
    pub radius: f32,
}

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage, if it is still known
    pub source: Option<Entity>,
    pub amount: f32,
}

/// Sent when an entity dies (health reaches 0).
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
    pub killed_by: Option<Entity>,
}
