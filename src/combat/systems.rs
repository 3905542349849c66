//! Combat systems - impacts become damage, damage becomes death.

use std::collections::HashSet;

use bevy::prelude::*;

use super::components::*;
use crate::core::{DamageEvent, DeathEvent, ProjectileImpact, SimulationSet};
use crate::player::Player;
use crate::weapons::Projectile;

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (resolve_impacts, apply_damage, handle_deaths)
            .chain()
            .in_set(SimulationSet::Damage),
    );
}

/// Convert projectile impacts into damage.
///
/// Regular projectiles damage what they touched; bombs damage every entity
/// with health inside their blast radius.
fn resolve_impacts(
    mut impacts: EventReader<ProjectileImpact>,
    targets: Query<(Entity, &GlobalTransform), (With<Health>, Without<Projectile>)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for impact in impacts.read() {
        if impact.is_bomb {
            let candidates = targets
                .iter()
                .map(|(entity, transform)| (entity, transform.translation()));
            for target in in_blast_radius(impact.position, impact.radius, candidates) {
                damage_events.send(DamageEvent {
                    target,
                    source: impact.owner,
                    amount: impact.damage,
                });
            }
        } else if targets.contains(impact.other) {
            damage_events.send(DamageEvent {
                target: impact.other,
                source: impact.owner,
                amount: impact.damage,
            });
        }
    }
}

/// Apply damage to entities.
fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<&mut Health, Without<Dead>>,
    mut death_events: EventWriter<DeathEvent>,
) {
    // Track entities that died this tick to avoid duplicate death events
    let mut died_this_tick = HashSet::new();

    for event in damage_events.read() {
        if died_this_tick.contains(&event.target) {
            continue;
        }

        let Ok(mut health) = health_query.get_mut(event.target) else {
            continue;
        };

        let taken = health.take_damage(event.amount);
        debug!(
            "{} took {:.1} damage ({:.0}% left)",
            event.target,
            taken,
            health.percentage() * 100.0
        );

        if health.is_dead() {
            died_this_tick.insert(event.target);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: event.source,
            });
        }
    }
}

/// Remove dead entities; the player is never despawned here.
fn handle_deaths(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<(), With<Player>>,
) {
    for event in death_events.read() {
        if player_query.contains(event.entity) {
            warn!("Player health reached zero");
            continue;
        }
        match event.killed_by {
            Some(killer) => info!("{} destroyed by {}", event.entity, killer),
            None => info!("{} destroyed", event.entity),
        }
        commands.entity(event.entity).despawn_recursive();
    }
}
