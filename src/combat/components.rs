//! Combat-related components.

use bevy::prelude::*;

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Apply damage, returning how much was actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

/// Which entities a bomb going off at `center` reaches.
pub fn in_blast_radius(
    center: Vec3,
    radius: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Vec<Entity> {
    let radius_squared = radius * radius;
    candidates
        .into_iter()
        .filter(|(_, position)| position.distance_squared(center) <= radius_squared)
        .map(|(entity, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_is_clamped_to_remaining_health() {
        let mut health = Health::new(30.0);
        assert_eq!(health.take_damage(20.0), 20.0);
        assert_eq!(health.take_damage(20.0), 10.0);
        assert!(health.is_dead());
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn negative_damage_does_not_heal() {
        let mut health = Health::new(30.0);
        assert_eq!(health.take_damage(-5.0), 0.0);
        assert_eq!(health.current, 30.0);
    }

    #[test]
    fn blast_radius_selects_nearby_entities() {
        let near = Entity::from_raw(1);
        let edge = Entity::from_raw(2);
        let far = Entity::from_raw(3);
        let hit = in_blast_radius(
            Vec3::ZERO,
            2.0,
            vec![
                (near, Vec3::new(0.5, 0.0, 0.0)),
                (edge, Vec3::new(0.0, 0.0, 2.0)),
                (far, Vec3::new(3.0, 0.0, 0.0)),
            ],
        );
        assert_eq!(hit, vec![near, edge]);
    }
}
