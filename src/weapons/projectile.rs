//! Projectiles - spawned bodies that fly until they hit something or expire.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::ProjectileInfo;
use crate::core::ProjectileImpact;

/// A projectile in flight.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub settings: ProjectileInfo,
    /// Character that fired it
    pub owner: Option<Entity>,
}

/// Remaining life span of a projectile.
#[derive(Component)]
pub struct Lifetime(pub Timer);

/// Shared projectile visuals, built once at startup.
#[derive(Resource)]
pub struct ProjectileAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    pub bomb_material: Handle<StandardMaterial>,
}

pub fn setup_projectile_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(ProjectileAssets {
        // Unit sphere, scaled per projectile
        mesh: meshes.add(Sphere::new(1.0)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.85, 0.4),
            emissive: LinearRgba::rgb(4.0, 3.0, 1.0),
            ..default()
        }),
        bomb_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.2, 0.2),
            emissive: LinearRgba::rgb(2.0, 0.4, 0.1),
            ..default()
        }),
    });
}

/// Spawn a projectile at `origin` flying along `direction`.
pub fn spawn_projectile(
    commands: &mut Commands,
    assets: &ProjectileAssets,
    settings: ProjectileInfo,
    origin: Vec3,
    direction: Dir3,
    owner: Option<Entity>,
) -> Entity {
    let material = if settings.is_bomb {
        assets.bomb_material.clone()
    } else {
        assets.material.clone()
    };

    commands
        .spawn((
            Projectile { settings, owner },
            Lifetime(Timer::from_seconds(settings.life_time, TimerMode::Once)),
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(origin)
                .looking_to(direction, Vec3::Y)
                .with_scale(Vec3::splat(settings.radius)),
            // Physics: a fast sphere that ignores gravity
            RigidBody::Dynamic,
            Collider::ball(1.0),
            GravityScale(0.0),
            Ccd::enabled(),
            Velocity::linear(direction * settings.initial_speed),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

/// Despawn projectiles whose life span ran out.
pub fn expire_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Lifetime), With<Projectile>>,
) {
    for (entity, mut lifetime) in query.iter_mut() {
        if lifetime.0.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Turn the first contact of each projectile into an impact.
pub fn handle_projectile_collisions(
    mut commands: Commands,
    mut collisions: EventReader<CollisionEvent>,
    projectiles: Query<(&Projectile, &GlobalTransform)>,
    mut impacts: EventWriter<ProjectileImpact>,
) {
    let mut impacted = HashSet::new();

    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };

        let (projectile_entity, other) = if projectiles.contains(a) {
            (a, b)
        } else if projectiles.contains(b) {
            (b, a)
        } else {
            continue;
        };

        if !impacted.insert(projectile_entity) {
            continue;
        }

        let Ok((projectile, transform)) = projectiles.get(projectile_entity) else {
            continue;
        };

        impact_projectile(
            &mut commands,
            &mut impacts,
            projectile_entity,
            projectile,
            transform.translation(),
            other,
        );
    }
}

/// Report the impact and remove the projectile.
fn impact_projectile(
    commands: &mut Commands,
    impacts: &mut EventWriter<ProjectileImpact>,
    entity: Entity,
    projectile: &Projectile,
    position: Vec3,
    other: Entity,
) {
    let settings = projectile.settings;
    impacts.send(ProjectileImpact {
        projectile: entity,
        owner: projectile.owner,
        other,
        position,
        damage: settings.damage,
        is_bomb: settings.is_bomb,
        radius: settings.max_radius_damage,
    });
    commands.entity(entity).despawn_recursive();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

    use super::*;

    fn spawn_test_projectile(app: &mut App, life_time: f32, owner: Option<Entity>) -> Entity {
        let settings = ProjectileInfo {
            life_time,
            ..default()
        };
        app.world_mut()
            .spawn((
                Projectile { settings, owner },
                Lifetime(Timer::from_seconds(life_time, TimerMode::Once)),
                GlobalTransform::from_translation(Vec3::new(1.0, 0.5, -2.0)),
            ))
            .id()
    }

    #[test]
    fn first_contact_reports_one_impact_and_despawns() {
        let mut app = App::new();
        app.add_event::<CollisionEvent>()
            .add_event::<ProjectileImpact>()
            .add_systems(Update, handle_projectile_collisions);

        let shooter = app.world_mut().spawn_empty().id();
        let projectile = spawn_test_projectile(&mut app, 5.0, Some(shooter));
        let wall = app.world_mut().spawn_empty().id();
        let target = app.world_mut().spawn_empty().id();

        let flags = CollisionEventFlags::empty();
        app.world_mut().send_event(CollisionEvent::Started(wall, projectile, flags));
        app.world_mut().send_event(CollisionEvent::Started(projectile, target, flags));
        app.world_mut().send_event(CollisionEvent::Stopped(projectile, wall, flags));
        app.update();

        let impacts: Vec<ProjectileImpact> = app
            .world()
            .resource::<Events<ProjectileImpact>>()
            .iter_current_update_events()
            .copied()
            .collect();
        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].projectile, projectile);
        assert_eq!(impacts[0].other, wall);
        assert_eq!(impacts[0].owner, Some(shooter));
        assert_eq!(impacts[0].position, Vec3::new(1.0, 0.5, -2.0));
        assert!(app.world().get::<Projectile>(projectile).is_none());
    }

    #[test]
    fn contacts_between_other_bodies_are_ignored() {
        let mut app = App::new();
        app.add_event::<CollisionEvent>()
            .add_event::<ProjectileImpact>()
            .add_systems(Update, handle_projectile_collisions);

        let a = app.world_mut().spawn_empty().id();
        let b = app.world_mut().spawn_empty().id();
        app.world_mut()
            .send_event(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
        app.update();

        assert_eq!(
            app.world()
                .resource::<Events<ProjectileImpact>>()
                .iter_current_update_events()
                .count(),
            0
        );
    }

    #[test]
    fn expired_projectiles_are_removed() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_systems(Update, expire_projectiles);

        let short = spawn_test_projectile(&mut app, 0.5, None);
        let long = spawn_test_projectile(&mut app, 5.0, None);

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(1.0));
        app.update();

        assert!(app.world().get::<Projectile>(short).is_none());
        assert!(app.world().get::<Projectile>(long).is_some());
    }
}
