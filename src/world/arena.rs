//! Arena construction - floor, walls, lights and targets.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::Health;

/// Marker for everything that belongs to the arena and is cleaned up with it.
#[derive(Component)]
pub struct ArenaEntity;

/// Marker for destructible practice targets.
#[derive(Component)]
pub struct Target;

/// Half the side length of the square arena.
pub const ARENA_HALF_EXTENT: f32 = 20.0;
const WALL_HEIGHT: f32 = 2.0;
const WALL_THICKNESS: f32 = 0.5;
const TARGET_HEALTH: f32 = 60.0;

/// Where practice targets stand.
const TARGET_POSITIONS: [Vec3; 6] = [
    Vec3::new(-6.0, 1.0, -8.0),
    Vec3::new(0.0, 1.0, -10.0),
    Vec3::new(6.0, 1.0, -8.0),
    Vec3::new(-10.0, 1.0, 2.0),
    Vec3::new(10.0, 1.0, 2.0),
    Vec3::new(0.0, 1.0, 12.0),
];

/// Build the arena and return the player start position.
pub fn build_arena(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Vec3 {
    let size = ARENA_HALF_EXTENT * 2.0;

    // Floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size, 0.2, size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.34, 0.3),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.1, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(ARENA_HALF_EXTENT, 0.1, ARENA_HALF_EXTENT),
        ArenaEntity,
    ));

    // Boundary walls
    let wall_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.42, 0.38),
        ..default()
    });
    let along_x = meshes.add(Cuboid::new(size, WALL_HEIGHT, WALL_THICKNESS));
    let along_z = meshes.add(Cuboid::new(WALL_THICKNESS, WALL_HEIGHT, size));
    for sign in [-1.0, 1.0] {
        spawn_wall(
            commands,
            along_x.clone(),
            wall_material.clone(),
            Vec3::new(0.0, WALL_HEIGHT / 2.0, sign * ARENA_HALF_EXTENT),
            Vec3::new(size / 2.0, WALL_HEIGHT / 2.0, WALL_THICKNESS / 2.0),
        );
        spawn_wall(
            commands,
            along_z.clone(),
            wall_material.clone(),
            Vec3::new(sign * ARENA_HALF_EXTENT, WALL_HEIGHT / 2.0, 0.0),
            Vec3::new(WALL_THICKNESS / 2.0, WALL_HEIGHT / 2.0, size / 2.0),
        );
    }

    // Lighting
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ArenaEntity,
    ));
    spawn_light(commands, Vec3::new(0.0, 6.0, 0.0), 400_000.0, (1.0, 0.85, 0.7), 30.0);

    // Targets
    let target_mesh = meshes.add(Cylinder::new(0.5, 2.0));
    let target_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.25, 0.2),
        ..default()
    });
    for position in TARGET_POSITIONS {
        commands.spawn((
            Target,
            Health::new(TARGET_HEALTH),
            Mesh3d(target_mesh.clone()),
            MeshMaterial3d(target_material.clone()),
            Transform::from_translation(position),
            RigidBody::Fixed,
            Collider::cylinder(1.0, 0.5),
            ArenaEntity,
        ));
    }

    info!("Arena built with {} targets", TARGET_POSITIONS.len());

    Vec3::new(0.0, 1.0, 4.0)
}

fn spawn_wall(
    commands: &mut Commands,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    half_extents: Vec3,
) {
    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Fixed,
        Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        ArenaEntity,
    ));
}

/// Spawn a point light.
fn spawn_light(
    commands: &mut Commands,
    position: Vec3,
    intensity: f32,
    color: (f32, f32, f32),
    range: f32,
) {
    commands.spawn((
        PointLight {
            color: Color::srgb(color.0, color.1, color.2),
            intensity,
            range,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(position),
        ArenaEntity,
    ));
}
