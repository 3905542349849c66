//! World plugin - arena setup and teardown.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::arena::{build_arena, ArenaEntity};
use crate::core::GameState;
use crate::player::{spawn_player, CharacterConfig, CursorMarker, Player, TopDownCamera};
use crate::weapons::Projectile;

/// World plugin - handles building and clearing the arena.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(AmbientLight {
            color: Color::srgb(0.8, 0.85, 1.0),
            brightness: 250.0,
        })
        // Resuming from pause re-enters InGame, so only build from the menu
        .add_systems(
            OnTransition {
                exited: GameState::MainMenu,
                entered: GameState::InGame,
            },
            setup_arena,
        )
        .add_systems(OnEnter(GameState::MainMenu), cleanup_arena)
        .add_systems(OnEnter(GameState::Paused), freeze_physics)
        .add_systems(OnExit(GameState::Paused), resume_physics);
    }
}

/// Build the arena and spawn the player into it.
pub fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<CharacterConfig>,
) {
    let player_pos = build_arena(&mut commands, &mut meshes, &mut materials);
    spawn_player(&mut commands, &mut meshes, &mut materials, player_pos, &config);
}

/// Clear the arena when returning to the menu.
#[allow(clippy::type_complexity)]
fn cleanup_arena(
    mut commands: Commands,
    query: Query<
        Entity,
        Or<(
            With<ArenaEntity>,
            With<Player>,
            With<TopDownCamera>,
            With<CursorMarker>,
            With<Projectile>,
        )>,
    >,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Projectiles hold still while the pause menu is open.
fn freeze_physics(mut query: Query<&mut RapierConfiguration>) {
    for mut config in query.iter_mut() {
        config.physics_pipeline_active = false;
    }
}

fn resume_physics(mut query: Query<&mut RapierConfiguration>) {
    for mut config in query.iter_mut() {
        config.physics_pipeline_active = true;
    }
}
