//! TDS - Entry Point
//!
//! A top-down shooter: walk, aim, sprint on a stamina budget and shoot.
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Aim
//! - Left Ctrl: Walk (hold)
//! - Right Mouse: Aim (hold)
//! - Shift: Sprint (hold)
//! - Left Mouse: Fire (hold)
//! - R: Reload
//! - Mouse Wheel: Zoom
//! - Escape: Pause/Unpause

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier3d::prelude::*;

/// Fixed simulation rate for locomotion, weapons and physics.
const SIMULATION_HZ: f64 = 60.0;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "TDS".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,tds=debug".to_string(),
                    ..default()
                }),
        )
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))

        // Physics, stepped together with the gameplay simulation
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())

        // Audio
        .add_plugins(AudioPlugin)

        // Our game plugin
        .add_plugins(tds::TdsPlugin)

        .run();
}
