//! Player plugin - character controller, camera and cursor systems.

use bevy::prelude::*;

use super::camera;
use super::config::load_character_config;
use super::movement;
use crate::core::GameState;

/// Player plugin - handles the character simulation, camera and cursor.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // Tuning must exist before anything spawns a character
        app.add_systems(Startup, load_character_config);

        // Set up movement systems
        movement::setup_movement_systems(app);

        // Camera and cursor follow the simulation every frame
        app.add_systems(
            Update,
            (
                camera::mouse_wheel_zoom,
                camera::follow_player,
                camera::update_cursor,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
    }
}
