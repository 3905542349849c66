//! Player module - character controller, stamina, camera boom and cursor.

mod camera;
mod components;
mod config;
mod movement;
mod plugin;
mod stamina;

pub use camera::{AimPoint, BoomSettings, CameraBoom, CursorMarker, TopDownCamera};
pub use components::*;
pub use config::{CharacterConfig, CHARACTER_CONFIG_PATH};
pub use movement::{
    change_movement_state, character_update_speed, face_towards, input_axis_x, input_axis_y,
    spawn_player,
};
pub(crate) use movement::sync_movement_state;
pub use plugin::PlayerPlugin;
pub use stamina::{DrainOutcome, RegenOutcome, Stamina, StaminaSettings};
