//! Core plugin that sets up game states, events, and simulation ordering.

use bevy::prelude::*;

use super::events::*;
use super::states::*;
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, Paused)
/// - Global events (MovementStateChanged, ProjectileImpact, ...)
/// - The fixed-step simulation set ordering
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()

            // Register global events
            .add_event::<MovementStateChanged>()
            .add_event::<WeaponFired>()
            .add_event::<ProjectileImpact>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()

            // The simulation only advances during gameplay
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Locomotion,
                    SimulationSet::Weapons,
                    SimulationSet::Impacts,
                    SimulationSet::Damage,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )

            // Data files are read at Startup, so there is nothing to wait on
            .add_systems(OnEnter(GameState::Loading), transition_to_main_menu)

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            )

            // Smooth transform interpolation (runs for all game states)
            .add_systems(Update, update_smooth_transforms);
    }
}

/// Immediately transition from Loading to MainMenu.
fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
