//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! the character simulation only runs in the InGame state, while menu
//! systems only run in the MainMenu state.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - Move to `MainMenu` when loading completes
/// - Enter `InGame` when the player starts
/// - `Paused` freezes the simulation but keeps the arena visible
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Main menu / title screen
    MainMenu,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
}

/// Ordering of the fixed-step simulation.
///
/// Each fixed tick advances the characters from their latest input, then the
/// weapons they carry, then turns projectile contacts into impacts and
/// finally applies the resulting damage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Locomotion,
    Weapons,
    Impacts,
    Damage,
}
