//! World module - the arena the game is played in.

mod arena;
mod plugin;

pub use arena::{build_arena, ArenaEntity, Target, ARENA_HALF_EXTENT};
pub use plugin::{setup_arena, WorldPlugin};
