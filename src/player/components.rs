//! Character controller components and the movement state machine.

use bevy::prelude::*;
use serde::Deserialize;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Raw movement axes, as last reported by input.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct AxisInput {
    /// Forward/back axis in [-1, 1]
    pub x: f32,
    /// Right/left axis in [-1, 1]
    pub y: f32,
}

impl AxisInput {
    pub fn is_moving(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }

    /// Movement direction on the ground plane.
    ///
    /// Forward is world -Z and right is world +X, the top-down camera looks
    /// down the -Z axis. Diagonals are normalized.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.y, 0.0, -self.x).normalize_or_zero()
    }
}

/// The character's locomotion mode, which selects its target speed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementState {
    AimWalk,
    Walk,
    AimRun,
    #[default]
    Run,
    FastRun,
}

impl MovementState {
    pub fn name(&self) -> &'static str {
        match self {
            MovementState::AimWalk => "Aim Walk",
            MovementState::Walk => "Walk",
            MovementState::AimRun => "Aim Run",
            MovementState::Run => "Run",
            MovementState::FastRun => "Fast Run",
        }
    }

    pub fn is_aiming(&self) -> bool {
        matches!(self, MovementState::AimWalk | MovementState::AimRun)
    }
}

/// Input-driven booleans the movement state is derived from.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementFlags {
    pub walking: bool,
    pub aiming: bool,
    pub fast_running: bool,
    /// Whether the sprint button is physically held
    pub sprint_held: bool,
}

impl MovementFlags {
    /// Derive the movement state from the flags.
    ///
    /// Fast-running wins over everything else and cancels walking and
    /// aiming.
    pub fn resolve_state(&mut self) -> MovementState {
        if self.fast_running {
            self.walking = false;
            self.aiming = false;
            return MovementState::FastRun;
        }

        match (self.walking, self.aiming) {
            (true, true) => MovementState::AimWalk,
            (false, true) => MovementState::AimRun,
            (true, false) => MovementState::Walk,
            (false, false) => MovementState::Run,
        }
    }
}

/// Target speed per movement state, in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterSpeed {
    pub aim_walk_speed: f32,
    pub walk_speed: f32,
    pub aim_run_speed: f32,
    pub run_speed: f32,
    pub fast_run_speed: f32,
    /// Speed change per ramp step
    pub acceleration: f32,
}

impl Default for CharacterSpeed {
    fn default() -> Self {
        Self {
            aim_walk_speed: 2.0,
            walk_speed: 3.0,
            aim_run_speed: 4.0,
            run_speed: 5.0,
            fast_run_speed: 9.0,
            acceleration: 0.01,
        }
    }
}

impl CharacterSpeed {
    pub fn for_state(&self, state: MovementState) -> f32 {
        match state {
            MovementState::AimWalk => self.aim_walk_speed,
            MovementState::Walk => self.walk_speed,
            MovementState::AimRun => self.aim_run_speed,
            MovementState::Run => self.run_speed,
            MovementState::FastRun => self.fast_run_speed,
        }
    }
}

/// Linear ramp of the character's max speed toward the state's speed.
///
/// The ramp moves by `step` once per `interval` seconds of simulated time,
/// independent of the tick rate driving it.
#[derive(Component, Debug, Clone)]
pub struct SpeedRamp {
    /// Max speed the character moves at right now
    pub current: f32,
    pub target: f32,
    pub step: f32,
    pub interval: f32,
    accumulator: f32,
    active: bool,
}

/// Ramp step interval in seconds.
pub const SPEED_RAMP_INTERVAL: f32 = 0.002;

impl SpeedRamp {
    /// A ramp resting at `speed`.
    pub fn new(speed: f32, step: f32) -> Self {
        Self {
            current: speed,
            target: speed,
            step,
            interval: SPEED_RAMP_INTERVAL,
            accumulator: 0.0,
            active: false,
        }
    }

    /// Start ramping toward a new target, restarting the step clock.
    pub fn retarget(&mut self, target: f32) {
        self.target = target;
        self.accumulator = 0.0;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance by `dt` seconds, running every whole step that elapsed.
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }

        self.accumulator += dt;
        while self.active && self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            self.step_once();
        }
    }

    fn step_once(&mut self) {
        let remaining = self.target - self.current;

        if remaining == 0.0 || self.step <= 0.0 {
            self.active = false;
            self.accumulator = 0.0;
        } else if remaining.abs() <= self.step {
            // Land exactly on the target instead of oscillating around it
            self.current = self.target;
        } else {
            self.current += self.step * remaining.signum();
        }
    }
}

/// The weapon the character currently carries, if any.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct CurrentWeapon(pub Option<Entity>);
