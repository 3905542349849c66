//! Weapon table rows and the weapon component.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use crate::player::MovementState;

/// Spread limits in degrees of yaw.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeaponDispersion {
    /// Spread when aiming on the run
    pub aim_start: f32,
    /// Spread when not aiming; also the cap while firing
    pub aim_max: f32,
    /// Spread when aiming at a walk
    pub aim_min: f32,
    /// Spread added by every shot
    pub aim_shoot_coef: f32,
}

impl Default for WeaponDispersion {
    fn default() -> Self {
        Self {
            aim_start: 0.5,
            aim_max: 1.0,
            aim_min: 0.1,
            aim_shoot_coef: 1.0,
        }
    }
}

impl WeaponDispersion {
    /// Resting spread for a movement state.
    pub fn base_for(&self, state: MovementState) -> f32 {
        match state {
            MovementState::AimWalk => self.aim_min,
            MovementState::AimRun => self.aim_start,
            _ => self.aim_max,
        }
    }
}

/// Ballistic settings of a projectile-firing weapon.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileInfo {
    pub damage: f32,
    /// Seconds before an unimpacted projectile disappears
    pub life_time: f32,
    /// Muzzle speed in units per second
    pub initial_speed: f32,
    /// Bombs damage everything within `max_radius_damage`
    pub is_bomb: bool,
    pub max_radius_damage: f32,
    /// Collision sphere radius
    pub radius: f32,
}

impl Default for ProjectileInfo {
    fn default() -> Self {
        Self {
            damage: 20.0,
            life_time: 20.0,
            initial_speed: 20.0,
            is_bomb: false,
            max_radius_damage: 2.0,
            radius: 0.16,
        }
    }
}

/// One row of the weapon table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeaponInfo {
    /// Display name; the table key is used when empty
    pub name: String,
    /// Seconds between shots
    pub rate_of_fire: f32,
    /// Seconds to refill the magazine
    pub reload_time: f32,
    pub max_round: u32,
    pub dispersion: WeaponDispersion,
    /// `None` makes the weapon a hit-scan weapon
    pub projectile: Option<ProjectileInfo>,
    /// Hit-scan damage
    pub weapon_damage: f32,
    /// Hit-scan range
    pub trace_distance: f32,
    pub fire_sound: Option<String>,
    pub reload_sound: Option<String>,
}

impl Default for WeaponInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            rate_of_fire: 0.5,
            reload_time: 2.0,
            max_round: 10,
            dispersion: WeaponDispersion::default(),
            projectile: None,
            weapon_damage: 20.0,
            trace_distance: 20.0,
            fire_sound: None,
            reload_sound: None,
        }
    }
}

/// A weapon carried by a character.
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    pub info: WeaponInfo,
    pub firing: bool,
    pub reloading: bool,
    /// Counts down to the next shot; a shot fires once it drops below zero
    pub fire_time: f32,
    pub rounds: u32,
    /// Current spread in degrees
    pub dispersion: f32,
    base_dispersion: f32,
    reload_timer: Option<Timer>,
}

impl Weapon {
    /// A weapon with a full magazine, settled for `state`.
    pub fn new(info: WeaponInfo, state: MovementState) -> Self {
        let base = info.dispersion.base_for(state);
        Self {
            rounds: info.max_round,
            info,
            firing: false,
            reloading: false,
            fire_time: 0.0,
            dispersion: base,
            base_dispersion: base,
            reload_timer: None,
        }
    }

    pub fn is_hitscan(&self) -> bool {
        self.info.projectile.is_none()
    }

    pub fn can_fire(&self) -> bool {
        !self.reloading && self.rounds > 0
    }

    /// Hold or release the trigger; holding is refused while unable to fire.
    pub fn set_fire_state(&mut self, firing: bool) {
        self.firing = firing && self.can_fire();
    }

    /// One simulation step of the fire-rate loop. Returns true when a shot
    /// was released this step.
    pub fn fire_tick(&mut self, dt: f32) -> bool {
        if !self.firing {
            return false;
        }

        if self.fire_time < 0.0 {
            self.fire();
            true
        } else {
            self.fire_time -= dt;
            false
        }
    }

    fn fire(&mut self) {
        self.fire_time = self.info.rate_of_fire;
        self.rounds = self.rounds.saturating_sub(1);
        self.dispersion = (self.dispersion + self.info.dispersion.aim_shoot_coef)
            .min(self.info.dispersion.aim_max.max(self.base_dispersion));

        if self.rounds == 0 {
            self.start_reload();
        }
    }

    /// Begin refilling the magazine. Returns false if a reload is already
    /// running or the magazine is full.
    pub fn start_reload(&mut self) -> bool {
        if self.reloading || self.rounds >= self.info.max_round {
            return false;
        }

        self.reloading = true;
        self.firing = false;
        self.reload_timer = Some(Timer::from_seconds(
            self.info.reload_time.max(0.0),
            TimerMode::Once,
        ));
        true
    }

    /// Advance a running reload. Returns true on the step it completes.
    pub fn tick_reload(&mut self, dt: f32) -> bool {
        let Some(timer) = self.reload_timer.as_mut() else {
            return false;
        };

        timer.tick(Duration::from_secs_f32(dt.max(0.0)));
        if !timer.finished() {
            return false;
        }

        self.reload_timer = None;
        self.reloading = false;
        self.rounds = self.info.max_round;
        true
    }

    /// Seconds left on a running reload.
    pub fn reload_remaining(&self) -> Option<f32> {
        self.reload_timer.as_ref().map(|timer| timer.remaining_secs())
    }

    /// React to the carrier changing its movement state.
    pub fn update_state_weapon(&mut self, state: MovementState) {
        self.change_dispersion(state);
    }

    fn change_dispersion(&mut self, state: MovementState) {
        self.base_dispersion = self.info.dispersion.base_for(state);
        self.dispersion = self.base_dispersion;
    }
}

/// Marks the point projectiles leave the weapon from.
#[derive(Component)]
pub struct Muzzle;

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    fn rifle() -> WeaponInfo {
        WeaponInfo {
            name: "Rifle".to_string(),
            rate_of_fire: 0.25,
            reload_time: 1.0,
            max_round: 3,
            dispersion: WeaponDispersion {
                aim_start: 2.0,
                aim_max: 6.0,
                aim_min: 1.0,
                aim_shoot_coef: 1.5,
            },
            projectile: Some(ProjectileInfo::default()),
            ..default()
        }
    }

    fn shots_over(weapon: &mut Weapon, steps: usize) -> usize {
        (0..steps).filter(|_| weapon.fire_tick(DT)).count()
    }

    #[test]
    fn new_weapon_has_full_magazine() {
        let weapon = Weapon::new(rifle(), MovementState::Run);
        assert_eq!(weapon.rounds, 3);
        assert!(weapon.can_fire());
        assert!(!weapon.firing);
        assert!(!weapon.is_hitscan());
    }

    #[test]
    fn idle_trigger_never_fires() {
        let mut weapon = Weapon::new(rifle(), MovementState::Run);
        assert_eq!(shots_over(&mut weapon, 50), 0);
        assert_eq!(weapon.rounds, 3);
    }

    #[test]
    fn first_shot_waits_for_timer_to_lapse() {
        let mut weapon = Weapon::new(rifle(), MovementState::Run);
        weapon.set_fire_state(true);
        // fire_time starts at zero, so the first step only counts down
        assert!(!weapon.fire_tick(DT));
        assert!(weapon.fire_tick(DT));
        assert_eq!(weapon.fire_time, 0.25);
    }

    #[test]
    fn shots_are_spaced_by_rate_of_fire() {
        let mut info = rifle();
        info.max_round = 100;
        let mut weapon = Weapon::new(info, MovementState::Run);
        weapon.set_fire_state(true);

        let mut fired_at = Vec::new();
        for step in 0..40 {
            if weapon.fire_tick(DT) {
                fired_at.push(step);
            }
        }
        assert!(fired_at.len() >= 2);
        for pair in fired_at.windows(2) {
            // 0.25 s at 0.1 s per step: three countdown steps, then the shot
            assert_eq!(pair[1] - pair[0], 4);
        }
    }

    #[test]
    fn releasing_trigger_stops_fire() {
        let mut weapon = Weapon::new(rifle(), MovementState::Run);
        weapon.set_fire_state(true);
        shots_over(&mut weapon, 2);
        weapon.set_fire_state(false);
        assert_eq!(shots_over(&mut weapon, 20), 0);
    }

    #[test]
    fn emptying_magazine_starts_reload() {
        let mut weapon = Weapon::new(rifle(), MovementState::Run);
        weapon.set_fire_state(true);
        assert_eq!(shots_over(&mut weapon, 100), 3);
        assert_eq!(weapon.rounds, 0);
        assert!(weapon.reloading);
        assert!(!weapon.firing);
        assert!(!weapon.can_fire());

        weapon.set_fire_state(true);
        assert!(!weapon.firing);
    }

    #[test]
    fn reload_refills_after_reload_time() {
        let mut weapon = Weapon::new(rifle(), MovementState::Run);
        weapon.rounds = 1;
        assert!(weapon.start_reload());
        assert!(!weapon.start_reload());

        for _ in 0..9 {
            assert!(!weapon.tick_reload(DT));
        }
        assert!(weapon.tick_reload(DT));
        assert_eq!(weapon.rounds, 3);
        assert!(!weapon.reloading);
        assert!(weapon.reload_remaining().is_none());
    }

    #[test]
    fn full_magazine_does_not_reload() {
        let mut weapon = Weapon::new(rifle(), MovementState::Run);
        assert!(!weapon.start_reload());
        assert!(!weapon.reloading);
    }

    #[test]
    fn dispersion_follows_movement_state() {
        let mut weapon = Weapon::new(rifle(), MovementState::Run);
        assert_eq!(weapon.dispersion, 6.0);

        weapon.update_state_weapon(MovementState::AimWalk);
        assert_eq!(weapon.dispersion, 1.0);

        weapon.update_state_weapon(MovementState::AimRun);
        assert_eq!(weapon.dispersion, 2.0);
    }

    #[test]
    fn shots_widen_dispersion_up_to_max() {
        let mut info = rifle();
        info.max_round = 100;
        let mut weapon = Weapon::new(info, MovementState::AimWalk);
        weapon.set_fire_state(true);

        shots_over(&mut weapon, 2);
        assert!((weapon.dispersion - 2.5).abs() < 1e-6);

        shots_over(&mut weapon, 40);
        assert_eq!(weapon.dispersion, 6.0);

        // A state change settles the spread again
        weapon.update_state_weapon(MovementState::AimWalk);
        assert_eq!(weapon.dispersion, 1.0);
    }

    #[test]
    fn missing_projectile_means_hitscan() {
        let info = WeaponInfo {
            projectile: None,
            ..rifle()
        };
        assert!(Weapon::new(info, MovementState::Run).is_hitscan());
    }
}
