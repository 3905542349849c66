//! Stamina meter gating the fast-run state.
//!
//! Fast-running drains the meter while the character actually moves. Every
//! drain pushes back a one-shot regen timer; once that timer fires the meter
//! refills until it is full. Hitting zero leaves the character tired and
//! uses a longer timer, and fast-running stays locked out until the meter
//! climbs past the recovery threshold.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

/// Stamina tuning, loaded as part of the character config.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaminaSettings {
    pub maximum: f32,
    /// Stamina lost per second of fast-running
    pub drain_rate: f32,
    /// Stamina gained per second while regenerating
    pub regen_rate: f32,
    /// Level at which a tired character may fast-run again
    pub recovery_threshold: f32,
    /// Seconds between the last drain and the start of regen
    pub regen_delay: f32,
    /// Seconds between exhaustion and the start of regen
    pub exhausted_regen_delay: f32,
}

impl Default for StaminaSettings {
    fn default() -> Self {
        Self {
            maximum: 100.0,
            drain_rate: 1.0,
            regen_rate: 1.0,
            recovery_threshold: 40.0,
            regen_delay: 0.5,
            exhausted_regen_delay: 2.0,
        }
    }
}

/// What a drain step did to the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Still has stamina left
    Draining,
    /// Hit zero this step; fast-running must stop
    Exhausted,
}

/// What a regen step did to the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenOutcome {
    /// Still tired, or was never tired
    Regenerating,
    /// Crossed the recovery threshold with sprint held; resume fast-running
    ResumeFastRun,
}

/// The character's stamina meter.
#[derive(Component, Debug, Clone)]
pub struct Stamina {
    pub current: f32,
    pub settings: StaminaSettings,
    /// Set when the meter hit zero, cleared at the recovery threshold
    pub tired: bool,
    can_regenerate: bool,
    regen_timer_started: bool,
    regen_timer: Option<Timer>,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(StaminaSettings::default())
    }
}

impl Stamina {
    /// A full meter.
    pub fn new(settings: StaminaSettings) -> Self {
        Self {
            current: settings.maximum,
            settings,
            tired: false,
            can_regenerate: false,
            regen_timer_started: false,
            regen_timer: None,
        }
    }

    pub fn maximum(&self) -> f32 {
        self.settings.maximum
    }

    pub fn fraction(&self) -> f32 {
        if self.settings.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.settings.maximum
    }

    pub fn can_regenerate(&self) -> bool {
        self.can_regenerate
    }

    /// Whether a regen timer is pending.
    pub fn regen_pending(&self) -> bool {
        self.regen_timer.is_some()
    }

    /// Advance the pending regen timer; regen unlocks when it fires.
    pub fn tick_timer(&mut self, dt: f32) {
        let Some(timer) = self.regen_timer.as_mut() else {
            return;
        };

        timer.tick(Duration::from_secs_f32(dt.max(0.0)));
        if timer.finished() {
            self.regen_timer = None;
            self.can_regenerate = true;
        }
    }

    /// One fast-running step.
    pub fn drain(&mut self, dt: f32, moving: bool) -> DrainOutcome {
        if moving {
            self.can_regenerate = false;
            self.regen_timer_started = false;
            self.current -= self.settings.drain_rate * dt;
        }

        if self.regen_timer_started {
            return DrainOutcome::Draining;
        }

        if self.current <= 0.0 {
            self.current = 0.0;
            self.tired = true;
            self.schedule_regen(self.settings.exhausted_regen_delay);
            return DrainOutcome::Exhausted;
        }

        self.schedule_regen(self.settings.regen_delay);
        self.regen_timer_started = true;
        DrainOutcome::Draining
    }

    /// One regen step; a no-op until the regen timer has fired.
    pub fn regenerate(&mut self, dt: f32, sprint_held: bool) -> RegenOutcome {
        if !self.can_regenerate {
            return RegenOutcome::Regenerating;
        }

        self.current += self.settings.regen_rate * dt;

        let mut outcome = RegenOutcome::Regenerating;
        if self.current >= self.settings.recovery_threshold {
            let was_tired = self.tired;
            self.tired = false;
            if was_tired && sprint_held {
                outcome = RegenOutcome::ResumeFastRun;
            }
        }

        if self.current >= self.settings.maximum {
            self.current = self.settings.maximum;
            self.can_regenerate = false;
        }

        outcome
    }

    fn schedule_regen(&mut self, delay: f32) {
        self.regen_timer = Some(Timer::from_seconds(delay.max(0.0), TimerMode::Once));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    fn fast_settings() -> StaminaSettings {
        StaminaSettings {
            maximum: 100.0,
            drain_rate: 50.0,
            regen_rate: 20.0,
            recovery_threshold: 40.0,
            regen_delay: 0.5,
            exhausted_regen_delay: 2.0,
        }
    }

    /// Drives the meter the way the fixed-step loop does.
    fn step(stamina: &mut Stamina, fast_running: bool, moving: bool) -> (Option<DrainOutcome>, RegenOutcome) {
        stamina.tick_timer(DT);
        let drained = fast_running.then(|| stamina.drain(DT, moving));
        let regen = stamina.regenerate(DT, fast_running);
        (drained, regen)
    }

    #[test]
    fn starts_full() {
        let stamina = Stamina::new(fast_settings());
        assert_eq!(stamina.current, 100.0);
        assert_eq!(stamina.fraction(), 1.0);
        assert!(!stamina.tired);
    }

    #[test]
    fn drains_only_while_moving() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.drain(DT, false);
        assert_eq!(stamina.current, 100.0);
        stamina.drain(DT, true);
        assert!((stamina.current - 95.0).abs() < 1e-4);
    }

    #[test]
    fn stationary_fast_run_starts_regen_timer_once() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.current = 50.0;
        stamina.drain(DT, false);
        assert!(stamina.regen_pending());

        // Repeated stationary drains do not push the timer back
        for _ in 0..5 {
            step(&mut stamina, true, false);
        }
        assert!(stamina.can_regenerate());
        assert!(stamina.current > 50.0);
    }

    #[test]
    fn moving_drain_blocks_regen() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.current = 80.0;
        for _ in 0..10 {
            step(&mut stamina, true, true);
            assert!(!stamina.can_regenerate());
        }
    }

    #[test]
    fn regen_waits_for_delay_after_sprint() {
        let mut stamina = Stamina::new(fast_settings());
        step(&mut stamina, true, true);
        let after_sprint = stamina.current;

        // 0.5 s delay: four idle steps do not regenerate yet
        for _ in 0..4 {
            step(&mut stamina, false, false);
            assert_eq!(stamina.current, after_sprint);
        }
        step(&mut stamina, false, false);
        assert!(stamina.current > after_sprint);
    }

    #[test]
    fn exhaustion_clamps_to_zero_and_tires() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.current = 3.0;
        let (drained, _) = step(&mut stamina, true, true);
        assert_eq!(drained, Some(DrainOutcome::Exhausted));
        assert_eq!(stamina.current, 0.0);
        assert!(stamina.tired);
        assert!(stamina.regen_pending());
    }

    #[test]
    fn exhausted_meter_waits_longer_before_regen() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.current = 1.0;
        step(&mut stamina, true, true);

        // 2 s after exhaustion nothing has come back yet
        for _ in 0..19 {
            step(&mut stamina, false, false);
            assert_eq!(stamina.current, 0.0);
        }
        step(&mut stamina, false, false);
        assert!(stamina.current > 0.0);
    }

    #[test]
    fn recovery_threshold_clears_tired_and_resumes_held_sprint() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.current = 1.0;
        step(&mut stamina, true, true);
        assert!(stamina.tired);

        let mut resumed = false;
        for _ in 0..200 {
            stamina.tick_timer(DT);
            if stamina.regenerate(DT, true) == RegenOutcome::ResumeFastRun {
                resumed = true;
                break;
            }
        }
        assert!(resumed);
        assert!(!stamina.tired);
        assert!(stamina.current >= 40.0);
    }

    #[test]
    fn recovery_without_sprint_held_only_clears_tired() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.current = 1.0;
        step(&mut stamina, true, true);

        for _ in 0..200 {
            stamina.tick_timer(DT);
            assert_eq!(stamina.regenerate(DT, false), RegenOutcome::Regenerating);
        }
        assert!(!stamina.tired);
    }

    #[test]
    fn regen_clamps_to_maximum_and_stops() {
        let mut stamina = Stamina::new(fast_settings());
        stamina.current = 95.0;
        stamina.drain(DT, false);
        for _ in 0..100 {
            step(&mut stamina, false, false);
            assert!(stamina.current <= 100.0);
        }
        assert_eq!(stamina.current, 100.0);
        assert!(!stamina.can_regenerate());
    }

    #[test]
    fn meter_never_leaves_bounds() {
        let mut stamina = Stamina::new(fast_settings());
        for i in 0..500 {
            let sprinting = (i / 37) % 2 == 0;
            step(&mut stamina, sprinting, i % 3 != 0);
            assert!(stamina.current >= 0.0);
            assert!(stamina.current <= stamina.maximum());
        }
    }
}
