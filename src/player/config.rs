//! Character tuning loaded from an external RON file.
//!
//! Allows tweaking speeds, stamina and camera limits without recompilation.

use std::fs;

use bevy::prelude::*;
use serde::Deserialize;

use super::camera::BoomSettings;
use super::components::CharacterSpeed;
use super::stamina::StaminaSettings;
use crate::core::DataLoadError;

/// Default location of the character config.
pub const CHARACTER_CONFIG_PATH: &str = "assets/data/player/character.ron";

/// Character configuration loaded from assets/data/player/character.ron.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub speed: CharacterSpeed,
    pub stamina: StaminaSettings,
    pub camera: BoomSettings,
    /// Weapon table row equipped when the character spawns
    pub initial_weapon: Option<String>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            speed: CharacterSpeed::default(),
            stamina: StaminaSettings::default(),
            camera: BoomSettings::default(),
            initial_weapon: None,
        }
    }
}

impl CharacterConfig {
    /// Parse and validate a config from RON text.
    pub fn from_ron(path: &str, contents: &str) -> Result<Self, DataLoadError> {
        let config: Self = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Read a config file from disk.
    pub fn read(path: &str) -> Result<Self, DataLoadError> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataLoadError::FileNotFound(path.to_string()),
            _ => DataLoadError::ReadError {
                path: path.to_string(),
                details: e.to_string(),
            },
        })?;
        Self::from_ron(path, &contents)
    }

    /// Load the config, falling back to defaults on any error.
    pub fn load() -> Self {
        match Self::read(CHARACTER_CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded character config from {}", CHARACTER_CONFIG_PATH);
                config
            }
            Err(e @ DataLoadError::FileNotFound(_)) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    fn validate(&self, path: &str) -> Result<(), DataLoadError> {
        let fields = [
            ("speed.aim_walk_speed", self.speed.aim_walk_speed),
            ("speed.walk_speed", self.speed.walk_speed),
            ("speed.aim_run_speed", self.speed.aim_run_speed),
            ("speed.run_speed", self.speed.run_speed),
            ("speed.fast_run_speed", self.speed.fast_run_speed),
            ("speed.acceleration", self.speed.acceleration),
            ("stamina.maximum", self.stamina.maximum),
            ("stamina.drain_rate", self.stamina.drain_rate),
            ("stamina.regen_rate", self.stamina.regen_rate),
            ("stamina.recovery_threshold", self.stamina.recovery_threshold),
            ("stamina.regen_delay", self.stamina.regen_delay),
            ("stamina.exhausted_regen_delay", self.stamina.exhausted_regen_delay),
            ("camera.start_length", self.camera.start_length),
            ("camera.min_length", self.camera.min_length),
            ("camera.max_length", self.camera.max_length),
            ("camera.zoom_step", self.camera.zoom_step),
            ("camera.slide_speed", self.camera.slide_speed),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DataLoadError::NegativeValue {
                    path: path.to_string(),
                    field,
                    value,
                });
            }
        }

        // A threshold above the maximum would leave the character tired forever
        if self.stamina.recovery_threshold > self.stamina.maximum {
            return Err(DataLoadError::InvalidRange {
                path: path.to_string(),
                details: format!(
                    "stamina.recovery_threshold {} exceeds stamina.maximum {}",
                    self.stamina.recovery_threshold, self.stamina.maximum
                ),
            });
        }
        if self.camera.min_length > self.camera.max_length {
            return Err(DataLoadError::InvalidRange {
                path: path.to_string(),
                details: format!(
                    "camera.min_length {} exceeds camera.max_length {}",
                    self.camera.min_length, self.camera.max_length
                ),
            });
        }
        Ok(())
    }
}

/// System to load the character config at startup.
pub fn load_character_config(mut commands: Commands) {
    commands.insert_resource(CharacterConfig::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = CharacterConfig::from_ron(
            "test.ron",
            "(speed: (fast_run_speed: 12.0), initial_weapon: Some(\"rifle\"))",
        )
        .unwrap();

        assert_eq!(config.speed.fast_run_speed, 12.0);
        assert_eq!(config.speed.run_speed, CharacterSpeed::default().run_speed);
        assert_eq!(config.stamina, StaminaSettings::default());
        assert_eq!(config.initial_weapon.as_deref(), Some("rifle"));
    }

    #[test]
    fn empty_struct_is_all_defaults() {
        let config = CharacterConfig::from_ron("test.ron", "()").unwrap();
        assert_eq!(config.speed, CharacterSpeed::default());
        assert!(config.initial_weapon.is_none());
    }

    #[test]
    fn negative_tuning_is_rejected() {
        let err = CharacterConfig::from_ron("test.ron", "(stamina: (drain_rate: -4.0))").unwrap_err();
        match err {
            DataLoadError::NegativeValue { field, value, .. } => {
                assert_eq!(field, "stamina.drain_rate");
                assert_eq!(value, -4.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn infinite_delay_is_rejected() {
        let err = CharacterConfig::from_ron("test.ron", "(stamina: (regen_delay: inf))").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::NegativeValue { field: "stamina.regen_delay", .. }
        ));
    }

    #[test]
    fn threshold_above_maximum_is_rejected() {
        let err = CharacterConfig::from_ron(
            "test.ron",
            "(stamina: (maximum: 50.0, recovery_threshold: 60.0))",
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidRange { .. }));
    }

    #[test]
    fn inverted_boom_limits_are_rejected() {
        let err = CharacterConfig::from_ron("test.ron", "(camera: (min_length: 12.0, max_length: 7.0))")
            .unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidRange { ref details, .. } if details.contains("camera.min_length")));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let err = CharacterConfig::from_ron("broken.ron", "(speed: ").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { ref path, .. } if path == "broken.ron"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = CharacterConfig::read("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }

    #[test]
    fn shipped_config_parses() {
        let path = format!("{}/{}", env!("CARGO_MANIFEST_DIR"), CHARACTER_CONFIG_PATH);
        let config = CharacterConfig::read(&path).unwrap();
        assert_eq!(config.initial_weapon.as_deref(), Some("rifle"));
        assert!(config.stamina.recovery_threshold < config.stamina.maximum);
        assert!(config.camera.min_length <= config.camera.start_length);
    }
}
