//! Runtime parameters
//!
//! Loaded from an optional JSON file; every field falls back to the defaults in
//! [`crate::consts`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Failure to load or validate a settings file
#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read settings {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "malformed settings {}: {source}", path.display())
            }
            Self::Invalid { field, reason } => write!(f, "invalid setting `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Timing ===
    /// Ticks per second
    pub tick_rate: u32,
    /// Pause between spawner waves (ms)
    pub spawner_wave_ms: u64,
    /// Pause between targets within a spawner wave (ms)
    pub spawner_target_ms: u64,

    // === Gameplay ===
    /// Targets spawned per mission
    pub num_targets: usize,
    pub bomb_speed: f32,
    pub bomb_drift: f32,
    /// Per-tick chance that the opponent spawns an extra target
    pub assist_chance: f64,

    /// RNG seed; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            tick_rate: TICK_RATE,
            spawner_wave_ms: SPAWNER_WAVE_MS,
            spawner_target_ms: SPAWNER_TARGET_MS,

            num_targets: NUM_TARGETS,
            bomb_speed: BOMB_SPEED,
            bomb_drift: BOMB_DRIFT,
            assist_chance: ASSIST_CHANCE,

            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        // A field smaller than two max-size targets leaves no valid spawn position
        let min_extent = 2.0 * MAX_TARGET_SIZE;
        let finite = self.field_width.is_finite() && self.field_height.is_finite();
        if !(finite && self.field_width > min_extent && self.field_height > min_extent) {
            return Err(SettingsError::Invalid {
                field: "field_width/field_height",
                reason: format!(
                    "field {}x{} must exceed {min_extent} in both dimensions",
                    self.field_width, self.field_height
                ),
            });
        }
        if self.tick_rate == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_rate",
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.assist_chance) {
            return Err(SettingsError::Invalid {
                field: "assist_chance",
                reason: format!("{} is not a probability", self.assist_chance),
            });
        }
        // The spawner sleeps at least once per wave; a zero pause would spin it
        if self.spawner_wave_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "spawner_wave_ms",
                reason: "must be at least 1".into(),
            });
        }
        // Bombs only expire by falling past the bottom edge
        if !(self.bomb_speed.is_finite() && self.bomb_speed > 0.0) {
            return Err(SettingsError::Invalid {
                field: "bomb_speed",
                reason: format!("{} must be a positive fall speed", self.bomb_speed),
            });
        }
        if !self.bomb_drift.is_finite() {
            return Err(SettingsError::Invalid {
                field: "bomb_drift",
                reason: format!("{} is not finite", self.bomb_drift),
            });
        }
        Ok(())
    }

    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }

    pub fn spawner_wave_interval(&self) -> Duration {
        Duration::from_millis(self.spawner_wave_ms)
    }

    pub fn spawner_target_interval(&self) -> Duration {
        Duration::from_millis(self.spawner_target_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.field_size(), Vec2::new(800.0, 600.0));
        assert_eq!(settings.num_targets, 10);
        assert_eq!(settings.tick_rate, 15);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "num_targets": 3, "seed": 42 }}"#).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.num_targets, 3);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.tick_rate, TICK_RATE);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_rate": 0 }}"#).unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "tick_rate", .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("cannot read settings"));
    }

    #[test]
    fn test_zero_wave_pause_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "spawner_wave_ms": 0, "spawner_target_ms": 0 }}"#).unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "spawner_wave_ms", .. }));
    }

    #[test]
    fn test_zero_target_pause_allowed() {
        let settings = Settings {
            spawner_target_ms: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_non_falling_bombs_rejected() {
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let settings = Settings {
                bomb_speed: speed,
                ..Default::default()
            };
            let err = settings.validate().unwrap_err();
            assert!(matches!(err, SettingsError::Invalid { field: "bomb_speed", .. }));
        }
    }

    #[test]
    fn test_infinite_drift_rejected() {
        let settings = Settings {
            bomb_drift: f32::NEG_INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "bomb_drift", .. })
        ));
    }

    #[test]
    fn test_non_finite_field_rejected() {
        for (w, h) in [(f32::INFINITY, 600.0), (800.0, f32::NAN)] {
            let settings = Settings {
                field_width: w,
                field_height: h,
                ..Default::default()
            };
            let err = settings.validate().unwrap_err();
            assert!(matches!(
                err,
                SettingsError::Invalid { field: "field_width/field_height", .. }
            ));
        }
    }

    #[test]
    fn test_assist_chance_out_of_range_rejected() {
        let settings = Settings {
            assist_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "assist_chance", .. })
        ));
    }

    #[test]
    fn test_tick_duration_matches_rate() {
        let settings = Settings::default();
        assert_eq!(settings.tick_duration(), Duration::from_secs_f64(1.0 / 15.0));
    }

    #[test]
    fn test_tiny_field_rejected() {
        let settings = Settings {
            field_width: 40.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
