//! Game settings
//!
//! Read once at startup from a JSON file. A missing file means defaults; a
//! malformed or out-of-range file is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SEATS;
use crate::tuning::Tuning;

/// Environment variable naming an alternative settings file
pub const CONFIG_ENV: &str = "VECTOR_DUEL_CONFIG";
/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vector-duel.json";

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Window and frame loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Playfield width in pixels
    pub width: u32,
    /// Playfield height in pixels (HUD included)
    pub height: u32,
    /// Target simulation and frame rate
    pub fps: u32,
    /// Height of the HUD strip on top of the screen
    pub hud_height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Vector Duel - 4 joysticks for 4 players, buttons switch aiming and target"
                .to_string(),
            width: 1024,
            height: 800,
            fps: 60,
            hud_height: 20.0,
        }
    }
}

impl WindowSettings {
    /// Seconds per simulation step
    pub fn step(&self) -> f32 {
        1.0 / self.fps as f32
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,

    // === Match ===
    /// Number of seats (1 to 4)
    pub players: usize,
    /// Every living player fires whenever the cannon is cool
    pub auto_fire: bool,
    /// Fixed RNG seed for debris and background choice
    pub seed: Option<u64>,

    // === Display ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Folder scanned (recursively) for .jpg/.jpeg backgrounds
    pub background_dir: PathBuf,
    /// Fill color when no background picture is available
    pub background_color: [f32; 4],

    // === Input ===
    /// Joystick axis values below this magnitude are ignored
    pub dead_zone: f32,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),

            players: MAX_SEATS,
            auto_fire: true,
            seed: None,

            show_fps: true,
            background_dir: PathBuf::from("data"),
            background_color: [1.0, 1.0, 1.0, 1.0],

            dead_zone: 0.1,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from `$VECTOR_DUEL_CONFIG` or `./vector-duel.json`
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load settings from a file; a missing file yields validated defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from JSON (unvalidated)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check every scaling and range parameter
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.window;
        if w.width == 0 || w.height == 0 {
            return Err(ConfigError::invalid(
                "window",
                format!("size must be positive, got {}x{}", w.width, w.height),
            ));
        }
        if w.fps == 0 {
            return Err(ConfigError::invalid("window.fps", "must be positive"));
        }
        if !w.hud_height.is_finite() || w.hud_height < 0.0 || w.hud_height >= w.height as f32 {
            return Err(ConfigError::invalid(
                "window.hud_height",
                format!("must be in [0, {}), got {}", w.height, w.hud_height),
            ));
        }
        if self.players == 0 || self.players > MAX_SEATS {
            return Err(ConfigError::invalid(
                "players",
                format!("must be 1 to {MAX_SEATS}, got {}", self.players),
            ));
        }
        if !(0.0..1.0).contains(&self.dead_zone) {
            return Err(ConfigError::invalid("dead_zone", "must be in [0, 1)"));
        }

        let p = &self.tuning.player;
        if p.radius <= 0.0 || self.tuning.beam.radius <= 0.0 {
            return Err(ConfigError::invalid("tuning", "radii must be positive"));
        }
        if p.hitpoints <= 0.0 {
            return Err(ConfigError::invalid("tuning.player.hitpoints", "must be positive"));
        }
        if p.reload_time < 0.0 {
            return Err(ConfigError::invalid("tuning.player.reload_time", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.tuning.beam.debris_chance) {
            return Err(ConfigError::invalid("tuning.beam.debris_chance", "must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.window.width, 1024);
        assert_eq!(settings.window.height, 800);
        assert_eq!(settings.players, 4);
        assert!(settings.auto_fire);
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "players": 2, "window": { "fps": 30 } }"#).unwrap();
        assert_eq!(settings.players, 2);
        assert_eq!(settings.window.fps, 30);
        assert_eq!(settings.window.width, 1024);
        assert!((settings.window.step() - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_scaling() {
        let mut settings = Settings::default();
        settings.window.width = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { field: "window", .. })
        ));

        let mut settings = Settings::default();
        settings.window.fps = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.window.hud_height = 900.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.players = 5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("vector-duel-does-not-exist.json");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.players, 4);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "vector-duel-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();
        let result = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
