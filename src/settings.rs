//! Match settings
//!
//! Loaded from a JSON file before a match; every field has a default so a
//! partial file is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::Difficulty;

/// Who controls each paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Near paddle human, far paddle CPU
    #[default]
    Single,
    /// Both paddles human
    Duo,
    /// Both paddles CPU (attract mode)
    Watch,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Single => "Single",
            GameMode::Duo => "Duo",
            GameMode::Watch => "Watch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "solo" => Some(GameMode::Single),
            "duo" | "versus" => Some(GameMode::Duo),
            "watch" | "demo" => Some(GameMode::Watch),
            _ => None,
        }
    }
}

/// Key codes bound to one paddle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSetting {
    pub left: String,
    pub right: String,
    /// Serves the ball while this side holds possession
    pub launch: String,
}

/// Partial update for [`ControlSetting::set_control`]
#[derive(Debug, Clone, Default)]
pub struct ControlOverride {
    pub left: Option<String>,
    pub right: Option<String>,
    pub launch: Option<String>,
}

impl ControlSetting {
    pub fn near_default() -> Self {
        Self {
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
            launch: "KeyW".to_string(),
        }
    }

    pub fn far_default() -> Self {
        Self {
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
            launch: "ArrowUp".to_string(),
        }
    }

    /// Replace only the bindings present in `op`
    pub fn set_control(&mut self, op: ControlOverride) {
        if let Some(left) = op.left {
            self.left = left;
        }
        if let Some(right) = op.right {
            self.right = right;
        }
        if let Some(launch) = op.launch {
            self.launch = launch;
        }
    }
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: GameMode,
    /// CPU tier for every CPU-controlled paddle
    pub difficulty: Difficulty,

    // === Controls ===
    /// Human paddle travel rate (units/s)
    pub paddle_speed: f32,
    pub near_controls: ControlSetting,
    pub far_controls: ControlSetting,

    // === Simulation ===
    /// Largest frame step passed to the simulation (seconds)
    pub max_delta: f32,
    /// Extra collision ray length past one frame of travel
    pub ray_margin: f32,
    /// Idle human serve launches after this many seconds
    pub serve_timeout: f32,
    /// Points needed to win; 0 plays forever
    pub points_to_win: u32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,

    // === Effects ===
    /// Emit effect events to the visual collaborators
    pub effect: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Single,
            difficulty: Difficulty::Normal,

            paddle_speed: HUMAN_PADDLE_SPEED,
            near_controls: ControlSetting::near_default(),
            far_controls: ControlSetting::far_default(),

            max_delta: MAX_DELTA,
            ray_margin: RAY_MARGIN,
            serve_timeout: SERVE_TIMEOUT,
            points_to_win: POINTS_TO_WIN,
            seed: None,

            effect: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, then validate them
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.paddle_speed > 0.0) {
            return Err(SimError::InvalidSetting(format!(
                "paddle_speed must be positive, got {}",
                self.paddle_speed
            )));
        }
        if !(self.max_delta > 0.0) {
            return Err(SimError::InvalidSetting(format!(
                "max_delta must be positive, got {}",
                self.max_delta
            )));
        }
        if !(self.ray_margin >= 0.0) {
            return Err(SimError::InvalidSetting(format!(
                "ray_margin must not be negative, got {}",
                self.ray_margin
            )));
        }
        if !(self.serve_timeout > 0.0) {
            return Err(SimError::InvalidSetting(format!(
                "serve_timeout must be positive, got {}",
                self.serve_timeout
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "mode": "Duo", "points_to_win": 5 }"#).unwrap();
        assert_eq!(settings.mode, GameMode::Duo);
        assert_eq!(settings.points_to_win, 5);
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert_eq!(settings.near_controls, ControlSetting::near_default());
        assert!(settings.effect);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Hard;
        settings.seed = Some(42);
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.difficulty, Difficulty::Hard);
        assert_eq!(back.seed, Some(42));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "paddle_speed": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting(_)));

        let err = Settings::from_json(r#"{ "max_delta": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ mode: ").unwrap_err();
        assert!(matches!(err, SimError::Settings(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/cube-pong-settings.json");
        assert_eq!(settings.mode, GameMode::Single);
    }

    #[test]
    fn test_set_control_partial() {
        let mut controls = ControlSetting::near_default();
        controls.set_control(ControlOverride {
            left: Some("KeyJ".to_string()),
            ..Default::default()
        });
        assert_eq!(controls.left, "KeyJ");
        assert_eq!(controls.right, "KeyD");
        assert_eq!(controls.launch, "KeyW");
    }

    #[test]
    fn test_game_mode_from_str() {
        assert_eq!(GameMode::from_str("DEMO"), Some(GameMode::Watch));
        assert_eq!(GameMode::from_str("duo"), Some(GameMode::Duo));
        assert_eq!(GameMode::from_str("multi"), None);
        assert_eq!(GameMode::Single.as_str(), "Single");
    }
}
