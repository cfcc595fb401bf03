//! Game settings and preferences
//!
//! Mode and target chosen on the settings screen before a round. Persisted
//! in LocalStorage on the web and as a JSON file natively.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RoundError, StorageError};
use crate::round::{COUNTDOWN_PRESETS, RoundConfig, SCORE_TARGET_PRESETS};

/// Round mode selected in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Guess as many as possible in the time limit
    #[default]
    Countdown,
    /// Guess a set number as fast as possible
    ScoreTarget,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Countdown => "Countdown",
            GameMode::ScoreTarget => "Score Target",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "countdown" | "time" => Some(GameMode::Countdown),
            "score" | "score-target" | "race" => Some(GameMode::ScoreTarget),
            _ => None,
        }
    }

    /// One-line explanation for the settings screen
    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Countdown => "Guess as many as you can before time runs out",
            GameMode::ScoreTarget => "Guess the set number of questions, fastest time wins",
        }
    }

    /// Target values offered for this mode
    pub fn presets(&self) -> &'static [u32] {
        match self {
            GameMode::Countdown => &COUNTDOWN_PRESETS,
            GameMode::ScoreTarget => &SCORE_TARGET_PRESETS,
        }
    }

    /// Unit shown after a target value
    pub fn unit(&self) -> &'static str {
        match self {
            GameMode::Countdown => "s",
            GameMode::ScoreTarget => " questions",
        }
    }

    fn default_target(&self) -> u32 {
        match self {
            GameMode::Countdown => 60,
            GameMode::ScoreTarget => 10,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub mode: GameMode,
    /// Seconds (countdown) or questions (score target)
    pub target: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Countdown,
            target: 60,
        }
    }
}

impl Settings {
    /// Switch mode, keeping the target only if it still makes sense for the
    /// new mode (countdowns are longer than 20 s, score targets at most 20)
    pub fn switch_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        let keeps = match mode {
            GameMode::Countdown => self.target > 20,
            GameMode::ScoreTarget => self.target <= 20,
        };
        if !keeps {
            self.target = mode.default_target();
        }
    }

    /// Pick a target from the current mode's presets
    pub fn set_target(&mut self, value: u32) -> Result<(), RoundError> {
        if !self.mode.presets().contains(&value) {
            return Err(RoundError::InvalidConfig(format!(
                "{} is not an option for {} (choose one of {:?})",
                value,
                self.mode.as_str(),
                self.mode.presets()
            )));
        }
        self.target = value;
        Ok(())
    }

    /// Round configuration for the next round
    pub fn round_config(&self) -> Result<RoundConfig, RoundError> {
        match self.mode {
            GameMode::Countdown => RoundConfig::countdown(self.target as f64),
            GameMode::ScoreTarget => RoundConfig::score_target(self.target),
        }
    }

    /// Target with its unit, e.g. "60s"
    pub fn target_label(&self) -> String {
        format!("{}{}", self.target, self.mode.unit())
    }

    /// LocalStorage key / file name stem
    const STORAGE_KEY: &'static str = "heads_up_settings";

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Stored settings whose target is not one of the mode's presets are
    /// replaced with the defaults
    fn checked(self) -> Self {
        if self.mode.presets().contains(&self.target) {
            return self;
        }
        log::warn!(
            "Stored target {} is not an option for {}, using default settings",
            self.target,
            self.mode.as_str()
        );
        Self::default()
    }

    /// Load settings from a JSON file, defaulting when absent or corrupt
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(StorageError::from)
            .and_then(|raw| Self::from_json(&raw))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.checked()
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// File name used under a data directory
    pub fn file_name() -> String {
        format!("{}.json", Self::STORAGE_KEY)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings.checked();
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;

        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StorageError::Unavailable)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_minute_countdown() {
        let settings = Settings::default();
        assert_eq!(
            settings.round_config().unwrap(),
            RoundConfig::Countdown { seconds: 60.0 }
        );
        assert_eq!(settings.target_label(), "60s");
    }

    #[test]
    fn test_switch_mode_resets_out_of_range_target() {
        let mut settings = Settings::default();
        settings.switch_mode(GameMode::ScoreTarget);
        assert_eq!(settings.target, 10);

        settings.set_target(15).unwrap();
        settings.switch_mode(GameMode::Countdown);
        assert_eq!(settings.target, 60);

        settings.set_target(120).unwrap();
        settings.switch_mode(GameMode::Countdown);
        assert_eq!(settings.target, 120);
    }

    #[test]
    fn test_switch_mode_keeps_compatible_target() {
        let mut settings = Settings {
            mode: GameMode::Countdown,
            target: 5,
        };
        settings.switch_mode(GameMode::ScoreTarget);
        assert_eq!(settings.target, 5);
        assert_eq!(
            settings.round_config().unwrap(),
            RoundConfig::ScoreTarget { count: 5 }
        );
    }

    #[test]
    fn test_set_target_only_accepts_presets() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_target(45),
            Err(RoundError::InvalidConfig(_))
        ));
        assert_eq!(settings.target, 60);
        settings.set_target(90).unwrap();
        assert_eq!(settings.target, 90);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("Countdown"), Some(GameMode::Countdown));
        assert_eq!(GameMode::from_str("score"), Some(GameMode::ScoreTarget));
        assert_eq!(GameMode::from_str("chess"), None);
    }

    #[test]
    fn test_file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Settings::file_name());
        assert_eq!(Settings::load_from(&path), Settings::default());

        let mut settings = Settings::default();
        settings.switch_mode(GameMode::ScoreTarget);
        settings.set_target(20).unwrap();
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);

        std::fs::write(&path, "{ nope").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_load_rejects_target_outside_presets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Settings::file_name());

        std::fs::write(&path, r#"{"mode":"Countdown","target":5}"#).unwrap();
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, Settings::default());
        assert_eq!(
            loaded.round_config().unwrap(),
            RoundConfig::Countdown { seconds: 60.0 }
        );

        std::fs::write(&path, r#"{"mode":"ScoreTarget","target":500}"#).unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());

        std::fs::write(&path, r#"{"mode":"ScoreTarget","target":15}"#).unwrap();
        assert_eq!(
            Settings::load_from(&path),
            Settings {
                mode: GameMode::ScoreTarget,
                target: 15
            }
        );
    }
}
