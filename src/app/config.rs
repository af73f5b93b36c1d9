//! Configuration Management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Adb invocation settings
    pub adb: AdbConfig,
    /// Capture settings
    pub capture: CaptureConfig,
    /// Replay settings
    pub replay: ReplayConfig,
}

/// Adb invocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdbConfig {
    /// Path to the adb executable
    pub path: String,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Correlation above which a swipe path is reduced to its endpoints
    pub straightness_threshold: f64,
}

/// Replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Floor for reconstructed swipe segment durations (seconds)
    pub min_swipe_duration: f64,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            path: "adb".to_string(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            straightness_threshold: crate::analysis::simplify::DEFAULT_STRAIGHTNESS_THRESHOLD,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            min_swipe_duration: crate::replay::scheduler::MIN_SWIPE_DURATION,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.adb.path.trim().is_empty() {
            return Err(crate::Error::Config("adb path must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.capture.straightness_threshold) {
            return Err(crate::Error::Config(format!(
                "straightness_threshold must be in [0, 1], got {}",
                self.capture.straightness_threshold
            )));
        }
        if !(0.0..=10.0).contains(&self.replay.min_swipe_duration) {
            return Err(crate::Error::Config(format!(
                "min_swipe_duration must be in [0, 10], got {}",
                self.replay.min_swipe_duration
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".gesture_replay").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
