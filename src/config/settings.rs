//! Configuration settings for quadrant.
//!
//! Settings are loaded from `~/.quadrant/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::QuadrantError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Gesture recognition thresholds.
    pub gesture: GestureSettings,
    /// Sync queue behavior.
    pub sync: SyncSettings,
    /// Terminal board settings.
    pub board: BoardSettings,
}

/// Gesture recognition thresholds, in surface units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Long-press activation delay in milliseconds.
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    /// Horizontal travel that commits a swipe-to-delete.
    #[serde(default = "default_swipe_distance")]
    pub swipe_distance: f64,
    /// Whether swipe-to-delete is enabled.
    #[serde(default = "default_true")]
    pub delete_enabled: bool,
}

/// Sync queue behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Failed attempts before an entry is demoted to failed.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Abort a drain pass on the first failure.
    #[serde(default)]
    pub stop_on_error: bool,
}

/// Terminal board settings. Thresholds are in cells, which are much
/// coarser than pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// Cells of horizontal travel that commit a swipe-to-delete.
    #[serde(default = "default_board_swipe_cells")]
    pub swipe_distance_cells: f64,
    /// Event-loop tick interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

// Default value functions for serde
const fn default_long_press_ms() -> u64 {
    300
}

const fn default_swipe_distance() -> f64 {
    100.0
}

const fn default_true() -> bool {
    true
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_board_swipe_cells() -> f64 {
    8.0
}

const fn default_tick_ms() -> u64 {
    100
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            long_press_ms: default_long_press_ms(),
            swipe_distance: default_swipe_distance(),
            delete_enabled: default_true(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            stop_on_error: false,
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            swipe_distance_cells: default_board_swipe_cells(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, QuadrantError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, QuadrantError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            QuadrantError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            QuadrantError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), QuadrantError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| QuadrantError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            QuadrantError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Gesture thresholds as a recognizer config, in pixel units.
    #[must_use]
    pub fn gesture_config(&self) -> crate::gesture::GestureConfig {
        crate::gesture::GestureConfig {
            long_press_delay: std::time::Duration::from_millis(self.gesture.long_press_ms),
            swipe_distance_threshold: self.gesture.swipe_distance,
            delete_enabled: self.gesture.delete_enabled,
            ..crate::gesture::GestureConfig::default()
        }
    }

    /// Drain configuration from the sync settings.
    #[must_use]
    pub const fn drain_config(&self) -> crate::sync::DrainConfig {
        crate::sync::DrainConfig {
            max_retries: self.sync.max_retries,
            stop_on_error: self.sync.stop_on_error,
        }
    }
}
