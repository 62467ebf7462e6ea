//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default log filter when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the note store and audio files
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `warn` or `voice_notes=debug`
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            data_dir: Some(Self::default_data_dir()),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Platform data directory for voice notes
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join("voice-notes")
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            data_dir: other.data_dir.or(self.data_dir),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get the data directory, or the platform default if not set
    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the log filter, or `warn` if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Directory of the key-value store files
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir_or_default().join("store")
    }

    /// Directory of recorded audio files
    pub fn audio_dir(&self) -> PathBuf {
        self.data_dir_or_default().join("audio")
    }
}
