//! Settings use case

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::error::SettingsError;
use crate::domain::settings::Settings;

use super::ports::{KeyValueStore, StorageError};

/// Storage key of the settings object
pub const SETTINGS_KEY: &str = "voice_recorder_settings";

/// Errors from the settings service
#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error(transparent)]
    Invalid(#[from] SettingsError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Loads and saves the settings singleton
pub struct SettingsService<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> SettingsService<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Load settings.
    ///
    /// Missing settings yield the defaults. Unreadable or out-of-range
    /// settings also yield the defaults, with a warning.
    pub async fn load(&self) -> Result<Settings, StorageError> {
        let Some(json) = self.store.get(SETTINGS_KEY).await? else {
            return Ok(Settings::default());
        };

        let settings = match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "stored settings are unreadable, using defaults");
                return Ok(Settings::default());
            }
        };

        match settings.validate() {
            Ok(()) => Ok(settings),
            Err(e) => {
                warn!(error = %e, "stored settings are invalid, using defaults");
                Ok(Settings::default())
            }
        }
    }

    /// Validate and replace the stored settings
    pub async fn save(&self, settings: &Settings) -> Result<(), SettingsServiceError> {
        settings.validate()?;
        let json = serde_json::to_string(settings).map_err(|e| StorageError::Write {
            key: SETTINGS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(SETTINGS_KEY, &json).await?;
        debug!("settings saved");
        Ok(())
    }

    /// Change one setting and save the result
    pub async fn update(&self, key: &str, value: &str) -> Result<Settings, SettingsServiceError> {
        let current = self.load().await?;
        let next = current.with_value(key, value)?;
        self.save(&next).await?;
        Ok(next)
    }

    /// Forget stored settings and return the defaults
    pub async fn reset(&self) -> Result<Settings, SettingsServiceError> {
        self.store.remove(SETTINGS_KEY).await?;
        Ok(Settings::default())
    }
}
