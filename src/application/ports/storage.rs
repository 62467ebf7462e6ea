//! Persistence port interfaces

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to read '{key}': {message}")]
    Read { key: String, message: String },

    #[error("Failed to write '{key}': {message}")]
    Write { key: String, message: String },

    #[error("Stored data for '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    #[error("Audio file error: {0}")]
    Audio(String),
}

/// Port for a string key-value store.
///
/// Values are whole documents; callers rewrite the full value on change.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A written audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    pub uri: String,
    pub size: u64,
}

/// Port for storing recorded audio files
#[async_trait]
pub trait AudioFileStore: Send + Sync {
    /// Write mono PCM samples as a new audio file
    async fn write(
        &self,
        samples: &[i16],
        sample_rate: u32,
        created_at: DateTime<Utc>,
    ) -> Result<StoredAudio, StorageError>;

    /// Delete an audio file; a missing file is not an error
    async fn remove(&self, uri: &str) -> Result<(), StorageError>;

    /// Local path of an audio file
    fn path(&self, uri: &str) -> PathBuf;

    /// Whether the audio file is still on disk
    fn exists(&self, uri: &str) -> bool {
        self.path(uri).is_file()
    }
}
