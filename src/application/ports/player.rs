//! Playback port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Audio output device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Failed to load audio: {0}")]
    LoadFailed(String),

    #[error("Seek failed: {0}")]
    SeekFailed(String),

    #[error("No sound loaded")]
    NotLoaded,

    #[error("Audio player stopped unexpectedly")]
    Disconnected,
}

/// Snapshot of the loaded sound, as returned by status polling
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackStatus {
    pub position_ms: u64,
    pub is_playing: bool,
    /// The sound played through to its end
    pub finished: bool,
}

/// Port for audio playback of a single loaded sound
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Load a sound and start playing it at `rate`.
    ///
    /// Replaces any previously loaded sound. Returns the sound length in
    /// milliseconds when the decoder knows it.
    async fn load(&self, path: &Path, rate: f32) -> Result<Option<u64>, PlaybackError>;

    async fn play(&self) -> Result<(), PlaybackError>;

    async fn pause(&self) -> Result<(), PlaybackError>;

    /// Stop and rewind to the start
    async fn stop(&self) -> Result<(), PlaybackError>;

    async fn seek(&self, position_ms: u64) -> Result<(), PlaybackError>;

    /// Change the playback rate of the loaded sound.
    ///
    /// Adapters may resample rather than time-stretch, in which case pitch
    /// follows the rate (the rodio adapter does this).
    async fn set_rate(&self, rate: f32) -> Result<(), PlaybackError>;

    async fn status(&self) -> Result<PlaybackStatus, PlaybackError>;

    /// Release the loaded sound
    async fn unload(&self) -> Result<(), PlaybackError>;
}
