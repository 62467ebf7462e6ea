//! Recording port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::settings::RecordingQuality;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("No recording in progress")]
    NotRecording,

    #[error("No audio data captured")]
    Empty,
}

/// Audio captured by a finished recording.
///
/// Mono PCM at `sample_rate`, already converted to the requested quality.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    /// Time spent recording, excluding pauses
    pub duration_ms: u64,
}

impl RecordedAudio {
    /// Whole seconds of audio
    pub fn duration_secs(&self) -> u64 {
        self.duration_ms / 1000
    }
}

/// Port for microphone recording with pause support
#[async_trait]
pub trait VoiceRecorder: Send + Sync {
    /// Make sure an input device is usable before recording starts.
    async fn request_permission(&self) -> Result<(), RecordingError>;

    /// Start capturing; the result is converted to `quality` on stop.
    async fn start(&self, quality: RecordingQuality) -> Result<(), RecordingError>;

    /// Stop capturing samples without closing the stream.
    async fn pause(&self) -> Result<(), RecordingError>;

    /// Continue capturing after a pause.
    async fn resume(&self) -> Result<(), RecordingError>;

    /// Finish the recording and return the captured audio.
    async fn stop(&self) -> Result<RecordedAudio, RecordingError>;

    /// Finish the recording and drop the captured audio.
    async fn cancel(&self) -> Result<(), RecordingError>;

    fn is_recording(&self) -> bool;

    fn is_paused(&self) -> bool;

    /// Milliseconds of captured audio so far (pauses excluded)
    fn elapsed_ms(&self) -> u64;
}
