//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod player;
pub mod recorder;
pub mod storage;

// Re-export common types
pub use config::ConfigStore;
pub use player::{AudioPlayer, PlaybackError, PlaybackStatus};
pub use recorder::{RecordedAudio, RecordingError, VoiceRecorder};
pub use storage::{AudioFileStore, KeyValueStore, StorageError, StoredAudio};
