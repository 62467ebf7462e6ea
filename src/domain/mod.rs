//! Domain layer - Core business logic
//!
//! Contains value objects, state machines, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod feedback;
pub mod note;
pub mod playback;
pub mod recording;
pub mod settings;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use note::{filter_notes, NoteId, VoiceNote};
pub use playback::{PlaybackSession, PlaybackState};
pub use recording::{format_clock, Duration, RecordingSession, RecordingState};
pub use settings::{RecordingQuality, Settings, Theme};
