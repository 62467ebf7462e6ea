//! Application layer - Use cases and port interfaces
//!
//! Contains the core operations on voice notes and the trait
//! definitions for external system interactions.

pub mod notes;
pub mod playback;
pub mod ports;
pub mod record;
pub mod settings;

// Re-export use cases
pub use notes::{LibraryError, VoiceNoteLibrary, VOICE_NOTES_KEY};
pub use playback::{ControlError, PlayOutcome, PlaybackController};
pub use record::{PendingNote, RecordError, RecordVoiceNoteUseCase, StopOutcome, ToggleOutcome};
pub use settings::{SettingsService, SettingsServiceError, SETTINGS_KEY};
