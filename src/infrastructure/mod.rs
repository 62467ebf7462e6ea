//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: cpal
//! microphone capture, rodio playback, file persistence and the
//! config file.

pub mod config;
pub mod playback;
pub mod recording;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use playback::RodioPlayer;
pub use recording::{create_recorder, CpalRecorder};
pub use storage::{FileKeyValueStore, FsAudioStore, MemoryKeyValueStore};
