//! Persistence adapters
//!
//! Key-value stores for note metadata and settings, plus the WAV file
//! store for recorded audio.

mod audio_files;
mod file_kv;
mod memory;

pub use audio_files::FsAudioStore;
pub use file_kv::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
