//! Voice note domain

mod search;
mod voice_note;

pub use search::{filter_notes, resolve_id};
pub use voice_note::{NoteId, VoiceNote};
