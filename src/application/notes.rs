//! Voice note library use case
//!
//! Persists every note as one JSON array under a single key. Each
//! mutation reads the whole list, changes it and writes it back.

use thiserror::Error;
use tracing::debug;

use crate::domain::error::NoteError;
use crate::domain::note::{filter_notes, resolve_id, NoteId, VoiceNote};

use super::ports::{AudioFileStore, KeyValueStore, StorageError};

/// Storage key of the note list
pub const VOICE_NOTES_KEY: &str = "voice_notes";

/// Errors from the note library
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Note(#[from] NoteError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Note metadata plus the audio files they point at
pub struct VoiceNoteLibrary<K, A>
where
    K: KeyValueStore,
    A: AudioFileStore,
{
    store: K,
    audio: A,
}

impl<K, A> VoiceNoteLibrary<K, A>
where
    K: KeyValueStore,
    A: AudioFileStore,
{
    pub fn new(store: K, audio: A) -> Self {
        Self { store, audio }
    }

    /// Audio file store backing the notes
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Notes in storage order (oldest first)
    async fn load(&self) -> Result<Vec<VoiceNote>, StorageError> {
        let Some(json) = self.store.get(VOICE_NOTES_KEY).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
            key: VOICE_NOTES_KEY.to_string(),
            message: e.to_string(),
        })
    }

    async fn persist(&self, notes: &[VoiceNote]) -> Result<(), StorageError> {
        let json = serde_json::to_string(notes).map_err(|e| StorageError::Write {
            key: VOICE_NOTES_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(VOICE_NOTES_KEY, &json).await?;
        debug!(count = notes.len(), "voice notes written");
        Ok(())
    }

    /// All notes, newest first
    pub async fn list(&self) -> Result<Vec<VoiceNote>, LibraryError> {
        let mut notes = self.load().await?;
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    /// Notes whose name contains `query`, ignoring case, newest first
    pub async fn search(&self, query: &str) -> Result<Vec<VoiceNote>, LibraryError> {
        let notes = self.list().await?;
        Ok(filter_notes(&notes, query).into_iter().cloned().collect())
    }

    pub async fn get(&self, id: &NoteId) -> Result<VoiceNote, LibraryError> {
        let notes = self.load().await?;
        notes
            .into_iter()
            .find(|n| &n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()).into())
    }

    /// Look a note up by exact id or unique id prefix
    pub async fn resolve(&self, input: &str) -> Result<VoiceNote, LibraryError> {
        let notes = self.load().await?;
        Ok(resolve_id(&notes, input)?.clone())
    }

    /// Append a new note
    pub async fn add(&self, note: VoiceNote) -> Result<(), LibraryError> {
        let mut notes = self.load().await?;
        debug!(id = %note.id, name = %note.name, "adding voice note");
        notes.push(note);
        self.persist(&notes).await?;
        Ok(())
    }

    /// Rename a note. Only the name changes.
    pub async fn rename(&self, id: &NoteId, name: &str) -> Result<VoiceNote, LibraryError> {
        let mut notes = self.load().await?;
        let slot = notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;

        *slot = slot.renamed(name)?;
        let renamed = slot.clone();

        self.persist(&notes).await?;
        Ok(renamed)
    }

    /// Delete a note and its audio file
    pub async fn delete(&self, id: &NoteId) -> Result<VoiceNote, LibraryError> {
        let mut notes = self.load().await?;
        let index = notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;

        self.audio.remove(&notes[index].uri).await?;
        let removed = notes.remove(index);

        self.persist(&notes).await?;
        debug!(id = %removed.id, "voice note deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{FsAudioStore, MemoryKeyValueStore};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        library: VoiceNoteLibrary<MemoryKeyValueStore, FsAudioStore>,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let audio = FsAudioStore::new(dir.path().join("audio"));
        Fixture {
            library: VoiceNoteLibrary::new(MemoryKeyValueStore::new(), audio),
            _dir: dir,
        }
    }

    /// Record a tiny clip through the audio store and build its note
    async fn recorded(library: &VoiceNoteLibrary<MemoryKeyValueStore, FsAudioStore>, name: &str, minute: u32) -> VoiceNote {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap();
        let stored = library
            .audio()
            .write(&[0i16; 800], 8_000, created_at)
            .await
            .unwrap();
        VoiceNote::new(Some(name), stored.uri, 0, created_at, Some(stored.size))
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let f = fixture();
        assert!(f.library.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let f = fixture();
        let older = recorded(&f.library, "older", 1).await;
        let newer = recorded(&f.library, "newer", 2).await;
        f.library.add(older).await.unwrap();
        f.library.add(newer).await.unwrap();

        let names: Vec<_> = f
            .library
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn rename_changes_only_the_name() {
        let f = fixture();
        let note = recorded(&f.library, "Draft", 1).await;
        f.library.add(note.clone()).await.unwrap();

        let renamed = f.library.rename(&note.id, "  Final  ").await.unwrap();
        assert_eq!(renamed.name, "Final");

        let stored = f.library.resolve(note.id.as_str()).await.unwrap();
        assert_eq!(stored, VoiceNote { name: "Final".to_string(), ..note });
    }

    #[tokio::test]
    async fn rename_rejects_blank_name() {
        let f = fixture();
        let note = recorded(&f.library, "Draft", 1).await;
        f.library.add(note.clone()).await.unwrap();

        let err = f.library.rename(&note.id, "   ").await.unwrap_err();
        assert!(matches!(err, LibraryError::Note(NoteError::EmptyName)));
        assert_eq!(f.library.resolve(note.id.as_str()).await.unwrap().name, "Draft");
    }

    #[tokio::test]
    async fn get_by_exact_id() {
        let f = fixture();
        let note = recorded(&f.library, "Memo", 1).await;
        f.library.add(note.clone()).await.unwrap();

        assert_eq!(f.library.get(&note.id).await.unwrap(), note);
        assert!(matches!(
            f.library.get(&NoteId::from("42")).await.unwrap_err(),
            LibraryError::Note(NoteError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rename_unknown_id() {
        let f = fixture();
        let err = f
            .library
            .rename(&NoteId::from("missing"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::Note(NoteError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_note_and_audio_file() {
        let f = fixture();
        let keep = recorded(&f.library, "keep", 1).await;
        let gone = recorded(&f.library, "gone", 2).await;
        f.library.add(keep.clone()).await.unwrap();
        f.library.add(gone.clone()).await.unwrap();

        let path = f.library.audio().path(&gone.uri);
        assert!(path.exists());

        f.library.delete(&gone.id).await.unwrap();

        assert!(!path.exists());
        let remaining = f.library.list().await.unwrap();
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_store_untouched() {
        let f = fixture();
        let note = recorded(&f.library, "only", 1).await;
        f.library.add(note).await.unwrap();

        let err = f.library.delete(&NoteId::from("nope")).await.unwrap_err();
        assert!(matches!(err, LibraryError::Note(NoteError::NotFound(_))));
        assert_eq!(f.library.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_filters_case_insensitively() {
        let f = fixture();
        for (i, name) in ["Standup Meeting", "groceries", "meeting notes"].iter().enumerate() {
            let note = recorded(&f.library, name, i as u32).await;
            f.library.add(note).await.unwrap();
        }

        let found = f.library.search("MEETING").await.unwrap();
        let names: Vec<_> = found.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["meeting notes", "Standup Meeting"]);
    }

    #[tokio::test]
    async fn corrupt_store_is_an_error() {
        let store = MemoryKeyValueStore::new();
        store.set(VOICE_NOTES_KEY, "{not json").await.unwrap();
        let dir = TempDir::new().unwrap();
        let library = VoiceNoteLibrary::new(store, FsAudioStore::new(dir.path()));

        let err = library.list().await.unwrap_err();
        assert!(matches!(err, LibraryError::Storage(StorageError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn every_mutation_rewrites_the_whole_list() {
        let f = fixture();
        let a = recorded(&f.library, "a", 1).await;
        let mut b = recorded(&f.library, "b", 2).await;
        b.created_at = a.created_at + ChronoDuration::seconds(1);
        f.library.add(a).await.unwrap();
        f.library.add(b).await.unwrap();

        let raw = f.library.store.get(VOICE_NOTES_KEY).await.unwrap().unwrap();
        let parsed: Vec<VoiceNote> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "a");
    }
}
