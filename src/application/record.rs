//! Record voice note use case

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::note::VoiceNote;
use crate::domain::recording::{InvalidRecordingTransition, RecordingSession, RecordingState};
use crate::domain::settings::Settings;

use super::notes::{LibraryError, VoiceNoteLibrary};
use super::ports::{AudioFileStore, KeyValueStore, RecordingError, StorageError, VoiceRecorder};

/// Errors from the record use case
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error(transparent)]
    State(#[from] InvalidRecordingTransition),

    #[error("Failed to save recording: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to save recording: {0}")]
    Library(#[from] LibraryError),
}

/// What the record button did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Paused,
    Resumed,
}

/// A stopped recording whose audio is written but not yet listed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNote {
    pub note: VoiceNote,
}

/// Result of stopping a recording
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    /// Auto-save is on; the note is in the library
    Saved(VoiceNote),
    /// Auto-save is off; call `commit` or `discard`
    Pending(PendingNote),
}

/// Drives one recording from start to a saved note
pub struct RecordVoiceNoteUseCase<'a, R, K, A>
where
    R: VoiceRecorder,
    K: KeyValueStore,
    A: AudioFileStore,
{
    recorder: R,
    library: &'a VoiceNoteLibrary<K, A>,
    settings: Settings,
    session: RecordingSession,
}

impl<'a, R, K, A> RecordVoiceNoteUseCase<'a, R, K, A>
where
    R: VoiceRecorder,
    K: KeyValueStore,
    A: AudioFileStore,
{
    pub fn new(recorder: R, library: &'a VoiceNoteLibrary<K, A>, settings: Settings) -> Self {
        Self {
            recorder,
            library,
            settings,
            session: RecordingSession::new(),
        }
    }

    pub fn state(&self) -> RecordingState {
        self.session.state()
    }

    /// Milliseconds recorded so far, pauses excluded
    pub fn elapsed_ms(&self) -> u64 {
        self.recorder.elapsed_ms()
    }

    /// Check the microphone and start recording
    pub async fn start(&mut self) -> Result<(), RecordError> {
        let mut next = self.session.clone();
        next.start()?;

        self.recorder.request_permission().await?;
        self.recorder.start(self.settings.recording_quality).await?;

        self.session = next;
        debug!(quality = %self.settings.recording_quality, "recording started");
        Ok(())
    }

    pub async fn pause(&mut self) -> Result<(), RecordError> {
        let mut next = self.session.clone();
        next.pause()?;
        self.recorder.pause().await?;
        self.session = next;
        debug!(elapsed_ms = self.recorder.elapsed_ms(), "recording paused");
        Ok(())
    }

    pub async fn resume(&mut self) -> Result<(), RecordError> {
        let mut next = self.session.clone();
        next.resume()?;
        self.recorder.resume().await?;
        self.session = next;
        debug!("recording resumed");
        Ok(())
    }

    /// Start when idle, otherwise flip between recording and paused
    pub async fn toggle(&mut self) -> Result<ToggleOutcome, RecordError> {
        match self.session.state() {
            RecordingState::Idle | RecordingState::Stopped => {
                self.session.reset();
                self.start().await?;
                Ok(ToggleOutcome::Started)
            }
            RecordingState::Recording => {
                self.pause().await?;
                Ok(ToggleOutcome::Paused)
            }
            RecordingState::Paused => {
                self.resume().await?;
                Ok(ToggleOutcome::Resumed)
            }
        }
    }

    /// Stop recording and write the audio file.
    ///
    /// With auto-save on, the note is added to the library right away.
    pub async fn stop(&mut self, name: Option<&str>) -> Result<StopOutcome, RecordError> {
        self.session.stop()?;

        let result = self.finish(name).await;
        self.session.reset();
        let note = result?;

        if self.settings.auto_save_recordings {
            if let Err(e) = self.library.add(note.clone()).await {
                if let Err(remove_err) = self.library.audio().remove(&note.uri).await {
                    warn!(uri = %note.uri, error = %remove_err, "failed to remove unsaved recording");
                }
                return Err(e.into());
            }
            Ok(StopOutcome::Saved(note))
        } else {
            Ok(StopOutcome::Pending(PendingNote { note }))
        }
    }

    async fn finish(&self, name: Option<&str>) -> Result<VoiceNote, RecordError> {
        let audio = self.recorder.stop().await?;
        let created_at = Utc::now();

        let stored = self
            .library
            .audio()
            .write(&audio.samples, audio.sample_rate, created_at)
            .await?;

        debug!(
            uri = %stored.uri,
            size = stored.size,
            duration_ms = audio.duration_ms,
            "recording written"
        );

        Ok(VoiceNote::new(
            name,
            stored.uri,
            audio.duration_secs(),
            created_at,
            Some(stored.size),
        ))
    }

    /// Keep a pending recording
    pub async fn commit(&self, pending: PendingNote) -> Result<VoiceNote, RecordError> {
        self.library.add(pending.note.clone()).await?;
        Ok(pending.note)
    }

    /// Throw a pending recording away
    pub async fn discard(&self, pending: PendingNote) -> Result<(), RecordError> {
        self.library.audio().remove(&pending.note.uri).await?;
        debug!(uri = %pending.note.uri, "pending recording discarded");
        Ok(())
    }

    /// Stop recording without saving anything
    pub async fn cancel(&mut self) -> Result<(), RecordError> {
        self.session.cancel()?;
        self.recorder.cancel().await?;
        debug!("recording cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::VOICE_NOTES_KEY;
    use crate::application::ports::RecordedAudio;
    use crate::domain::settings::RecordingQuality;
    use crate::infrastructure::storage::{FsAudioStore, MemoryKeyValueStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockRecorder {
        deny_permission: bool,
        recording: AtomicBool,
        paused: AtomicBool,
        quality: Mutex<Option<RecordingQuality>>,
    }

    #[async_trait]
    impl VoiceRecorder for MockRecorder {
        async fn request_permission(&self) -> Result<(), RecordingError> {
            if self.deny_permission {
                return Err(RecordingError::PermissionDenied("no microphone".into()));
            }
            Ok(())
        }

        async fn start(&self, quality: RecordingQuality) -> Result<(), RecordingError> {
            *self.quality.lock().unwrap() = Some(quality);
            self.recording.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn pause(&self) -> Result<(), RecordingError> {
            self.paused.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn resume(&self) -> Result<(), RecordingError> {
            self.paused.store(false, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<RecordedAudio, RecordingError> {
            self.recording.store(false, Ordering::SeqCst);
            Ok(RecordedAudio {
                samples: vec![0; 8_000 * 3],
                sample_rate: 8_000,
                duration_ms: 3_400,
            })
        }

        async fn cancel(&self) -> Result<(), RecordingError> {
            self.recording.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn is_recording(&self) -> bool {
            self.recording.load(Ordering::SeqCst)
        }

        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }

        fn elapsed_ms(&self) -> u64 {
            0
        }
    }

    fn library(dir: &TempDir) -> VoiceNoteLibrary<MemoryKeyValueStore, FsAudioStore> {
        VoiceNoteLibrary::new(
            MemoryKeyValueStore::new(),
            FsAudioStore::new(dir.path().join("audio")),
        )
    }

    #[tokio::test]
    async fn record_and_auto_save() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let mut use_case =
            RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, Settings::default());

        use_case.start().await.unwrap();
        assert_eq!(use_case.state(), RecordingState::Recording);

        let outcome = use_case.stop(Some("Idea")).await.unwrap();
        let StopOutcome::Saved(note) = outcome else {
            panic!("expected the note to be saved");
        };
        assert_eq!(note.name, "Idea");
        assert_eq!(note.duration, 3);
        assert!(note.size.unwrap() > 0);
        assert!(library.audio().path(&note.uri).exists());
        assert_eq!(library.list().await.unwrap(), vec![note]);
        assert_eq!(use_case.state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn failed_save_removes_the_audio_file() {
        let dir = TempDir::new().unwrap();
        let store = MemoryKeyValueStore::new();
        store.set(VOICE_NOTES_KEY, "not json").await.unwrap();
        let library = VoiceNoteLibrary::new(store, FsAudioStore::new(dir.path().join("audio")));
        let mut use_case =
            RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, Settings::default());

        use_case.start().await.unwrap();
        let err = use_case.stop(None).await.unwrap_err();

        assert!(matches!(err, RecordError::Library(_)));
        let leftover = std::fs::read_dir(dir.path().join("audio")).unwrap().count();
        assert_eq!(leftover, 0);
        assert_eq!(use_case.state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn start_uses_configured_quality() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let settings = Settings {
            recording_quality: RecordingQuality::Low,
            ..Default::default()
        };
        let mut use_case = RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, settings);

        use_case.start().await.unwrap();
        assert_eq!(
            *use_case.recorder.quality.lock().unwrap(),
            Some(RecordingQuality::Low)
        );
    }

    #[tokio::test]
    async fn permission_denied_keeps_session_idle() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let recorder = MockRecorder {
            deny_permission: true,
            ..Default::default()
        };
        let mut use_case = RecordVoiceNoteUseCase::new(recorder, &library, Settings::default());

        let err = use_case.start().await.unwrap_err();
        assert!(matches!(
            err,
            RecordError::Recording(RecordingError::PermissionDenied(_))
        ));
        assert_eq!(use_case.state(), RecordingState::Idle);
        assert!(!use_case.recorder.is_recording());
    }

    #[tokio::test]
    async fn toggle_cycles_start_pause_resume() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let mut use_case =
            RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, Settings::default());

        assert_eq!(use_case.toggle().await.unwrap(), ToggleOutcome::Started);
        assert_eq!(use_case.toggle().await.unwrap(), ToggleOutcome::Paused);
        assert!(use_case.recorder.is_paused());
        assert_eq!(use_case.toggle().await.unwrap(), ToggleOutcome::Resumed);
        assert!(!use_case.recorder.is_paused());
    }

    #[tokio::test]
    async fn stop_while_paused_saves() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let mut use_case =
            RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, Settings::default());

        use_case.start().await.unwrap();
        use_case.pause().await.unwrap();
        assert!(matches!(
            use_case.stop(None).await.unwrap(),
            StopOutcome::Saved(_)
        ));
    }

    #[tokio::test]
    async fn pause_when_idle_is_rejected() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let mut use_case =
            RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, Settings::default());

        assert!(matches!(
            use_case.pause().await.unwrap_err(),
            RecordError::State(_)
        ));
        assert!(!use_case.recorder.is_paused());
    }

    #[tokio::test]
    async fn cancel_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let mut use_case =
            RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, Settings::default());

        use_case.start().await.unwrap();
        use_case.cancel().await.unwrap();

        assert_eq!(use_case.state(), RecordingState::Idle);
        assert!(library.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn without_auto_save_stop_is_pending() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let settings = Settings {
            auto_save_recordings: false,
            ..Default::default()
        };
        let mut use_case = RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, settings);

        use_case.start().await.unwrap();
        let StopOutcome::Pending(pending) = use_case.stop(None).await.unwrap() else {
            panic!("expected a pending note");
        };
        assert!(library.list().await.unwrap().is_empty());

        let note = use_case.commit(pending).await.unwrap();
        assert_eq!(library.list().await.unwrap(), vec![note]);
    }

    #[tokio::test]
    async fn discard_removes_the_audio_file() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let settings = Settings {
            auto_save_recordings: false,
            ..Default::default()
        };
        let mut use_case = RecordVoiceNoteUseCase::new(MockRecorder::default(), &library, settings);

        use_case.start().await.unwrap();
        let StopOutcome::Pending(pending) = use_case.stop(None).await.unwrap() else {
            panic!("expected a pending note");
        };
        let path = library.audio().path(&pending.note.uri);
        assert!(path.exists());

        use_case.discard(pending).await.unwrap();
        assert!(!path.exists());
        assert!(library.list().await.unwrap().is_empty());
    }
}
