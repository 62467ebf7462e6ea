//! WAV file store for recorded audio

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::application::ports::{AudioFileStore, StorageError, StoredAudio};

/// Writes recordings as mono 16-bit WAV files into one directory.
///
/// The uri of a recording is its file name inside that directory.
#[derive(Debug, Clone)]
pub struct FsAudioStore {
    dir: PathBuf,
}

impl FsAudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(created_at: DateTime<Utc>, attempt: u32) -> String {
        let stamp = created_at.format("%Y-%m-%dT%H-%M-%S-%3f");
        if attempt == 0 {
            format!("recording-{}.wav", stamp)
        } else {
            format!("recording-{}-{}.wav", stamp, attempt)
        }
    }

    /// First free file name for `created_at`
    fn free_path(dir: &Path, created_at: DateTime<Utc>) -> (String, PathBuf) {
        let mut attempt = 0;
        loop {
            let name = Self::file_name(created_at, attempt);
            let path = dir.join(&name);
            if !path.exists() {
                return (name, path);
            }
            attempt += 1;
        }
    }

    fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<u64, StorageError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(hound_error)?;
        for &sample in samples {
            writer.write_sample(sample).map_err(hound_error)?;
        }
        writer.finalize().map_err(hound_error)?;

        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| StorageError::Audio(e.to_string()))
    }
}

fn hound_error(e: hound::Error) -> StorageError {
    StorageError::Audio(e.to_string())
}

#[async_trait]
impl AudioFileStore for FsAudioStore {
    async fn write(
        &self,
        samples: &[i16],
        sample_rate: u32,
        created_at: DateTime<Utc>,
    ) -> Result<StoredAudio, StorageError> {
        let dir = self.dir.clone();
        let samples = samples.to_vec();

        let stored = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir).map_err(|e| StorageError::Audio(e.to_string()))?;
            let (uri, path) = Self::free_path(&dir, created_at);
            let size = Self::write_wav(&path, &samples, sample_rate)?;
            Ok::<_, StorageError>(StoredAudio { uri, size })
        })
        .await
        .map_err(|e| StorageError::Audio(format!("Write task error: {}", e)))??;

        debug!(uri = %stored.uri, size = stored.size, sample_rate, "audio file written");
        Ok(stored)
    }

    async fn remove(&self, uri: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path(uri)).await {
            Ok(()) => {
                debug!(uri, "audio file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Audio(e.to_string())),
        }
    }

    fn path(&self, uri: &str) -> PathBuf {
        self.dir.join(uri)
    }
}
