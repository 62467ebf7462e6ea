//! Rodio-based audio player
//!
//! rodio's `OutputStream` is not Send, so the stream and its sink live on
//! a dedicated thread. The async side sends commands over a channel and
//! waits for a one-shot reply.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{AudioPlayer, PlaybackError, PlaybackStatus};

type Reply<T> = oneshot::Sender<Result<T, PlaybackError>>;

/// Commands handled by the player thread
enum PlayerCommand {
    Load {
        path: PathBuf,
        rate: f32,
        reply: Reply<Option<u64>>,
    },
    Play(Reply<()>),
    Pause(Reply<()>),
    Stop(Reply<()>),
    Seek(u64, Reply<()>),
    SetRate(f32, Reply<()>),
    Status(Reply<PlaybackStatus>),
    Unload(Reply<()>),
    Shutdown,
}

/// Audio player backed by the default output device
pub struct RodioPlayer {
    sender: Sender<PlayerCommand>,
    thread: Option<JoinHandle<()>>,
}

impl RodioPlayer {
    /// Spawn the player thread. The output device is opened on first load.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        let thread = thread::spawn(move || player_thread_main(receiver));
        Self {
            sender,
            thread: Some(thread),
        }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> PlayerCommand,
    ) -> Result<T, PlaybackError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make(reply))
            .map_err(|_| PlaybackError::Disconnected)?;
        response.await.map_err(|_| PlaybackError::Disconnected)?
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        let _ = self.sender.send(PlayerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn load(&self, path: &Path, rate: f32) -> Result<Option<u64>, PlaybackError> {
        let path = path.to_path_buf();
        self.request(|reply| PlayerCommand::Load { path, rate, reply })
            .await
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        self.request(PlayerCommand::Play).await
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.request(PlayerCommand::Pause).await
    }

    async fn stop(&self) -> Result<(), PlaybackError> {
        self.request(PlayerCommand::Stop).await
    }

    async fn seek(&self, position_ms: u64) -> Result<(), PlaybackError> {
        self.request(|reply| PlayerCommand::Seek(position_ms, reply))
            .await
    }

    async fn set_rate(&self, rate: f32) -> Result<(), PlaybackError> {
        self.request(|reply| PlayerCommand::SetRate(rate, reply))
            .await
    }

    async fn status(&self) -> Result<PlaybackStatus, PlaybackError> {
        self.request(PlayerCommand::Status).await
    }

    async fn unload(&self) -> Result<(), PlaybackError> {
        self.request(PlayerCommand::Unload).await
    }
}

/// State owned by the player thread
#[derive(Default)]
struct PlayerState {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl PlayerState {
    fn handle(&mut self) -> Result<&OutputStreamHandle, PlaybackError> {
        if self.output.is_none() {
            let output = OutputStream::try_default()
                .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
            debug!("audio output opened");
            self.output = Some(output);
        }
        match &self.output {
            Some((_, handle)) => Ok(handle),
            None => Err(PlaybackError::DeviceNotAvailable(
                "output stream missing".into(),
            )),
        }
    }

    fn sink(&self) -> Result<&Sink, PlaybackError> {
        self.sink.as_ref().ok_or(PlaybackError::NotLoaded)
    }

    fn load(&mut self, path: &Path, rate: f32) -> Result<Option<u64>, PlaybackError> {
        self.unload();

        let file = File::open(path)
            .map_err(|e| PlaybackError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::LoadFailed(e.to_string()))?;
        let length_ms = source.total_duration().map(|d| d.as_millis() as u64);

        let sink = Sink::try_new(self.handle()?)
            .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
        // Sink speed resamples, so pitch shifts with the rate
        sink.set_speed(rate);
        sink.append(source);
        sink.play();

        debug!(path = %path.display(), ?length_ms, rate, "sound loaded");
        self.sink = Some(sink);
        Ok(length_ms)
    }

    fn seek(&self, position_ms: u64) -> Result<(), PlaybackError> {
        self.sink()?
            .try_seek(Duration::from_millis(position_ms))
            .map_err(|e| PlaybackError::SeekFailed(e.to_string()))
    }

    /// Pause and rewind, keeping the sound loaded
    fn stop(&self) -> Result<(), PlaybackError> {
        let sink = self.sink()?;
        sink.pause();
        sink.try_seek(Duration::ZERO)
            .map_err(|e| PlaybackError::SeekFailed(e.to_string()))
    }

    fn status(&self) -> PlaybackStatus {
        match &self.sink {
            Some(sink) => PlaybackStatus {
                position_ms: sink.get_pos().as_millis() as u64,
                is_playing: !sink.is_paused() && !sink.empty(),
                finished: sink.empty(),
            },
            None => PlaybackStatus::default(),
        }
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("sound unloaded");
        }
    }
}

/// Main loop of the player thread
fn player_thread_main(receiver: Receiver<PlayerCommand>) {
    let mut state = PlayerState::default();

    while let Ok(command) = receiver.recv() {
        match command {
            PlayerCommand::Load { path, rate, reply } => {
                let result = state.load(&path, rate);
                if let Err(e) = &result {
                    warn!(error = %e, "failed to load sound");
                }
                let _ = reply.send(result);
            }
            PlayerCommand::Play(reply) => {
                let _ = reply.send(state.sink().map(Sink::play));
            }
            PlayerCommand::Pause(reply) => {
                let _ = reply.send(state.sink().map(Sink::pause));
            }
            PlayerCommand::Stop(reply) => {
                let _ = reply.send(state.stop());
            }
            PlayerCommand::Seek(position_ms, reply) => {
                let _ = reply.send(state.seek(position_ms));
            }
            PlayerCommand::SetRate(rate, reply) => {
                let _ = reply.send(state.sink().map(|sink| sink.set_speed(rate)));
            }
            PlayerCommand::Status(reply) => {
                let _ = reply.send(Ok(state.status()));
            }
            PlayerCommand::Unload(reply) => {
                state.unload();
                let _ = reply.send(Ok(()));
            }
            PlayerCommand::Shutdown => break,
        }
    }

    state.unload();
    debug!("player thread exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_without_a_sound_fail() {
        let player = RodioPlayer::new();
        assert!(matches!(player.play().await, Err(PlaybackError::NotLoaded)));
        assert!(matches!(player.seek(1_000).await, Err(PlaybackError::NotLoaded)));
        assert!(matches!(player.set_rate(1.5).await, Err(PlaybackError::NotLoaded)));
    }

    #[tokio::test]
    async fn status_without_a_sound_is_default() {
        let player = RodioPlayer::new();
        assert_eq!(player.status().await.unwrap(), PlaybackStatus::default());
        player.unload().await.unwrap();
    }

    #[tokio::test]
    async fn loading_a_missing_file_fails() {
        let player = RodioPlayer::new();
        let err = player
            .load(Path::new("/nonexistent/recording.wav"), 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, PlaybackError::LoadFailed(_)));
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn plays_a_wav_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..8_000 {
            writer.write_sample(((i % 40) * 400) as i16).unwrap();
        }
        writer.finalize().unwrap();

        let player = RodioPlayer::new();
        let length = player.load(&path, 1.0).await.unwrap();
        assert_eq!(length, Some(1_000));
        player.seek(500).await.unwrap();
        player.pause().await.unwrap();
        assert!(!player.status().await.unwrap().is_playing);
    }
}
