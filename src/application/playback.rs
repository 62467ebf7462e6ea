//! Playback control use case

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::domain::note::VoiceNote;
use crate::domain::playback::{InvalidPlaybackTransition, PlaybackSession, PlaybackState};
use crate::domain::settings::Settings;

use super::ports::{AudioPlayer, PlaybackError};

/// Errors from playback control
#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    State(#[from] InvalidPlaybackTransition),
}

/// What pressing play on a note did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// The note was already playing and has been stopped
    Stopped,
}

/// Single-sound player driven by the playback state machine
pub struct PlaybackController<P: AudioPlayer> {
    player: P,
    settings: Settings,
    session: PlaybackSession,
    loaded: bool,
}

impl<P: AudioPlayer> PlaybackController<P> {
    pub fn new(player: P, settings: Settings) -> Self {
        let mut session = PlaybackSession::new();
        session.set_rate(settings.default_playback_speed);
        Self {
            player,
            settings,
            session,
            loaded: false,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    /// Play `note` from the audio file at `path`.
    ///
    /// Pressing play on the note that is already active stops it. Any
    /// other loaded sound is released first.
    pub async fn play(&mut self, note: &VoiceNote, path: &Path) -> Result<PlayOutcome, ControlError> {
        if self.session.is_playing_note(&note.id) {
            self.stop().await?;
            return Ok(PlayOutcome::Stopped);
        }

        self.unload().await?;

        let rate = self.session.rate();
        let known = self.player.load(path, rate).await?;
        self.loaded = true;

        let duration_ms = known.unwrap_or(note.duration * 1000);
        self.session.play(note.id.clone(), duration_ms, rate)?;
        debug!(id = %note.id, duration_ms, rate, "playback started");
        Ok(PlayOutcome::Started)
    }

    /// Pause when playing, resume when paused. Returns the new state.
    pub async fn toggle_pause(&mut self) -> Result<PlaybackState, ControlError> {
        match self.session.state() {
            PlaybackState::Playing => {
                self.session.clone().pause()?;
                self.player.pause().await?;
                self.session.pause()?;
            }
            PlaybackState::Paused => {
                self.session.clone().resume()?;
                self.player.play().await?;
                self.session.resume()?;
            }
            PlaybackState::Idle => {
                return Err(InvalidPlaybackTransition {
                    current_state: PlaybackState::Idle,
                    action: "pause playback",
                }
                .into());
            }
        }
        Ok(self.session.state())
    }

    /// Stop and rewind; the sound stays loaded
    pub async fn stop(&mut self) -> Result<(), ControlError> {
        self.session.clone().stop()?;
        self.player.stop().await?;
        self.session.stop()?;
        debug!("playback stopped");
        Ok(())
    }

    /// Jump to an absolute position (clamped to the sound length)
    pub async fn seek(&mut self, position_ms: u64) -> Result<u64, ControlError> {
        let mut next = self.session.clone();
        let target = next.seek(position_ms)?;
        self.player.seek(target).await?;
        self.session = next;
        Ok(target)
    }

    pub async fn skip_forward(&mut self) -> Result<u64, ControlError> {
        let mut next = self.session.clone();
        let target = next.skip_forward(self.settings.skip_duration)?;
        self.player.seek(target).await?;
        self.session = next;
        Ok(target)
    }

    pub async fn skip_backward(&mut self) -> Result<u64, ControlError> {
        let mut next = self.session.clone();
        let target = next.skip_backward(self.settings.skip_duration)?;
        self.player.seek(target).await?;
        self.session = next;
        Ok(target)
    }

    /// Move to the next speed in the configured list. Returns the new rate.
    pub async fn cycle_speed(&mut self) -> Result<f32, ControlError> {
        let rate = self.settings.next_speed(self.session.rate());
        self.set_speed(rate).await?;
        Ok(rate)
    }

    /// Change the playback rate of the current and any later sound
    pub async fn set_speed(&mut self, rate: f32) -> Result<(), ControlError> {
        if self.loaded {
            self.player.set_rate(rate).await?;
        }
        self.session.set_rate(rate);
        debug!(rate, "playback rate changed");
        Ok(())
    }

    /// Poll the player and fold its status into the session.
    ///
    /// Returns the state after the poll; `Idle` once the sound has ended.
    pub async fn poll(&mut self) -> Result<PlaybackState, ControlError> {
        if !self.session.is_active() {
            return Ok(self.session.state());
        }

        let status = self.player.status().await?;
        if status.finished {
            self.session.finish()?;
            debug!("playback finished");
        } else {
            self.session.update_position(status.position_ms);
        }
        Ok(self.session.state())
    }

    /// Release the loaded sound
    pub async fn unload(&mut self) -> Result<(), ControlError> {
        if self.session.is_active() {
            self.session.stop()?;
        }
        if self.loaded {
            self.player.unload().await?;
            self.loaded = false;
        }
        Ok(())
    }
}
