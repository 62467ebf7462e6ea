//! Playback session state machine

use std::fmt;
use thiserror::Error;

use crate::domain::note::NoteId;

/// Playback states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

impl PlaybackState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid playback transition is attempted
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidPlaybackTransition {
    pub current_state: PlaybackState,
    pub action: &'static str,
}

/// Playback session entity.
///
/// State machine:
///   IDLE -> PLAYING (play)
///   PLAYING -> PAUSED (pause)
///   PAUSED -> PLAYING (resume)
///   PLAYING | PAUSED -> IDLE (stop, finish)
///
/// Positions are milliseconds and always stay within `[0, duration]`.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    state: PlaybackState,
    note_id: Option<NoteId>,
    position_ms: u64,
    duration_ms: u64,
    rate: f32,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            note_id: None,
            position_ms: 0,
            duration_ms: 0,
            rate: 1.0,
        }
    }
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Note currently loaded, if any
    pub fn note_id(&self) -> Option<&NoteId> {
        self.note_id.as_ref()
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Playing or paused
    pub fn is_active(&self) -> bool {
        self.state != PlaybackState::Idle
    }

    /// Check whether `id` is the note being played
    pub fn is_playing_note(&self, id: &NoteId) -> bool {
        self.is_active() && self.note_id.as_ref() == Some(id)
    }

    fn require_active(&self, action: &'static str) -> Result<(), InvalidPlaybackTransition> {
        if self.is_active() {
            Ok(())
        } else {
            Err(InvalidPlaybackTransition {
                current_state: self.state,
                action,
            })
        }
    }

    /// Transition from IDLE to PLAYING with a freshly loaded note
    pub fn play(
        &mut self,
        note_id: NoteId,
        duration_ms: u64,
        rate: f32,
    ) -> Result<(), InvalidPlaybackTransition> {
        if self.state != PlaybackState::Idle {
            return Err(InvalidPlaybackTransition {
                current_state: self.state,
                action: "start playback",
            });
        }
        self.state = PlaybackState::Playing;
        self.note_id = Some(note_id);
        self.position_ms = 0;
        self.duration_ms = duration_ms;
        self.rate = rate;
        Ok(())
    }

    /// Transition from PLAYING to PAUSED
    pub fn pause(&mut self) -> Result<(), InvalidPlaybackTransition> {
        if self.state != PlaybackState::Playing {
            return Err(InvalidPlaybackTransition {
                current_state: self.state,
                action: "pause playback",
            });
        }
        self.state = PlaybackState::Paused;
        Ok(())
    }

    /// Transition from PAUSED to PLAYING
    pub fn resume(&mut self) -> Result<(), InvalidPlaybackTransition> {
        if self.state != PlaybackState::Paused {
            return Err(InvalidPlaybackTransition {
                current_state: self.state,
                action: "resume playback",
            });
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Stop playback and rewind
    pub fn stop(&mut self) -> Result<(), InvalidPlaybackTransition> {
        self.require_active("stop playback")?;
        self.reset();
        Ok(())
    }

    /// The sound reached its end
    pub fn finish(&mut self) -> Result<(), InvalidPlaybackTransition> {
        self.require_active("finish playback")?;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.note_id = None;
        self.position_ms = 0;
    }

    /// Record a polled position
    pub fn update_position(&mut self, position_ms: u64) {
        if self.is_active() {
            self.position_ms = position_ms.min(self.duration_ms);
        }
    }

    /// Move to an absolute position, clamped to the sound length.
    /// Returns the new position.
    pub fn seek(&mut self, position_ms: u64) -> Result<u64, InvalidPlaybackTransition> {
        self.require_active("seek")?;
        self.position_ms = position_ms.min(self.duration_ms);
        Ok(self.position_ms)
    }

    /// Jump ahead by `secs`, stopping at the end of the sound
    pub fn skip_forward(&mut self, secs: u64) -> Result<u64, InvalidPlaybackTransition> {
        self.require_active("skip forward")?;
        let target = self.position_ms.saturating_add(secs * 1000);
        self.seek(target)
    }

    /// Jump back by `secs`, stopping at the start of the sound
    pub fn skip_backward(&mut self, secs: u64) -> Result<u64, InvalidPlaybackTransition> {
        self.require_active("skip backward")?;
        let target = self.position_ms.saturating_sub(secs * 1000);
        self.seek(target)
    }

    /// Remember the playback rate; applies to the next sound when idle
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }
}
