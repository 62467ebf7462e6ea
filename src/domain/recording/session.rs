//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Recording states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    Paused,
    Stopped,
}

impl RecordingState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid recording transition is attempted
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidRecordingTransition {
    pub current_state: RecordingState,
    pub action: &'static str,
}

/// Recording session entity.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> PAUSED (pause)
///   PAUSED -> RECORDING (resume)
///   RECORDING | PAUSED -> STOPPED (stop)
///   RECORDING | PAUSED -> IDLE (cancel)
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    state: RecordingState,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Recording or paused
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            RecordingState::Recording | RecordingState::Paused
        )
    }

    pub fn is_paused(&self) -> bool {
        self.state == RecordingState::Paused
    }

    fn transition(
        &mut self,
        allowed: &[RecordingState],
        next: RecordingState,
        action: &'static str,
    ) -> Result<(), InvalidRecordingTransition> {
        if !allowed.contains(&self.state) {
            return Err(InvalidRecordingTransition {
                current_state: self.state,
                action,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidRecordingTransition> {
        self.transition(
            &[RecordingState::Idle],
            RecordingState::Recording,
            "start recording",
        )
    }

    /// Transition from RECORDING to PAUSED
    pub fn pause(&mut self) -> Result<(), InvalidRecordingTransition> {
        self.transition(
            &[RecordingState::Recording],
            RecordingState::Paused,
            "pause recording",
        )
    }

    /// Transition from PAUSED to RECORDING
    pub fn resume(&mut self) -> Result<(), InvalidRecordingTransition> {
        self.transition(
            &[RecordingState::Paused],
            RecordingState::Recording,
            "resume recording",
        )
    }

    /// Transition to STOPPED, keeping the captured audio
    pub fn stop(&mut self) -> Result<(), InvalidRecordingTransition> {
        self.transition(
            &[RecordingState::Recording, RecordingState::Paused],
            RecordingState::Stopped,
            "stop recording",
        )
    }

    /// Transition back to IDLE, discarding the captured audio
    pub fn cancel(&mut self) -> Result<(), InvalidRecordingTransition> {
        self.transition(
            &[RecordingState::Recording, RecordingState::Paused],
            RecordingState::Idle,
            "cancel recording",
        )
    }

    /// Return to IDLE once a stopped recording has been handled
    pub fn reset(&mut self) {
        self.state = RecordingState::Idle;
    }
}
