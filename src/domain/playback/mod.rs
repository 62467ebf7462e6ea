//! Playback domain

mod session;

pub use session::{InvalidPlaybackTransition, PlaybackSession, PlaybackState};
