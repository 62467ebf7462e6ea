//! Recording domain

mod duration;
mod session;

pub use duration::{format_clock, parse_clock, Duration};
pub use session::{InvalidRecordingTransition, RecordingSession, RecordingState};
