//! Recording infrastructure module
//!
//! Microphone capture through cpal, resampled to the recording quality.

mod cpal_recorder;

pub use cpal_recorder::CpalRecorder;

/// Create the default recorder for the current platform
pub fn create_recorder() -> CpalRecorder {
    CpalRecorder::new()
}
