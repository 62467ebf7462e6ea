//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, stdin commands,
//! signal handling, and the per-command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod feedback_cmd;
pub mod input;
pub mod notes_cmd;
pub mod play_cmd;
pub mod presenter;
pub mod record_cmd;
pub mod settings_cmd;
pub mod signals;

// Re-export commonly used types
pub use app::{run, CliError, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, FeedbackAction, PlayOptions, RecordOptions, SettingsAction};
pub use presenter::Presenter;
