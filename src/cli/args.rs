//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::recording::Duration;

/// Voice notes - record, list and play back voice memos
#[derive(Parser, Debug)]
#[command(name = "voice-notes")]
#[command(version)]
#[command(about = "Record, organise and play back voice notes from the terminal")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory for recordings and the note store
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new voice note (Enter: stop, p: pause/resume, c: cancel)
    Record {
        /// Name of the note (default: "Recording HH:MM:SS")
        #[arg(short, long)]
        name: Option<String>,

        /// Stop automatically after this long (e.g. 30s, 5m, 2m30s)
        #[arg(short = 'm', long, value_name = "TIME")]
        max_duration: Option<String>,
    },
    /// List voice notes, newest first
    #[command(visible_alias = "ls")]
    List {
        /// Only show notes whose name contains this text
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,
    },
    /// Play a voice note (p: pause, f/b: skip, s: speed, seek M:SS, q: quit)
    Play {
        /// Note id or unique id prefix
        id: String,

        /// Playback speed (e.g. 1.5)
        #[arg(short, long)]
        speed: Option<String>,
    },
    /// Rename a voice note
    Rename {
        /// Note id or unique id prefix
        id: String,
        /// New name
        name: String,
    },
    /// Delete a voice note and its audio file
    #[command(visible_alias = "rm")]
    Delete {
        /// Note id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage recorder settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Manage the application config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send feedback, report a bug, request a feature or get help
    #[command(disable_help_subcommand = true)]
    Feedback {
        #[command(subcommand)]
        action: Option<FeedbackAction>,
    },
}

/// Settings action subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// List all settings
    List,
    /// Get a setting
    Get {
        /// Setting key
        key: String,
    },
    /// Change a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// Restore default settings
    Reset,
    /// Show where settings are stored
    Path,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Feedback action subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackAction {
    /// General feedback (default)
    Send,
    /// Report a bug
    Bug,
    /// Request a feature
    Feature,
    /// Show where to get help
    Help,
}

/// Parsed record options
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    pub name: Option<String>,
    pub max_duration: Option<Duration>,
}

/// Parsed play options
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub id: String,
    pub speed: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_record_defaults() {
        let cli = Cli::parse_from(["voice-notes", "record"]);
        assert!(cli.data_dir.is_none());
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Record {
                name: None,
                max_duration: None
            }
        ));
    }

    #[test]
    fn cli_parses_record_options() {
        let cli = Cli::parse_from(["voice-notes", "record", "-n", "Idea", "-m", "2m"]);
        if let Commands::Record { name, max_duration } = cli.command {
            assert_eq!(name.as_deref(), Some("Idea"));
            assert_eq!(max_duration.as_deref(), Some("2m"));
        } else {
            panic!("Expected Record command");
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["voice-notes", "list", "--data-dir", "/tmp/notes", "-v"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/notes")));
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_feedback_actions() {
        let cli = Cli::parse_from(["voice-notes", "feedback"]);
        assert!(matches!(cli.command, Commands::Feedback { action: None }));

        let cli = Cli::parse_from(["voice-notes", "feedback", "bug"]);
        assert!(matches!(
            cli.command,
            Commands::Feedback {
                action: Some(FeedbackAction::Bug)
            }
        ));
    }

    #[test]
    fn cli_parses_list_search() {
        let cli = Cli::parse_from(["voice-notes", "ls", "--search", "meeting"]);
        assert!(matches!(
            cli.command,
            Commands::List { search: Some(ref q) } if q == "meeting"
        ));
    }

    #[test]
    fn cli_parses_play_speed() {
        let cli = Cli::parse_from(["voice-notes", "play", "1700", "--speed", "1.5"]);
        if let Commands::Play { id, speed } = cli.command {
            assert_eq!(id, "1700");
            assert_eq!(speed.as_deref(), Some("1.5"));
        } else {
            panic!("Expected Play command");
        }
    }

    #[test]
    fn cli_parses_delete_yes() {
        let cli = Cli::parse_from(["voice-notes", "rm", "17", "-y"]);
        assert!(matches!(cli.command, Commands::Delete { yes: true, .. }));
    }

    #[test]
    fn cli_parses_settings_set() {
        let cli = Cli::parse_from(["voice-notes", "settings", "set", "theme", "light"]);
        if let Commands::Settings {
            action: SettingsAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "theme");
            assert_eq!(value, "light");
        } else {
            panic!("Expected Settings Set command");
        }
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["voice-notes", "config", "init"]);
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Init
            }
        ));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["voice-notes"]).is_err());
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
