//! App wiring: config merging, logging and command dispatch

use std::env;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::ports::{ConfigStore, StorageError};
use crate::application::{
    ControlError, LibraryError, RecordError, SettingsService, SettingsServiceError,
    VoiceNoteLibrary,
};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;
use crate::domain::settings::MAX_PLAYBACK_SPEED;
use crate::infrastructure::{FileKeyValueStore, FsAudioStore, XdgConfigStore};

use super::args::{Commands, PlayOptions, RecordOptions};
use super::config_cmd::handle_config_command;
use super::feedback_cmd::handle_feedback_command;
use super::notes_cmd::{handle_delete, handle_list, handle_rename};
use super::play_cmd::run_play;
use super::presenter::Presenter;
use super::record_cmd::run_record;
use super::settings_cmd::handle_settings_command;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "VOICE_NOTES_DATA_DIR";

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Settings(#[from] SettingsServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Playback(#[from] ControlError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::Settings(SettingsServiceError::Invalid(_)) => EXIT_USAGE_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            Presenter::new().warn(&format!("Ignoring config file: {}", e));
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        data_dir: env::var_os(DATA_DIR_ENV)
            .filter(|s| !s.is_empty())
            .map(Into::into),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Log filter used when `RUST_LOG` is not set
pub fn default_log_filter(config: &AppConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.log_level_or_default().to_string()
    }
}

/// Install the stderr tracing subscriber
pub fn init_tracing(config: &AppConfig, verbose: bool) {
    let fallback = default_log_filter(config, verbose);
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Note library over the data directory
pub fn open_library(config: &AppConfig) -> VoiceNoteLibrary<FileKeyValueStore, FsAudioStore> {
    VoiceNoteLibrary::new(
        FileKeyValueStore::new(config.store_dir()),
        FsAudioStore::new(config.audio_dir()),
    )
}

/// Settings service over the data directory
pub fn open_settings(config: &AppConfig) -> SettingsService<FileKeyValueStore> {
    SettingsService::new(FileKeyValueStore::new(config.store_dir()))
}

fn parse_max_duration(value: Option<String>) -> Result<Option<Duration>, CliError> {
    value
        .map(|s| {
            s.parse::<Duration>()
                .map_err(|e| CliError::Usage(format!("Invalid max-duration: {}", e)))
        })
        .transpose()
}

fn parse_speed(value: Option<String>) -> Result<Option<f32>, CliError> {
    value
        .map(|s| {
            let speed = s
                .trim()
                .trim_end_matches('x')
                .parse::<f32>()
                .map_err(|_| CliError::Usage(format!("Invalid speed: '{}'", s)))?;
            if !(speed > 0.0 && speed <= MAX_PLAYBACK_SPEED) {
                return Err(CliError::Usage(format!(
                    "Invalid speed: {} is outside (0, {}]",
                    speed,
                    MAX_PLAYBACK_SPEED
                )));
            }
            Ok(speed)
        })
        .transpose()
}

/// Run one subcommand
pub async fn run(command: Commands, config: &AppConfig) -> Result<(), CliError> {
    match command {
        Commands::Record { name, max_duration } => {
            let options = RecordOptions {
                name,
                max_duration: parse_max_duration(max_duration)?,
            };
            run_record(options, config).await
        }
        Commands::List { search } => handle_list(config, search.as_deref()).await,
        Commands::Play { id, speed } => {
            let options = PlayOptions {
                id,
                speed: parse_speed(speed)?,
            };
            run_play(options, config).await
        }
        Commands::Rename { id, name } => handle_rename(config, &id, &name).await,
        Commands::Delete { id, yes } => handle_delete(config, &id, yes).await,
        Commands::Settings { action } => handle_settings_command(action, config).await,
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            handle_config_command(action, &store, &Presenter::new()).await
        }
        Commands::Feedback { action } => {
            handle_feedback_command(action, &Presenter::new());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::AudioFileStore;
    use crate::domain::error::SettingsError;
    use std::path::PathBuf;

    #[test]
    fn verbose_raises_log_filter() {
        let config = AppConfig::defaults();
        assert_eq!(default_log_filter(&config, false), "warn");
        assert_eq!(default_log_filter(&config, true), "debug");
    }

    #[test]
    fn configured_log_level_is_used() {
        let config = AppConfig {
            log_level: Some("voice_notes=trace".to_string()),
            ..Default::default()
        };
        assert_eq!(default_log_filter(&config, false), "voice_notes=trace");
    }

    #[test]
    fn max_duration_is_parsed() {
        let parsed = parse_max_duration(Some("1m30s".to_string())).unwrap();
        assert_eq!(parsed.map(|d| d.as_secs()), Some(90));
        assert!(parse_max_duration(None).unwrap().is_none());
    }

    #[test]
    fn bad_max_duration_is_a_usage_error() {
        let err = parse_max_duration(Some("soon".to_string())).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE_ERROR);
    }

    #[test]
    fn speed_must_be_in_range() {
        assert_eq!(parse_speed(Some("1.5x".to_string())).unwrap(), Some(1.5));
        assert!(parse_speed(Some("0".to_string())).is_err());
        assert!(parse_speed(Some("9".to_string())).is_err());
        assert!(parse_speed(Some("fast".to_string())).is_err());
    }

    #[test]
    fn invalid_setting_is_a_usage_error() {
        let err = CliError::from(SettingsServiceError::Invalid(SettingsError::UnknownKey(
            "volume".to_string(),
        )));
        assert_eq!(err.exit_code(), EXIT_USAGE_ERROR);
    }

    #[test]
    fn runtime_errors_exit_with_one() {
        let err = CliError::Other("boom".to_string());
        assert_eq!(err.exit_code(), EXIT_ERROR);
    }

    #[test]
    fn library_lives_under_data_dir() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/srv/notes")),
            ..Default::default()
        };
        let library = open_library(&config);
        assert_eq!(
            library.audio().path("a.wav"),
            PathBuf::from("/srv/notes/audio/a.wav")
        );
    }
}
