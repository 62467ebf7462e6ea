//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when parsing a clock position such as `1:05`
#[derive(Debug, Clone, Error)]
#[error("Invalid position: \"{input}\". Expected M:SS (e.g., 1:05) or plain seconds")]
pub struct ClockParseError {
    pub input: String,
}

/// Errors raised by voice note operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("Note name cannot be empty")]
    EmptyName,

    #[error("No voice note with id \"{0}\"")]
    NotFound(String),

    #[error("Id prefix \"{prefix}\" is ambiguous ({count} notes match)")]
    AmbiguousId { prefix: String, count: usize },
}

/// Errors raised when validating or editing settings
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl SettingsError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
