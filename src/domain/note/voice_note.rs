//! Voice note entity

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::NoteError;

/// Identifier of a voice note.
///
/// Generated from the creation instant in milliseconds since the Unix epoch,
/// so ids sort in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create an id for a note created at the given instant
    pub fn from_timestamp(created_at: DateTime<Utc>) -> Self {
        Self(created_at.timestamp_millis().to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded audio clip with its metadata.
///
/// Field names follow the stored JSON layout (`createdAt`, optional `size`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNote {
    pub id: NoteId,
    pub name: String,
    /// Location of the audio file
    pub uri: String,
    /// Length of the recording in whole seconds
    pub duration: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl VoiceNote {
    /// Create a note for a freshly stopped recording.
    ///
    /// Uses the default `Recording HH:MM:SS` name when `name` is `None`
    /// or blank.
    pub fn new(
        name: Option<&str>,
        uri: impl Into<String>,
        duration: u64,
        created_at: DateTime<Utc>,
        size: Option<u64>,
    ) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Self::default_name(created_at));

        Self {
            id: NoteId::from_timestamp(created_at),
            name,
            uri: uri.into(),
            duration,
            created_at,
            size,
        }
    }

    /// Default display name, based on the local time of creation
    pub fn default_name(created_at: DateTime<Utc>) -> String {
        let local: DateTime<Local> = created_at.with_timezone(&Local);
        format!("Recording {}", local.format("%H:%M:%S"))
    }

    /// Return a copy of this note with a new name.
    ///
    /// The name is trimmed; a blank name is rejected.
    pub fn renamed(&self, name: &str) -> Result<Self, NoteError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NoteError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_string(),
            ..self.clone()
        })
    }

    /// Check whether the name contains `query`, ignoring case
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
