//! User settings value object
//!
//! A single `Settings` value is loaded at startup and replaced wholesale
//! on save.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::SettingsError;

/// Fastest playback rate accepted in settings
pub const MAX_PLAYBACK_SPEED: f32 = 4.0;

/// Longest skip increment in seconds
pub const MAX_SKIP_DURATION_SECS: u64 = 300;

/// Keys accepted by `settings get/set`
pub const SETTINGS_KEYS: &[&str] = &[
    "recording_quality",
    "playback_speeds",
    "default_playback_speed",
    "auto_save_recordings",
    "show_recording_duration",
    "enable_animations",
    "theme",
    "skip_duration",
];

/// Recording quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingQuality {
    Low,
    Medium,
    #[default]
    High,
}

impl RecordingQuality {
    /// Sample rate of the stored WAV file
    pub const fn sample_rate(&self) -> u32 {
        match self {
            Self::Low => 8_000,
            Self::Medium => 22_050,
            Self::High => 44_100,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RecordingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordingQuality {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(SettingsError::invalid(
                "recording_quality",
                format!("'{}' is not one of: low, medium, high", s),
            )),
        }
    }
}

/// Colour theme for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(SettingsError::invalid(
                "theme",
                format!("'{}' is not one of: dark, light", s),
            )),
        }
    }
}

/// Application settings, stored as one JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub recording_quality: RecordingQuality,
    pub playback_speeds: Vec<f32>,
    pub default_playback_speed: f32,
    pub auto_save_recordings: bool,
    pub show_recording_duration: bool,
    pub enable_animations: bool,
    pub theme: Theme,
    /// Seek increment for skip forward/backward, in seconds
    pub skip_duration: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recording_quality: RecordingQuality::High,
            playback_speeds: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            default_playback_speed: 1.0,
            auto_save_recordings: true,
            show_recording_duration: true,
            enable_animations: true,
            theme: Theme::Dark,
            skip_duration: 10,
        }
    }
}

impl Settings {
    /// Check value ranges before the settings are saved
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.playback_speeds.is_empty() {
            return Err(SettingsError::invalid(
                "playback_speeds",
                "at least one speed is required",
            ));
        }
        if let Some(bad) = self.playback_speeds.iter().find(|s| !valid_speed(**s)) {
            return Err(SettingsError::invalid(
                "playback_speeds",
                format!("{} is outside (0, {}]", bad, MAX_PLAYBACK_SPEED),
            ));
        }
        if !valid_speed(self.default_playback_speed) {
            return Err(SettingsError::invalid(
                "default_playback_speed",
                format!(
                    "{} is outside (0, {}]",
                    self.default_playback_speed, MAX_PLAYBACK_SPEED
                ),
            ));
        }
        if self.skip_duration == 0 || self.skip_duration > MAX_SKIP_DURATION_SECS {
            return Err(SettingsError::invalid(
                "skip_duration",
                format!("must be between 1 and {} seconds", MAX_SKIP_DURATION_SECS),
            ));
        }
        Ok(())
    }

    /// Speed that follows `current` in the speed list, wrapping around.
    ///
    /// Falls back to the first speed when `current` is not in the list.
    pub fn next_speed(&self, current: f32) -> f32 {
        let Some(&first) = self.playback_speeds.first() else {
            return current;
        };
        match self
            .playback_speeds
            .iter()
            .position(|s| (s - current).abs() < f32::EPSILON)
        {
            Some(i) => self.playback_speeds[(i + 1) % self.playback_speeds.len()],
            None => first,
        }
    }

    /// Read one setting as display text
    pub fn get(&self, key: &str) -> Result<String, SettingsError> {
        let value = match key {
            "recording_quality" => self.recording_quality.to_string(),
            "playback_speeds" => format_speeds(&self.playback_speeds),
            "default_playback_speed" => self.default_playback_speed.to_string(),
            "auto_save_recordings" => self.auto_save_recordings.to_string(),
            "show_recording_duration" => self.show_recording_duration.to_string(),
            "enable_animations" => self.enable_animations.to_string(),
            "theme" => self.theme.to_string(),
            "skip_duration" => self.skip_duration.to_string(),
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Return a copy with one setting changed.
    ///
    /// The result is validated as a whole.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, SettingsError> {
        let mut next = self.clone();
        match key {
            "recording_quality" => next.recording_quality = value.parse()?,
            "playback_speeds" => next.playback_speeds = parse_speeds(value)?,
            "default_playback_speed" => {
                next.default_playback_speed = parse_speed(key, value)?;
            }
            "auto_save_recordings" => next.auto_save_recordings = parse_bool(key, value)?,
            "show_recording_duration" => next.show_recording_duration = parse_bool(key, value)?,
            "enable_animations" => next.enable_animations = parse_bool(key, value)?,
            "theme" => next.theme = value.parse()?,
            "skip_duration" => {
                next.skip_duration = value.trim().parse().map_err(|_| {
                    SettingsError::invalid(key, format!("'{}' is not a whole number", value))
                })?;
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        next.validate()?;
        Ok(next)
    }
}

fn valid_speed(speed: f32) -> bool {
    speed.is_finite() && speed > 0.0 && speed <= MAX_PLAYBACK_SPEED
}

/// Format a speed list as `0.5, 1, 2`
pub fn format_speeds(speeds: &[f32]) -> String {
    speeds
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_speed(key: &str, value: &str) -> Result<f32, SettingsError> {
    value
        .trim()
        .trim_end_matches('x')
        .parse::<f32>()
        .map_err(|_| SettingsError::invalid(key, format!("'{}' is not a number", value)))
}

fn parse_speeds(value: &str) -> Result<Vec<f32>, SettingsError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_speed("playback_speeds", s))
        .collect()
}

/// Parse a boolean value
pub fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(SettingsError::invalid(
            key,
            "Value must be 'true' or 'false'",
        )),
    }
}
