//! Feedback and support contact messages

use std::fmt;

/// Support contact shown by `feedback help`
pub const SUPPORT_EMAIL: &str = "support@voicerecorder.com";
pub const WEBSITE: &str = "www.voicerecorder.com";

/// Kind of message sent to the developers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackKind {
    #[default]
    Feedback,
    Bug,
    Feature,
}

impl FeedbackKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Feedback => "feedback",
            Self::Bug => "bug",
            Self::Feature => "feature",
        }
    }

    pub const fn email(&self) -> &'static str {
        match self {
            Self::Feedback => SUPPORT_EMAIL,
            Self::Bug => "bugs@voicerecorder.com",
            Self::Feature => "features@voicerecorder.com",
        }
    }

    pub const fn subject(&self) -> &'static str {
        match self {
            Self::Feedback => "Voice Recorder App Feedback",
            Self::Bug => "Bug Report - Voice Recorder App",
            Self::Feature => "Feature Request - Voice Recorder App",
        }
    }

    /// Prefilled message body with the device and app version filled in
    pub fn body(&self, platform: &str, version: &str) -> String {
        let (title, prompt) = match self {
            Self::Feedback => (
                "Voice Recorder App Feedback",
                "Please describe your feedback or issue:",
            ),
            Self::Bug => (
                "Bug Report",
                "Describe the bug:\n\nSteps to reproduce:\n1. \n2. \n3. \n\nExpected behavior:\n\nActual behavior:",
            ),
            Self::Feature => (
                "Feature Request",
                "Feature Description:\n\nUse Case:\n\nWhy this feature would be helpful:",
            ),
        };
        format!(
            "{}\n\nDevice: {}\nApp Version: {}\n\n{}",
            title, platform, version, prompt
        )
    }

    /// `mailto:` link with subject and body encoded
    pub fn mailto_url(&self, platform: &str, version: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.email(),
            encode_component(self.subject()),
            encode_component(&self.body(platform, version))
        )
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text of `feedback help`
pub fn help_text() -> String {
    format!(
        "Need help using the Voice Recorder?\n\n1. Check the settings with 'voice-notes settings list'\n2. Email us at {}\n3. Visit our website: {}",
        SUPPORT_EMAIL, WEBSITE
    )
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
