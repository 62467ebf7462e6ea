//! Interactive line commands for the record and play screens

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::domain::error::ClockParseError;
use crate::domain::recording::parse_clock;

/// A command typed while recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordCommand {
    /// Empty line: stop and save
    Stop,
    TogglePause,
    Cancel,
    Unknown(String),
}

impl RecordCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "" | "s" | "stop" => Self::Stop,
            "p" | "pause" | "resume" => Self::TogglePause,
            "c" | "cancel" => Self::Cancel,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A command typed while playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    TogglePause,
    Forward,
    Back,
    CycleSpeed,
    /// Absolute position in milliseconds
    Seek(u64),
    Quit,
    Unknown(String),
}

impl PlayCommand {
    pub fn parse(line: &str) -> Result<Self, ClockParseError> {
        let line = line.trim().to_lowercase();
        let command = match line.as_str() {
            "" | "p" | "pause" | "resume" => Self::TogglePause,
            "f" | "forward" => Self::Forward,
            "b" | "back" => Self::Back,
            "s" | "speed" => Self::CycleSpeed,
            "q" | "quit" | "stop" => Self::Quit,
            other => match other.strip_prefix("seek") {
                Some(position) => Self::Seek(parse_clock(position.trim())?),
                None => Self::Unknown(other.to_string()),
            },
        };
        Ok(command)
    }
}

pub const RECORD_HELP: &str = "Enter: stop and save | p: pause/resume | c: cancel";
pub const PLAY_HELP: &str =
    "p: pause/resume | f/b: skip | s: speed | seek M:SS | q: quit";

/// Lines read from stdin on a background task.
///
/// `recv` yields `None` once stdin is closed.
pub struct StdinLines {
    receiver: mpsc::Receiver<String>,
}

impl StdinLines {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        Self { receiver: rx }
    }

    pub async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_commands() {
        assert_eq!(RecordCommand::parse(""), RecordCommand::Stop);
        assert_eq!(RecordCommand::parse("  \n"), RecordCommand::Stop);
        assert_eq!(RecordCommand::parse("P"), RecordCommand::TogglePause);
        assert_eq!(RecordCommand::parse("cancel"), RecordCommand::Cancel);
        assert_eq!(
            RecordCommand::parse("x"),
            RecordCommand::Unknown("x".to_string())
        );
    }

    #[test]
    fn play_commands() {
        assert_eq!(PlayCommand::parse("p").unwrap(), PlayCommand::TogglePause);
        assert_eq!(PlayCommand::parse("f").unwrap(), PlayCommand::Forward);
        assert_eq!(PlayCommand::parse("B").unwrap(), PlayCommand::Back);
        assert_eq!(PlayCommand::parse("s").unwrap(), PlayCommand::CycleSpeed);
        assert_eq!(PlayCommand::parse("q").unwrap(), PlayCommand::Quit);
    }

    #[test]
    fn play_seek_accepts_clock_and_seconds() {
        assert_eq!(PlayCommand::parse("seek 1:05").unwrap(), PlayCommand::Seek(65_000));
        assert_eq!(PlayCommand::parse("seek 30").unwrap(), PlayCommand::Seek(30_000));
    }

    #[test]
    fn play_seek_rejects_bad_position() {
        assert!(PlayCommand::parse("seek soon").is_err());
    }
}
