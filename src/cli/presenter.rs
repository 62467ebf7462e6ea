//! CLI presenter for output formatting

use std::io::{self, Write};

use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::note::VoiceNote;
use crate::domain::recording::format_clock;
use crate::domain::settings::{Settings, Theme};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    theme: Theme,
    animations: bool,
}

impl Presenter {
    /// Create a presenter with the default look
    pub fn new() -> Self {
        Self {
            spinner: None,
            theme: Theme::default(),
            animations: true,
        }
    }

    /// Create a presenter following the user's display settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            spinner: None,
            theme: settings.theme,
            animations: settings.enable_animations,
        }
    }

    fn accent(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Dark => text.cyan(),
            Theme::Light => text.blue(),
        }
    }

    fn spinner_template(&self) -> &'static str {
        match self.theme {
            Theme::Dark => "{spinner:.cyan} {msg}",
            Theme::Light => "{spinner:.blue} {msg}",
        }
    }

    /// Start a spinner with message.
    ///
    /// With animations off the message is printed once instead.
    pub fn start_spinner(&mut self, message: &str) {
        if !self.animations {
            eprintln!("{} {}", self.accent("●"), message);
            return;
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template(self.spinner_template())
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.finish_with_message(format!("{} {}", "✓".green(), message)),
            None => self.success(message),
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.finish_with_message(format!("{} {}", "✗".red(), message)),
            None => self.error(message),
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Show a status change. Updates the spinner when one is running.
    pub fn status(&self, message: &str) {
        match self.spinner {
            Some(ref spinner) => spinner.set_message(message.to_string()),
            None => eprintln!("{} {}", self.accent("●"), message),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.suspend(|| eprintln!("{} {}", self.accent("ℹ"), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.suspend(|| eprintln!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.suspend(|| eprintln!("{} {}", "✗".red(), message));
    }

    fn suspend(&self, print: impl FnOnce()) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(print),
            None => print(),
        }
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for settings and config lists)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", self.accent(key), value);
    }

    /// Format a playback position as a bar plus `M:SS / M:SS`
    pub fn format_progress(&self, position_ms: u64, total_ms: u64) -> String {
        let percent = if total_ms > 0 {
            (position_ms as f64 / total_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        let bar_width = 20;
        let filled = ((percent / 100.0) * bar_width as f64) as usize;
        let empty = bar_width - filled;

        format!(
            "[{}{}] {} / {}",
            self.accent(&"█".repeat(filled)),
            "░".repeat(empty),
            format_clock(position_ms / 1000),
            format_clock(total_ms / 1000)
        )
    }

    /// Print notes as a table, or a hint when there are none
    pub fn note_table(&self, notes: &[VoiceNote]) {
        if notes.is_empty() {
            self.info("No voice notes yet. Record one with 'voice-notes record'.");
            return;
        }

        let name_width = notes
            .iter()
            .map(|n| n.name.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(4, 40);

        println!(
            "{}",
            format!(
                "{:<13}  {:<name_width$}  {:>8}  {:<16}  {:>9}",
                "ID", "NAME", "DURATION", "CREATED", "SIZE"
            )
            .bold()
        );
        for note in notes {
            println!("{}", format_note_row(note, name_width));
        }
    }

    /// Ask a yes/no question on stderr and read the answer from stdin.
    ///
    /// Anything but `y`/`yes` (including end of input) means no.
    pub fn confirm(&self, question: &str) -> bool {
        self.prompt(question, false);
        let mut answer = String::new();
        match io::stdin().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer, false),
        }
    }

    /// Print a yes/no prompt without reading the answer
    pub fn prompt(&self, question: &str, default_yes: bool) {
        let choices = if default_yes { "[Y/n]" } else { "[y/N]" };
        eprint!("{} {} {} ", self.accent("?"), question, choices);
        let _ = io::stderr().flush();
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a prompt answer; an empty answer takes the default
pub fn is_yes(answer: &str, default_yes: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default_yes,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn format_note_row(note: &VoiceNote, name_width: usize) -> String {
    let name: String = if note.name.chars().count() > name_width {
        let mut cut: String = note.name.chars().take(name_width - 1).collect();
        cut.push('…');
        cut
    } else {
        note.name.clone()
    };
    let created = note.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let size = note.size.map(format_size).unwrap_or_else(|| "-".to_string());

    format!(
        "{:<13}  {:<name_width$}  {:>8}  {:<16}  {:>9}",
        note.id.as_str(),
        name,
        format_clock(note.duration),
        created,
        size
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn format_progress_at_start() {
        let presenter = Presenter::new();
        let progress = presenter.format_progress(0, 10_000);
        assert!(progress.contains("0:00 / 0:10"));
    }

    #[test]
    fn format_progress_past_a_minute() {
        let presenter = Presenter::new();
        let progress = presenter.format_progress(65_000, 180_000);
        assert!(progress.contains("1:05 / 3:00"));
    }

    #[test]
    fn format_progress_with_unknown_length() {
        let presenter = Presenter::new();
        let progress = presenter.format_progress(5_000, 0);
        assert!(progress.contains("0:05 / 0:00"));
    }

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n", false));
        assert!(is_yes(" YES ", false));
        assert!(!is_yes("n", true));
        assert!(!is_yes("sure", true));
    }

    #[test]
    fn empty_answer_takes_default() {
        assert!(!is_yes("\n", false));
        assert!(is_yes("", true));
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn note_row_shows_clock_duration_and_size() {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let note = VoiceNote::new(Some("Groceries"), "a.wav", 65, created_at, Some(2048));

        let row = format_note_row(&note, 10);
        assert!(row.starts_with(note.id.as_str()));
        assert!(row.contains("Groceries"));
        assert!(row.contains("1:05"));
        assert!(row.contains("2.0 KB"));
    }

    #[test]
    fn long_names_are_cut() {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let note = VoiceNote::new(Some("A very long name indeed"), "a.wav", 1, created_at, None);

        let row = format_note_row(&note, 6);
        assert!(row.contains("A ver…"));
        assert!(row.contains(" -"));
    }
}
