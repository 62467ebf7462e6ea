//! Interactive record screen

use std::time::Duration as StdDuration;

use tokio::time::interval;

use crate::application::ports::{AudioFileStore, KeyValueStore, VoiceRecorder};
use crate::application::{RecordVoiceNoteUseCase, StopOutcome, ToggleOutcome};
use crate::domain::config::AppConfig;
use crate::domain::note::VoiceNote;
use crate::domain::recording::format_clock;
use crate::domain::settings::Settings;
use crate::infrastructure::create_recorder;

use super::app::{open_library, open_settings, CliError};
use super::args::RecordOptions;
use super::input::{RecordCommand, StdinLines, RECORD_HELP};
use super::presenter::{is_yes, Presenter};
use super::signals::ShutdownSignal;

/// How the record loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Save,
    Discard,
}

/// Status line for the recording spinner
fn recording_message(settings: &Settings, elapsed_ms: u64, paused: bool) -> String {
    let label = if paused { "Paused" } else { "Recording..." };
    if settings.show_recording_duration {
        format!("{} {}", label, format_clock(elapsed_ms / 1000))
    } else {
        label.to_string()
    }
}

fn saved_message(note: &VoiceNote) -> String {
    format!(
        "Saved '{}' ({}) as {}",
        note.name,
        format_clock(note.duration),
        note.id
    )
}

/// Record until the user stops, cancels, interrupts, or the optional
/// maximum duration runs out
pub async fn run_record(options: RecordOptions, config: &AppConfig) -> Result<(), CliError> {
    let settings = open_settings(config).load().await?;
    let mut presenter = Presenter::from_settings(&settings);
    let library = open_library(config);
    let mut use_case = RecordVoiceNoteUseCase::new(create_recorder(), &library, settings.clone());

    use_case.start().await?;

    let shutdown = ShutdownSignal::new();
    shutdown.setup();
    let mut input = StdinLines::spawn();

    presenter.info(&format!(
        "Recording at {} quality. {}",
        settings.recording_quality, RECORD_HELP
    ));
    presenter.start_spinner(&recording_message(&settings, 0, false));

    let finish = record_loop(
        &mut use_case,
        &settings,
        &presenter,
        &mut input,
        &shutdown,
        options.max_duration.map(|d| d.as_millis()),
    )
    .await;

    if finish == Finish::Discard {
        use_case.cancel().await?;
        presenter.spinner_fail("Recording discarded");
        return Ok(());
    }

    presenter.update_spinner("Saving...");
    let outcome = match use_case.stop(options.name.as_deref()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            return Err(e.into());
        }
    };

    match outcome {
        StopOutcome::Saved(note) => presenter.spinner_success(&saved_message(&note)),
        StopOutcome::Pending(pending) => {
            presenter.stop_spinner();
            presenter.prompt(
                &format!(
                    "Keep '{}' ({})?",
                    pending.note.name,
                    format_clock(pending.note.duration)
                ),
                true,
            );
            let answer = input.recv().await;
            eprintln!();
            if answer.map_or(true, |a| is_yes(&a, true)) {
                let note = use_case.commit(pending).await?;
                presenter.success(&saved_message(&note));
            } else {
                use_case.discard(pending).await?;
                presenter.info("Recording discarded");
            }
        }
    }
    Ok(())
}

async fn record_loop<R, K, A>(
    use_case: &mut RecordVoiceNoteUseCase<'_, R, K, A>,
    settings: &Settings,
    presenter: &Presenter,
    input: &mut StdinLines,
    shutdown: &ShutdownSignal,
    max_duration_ms: Option<u64>,
) -> Finish
where
    R: VoiceRecorder,
    K: KeyValueStore,
    A: AudioFileStore,
{
    let mut ticker = interval(StdDuration::from_millis(200));
    let mut stdin_open = true;
    let mut paused = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed = use_case.elapsed_ms();
                if max_duration_ms.is_some_and(|max| elapsed >= max) {
                    presenter.info("Maximum duration reached");
                    return Finish::Save;
                }
                presenter.update_spinner(&recording_message(settings, elapsed, paused));
            }
            line = input.recv(), if stdin_open => {
                let Some(line) = line else {
                    stdin_open = false;
                    continue;
                };
                match RecordCommand::parse(&line) {
                    RecordCommand::Stop => return Finish::Save,
                    RecordCommand::Cancel => return Finish::Discard,
                    RecordCommand::TogglePause => match use_case.toggle().await {
                        Ok(outcome) => {
                            paused = outcome == ToggleOutcome::Paused;
                            presenter.status(&recording_message(
                                settings,
                                use_case.elapsed_ms(),
                                paused,
                            ));
                        }
                        Err(e) => presenter.warn(&e.to_string()),
                    },
                    RecordCommand::Unknown(other) => {
                        presenter.warn(&format!("Unknown command '{}'. {}", other, RECORD_HELP));
                    }
                }
            }
            _ = shutdown.wait() => return Finish::Save,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_shows_elapsed_when_enabled() {
        let settings = Settings::default();
        assert_eq!(recording_message(&settings, 65_400, false), "Recording... 1:05");
        assert_eq!(recording_message(&settings, 3_000, true), "Paused 0:03");
    }

    #[test]
    fn message_hides_elapsed_when_disabled() {
        let settings = Settings {
            show_recording_duration: false,
            ..Default::default()
        };
        assert_eq!(recording_message(&settings, 65_400, false), "Recording...");
    }
}
