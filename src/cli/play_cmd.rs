//! Interactive playback screen

use std::time::Duration as StdDuration;

use tokio::time::interval;

use crate::application::ports::{AudioFileStore, AudioPlayer};
use crate::application::{ControlError, PlaybackController};
use crate::domain::config::AppConfig;
use crate::domain::playback::{PlaybackSession, PlaybackState};
use crate::infrastructure::RodioPlayer;

use super::app::{open_library, open_settings, CliError};
use super::args::PlayOptions;
use super::input::{PlayCommand, StdinLines, PLAY_HELP};
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

fn playback_line(presenter: &Presenter, session: &PlaybackSession) -> String {
    let label = match session.state() {
        PlaybackState::Paused => "Paused ",
        _ => "Playing",
    };
    format!(
        "{} {} {}x",
        label,
        presenter.format_progress(session.position_ms(), session.duration_ms()),
        session.rate()
    )
}

/// Play one note until it ends or the user quits
pub async fn run_play(options: PlayOptions, config: &AppConfig) -> Result<(), CliError> {
    let settings = open_settings(config).load().await?;
    let mut presenter = Presenter::from_settings(&settings);
    let library = open_library(config);

    let note = library.resolve(&options.id).await?;
    let path = library.audio().path(&note.uri);
    if !library.audio().exists(&note.uri) {
        return Err(CliError::Other(format!(
            "Audio file for '{}' is missing: {}",
            note.name,
            path.display()
        )));
    }

    let mut controller = PlaybackController::new(RodioPlayer::new(), settings);
    if let Some(speed) = options.speed {
        controller.set_speed(speed).await?;
    }
    controller.play(&note, &path).await?;

    let shutdown = ShutdownSignal::new();
    shutdown.setup();
    let mut input = StdinLines::spawn();

    presenter.info(&format!("Playing '{}'. {}", note.name, PLAY_HELP));
    presenter.start_spinner(&playback_line(&presenter, controller.session()));

    let result = play_loop(&mut controller, &presenter, &mut input, &shutdown).await;
    controller.unload().await?;

    match result {
        Ok(true) => presenter.spinner_success(&format!("Finished '{}'", note.name)),
        Ok(false) => presenter.stop_spinner(),
        Err(e) => {
            presenter.spinner_fail("Playback failed");
            return Err(e.into());
        }
    }
    Ok(())
}

/// Drive the controller from the ticker and stdin.
///
/// Returns `true` when the sound played to the end, `false` on quit.
async fn play_loop<P: AudioPlayer>(
    controller: &mut PlaybackController<P>,
    presenter: &Presenter,
    input: &mut StdinLines,
    shutdown: &ShutdownSignal,
) -> Result<bool, ControlError> {
    let mut ticker = interval(StdDuration::from_millis(250));
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if controller.poll().await? == PlaybackState::Idle {
                    return Ok(true);
                }
            }
            line = input.recv(), if stdin_open => {
                let Some(line) = line else {
                    stdin_open = false;
                    continue;
                };
                let command = match PlayCommand::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        presenter.warn(&e.to_string());
                        continue;
                    }
                };
                match command {
                    PlayCommand::TogglePause => {
                        controller.toggle_pause().await?;
                    }
                    PlayCommand::Forward => {
                        controller.skip_forward().await?;
                    }
                    PlayCommand::Back => {
                        controller.skip_backward().await?;
                    }
                    PlayCommand::CycleSpeed => {
                        controller.cycle_speed().await?;
                    }
                    PlayCommand::Seek(position_ms) => {
                        controller.seek(position_ms).await?;
                    }
                    PlayCommand::Quit => return Ok(false),
                    PlayCommand::Unknown(other) => {
                        presenter.warn(&format!("Unknown command '{}'. {}", other, PLAY_HELP));
                    }
                }
            }
            _ = shutdown.wait() => return Ok(false),
        }
        presenter.status(&playback_line(presenter, controller.session()));
    }
}
