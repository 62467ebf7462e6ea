//! Settings command handler

use crate::application::SETTINGS_KEY;
use crate::domain::config::AppConfig;
use crate::domain::error::SettingsError;
use crate::domain::settings::{Settings, SETTINGS_KEYS};
use crate::infrastructure::FileKeyValueStore;

use super::app::{open_settings, CliError};
use super::args::SettingsAction;
use super::presenter::Presenter;

/// Handle settings subcommand
pub async fn handle_settings_command(
    action: SettingsAction,
    config: &AppConfig,
) -> Result<(), CliError> {
    let service = open_settings(config);
    let current = service.load().await?;
    let presenter = Presenter::from_settings(&current);

    match action {
        SettingsAction::List => {
            list(&current, &presenter)?;
        }
        SettingsAction::Get { key } => {
            presenter.output(&current.get(&key).map_err(invalid)?);
        }
        SettingsAction::Set { key, value } => {
            let updated = service.update(&key, &value).await?;
            presenter.success(&format!("{} = {}", key, updated.get(&key).map_err(invalid)?));
        }
        SettingsAction::Reset => {
            service.reset().await?;
            presenter.success("Settings restored to defaults");
        }
        SettingsAction::Path => {
            let store = FileKeyValueStore::new(config.store_dir());
            presenter.output(&store.key_path(SETTINGS_KEY).to_string_lossy());
        }
    }
    Ok(())
}

fn list(settings: &Settings, presenter: &Presenter) -> Result<(), CliError> {
    for key in SETTINGS_KEYS {
        presenter.key_value(key, &settings.get(key).map_err(invalid)?);
    }
    Ok(())
}

fn invalid(e: SettingsError) -> CliError {
    CliError::Settings(e.into())
}
