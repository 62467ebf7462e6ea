//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;

use super::app::CliError;
use super::args::ConfigAction;
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), CliError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), CliError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), CliError> {
    let config = store.load().await?;
    for (key, value) in config_entries(&config) {
        presenter.key_value(key, &value);
    }
    Ok(())
}

/// Display pairs for every config key, in file order
fn config_entries(config: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        (
            "data_dir",
            config
                .data_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| NOT_SET.to_string()),
        ),
        (
            "log_level",
            config
                .log_level
                .clone()
                .unwrap_or_else(|| NOT_SET.to_string()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::XdgConfigStore;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn unset_values_are_marked() {
        let entries = config_entries(&AppConfig::empty());
        assert_eq!(
            entries,
            vec![
                ("data_dir", NOT_SET.to_string()),
                ("log_level", NOT_SET.to_string())
            ]
        );
    }

    #[test]
    fn set_values_are_shown() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/srv/notes")),
            log_level: Some("debug".to_string()),
        };
        let entries = config_entries(&config);
        assert_eq!(entries[0].1, "/srv/notes");
        assert_eq!(entries[1].1, "debug");
    }

    #[tokio::test]
    async fn init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let presenter = Presenter::new();

        handle_config_command(ConfigAction::Init, &store, &presenter)
            .await
            .unwrap();
        let err = handle_config_command(ConfigAction::Init, &store, &presenter)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
