//! List, rename and delete command handlers

use crate::domain::config::AppConfig;
use crate::domain::recording::format_clock;

use super::app::{open_library, open_settings, CliError};
use super::presenter::Presenter;

/// Print the notes, optionally filtered by name
pub async fn handle_list(config: &AppConfig, search: Option<&str>) -> Result<(), CliError> {
    let settings = open_settings(config).load().await?;
    let presenter = Presenter::from_settings(&settings);
    let library = open_library(config);

    let notes = match search {
        Some(query) => library.search(query).await?,
        None => library.list().await?,
    };

    if notes.is_empty() && search.is_some() {
        presenter.info("No voice notes match that search.");
        return Ok(());
    }
    presenter.note_table(&notes);
    Ok(())
}

pub async fn handle_rename(config: &AppConfig, id: &str, name: &str) -> Result<(), CliError> {
    let presenter = Presenter::from_settings(&open_settings(config).load().await?);
    let library = open_library(config);

    let note = library.resolve(id).await?;
    let renamed = library.rename(&note.id, name).await?;

    presenter.success(&format!("Renamed '{}' to '{}'", note.name, renamed.name));
    Ok(())
}

/// Delete a note, asking first unless `yes` is set
pub async fn handle_delete(config: &AppConfig, id: &str, yes: bool) -> Result<(), CliError> {
    let presenter = Presenter::from_settings(&open_settings(config).load().await?);
    let library = open_library(config);

    let note = library.resolve(id).await?;
    let question = format!(
        "Delete '{}' ({})?",
        note.name,
        format_clock(note.duration)
    );
    if !yes && !presenter.confirm(&question) {
        presenter.info("Nothing deleted");
        return Ok(());
    }

    library.delete(&note.id).await?;
    presenter.success(&format!("Deleted '{}'", note.name));
    Ok(())
}
