//! Error scenario integration tests

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn voice_notes_bin(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voice-notes"));
    cmd.arg("--data-dir")
        .arg(data_dir)
        .env("XDG_CONFIG_HOME", data_dir.join("config"))
        .env_remove("VOICE_NOTES_DATA_DIR");
    cmd
}

#[test]
fn missing_subcommand() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path()).assert().code(2);
}

#[test]
fn unknown_setting_key() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path())
        .args(["settings", "get", "volume"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown setting"));
}

#[test]
fn invalid_setting_value() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path())
        .args(["settings", "set", "recording_quality", "ultra"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("recording_quality"));
}

#[test]
fn default_speed_out_of_range() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path())
        .args(["settings", "set", "default_playback_speed", "5"])
        .assert()
        .code(2);
}

#[test]
fn rename_unknown_note() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path())
        .args(["rename", "12345", "New name"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No voice note"));
}

#[test]
fn delete_unknown_note() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path())
        .args(["delete", "12345", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No voice note"));
}

#[test]
fn invalid_max_duration() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path())
        .args(["record", "--max-duration", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid max-duration"));
}

#[test]
fn invalid_speed() {
    let dir = TempDir::new().unwrap();
    voice_notes_bin(dir.path())
        .args(["play", "12345", "--speed", "fast"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid speed"));
}

#[test]
fn corrupt_note_list_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(store.join("voice_notes.json"), "not json").unwrap();

    voice_notes_bin(dir.path())
        .arg("list")
        .assert()
        .code(1);
}
