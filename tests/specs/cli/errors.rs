//! Error reporting specs

use crate::prelude::*;

#[test]
fn missing_path_explains_itself() {
    Project::empty()
        .rotlog()
        .stdin("")
        .fails()
        .stderr_has("No log file path given")
        .stderr_has("hint: pass the path as an argument");
}

#[test]
fn zero_max_file_size_is_rejected() {
    Project::empty()
        .rotlog()
        .args(&["--max-file-size", "0", "app.log"])
        .stdin("x\n")
        .fails()
        .stderr_has("max_file_size must be positive");
}

#[test]
fn unreadable_config_is_reported() {
    Project::empty()
        .rotlog()
        .args(&["--config", "missing.toml", "app.log"])
        .stdin("")
        .fails()
        .stderr_has("failed to load config missing.toml");
}

#[test]
fn unknown_config_key_is_reported() {
    let temp = Project::empty();
    temp.file("rotlog.toml", "compress = true\n");

    temp.rotlog()
        .args(&["--config", "rotlog.toml", "app.log"])
        .stdin("")
        .fails()
        .stderr_has("compress");
}

#[test]
fn unusable_directory_fails_before_reading() {
    let temp = Project::empty();
    temp.file("blocker", "a file, not a directory");

    temp.rotlog()
        .args(&["blocker/app.log"])
        .stdin("never written\n")
        .fails()
        .stderr_has("Failed to open log file blocker/app.log");
}
