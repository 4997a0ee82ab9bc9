//! `rotlog list` specs

use crate::prelude::*;

#[test]
fn nothing_archived_prints_nothing() {
    Project::empty()
        .rotlog()
        .args(&["list", "app.log"])
        .passes()
        .stdout_eq("");
}

#[test]
fn lists_archives_oldest_first() {
    let temp = Project::empty();
    temp.file("old/app.20261019-101500.000.log", "first");
    temp.file("old/app.20261019-101500.000.1.log", "second");
    temp.file("old/app.20261018-235959.999.log", "zeroth");
    temp.file("old/other.20261019-101500.000.log", "not ours");

    let stdout = temp.rotlog().args(&["list", "app.log"]).passes().stdout();

    let names: Vec<&str> = stdout
        .lines()
        .map(|l| l.rsplit('/').next().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "app.20261018-235959.999.log",
            "app.20261019-101500.000.log",
            "app.20261019-101500.000.1.log",
        ]
    );
}

#[test]
fn json_format_includes_sizes() {
    let temp = Project::empty();
    temp.file("old/app.20261019-101500.000.log", "12345");

    let stdout = temp
        .rotlog()
        .args(&["list", "--format", "json", "app.log"])
        .passes()
        .stdout();

    let files: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(files[0]["size"], 5);
    assert!(files[0]["path"]
        .as_str()
        .unwrap()
        .ends_with("app.20261019-101500.000.log"));
}

#[test]
fn custom_archive_dir() {
    let temp = Project::empty();
    temp.file("logs/archive/app.20261019-101500.000.log", "x");

    temp.rotlog()
        .args(&["list", "--archive-dir", "archive", "logs/app.log"])
        .passes()
        .stdout_has("1\tlogs/archive/app.20261019-101500.000.log");
}
