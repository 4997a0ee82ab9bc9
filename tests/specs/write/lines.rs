//! Writing stdin specs

use crate::prelude::*;

#[test]
fn lines_land_after_header() {
    let temp = Project::empty();

    temp.rotlog()
        .args(&["app.log"])
        .stdin("alpha\nbeta\n")
        .passes()
        .stdout_eq("");

    let content = temp.read("app.log");
    assert!(content.starts_with("Log file created at: "));
    assert_eq!(&content[HEADER_LEN..], "alpha\nbeta\n");
}

#[test]
fn creates_missing_directories() {
    let temp = Project::empty();

    temp.rotlog()
        .args(&["var/log/service/app.log"])
        .stdin("hello\n")
        .passes();

    assert!(temp.read("var/log/service/app.log").ends_with("hello\n"));
}

#[test]
fn tee_echoes_stdin() {
    let temp = Project::empty();

    temp.rotlog()
        .args(&["--tee", "app.log"])
        .stdin("one\ntwo\nno newline")
        .passes()
        .stdout_eq("one\ntwo\nno newline");

    assert!(temp.read("app.log").ends_with("one\ntwo\nno newline"));
}

#[test]
fn stats_are_printed_as_json() {
    let temp = Project::empty();

    let run = temp
        .rotlog()
        .args(&["--stats", "app.log"])
        .stdin("0123456789\n")
        .passes();

    let stats: serde_json::Value = serde_json::from_str(run.stderr().trim()).unwrap();
    assert_eq!(stats["bytes_accepted"], 11);
    assert_eq!(stats["rotations"], 0);
    assert_eq!(stats["flush_failures"], 0);
}

#[test]
fn second_run_appends_to_same_file() {
    let temp = Project::empty();

    temp.rotlog().args(&["app.log"]).stdin("run one\n").passes();
    temp.rotlog().args(&["app.log"]).stdin("run two\n").passes();

    let content = temp.read("app.log");
    assert_eq!(content.matches("Log file created at: ").count(), 1);
    assert!(content.ends_with("run one\nrun two\n"));
}
