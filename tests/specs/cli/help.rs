//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_write_options() {
    Project::empty()
        .rotlog()
        .args(&["--help"])
        .passes()
        .stdout_has("--max-file-size")
        .stdout_has("--flush-interval")
        .stdout_has("--config")
        .stdout_has("--tee")
        .stdout_has("--stats")
        .stdout_has("list");
}

#[test]
fn list_help_mentions_format() {
    Project::empty()
        .rotlog()
        .args(&["list", "--help"])
        .passes()
        .stdout_has("--format")
        .stdout_has("--archive-dir");
}

#[test]
fn version_flag_prints_version() {
    Project::empty()
        .rotlog()
        .args(&["--version"])
        .passes()
        .stdout_has("rotlog");
}
