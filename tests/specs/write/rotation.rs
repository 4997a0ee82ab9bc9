//! Rotation specs

use crate::prelude::*;

fn line(fill: char, len: usize) -> String {
    let mut line: String = std::iter::repeat(fill).take(len - 1).collect();
    line.push('\n');
    line
}

#[test]
fn size_limit_moves_old_file_aside() {
    let temp = Project::empty();
    let first = line('a', 60);
    let second = line('b', 60);

    temp.rotlog()
        .args(&["--max-file-size", "100", "app.log"])
        .stdin(format!("{first}{second}"))
        .passes();

    let archived = temp.files_in("old");
    assert_eq!(archived.len(), 1);
    let archived_content = std::fs::read_to_string(&archived[0]).unwrap();
    assert_eq!(&archived_content[HEADER_LEN..], first);

    let active = temp.read("app.log");
    assert!(active.starts_with("Log file created at: "));
    assert_eq!(&active[HEADER_LEN..], second);
}

#[test]
fn restart_counts_existing_bytes() {
    let temp = Project::empty();

    temp.rotlog()
        .args(&["--max-file-size", "100", "app.log"])
        .stdin(line('a', 50))
        .passes();
    assert!(temp.files_in("old").is_empty());

    temp.rotlog()
        .args(&["--max-file-size", "100", "app.log"])
        .stdin(line('b', 20))
        .passes();

    assert_eq!(temp.files_in("old").len(), 1);
    assert_eq!(&temp.read("app.log")[HEADER_LEN..], line('b', 20));
}

#[test]
fn config_file_settings_apply() {
    let temp = Project::empty();
    temp.file(
        "rotlog.toml",
        "path = \"from-config.log\"\nmax_file_size = 100\narchive_dir = \"archive\"\n",
    );

    temp.rotlog()
        .args(&["--config", "rotlog.toml"])
        .stdin(format!("{}{}", line('a', 60), line('b', 60)))
        .passes();

    assert_eq!(temp.files_in("archive").len(), 1);
    assert!(temp.read("from-config.log").ends_with(&line('b', 60)));
}

#[test]
fn many_lines_are_never_lost() {
    let temp = Project::empty();
    let input: String = (0..2000).map(|i| format!("line {i:06}\n")).collect();

    temp.rotlog()
        .args(&["--max-file-size", "1024", "app.log"])
        .stdin(input)
        .passes();

    let mut files = temp.files_in("old");
    assert!(files.len() > 10);
    files.push(temp.path().join("app.log"));

    let mut seen = Vec::new();
    for file in files {
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.len() <= 1024);
        for l in content.lines().skip(1) {
            seen.push(l.trim_start_matches("line ").parse::<usize>().unwrap());
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..2000).collect::<Vec<_>>());
}
