use std::path::{Path, PathBuf};

use tbl_core::{merge_files, Error, KeySpec, MergeOptions, Policy, Warning};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn output(paths: &[PathBuf], key: &str, options: MergeOptions) -> tbl_core::Result<String> {
    let merged = merge_files(paths, &KeySpec::parse(key)?, options)?;
    let mut out = Vec::new();
    merged.write_to(&mut out, options.separator)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn merges_mapped_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write(&dir, "1.tsv", "id\tval1\n1\tA\n2\tX\n"),
        write(&dir, "2.tsv", "id\tval2\r\n1\tB\r\n"),
        write(&dir, "3.tsv", "val3\tid\n C\t1\nZ\t3"),
    ];

    let out = output(&paths, "id", MergeOptions::default()).unwrap();
    assert_eq!(
        out,
        "id\tval1\tval2\tval3\n1\tA\tB\t C\n2\tX\t\t\n3\t\t\tZ\n"
    );
}

#[test]
fn reports_missing_final_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "a.tsv", "id\tv\n1\tx");

    let merged = merge_files(&[&path], &KeySpec::parse("id").unwrap(), MergeOptions::default()).unwrap();
    assert_eq!(
        merged.report().warnings,
        vec![Warning::MissingFinalNewline { path: path.clone() }]
    );
    assert_eq!(merged.value(0, 1), Some(&b"x"[..]));
}

#[test]
fn separator_applies_to_input_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write(&dir, "a.csv", "k,a\n1,x\n"),
        write(&dir, "b.csv", "k,b\n1,y\n"),
    ];

    let options = MergeOptions::default().with_separator(b',');
    assert_eq!(output(&paths, "k", options).unwrap(), "k,a,b\n1,x,y\n");
}

#[test]
fn conflict_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write(&dir, "a.tsv", "key\tcol\n1\tfoo\n"),
        write(&dir, "b.tsv", "key\tcol\n1\tbar\n"),
        write(&dir, "c.tsv", "key\tother\n2\tz\n"),
    ];

    let err = output(&paths, "key", MergeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Conflict { ref path, .. } if path == &paths[1]));

    let options = MergeOptions::default().with_policy(Policy::KeepGoing);
    let out = output(&paths, "key", options).unwrap();
    assert_eq!(out, "key\tcol\tother\n1\tfoo\t\n2\t\tz\n");
}

#[test]
fn ragged_file_fails_with_line() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![write(&dir, "bad.tsv", "a\tb\n1\t2\n3\t4\t5\n")];

    let err = output(&paths, "a", MergeOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "{}:3: variable number of columns (expected 2, found 3)",
            paths[0].display()
        )
    );
}

#[test]
fn unreadable_path_fails_immediately() {
    let err = merge_files(
        &[Path::new("/nonexistent/tbl/input.tsv")],
        &KeySpec::parse("id").unwrap(),
        MergeOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::FileOpen { .. }));
}

#[test]
fn empty_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write(&dir, "a.tsv", "id\tv\n1\tx\n"),
        write(&dir, "empty.tsv", ""),
    ];

    let options = MergeOptions::default().with_policy(Policy::KeepGoing);
    let err = output(&paths, "id", options).unwrap_err();
    assert!(matches!(err, Error::EmptyFile { .. }));
}
