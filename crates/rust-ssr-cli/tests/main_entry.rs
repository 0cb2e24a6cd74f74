//! Integration tests for the `rssr` binary entry point.
//!
//! Verifies exit codes and what a user sees on stdout and stderr.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn source_file(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).expect("write source");
    path
}

#[test]
fn reports_matches_with_bindings() {
    let dir = TempDir::new().expect("tempdir");
    let path = source_file(&dir, "main.rs", "fn main() {\n    log(\"hi\");\n}\n");
    let mut command = cargo_bin_cmd!("rssr");
    command.arg("log('_msg)").arg(&path);
    command
        .assert()
        .success()
        .stdout(contains("main.rs:2:5: log(\"hi\");"))
        .stdout(contains("    msg = \"hi\""));
}

#[test]
fn json_output_emits_one_object_per_match() {
    let dir = TempDir::new().expect("tempdir");
    let path = source_file(&dir, "lib.rs", "fn f() { g(1); g(2); }\n");
    let mut command = cargo_bin_cmd!("rssr");
    command.args(["--format", "json", "g('_n)"]).arg(&path);
    let output = command.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).expect("stdout utf8");
    let values: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    let bound: Vec<_> = values
        .iter()
        .map(|value| value["bindings"]["n"].clone())
        .collect();
    assert_eq!(bound, ["1", "2"]);
}

#[test]
fn no_match_exits_with_one() {
    let dir = TempDir::new().expect("tempdir");
    let path = source_file(&dir, "lib.rs", "fn f() {}\n");
    let mut command = cargo_bin_cmd!("rssr");
    command.arg("g()").arg(&path);
    command.assert().code(1).stdout(predicate::str::is_empty());
}

#[test]
fn missing_file_exits_with_two() {
    let dir = TempDir::new().expect("tempdir");
    let mut command = cargo_bin_cmd!("rssr");
    command.arg("g()").arg(dir.path().join("absent.rs"));
    command
        .assert()
        .code(2)
        .stderr(contains("failed to read").and(contains("absent.rs")));
}

#[test]
fn malformed_template_exits_with_two() {
    let dir = TempDir::new().expect("tempdir");
    let path = source_file(&dir, "lib.rs", "fn f() {}\n");
    let mut command = cargo_bin_cmd!("rssr");
    command.arg("g('_x:[regex(a(b)])").arg(&path);
    command.assert().code(2).stderr(contains("a(b"));
}

#[test]
fn missing_arguments_exit_with_two() {
    let mut command = cargo_bin_cmd!("rssr");
    command.assert().code(2).stderr(contains("TEMPLATE"));
}
