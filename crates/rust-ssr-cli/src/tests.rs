use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;
use rstest::rstest;

use super::*;
use crate::output::OutputFormat;
use crate::telemetry::{LogFormat, TelemetryError, parse_filter};

fn args(values: &[&str]) -> Vec<OsString> {
    std::iter::once("rssr")
        .chain(values.iter().copied())
        .map(OsString::from)
        .collect()
}

fn run_captured(values: &[&str]) -> (ExitCode, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run(args(values), &mut stdout, &mut stderr);
    let out = String::from_utf8(stdout).expect("stdout utf8");
    let err = String::from_utf8(stderr).expect("stderr utf8");
    (exit, out, err)
}

fn write_source(dir: &tempfile::TempDir, name: &str, source: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, source).expect("write source");
    path.display().to_string()
}

fn record_for(template: &str, source: &str) -> MatchRecord {
    let pattern = Pattern::compile(template).expect("template");
    let mut parser = Parser::new().expect("parser");
    let parsed = parser.parse(source).expect("parse");
    let found = pattern.find_first(&parsed).expect("match");
    MatchRecord::new("src/lib.rs", &found)
}

#[test]
fn flags_default_to_library_configuration() {
    let cli = Cli::try_parse_from(args(&["foo()", "a.rs"])).expect("parse args");
    assert_eq!(cli.format, OutputFormat::Human);
    assert_eq!(cli.log_format, LogFormat::Compact);
    assert_eq!(cli.log_filter, "warn");
    assert_eq!(cli.files, [PathBuf::from("a.rs")]);
    let config = cli.search_config();
    assert_eq!(config.max_matches(), 10_000);
    assert_eq!(config.max_depth(), 512);
    assert!(config.case_sensitive());
}

#[test]
fn flags_override_search_configuration() {
    let cli = Cli::try_parse_from(args(&[
        "--max-matches",
        "3",
        "--max-depth",
        "40",
        "--ignore-case",
        "--format",
        "json",
        "--log-format",
        "JSON",
        "foo()",
        "a.rs",
        "b.rs",
    ]))
    .expect("parse args");
    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.log_format, LogFormat::Json);
    assert_eq!(cli.files.len(), 2);
    let config = cli.search_config();
    assert_eq!(config.max_matches(), 3);
    assert_eq!(config.max_depth(), 40);
    assert!(!config.case_sensitive());
}

#[rstest]
#[case(&[])]
#[case(&["foo()"])]
#[case(&["--format", "xml", "foo()", "a.rs"])]
fn usage_errors_exit_with_two(#[case] values: &[&str]) {
    let (exit, out, err) = run_captured(values);
    assert_eq!(exit, ExitCode::from(2));
    assert!(out.is_empty());
    assert!(!err.is_empty());
}

#[test]
fn help_is_written_to_stdout() {
    let (exit, out, err) = run_captured(&["--help"]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(out.contains("TEMPLATE"), "help: {out}");
    assert!(err.is_empty());
}

#[test]
fn human_record_lists_bindings_by_name() {
    let record = record_for("'_f('_b, '_a)", "fn main() {\n    call(x, y);\n}");
    let mut buffer = Vec::new();
    write_record(&mut buffer, OutputFormat::Human, &record).expect("render");
    let rendered = String::from_utf8(buffer).expect("utf8");
    assert_eq!(
        rendered,
        "src/lib.rs:2:5: call(x, y);\n    a = y\n    b = x\n    f = call\n"
    );
}

#[test]
fn json_record_is_one_object_per_line() {
    let record = record_for("drop('_x)", "fn main() { drop(v); }");
    let mut buffer = Vec::new();
    write_record(&mut buffer, OutputFormat::Json, &record).expect("render");
    let rendered = String::from_utf8(buffer).expect("utf8");
    assert!(rendered.ends_with('\n'));
    assert_eq!(rendered.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(rendered.trim_end()).expect("json");
    assert_eq!(value["path"], "src/lib.rs");
    assert_eq!(value["line"], 1);
    assert_eq!(value["column"], 13);
    assert_eq!(value["text"], "drop(v);");
    assert_eq!(value["bindings"]["x"], "v");
}

#[test]
fn matches_exit_with_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "lib.rs", "fn main() {\n    foo(1);\n}\n");
    let (exit, out, err) = run_captured(&["foo('_x)", &path]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert_eq!(out, format!("{path}:2:5: foo(1);\n    x = 1\n"));
    assert!(err.is_empty(), "stderr: {err}");
}

#[test]
fn files_with_syntax_errors_are_still_searched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "broken.rs", "fn main() {\n    foo(1);\n}\nfn broken( {\n");
    let (exit, out, err) = run_captured(&["foo('_x)", &path]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(out.contains("broken.rs:2:5: foo(1);"), "stdout: {out}");
    assert!(err.is_empty(), "stderr: {err}");
}

#[test]
fn no_matches_exit_with_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "lib.rs", "fn main() { bar(); }\n");
    let (exit, out, _) = run_captured(&["foo()", &path]);
    assert_eq!(exit, ExitCode::from(1));
    assert!(out.is_empty());
}

#[test]
fn unreadable_file_is_reported_and_others_are_searched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let present = write_source(&dir, "present.rs", "fn main() { foo(); }\n");
    let missing = dir.path().join("missing.rs").display().to_string();
    let (exit, out, err) = run_captured(&["foo()", &missing, &present]);
    assert_eq!(exit, ExitCode::from(2));
    assert!(out.contains("present.rs:1:13: foo();"), "stdout: {out}");
    assert!(err.contains("failed to read"), "stderr: {err}");
}

#[test]
fn invalid_template_exits_with_two() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "lib.rs", "fn main() {}\n");
    let (exit, out, err) = run_captured(&["foo('_a:{3,1})", &path]);
    assert_eq!(exit, ExitCode::from(2));
    assert!(out.is_empty());
    assert!(err.contains("minimum 3 exceeds maximum 1"), "stderr: {err}");
}

#[test]
fn max_matches_limits_each_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = write_source(&dir, "a.rs", "fn a() { f(); f(); f(); }\n");
    let second = write_source(&dir, "b.rs", "fn b() { f(); f(); }\n");
    let (exit, out, _) = run_captured(&["--max-matches", "1", "f()", &first, &second]);
    assert_eq!(exit, ExitCode::SUCCESS);
    assert_eq!(out.lines().count(), 2);
}

#[rstest]
#[case("warn")]
#[case("rust_ssr=debug,info")]
fn valid_log_filters_parse(#[case] filter: &str) {
    assert!(parse_filter(filter).is_ok());
}

#[test]
fn invalid_log_filter_is_rejected() {
    let error = parse_filter("rust_ssr=notalevel").expect_err("filter should fail");
    assert!(matches!(error, TelemetryError::Filter(_)));
}

#[rstest]
#[case("json", LogFormat::Json)]
#[case("Compact", LogFormat::Compact)]
fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(text.parse::<LogFormat>().expect("log format"), expected);
}
