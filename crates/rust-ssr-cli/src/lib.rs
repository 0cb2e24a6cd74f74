//! Command-line runtime for `rssr`.
//!
//! The runtime parses arguments, installs telemetry, compiles the template
//! once and searches each file in turn. Streams are passed in so tests can
//! capture what a user would see.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use clap::error::ErrorKind;
use rust_ssr::{Parser, Pattern};

mod cli;
mod errors;
mod output;
mod telemetry;

use cli::Cli;
use errors::AppError;
use output::{MatchRecord, write_record};

const EXIT_NO_MATCH: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// Totals gathered over every searched file.
#[derive(Debug, Default)]
struct Outcome {
    matches: usize,
    failures: usize,
}

impl Outcome {
    fn exit_code(&self) -> ExitCode {
        if self.failures > 0 {
            ExitCode::from(EXIT_ERROR)
        } else if self.matches > 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_NO_MATCH)
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
///
/// Returns 0 when at least one match was reported, 1 when nothing matched
/// and 2 when the template, a file or the output stream failed.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(error, stdout, stderr),
    };

    let result = telemetry::initialise(&cli.log_filter, cli.log_format)
        .map_err(AppError::from)
        .and_then(|()| search(&cli, stdout, stderr));

    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => {
            report_error(stderr, &error);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn report_usage<W: Write, E: Write>(error: clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(stdout, "{}", error.render()).is_err() {
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        _ => {
            report_error(stderr, &AppError::CliUsage(error));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn report_error<E: Write>(stderr: &mut E, error: &AppError) {
    if writeln!(stderr, "{error}").is_err() {
        tracing::warn!(%error, "failed to report error on stderr");
    }
}

/// Compiles the template and reports matches from every file.
///
/// A file that cannot be read or parsed is reported and skipped; the search
/// carries on with the remaining files.
fn search<W: Write, E: Write>(cli: &Cli, stdout: &mut W, stderr: &mut E) -> Result<Outcome, AppError> {
    let pattern = Pattern::compile_with_config(&cli.template, &cli.search_config())?;
    let mut parser = Parser::new()?;
    let mut outcome = Outcome::default();

    for path in &cli.files {
        match search_file(&pattern, &mut parser, path) {
            Ok(records) => {
                for record in &records {
                    write_record(stdout, cli.format, record)?;
                }
                outcome.matches += records.len();
            }
            Err(error) => {
                report_error(stderr, &error);
                outcome.failures += 1;
            }
        }
    }

    tracing::debug!(
        files = cli.files.len(),
        matches = outcome.matches,
        failures = outcome.failures,
        "search finished"
    );
    Ok(outcome)
}

fn search_file(pattern: &Pattern, parser: &mut Parser, path: &Path) -> Result<Vec<MatchRecord>, AppError> {
    let path_text = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|error| AppError::Read {
        path: path_text.clone(),
        source: error,
    })?;
    let parsed = parser.parse(&source).map_err(|error| AppError::Parse {
        path: path_text.clone(),
        source: error,
    })?;
    if parsed.has_errors() {
        tracing::warn!(
            path = %path_text,
            errors = parsed.errors().len(),
            "source has syntax errors, searching the recovered tree"
        );
    }

    let records: Vec<_> = pattern
        .find_all(&parsed)
        .iter()
        .map(|found| MatchRecord::new(&path_text, found))
        .collect();
    tracing::debug!(path = %path_text, matches = records.len(), "searched file");
    Ok(records)
}

#[cfg(test)]
mod tests;
