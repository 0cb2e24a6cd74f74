//! Match rendering for terminals and for machines.
//!
//! Human output prints one `path:line:column: text` line per match followed
//! by the bindings, indented and sorted by name. JSON output prints one
//! object per line.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::ValueEnum;
use rust_ssr::MatchResult;
use serde::Serialize;

use crate::errors::AppError;

/// Output format selection for reported matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per match.
    Json,
}

/// A match detached from the tree it was found in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct MatchRecord {
    pub(crate) path: String,
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) text: String,
    pub(crate) bindings: BTreeMap<String, String>,
}

impl MatchRecord {
    pub(crate) fn new(path: &str, found: &MatchResult<'_>) -> Self {
        let (line, column) = found.start_position();
        let bindings = found
            .captures()
            .iter()
            .map(|(name, value)| (name.clone(), value.text().to_owned()))
            .collect();
        Self {
            path: path.to_owned(),
            line,
            column,
            text: found.text().to_owned(),
            bindings,
        }
    }
}

pub(crate) fn write_record<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    record: &MatchRecord,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Human => write_human(writer, record).map_err(AppError::Write),
        OutputFormat::Json => write_json(writer, record),
    }
}

fn write_human<W: Write>(writer: &mut W, record: &MatchRecord) -> io::Result<()> {
    writeln!(
        writer,
        "{}:{}:{}: {}",
        record.path, record.line, record.column, record.text
    )?;
    for (name, text) in &record.bindings {
        writeln!(writer, "    {name} = {text}")?;
    }
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, record: &MatchRecord) -> Result<(), AppError> {
    serde_json::to_writer(&mut *writer, record).map_err(AppError::Serialise)?;
    writeln!(writer).map_err(AppError::Write)
}
