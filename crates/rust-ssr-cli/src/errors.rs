//! Error types for the CLI runtime.

use std::io;

use rust_ssr::SsrError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Template(#[from] SsrError),
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: String, source: SsrError },
    #[error("failed to serialise match: {0}")]
    Serialise(serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(io::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}
