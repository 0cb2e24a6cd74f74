//! CLI argument definitions for `rssr`.

use std::path::PathBuf;

use clap::Parser;
use rust_ssr::SearchConfig;

use crate::output::OutputFormat;
use crate::telemetry::LogFormat;

/// Command-line interface for the `rssr` structural search tool.
#[derive(Parser, Debug)]
#[command(
    name = "rssr",
    version,
    about = "Search Rust source files for code shaped like a template"
)]
pub(crate) struct Cli {
    /// The search template, for example `foo('_arg)`.
    #[arg(value_name = "TEMPLATE")]
    pub(crate) template: String,
    /// Rust source files to search.
    #[arg(value_name = "FILE", required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// Controls how matches are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub(crate) format: OutputFormat,
    /// Stops after this many matches in each file.
    #[arg(long, value_name = "N")]
    pub(crate) max_matches: Option<usize>,
    /// Caps how deep a single comparison may recurse.
    #[arg(long, value_name = "N")]
    pub(crate) max_depth: Option<usize>,
    /// Makes regex constraints case-insensitive.
    #[arg(long)]
    pub(crate) ignore_case: bool,
    /// Tracing filter directive, for example `rust_ssr=debug`.
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub(crate) log_filter: String,
    /// Log record format written to stderr.
    #[arg(long, value_name = "FORMAT", default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
}

impl Cli {
    /// Builds the search configuration, keeping library defaults for flags
    /// that were not given.
    pub(crate) fn search_config(&self) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig::new(
            self.max_matches.unwrap_or(defaults.max_matches()),
            self.max_depth.unwrap_or(defaults.max_depth()),
            !self.ignore_case,
        )
    }
}
