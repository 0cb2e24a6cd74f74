//! Error types for template compilation and parsing.
//!
//! Matching itself never fails: a candidate either matches or it does not.
//! Errors only surface while loading the grammar, parsing source text, or
//! compiling a search template.

use thiserror::Error;

/// Errors raised at the edges of the search engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SsrError {
    /// The Rust grammar could not be loaded into a Tree-sitter parser.
    #[error("failed to initialise the Rust parser: {message}")]
    ParserInit {
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter produced no syntax tree for the input.
    #[error("failed to parse source: {message}")]
    Parse {
        /// Description of the failure.
        message: String,
    },

    /// The normalised template does not parse as Rust.
    #[error("invalid search template: {message}")]
    PatternCompile {
        /// Description of the compilation failure.
        message: String,
    },

    /// A template variable is malformed or declared inconsistently.
    #[error("invalid template variable: {message}")]
    InvalidVariable {
        /// Description of the variable error.
        message: String,
    },

    /// A text constraint carries a regular expression that does not compile.
    #[error("invalid text constraint `{pattern}`: {message}")]
    InvalidConstraint {
        /// The regular expression as written in the template.
        pattern: String,
        /// Description reported by the regex engine.
        message: String,
    },
}

impl SsrError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(message: impl Into<String>) -> Self {
        Self::ParserInit {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a template compilation error.
    #[must_use]
    pub fn pattern_compile(message: impl Into<String>) -> Self {
        Self::PatternCompile {
            message: message.into(),
        }
    }

    /// Creates an invalid variable error.
    #[must_use]
    pub fn invalid_variable(message: impl Into<String>) -> Self {
        Self::InvalidVariable {
            message: message.into(),
        }
    }

    /// Creates an invalid constraint error.
    #[must_use]
    pub fn invalid_constraint(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
