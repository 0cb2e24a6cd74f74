//! Structural search over Rust syntax trees.
//!
//! A search template is ordinary Rust code with wildcards in it. The template
//! is parsed with Tree-sitter, compiled once into a table of per-node
//! handlers, and then compared node by node against candidate trees. The
//! comparison understands Rust: attributes and trait bounds match in any
//! order, literals compare by value, and path qualifiers left out of the
//! template are ignored.
//!
//! # Template language
//!
//! - `'_name` is a named wildcard; every occurrence must bind the same text
//! - `'_` is an anonymous wildcard that binds anything and records nothing
//! - `'_name:*`, `:+`, `:?`, `:{n}`, `:{n,}` and `:{n,m}` let a wildcard
//!   consume a run of list elements, such as call arguments
//! - `'_name:[regex(...)]` and `'_name:[!regex(...)]` constrain the bound
//!   text, which must match the whole expression
//! - `\'` is a literal quote, so `continue \''_l` searches for labels
//!
//! # Example
//!
//! ```
//! use rust_ssr::{Parser, Pattern};
//!
//! let mut parser = Parser::new()?;
//! let source = parser.parse("fn main() { log(1); log(2, 3); }")?;
//!
//! let pattern = Pattern::compile("log('_arg)")?;
//! let matches = pattern.find_all(&source);
//!
//! assert_eq!(matches.len(), 1);
//! let bound = matches.first().and_then(|m| m.capture("arg"));
//! assert_eq!(bound.map(|c| c.text()), Some("1"));
//! # Ok::<(), rust_ssr::SsrError>(())
//! ```

mod compiler;
mod config;
mod error;
mod matcher;
mod parser;
mod pattern;
mod position;
mod substitution;
mod syntax;
mod template;

pub use config::SearchConfig;
pub use error::SsrError;
pub use matcher::{CapturedNode, CapturedNodes, CapturedValue, MatchResult, Matcher};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use pattern::Pattern;
pub use template::{Quantifier, TextConstraint, Variable};

#[cfg(test)]
mod tests;
