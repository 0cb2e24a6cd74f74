//! Tree-sitter parsing wrapper for Rust source.
//!
//! Both search templates and candidate files go through this wrapper. The
//! parse result owns its source text so that matches can borrow node text
//! for as long as the result lives.

use std::ops::Range;

use crate::error::SsrError;
use crate::position::point_to_one_based;

/// Result of parsing Rust source code.
///
/// Tree-sitter is error-tolerant, so a parse result may hold a usable tree
/// even when the source contains syntax errors.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
}

impl ParseResult {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns whether the tree contains `ERROR` or missing nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects every syntax error in the tree in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }
}

/// Location and context of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// One-based line where the error starts.
    pub line: u32,
    /// One-based column where the error starts.
    pub column: u32,
    /// The offending source text, truncated to 40 characters.
    pub context: String,
    /// Short description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let byte_range = node.byte_range();
        let context = source
            .get(byte_range.clone())
            .map(|text| text.chars().take(40).collect::<String>())
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "unexpected syntax".to_owned()
        };

        let (line, column) = point_to_one_based(node.start_position());
        Self {
            byte_range,
            line,
            column,
            context,
            message,
        }
    }
}

impl std::fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} near `{}`",
            self.line, self.column, self.message, self.context
        )
    }
}

/// Tree-sitter parser configured for the Rust grammar.
pub struct Parser {
    inner: tree_sitter::Parser,
}

impl Parser {
    /// Creates a parser with the Rust grammar loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SsrError::ParserInit`] if the grammar ABI is incompatible
    /// with the linked Tree-sitter runtime.
    pub fn new() -> Result<Self, SsrError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|e| SsrError::parser_init(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parses `source` into a syntax tree.
    ///
    /// # Errors
    ///
    /// Returns [`SsrError::Parse`] if Tree-sitter yields no tree at all.
    /// Syntax errors inside the source do not cause an error; check
    /// [`ParseResult::has_errors`] instead.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SsrError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SsrError::parse("parser returned no tree"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
        })
    }
}

fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
        return;
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}
