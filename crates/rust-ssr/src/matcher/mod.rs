//! Tree matching for compiled templates.
//!
//! The matcher walks a parsed Rust syntax tree and compares every statement or
//! item against the template's match roots. Comparison is structural: each
//! node kind has a strategy that decides which children must agree and how
//! lists are aligned. Successful matches carry the bindings of named
//! wildcards.

mod capture;
mod context;
mod search;
mod substrate;
mod visitor;

use std::collections::HashMap;
use std::ops::Range;

use tree_sitter::Node;

use crate::parser::ParseResult;
use crate::pattern::Pattern;
use crate::position::point_to_one_based;

pub use capture::{CapturedNode, CapturedNodes, CapturedValue};
pub(crate) use context::{MatchContext, MatchState};

/// Result of a successful template match.
///
/// A template with several top-level statements matches a run of consecutive
/// statements; the result then spans all of them.
#[derive(Debug)]
pub struct MatchResult<'a> {
    node: Node<'a>,
    last: Node<'a>,
    nodes: Vec<Node<'a>>,
    source: &'a str,
    captures: HashMap<String, CapturedValue<'a>>,
}

impl<'a> MatchResult<'a> {
    /// Builds a result from the matched run; `None` when the run is empty.
    pub(crate) fn from_run(
        nodes: Vec<Node<'a>>,
        source: &'a str,
        captures: HashMap<String, CapturedValue<'a>>,
    ) -> Option<Self> {
        let node = nodes.first().copied()?;
        let last = nodes.last().copied()?;
        Some(Self {
            node,
            last,
            nodes,
            source,
            captures,
        })
    }

    /// Returns the first matched node.
    #[must_use]
    pub const fn node(&self) -> Node<'a> {
        self.node
    }

    /// Returns every matched node, one per template root.
    #[must_use]
    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    /// Returns the byte range from the first to the last matched node.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.node.start_byte()..self.last.end_byte()
    }

    /// Returns the text of the matched region.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.source.get(self.byte_range()).unwrap_or_default()
    }

    /// Returns the start position (line, column) of the match.
    ///
    /// Both line and column are one-based for display purposes.
    #[must_use]
    pub fn start_position(&self) -> (u32, u32) {
        point_to_one_based(self.node.start_position())
    }

    /// Returns the end position (line, column) of the match.
    ///
    /// Both line and column are one-based for display purposes.
    #[must_use]
    pub fn end_position(&self) -> (u32, u32) {
        point_to_one_based(self.last.end_position())
    }

    /// Gets the binding of a named wildcard.
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&CapturedValue<'a>> {
        self.captures.get(name)
    }

    /// Returns all bindings of named wildcards.
    #[must_use]
    pub const fn captures(&self) -> &HashMap<String, CapturedValue<'a>> {
        &self.captures
    }
}

/// Template matcher that finds occurrences in parsed code.
pub struct Matcher<'p> {
    pattern: &'p Pattern,
    roots: Vec<Node<'p>>,
}

impl<'p> Matcher<'p> {
    /// Creates a new matcher for the given pattern.
    #[must_use]
    pub fn new(pattern: &'p Pattern) -> Self {
        Self {
            pattern,
            roots: pattern.roots(),
        }
    }

    /// Finds all matches of the pattern in the parsed source, in pre-order.
    ///
    /// The search stops once the configured maximum number of matches has
    /// been reached.
    #[must_use]
    pub fn find_all<'a>(&self, parsed: &'a ParseResult) -> Vec<MatchResult<'a>> {
        search::find_all(self, parsed)
    }

    /// Finds the first match of the pattern in the parsed source.
    #[must_use]
    pub fn find_first<'a>(&self, parsed: &'a ParseResult) -> Option<MatchResult<'a>> {
        search::find_first(self, parsed)
    }

    /// Tries the pattern at exactly one node of `parsed`.
    #[must_use]
    pub fn match_node<'a>(&self, parsed: &'a ParseResult, node: Node<'a>) -> Option<MatchResult<'a>> {
        let ctx = MatchContext::new(self.pattern, parsed.source());
        search::match_at(self, node, &ctx)
    }
}

impl Pattern {
    /// Finds all matches of this pattern in the parsed source.
    #[must_use]
    pub fn find_all<'a>(&self, parsed: &'a ParseResult) -> Vec<MatchResult<'a>> {
        Matcher::new(self).find_all(parsed)
    }

    /// Finds the first match of this pattern in the parsed source.
    #[must_use]
    pub fn find_first<'a>(&self, parsed: &'a ParseResult) -> Option<MatchResult<'a>> {
        Matcher::new(self).find_first(parsed)
    }

    /// Tries this pattern at exactly one node of `parsed`.
    #[must_use]
    pub fn match_node<'a>(&self, parsed: &'a ParseResult, node: Node<'a>) -> Option<MatchResult<'a>> {
        Matcher::new(self).match_node(parsed, node)
    }
}

#[cfg(test)]
mod tests;
