//! Per-query matching state.
//!
//! [`MatchContext`] is shared read-only by every comparison in a query.
//! [`MatchState`] holds the bindings made so far; trial matches clone it and
//! only write the clone back when the trial succeeds.

use tree_sitter::Node;

use crate::compiler::NodeHandler;
use crate::matcher::capture::Captures;
use crate::pattern::Pattern;
use crate::substitution::SubstitutionHandler;
use crate::syntax::node_text;
use crate::template::Variable;

pub(crate) struct MatchContext<'a, 'p> {
    pattern: &'p Pattern,
    source: &'a str,
}

impl<'a, 'p> MatchContext<'a, 'p> {
    pub(crate) const fn new(pattern: &'p Pattern, source: &'a str) -> Self {
        Self { pattern, source }
    }

    pub(crate) const fn pattern(&self) -> &'p Pattern {
        self.pattern
    }

    /// Source text of the candidate file.
    pub(crate) const fn source(&self) -> &'a str {
        self.source
    }

    pub(crate) fn pattern_text(&self, node: Node<'p>) -> &'p str {
        node_text(node, self.pattern.parsed().source())
    }

    pub(crate) fn candidate_text(&self, node: Node<'a>) -> &'a str {
        node_text(node, self.source)
    }

    pub(crate) fn handler(&self, node: Node<'p>) -> NodeHandler {
        self.pattern.handlers().handler(node)
    }

    /// Returns the wildcard handler registered for a pattern node.
    pub(crate) fn substitution(&self, node: Node<'p>) -> Option<&'p SubstitutionHandler> {
        self.pattern.handlers().substitution(node)
    }

    pub(crate) fn variable(&self, index: usize) -> Option<&'p Variable> {
        self.pattern.variables().get(index)
    }

    pub(crate) const fn max_depth(&self) -> usize {
        self.pattern.config().max_depth()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MatchState<'a> {
    captures: Captures<'a>,
    depth: usize,
}

impl<'a> MatchState<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Descends one level, refusing once `limit` is reached.
    pub(crate) const fn enter(&mut self, limit: usize) -> bool {
        if self.depth >= limit {
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) const fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) const fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) const fn captures_mut(&mut self) -> &mut Captures<'a> {
        &mut self.captures
    }

    pub(crate) fn into_captures(self) -> Captures<'a> {
        self.captures
    }
}
