//! One-pass compilation of a parsed template into matching instructions.
//!
//! The compiling visitor walks every node below the template's top-level
//! nodes and registers a handler for it. Placeholder nodes get a
//! [`SubstitutionHandler`] whose filter depends on the slot they occupy; all
//! other nodes are matched structurally. Each top-level node is then marked
//! as a match root.

use std::collections::{HashMap, HashSet};

use tree_sitter::Node;

use crate::substitution::{SubstitutionHandler, filter_for};
use crate::syntax::{node_text, outer_attributes};
use crate::template::Template;

/// How a pattern node is compared with candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeHandler {
    /// Compare by node kind using the structural matcher.
    Structural,
    /// Bind the candidate to a template variable.
    Substitution(SubstitutionHandler),
}

/// Handlers keyed by pattern node id, plus the set of match roots.
#[derive(Debug, Default)]
pub(crate) struct HandlerTable {
    handlers: HashMap<usize, NodeHandler>,
    roots: HashSet<usize>,
}

impl HandlerTable {
    pub(crate) fn handler(&self, node: Node<'_>) -> NodeHandler {
        self.handlers
            .get(&node.id())
            .copied()
            .unwrap_or(NodeHandler::Structural)
    }

    pub(crate) fn substitution(&self, node: Node<'_>) -> Option<&SubstitutionHandler> {
        match self.handlers.get(&node.id()) {
            Some(NodeHandler::Substitution(handler)) => Some(handler),
            _ => None,
        }
    }

    pub(crate) fn is_match_root(&self, node: Node<'_>) -> bool {
        self.roots.contains(&node.id())
    }

    pub(crate) fn node_count(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn wildcard_count(&self) -> usize {
        self.handlers
            .values()
            .filter(|handler| matches!(handler, NodeHandler::Substitution(_)))
            .count()
    }

    pub(crate) fn root_count(&self) -> usize {
        self.roots.len()
    }
}

pub(crate) struct CompilingVisitor<'t> {
    template: &'t Template,
    source: &'t str,
    table: HandlerTable,
}

impl<'t> CompilingVisitor<'t> {
    /// `source` is the text the template's syntax tree was parsed from.
    pub(crate) fn new(template: &'t Template, source: &'t str) -> Self {
        Self {
            template,
            source,
            table: HandlerTable::default(),
        }
    }

    pub(crate) fn compile(mut self, roots: &[Node<'_>]) -> HandlerTable {
        for root in roots {
            for attribute in outer_attributes(*root) {
                self.visit(attribute);
            }
            self.visit(*root);
            self.table.roots.insert(root.id());
        }
        self.table
    }

    fn visit(&mut self, node: Node<'_>) {
        self.register(node);
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children {
            self.visit(child);
        }
    }

    fn register(&mut self, node: Node<'_>) {
        let text = node_text(node, self.source);
        let handler = match self.template.variable_for_placeholder(text) {
            Some(variable) => {
                NodeHandler::Substitution(SubstitutionHandler::new(variable, filter_for(node)))
            }
            None => NodeHandler::Structural,
        };
        self.table.handlers.insert(node.id(), handler);
    }
}
