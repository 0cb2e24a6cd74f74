//! Bindings recorded for named wildcards.

use std::collections::HashMap;
use std::ops::Range;

/// A single node bound to a wildcard.
#[derive(Debug, Clone)]
pub struct CapturedNode<'a> {
    node: tree_sitter::Node<'a>,
    text: &'a str,
}

impl<'a> CapturedNode<'a> {
    /// Returns the bound syntax node.
    #[must_use]
    pub const fn node(&self) -> tree_sitter::Node<'a> {
        self.node
    }

    /// Returns the bound text.
    ///
    /// For labels and lifetimes this excludes the leading quote.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the byte range of the bound node.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }
}

/// Several sibling nodes bound to one quantified wildcard.
#[derive(Debug, Clone)]
pub struct CapturedNodes<'a> {
    nodes: Vec<CapturedNode<'a>>,
    text: &'a str,
    byte_range: Range<usize>,
}

impl<'a> CapturedNodes<'a> {
    /// Returns the bound nodes in source order.
    #[must_use]
    pub fn nodes(&self) -> &[CapturedNode<'a>] {
        &self.nodes
    }

    /// Returns the source text from the first to the last bound node.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the byte range from the first to the last bound node.
    ///
    /// An empty binding has an empty range at the position where the nodes
    /// would have been.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.byte_range.clone()
    }
}

/// The value bound to a named wildcard.
#[derive(Debug, Clone)]
pub enum CapturedValue<'a> {
    /// A wildcard matched in a single-node position.
    Single(CapturedNode<'a>),
    /// A quantified wildcard matched within a list.
    Multiple(CapturedNodes<'a>),
}

impl<'a> CapturedValue<'a> {
    /// Returns the bound text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        match self {
            Self::Single(node) => node.text(),
            Self::Multiple(nodes) => nodes.text(),
        }
    }

    /// Returns the byte range of the binding.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        match self {
            Self::Single(node) => node.byte_range(),
            Self::Multiple(nodes) => nodes.byte_range(),
        }
    }

    /// Returns the binding as a single node, if applicable.
    #[must_use]
    pub const fn as_single(&self) -> Option<&CapturedNode<'a>> {
        match self {
            Self::Single(node) => Some(node),
            Self::Multiple(_) => None,
        }
    }

    /// Returns the binding as a node list, if applicable.
    #[must_use]
    pub const fn as_multiple(&self) -> Option<&CapturedNodes<'a>> {
        match self {
            Self::Multiple(nodes) => Some(nodes),
            Self::Single(_) => None,
        }
    }
}

/// Bindings accumulated during one match attempt.
///
/// Anonymous wildcards have an empty name and are never recorded.
#[derive(Debug, Clone, Default)]
pub(crate) struct Captures<'a> {
    inner: HashMap<String, CapturedValue<'a>>,
}

impl<'a> Captures<'a> {
    pub(crate) fn into_inner(self) -> HashMap<String, CapturedValue<'a>> {
        self.inner
    }

    /// Binds `node` with the given `text`, or checks it against an earlier
    /// binding of the same name.
    pub(crate) fn bind_single(&mut self, name: &str, node: tree_sitter::Node<'a>, text: &'a str) -> bool {
        if name.is_empty() {
            return true;
        }
        self.insert_consistent(name, CapturedValue::Single(CapturedNode { node, text }))
    }

    /// Binds a run of nodes, or checks it against an earlier binding.
    ///
    /// `anchor` positions an empty run in the source.
    pub(crate) fn bind_multiple(
        &mut self,
        name: &str,
        nodes: &[tree_sitter::Node<'a>],
        anchor: usize,
        source: &'a str,
    ) -> bool {
        if name.is_empty() {
            return true;
        }

        let mut ordered = nodes.to_vec();
        ordered.sort_by_key(tree_sitter::Node::start_byte);
        let captured: Vec<_> = ordered
            .iter()
            .map(|node| CapturedNode {
                node: *node,
                text: source.get(node.byte_range()).unwrap_or_default(),
            })
            .collect();

        let byte_range = match (ordered.first(), ordered.last()) {
            (Some(first), Some(last)) => first.start_byte()..last.end_byte(),
            _ => anchor..anchor,
        };
        let text = source.get(byte_range.clone()).unwrap_or_default();

        self.insert_consistent(
            name,
            CapturedValue::Multiple(CapturedNodes {
                nodes: captured,
                text,
                byte_range,
            }),
        )
    }

    fn insert_consistent(&mut self, name: &str, next: CapturedValue<'a>) -> bool {
        let Some(existing) = self.inner.get(name) else {
            self.inner.insert(name.to_owned(), next);
            return true;
        };

        match (existing, &next) {
            (CapturedValue::Single(a), CapturedValue::Single(b)) => {
                a.node.kind() == b.node.kind() && a.text == b.text
            }
            (CapturedValue::Multiple(a), CapturedValue::Multiple(b)) => {
                a.nodes.len() == b.nodes.len()
                    && a
                        .nodes
                        .iter()
                        .zip(&b.nodes)
                        .all(|(left, right)| left.text == right.text)
            }
            _ => false,
        }
    }
}
