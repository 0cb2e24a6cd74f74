//! Wildcard handlers attached to placeholder nodes.
//!
//! Every placeholder in a compiled pattern carries a [`SubstitutionHandler`]
//! naming the variable it stands for and a [`NodeFilter`] fixed by the
//! syntactic slot it occupies. Validation checks the filter, then the text
//! constraint, then records the binding.

use tree_sitter::Node;

use crate::matcher::{MatchContext, MatchState};
use crate::syntax::{is_generic_parameter, is_path_expression};
use crate::template::Quantifier;

/// Which candidate nodes a wildcard may bind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum NodeFilter {
    /// Any node at all.
    #[default]
    Any,
    /// Type, lifetime or const generic parameters.
    GenericParameter,
}

impl NodeFilter {
    pub(crate) fn accepts(self, node: Node<'_>) -> bool {
        match self {
            Self::Any => true,
            Self::GenericParameter => is_generic_parameter(node),
        }
    }
}

/// Syntactic positions whose wildcards get a dedicated filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WildcardSlot {
    PathExpression,
    TypeParameter,
}

impl WildcardSlot {
    pub(crate) fn of(node: Node<'_>) -> Option<Self> {
        if is_generic_parameter(node) {
            Some(Self::TypeParameter)
        } else if is_path_expression(node) {
            Some(Self::PathExpression)
        } else {
            None
        }
    }
}

/// Filter assigned to wildcards in each slot; other slots use the default.
pub(crate) const SLOT_FILTERS: &[(WildcardSlot, NodeFilter)] = &[
    (WildcardSlot::PathExpression, NodeFilter::Any),
    (WildcardSlot::TypeParameter, NodeFilter::GenericParameter),
];

/// Looks up the filter for a placeholder node from [`SLOT_FILTERS`].
pub(crate) fn filter_for(node: Node<'_>) -> NodeFilter {
    WildcardSlot::of(node)
        .and_then(|slot| {
            SLOT_FILTERS
                .iter()
                .find(|(candidate, _)| *candidate == slot)
                .map(|(_, filter)| *filter)
        })
        .unwrap_or_default()
}

/// Ties one placeholder occurrence to its variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubstitutionHandler {
    variable: usize,
    filter: NodeFilter,
}

impl SubstitutionHandler {
    pub(crate) const fn new(variable: usize, filter: NodeFilter) -> Self {
        Self { variable, filter }
    }

    pub(crate) const fn filter(&self) -> NodeFilter {
        self.filter
    }

    pub(crate) fn quantifier(&self, ctx: &MatchContext<'_, '_>) -> Quantifier {
        ctx.variable(self.variable)
            .map(crate::template::Variable::quantifier)
            .unwrap_or_default()
    }

    /// Returns whether the filter and text constraint accept `candidate`,
    /// reading its text from byte `offset` onwards.
    pub(crate) fn accepts<'a>(&self, candidate: Node<'a>, offset: usize, ctx: &MatchContext<'a, '_>) -> bool {
        if !self.filter().accepts(candidate) {
            return false;
        }
        let Some(text) = ctx.candidate_text(candidate).get(offset..) else {
            return false;
        };
        ctx.variable(self.variable)
            .and_then(crate::template::Variable::constraint)
            .is_none_or(|constraint| constraint.accepts(text))
    }

    /// Validates a single candidate and binds it.
    ///
    /// A quantified wildcard in a single-node position counts as one
    /// occurrence, so only a maximum of zero rejects here.
    pub(crate) fn validate<'a>(
        &self,
        candidate: Node<'a>,
        offset: usize,
        ctx: &MatchContext<'a, '_>,
        state: &mut MatchState<'a>,
    ) -> bool {
        if self.quantifier(ctx).max() == 0 || !self.accepts(candidate, offset, ctx) {
            return false;
        }
        let Some(variable) = ctx.variable(self.variable) else {
            return false;
        };
        let text = ctx
            .candidate_text(candidate)
            .get(offset..)
            .unwrap_or_default();
        state
            .captures_mut()
            .bind_single(variable.name(), candidate, text)
    }

    /// Validates a run of candidates consumed by a quantified wildcard.
    pub(crate) fn validate_run<'a>(
        &self,
        run: &[Node<'a>],
        anchor: usize,
        ctx: &MatchContext<'a, '_>,
        state: &mut MatchState<'a>,
    ) -> bool {
        if !self.quantifier(ctx).admits(run.len())
            || !run.iter().all(|node| self.accepts(*node, 0, ctx))
        {
            return false;
        }
        let Some(variable) = ctx.variable(self.variable) else {
            return false;
        };
        state
            .captures_mut()
            .bind_multiple(variable.name(), run, anchor, ctx.source())
    }
}
