//! Matching primitives shared by every node strategy.
//!
//! - [`match_nodes`] is the single entry point for comparing a pattern node
//!   with a candidate node
//! - [`match_optional`] handles children that may be absent
//! - [`match_sequentially`] compares ordered lists, letting quantified
//!   wildcards consume runs of candidates
//! - [`match_in_any_order`] compares unordered lists such as bounds and
//!   attributes
//!
//! List matching backtracks. Every trial runs on a clone of the match state,
//! which replaces the caller's state only when the trial succeeds.

use tree_sitter::Node;

use crate::compiler::NodeHandler;
use crate::matcher::context::{MatchContext, MatchState};
use crate::matcher::visitor;
use crate::substitution::SubstitutionHandler;

/// An element of a list being matched.
pub(crate) trait SequenceItem<'t> {
    /// Node that carries the item's wildcard when the item is nothing but a
    /// placeholder.
    fn placeholder(&self) -> Option<Node<'t>>;

    /// Node recorded when a quantified wildcard consumes the item.
    fn bound_node(&self) -> Node<'t>;
}

impl<'t> SequenceItem<'t> for Node<'t> {
    fn placeholder(&self) -> Option<Node<'t>> {
        Some(*self)
    }

    fn bound_node(&self) -> Node<'t> {
        *self
    }
}

/// Compares one pattern node with one candidate node.
pub(crate) fn match_nodes<'a, 'p>(
    pattern: Node<'p>,
    candidate: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match ctx.handler(pattern) {
        NodeHandler::Substitution(handler) => handler.validate(candidate, 0, ctx, state),
        NodeHandler::Structural => {
            if !state.enter(ctx.max_depth()) {
                tracing::warn!(
                    depth = state.depth(),
                    kind = pattern.kind(),
                    "structural comparison exceeded the depth limit"
                );
                return false;
            }
            let matched = visitor::visit(pattern, candidate, ctx, state);
            state.leave();
            matched
        }
    }
}

/// Compares children that may be absent.
///
/// An absent pattern child places no requirement on the candidate; a present
/// one requires a candidate.
pub(crate) fn match_optional<'a, 'p>(
    pattern: Option<Node<'p>>,
    candidate: Option<Node<'a>>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match (pattern, candidate) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(pattern), Some(candidate)) => match_nodes(pattern, candidate, ctx, state),
    }
}

/// Ordered list comparison over plain nodes.
pub(crate) fn match_sequentially<'a, 'p>(
    patterns: &[Node<'p>],
    candidates: &[Node<'a>],
    parent: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match_sequentially_with(patterns, candidates, parent, ctx, state, &|p, c, cx, st| {
        match_nodes(*p, *c, cx, st)
    })
}

/// Unordered list comparison over plain nodes.
pub(crate) fn match_in_any_order<'a, 'p>(
    patterns: &[Node<'p>],
    candidates: &[Node<'a>],
    parent: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match_in_any_order_with(patterns, candidates, parent, ctx, state, &|p, c, cx, st| {
        match_nodes(*p, *c, cx, st)
    })
}

/// Compares two ordered lists element by element.
///
/// Both lists must be consumed completely. A quantified wildcard consumes
/// between its minimum and maximum number of candidates, preferring the
/// longest run and backing off when the rest of the list fails to match.
pub(crate) fn match_sequentially_with<'a, 'p, P, C, F>(
    patterns: &[P],
    candidates: &[C],
    parent: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
    matches: &F,
) -> bool
where
    P: SequenceItem<'p>,
    C: SequenceItem<'a>,
    F: Fn(&P, &C, &MatchContext<'a, 'p>, &mut MatchState<'a>) -> bool,
{
    SequenceMatcher {
        patterns,
        candidates,
        parent,
        ctx,
        matches,
    }
    .step(0, 0, state)
}

/// Compares two lists whose order is irrelevant.
///
/// An empty pattern list matches any candidate list. Otherwise every
/// non-quantified pattern element is paired with a distinct candidate, and
/// the remaining candidates are shared among the quantified wildcards within
/// their bounds. No candidate may be left over.
pub(crate) fn match_in_any_order_with<'a, 'p, P, C, F>(
    patterns: &[P],
    candidates: &[C],
    parent: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
    matches: &F,
) -> bool
where
    P: SequenceItem<'p>,
    C: SequenceItem<'a>,
    F: Fn(&P, &C, &MatchContext<'a, 'p>, &mut MatchState<'a>) -> bool,
{
    if patterns.is_empty() {
        return true;
    }

    let mut fixed = Vec::new();
    let mut quantified = Vec::new();
    for pattern in patterns {
        match quantified_handler(pattern, ctx) {
            Some(handler) => quantified.push(handler),
            None => fixed.push(pattern),
        }
    }

    let mut used = vec![false; candidates.len()];
    AnyOrderMatcher {
        fixed,
        quantified,
        candidates,
        parent,
        ctx,
        matches,
    }
    .assign(0, &mut used, state)
}

/// Returns the handler of a bare placeholder whose quantifier is not exactly
/// one.
fn quantified_handler<'p, P: SequenceItem<'p>>(
    item: &P,
    ctx: &MatchContext<'_, 'p>,
) -> Option<&'p SubstitutionHandler> {
    item.placeholder()
        .and_then(|node| ctx.substitution(node))
        .filter(|handler| !handler.quantifier(ctx).is_single())
}

struct SequenceMatcher<'c, 'a, 'p, P, C, F> {
    patterns: &'c [P],
    candidates: &'c [C],
    parent: Node<'a>,
    ctx: &'c MatchContext<'a, 'p>,
    matches: &'c F,
}

impl<'a, 'p, P, C, F> SequenceMatcher<'_, 'a, 'p, P, C, F>
where
    P: SequenceItem<'p>,
    C: SequenceItem<'a>,
    F: Fn(&P, &C, &MatchContext<'a, 'p>, &mut MatchState<'a>) -> bool,
{
    fn step(&self, pattern_idx: usize, candidate_idx: usize, state: &mut MatchState<'a>) -> bool {
        let Some(pattern) = self.patterns.get(pattern_idx) else {
            return candidate_idx == self.candidates.len();
        };

        if let Some(handler) = quantified_handler(pattern, self.ctx) {
            return self.step_run(handler, pattern_idx, candidate_idx, state);
        }

        let Some(candidate) = self.candidates.get(candidate_idx) else {
            return false;
        };
        let mut trial = state.clone();
        if (self.matches)(pattern, candidate, self.ctx, &mut trial)
            && self.step(pattern_idx + 1, candidate_idx + 1, &mut trial)
        {
            *state = trial;
            return true;
        }
        false
    }

    fn step_run(
        &self,
        handler: &SubstitutionHandler,
        pattern_idx: usize,
        candidate_idx: usize,
        state: &mut MatchState<'a>,
    ) -> bool {
        let quantifier = handler.quantifier(self.ctx);
        let remaining = self.candidates.len().saturating_sub(candidate_idx);
        let longest = quantifier.max().min(remaining);
        if longest < quantifier.min() {
            return false;
        }

        let anchor = self.anchor(candidate_idx);
        for len in (quantifier.min()..=longest).rev() {
            let Some(run) = self.candidates.get(candidate_idx..candidate_idx + len) else {
                continue;
            };
            let nodes: Vec<_> = run.iter().map(SequenceItem::bound_node).collect();

            let mut trial = state.clone();
            if handler.validate_run(&nodes, anchor, self.ctx, &mut trial)
                && self.step(pattern_idx + 1, candidate_idx + len, &mut trial)
            {
                *state = trial;
                return true;
            }
        }
        false
    }

    /// Byte position for an empty run starting at `candidate_idx`.
    fn anchor(&self, candidate_idx: usize) -> usize {
        if let Some(next) = self.candidates.get(candidate_idx) {
            return next.bound_node().start_byte();
        }
        self.candidates.last().map_or_else(
            || self.parent.start_byte(),
            |last| last.bound_node().end_byte(),
        )
    }
}

struct AnyOrderMatcher<'c, 'a, 'p, P, C, F> {
    fixed: Vec<&'c P>,
    quantified: Vec<&'p SubstitutionHandler>,
    candidates: &'c [C],
    parent: Node<'a>,
    ctx: &'c MatchContext<'a, 'p>,
    matches: &'c F,
}

impl<'a, 'p, P, C, F> AnyOrderMatcher<'_, 'a, 'p, P, C, F>
where
    P: SequenceItem<'p>,
    C: SequenceItem<'a>,
    F: Fn(&P, &C, &MatchContext<'a, 'p>, &mut MatchState<'a>) -> bool,
{
    /// Pairs fixed pattern elements with unused candidates.
    fn assign(&self, fixed_idx: usize, used: &mut [bool], state: &mut MatchState<'a>) -> bool {
        let Some(&pattern) = self.fixed.get(fixed_idx) else {
            return self.distribute(used, state);
        };

        for (candidate_idx, candidate) in self.candidates.iter().enumerate() {
            if used.get(candidate_idx).copied().unwrap_or(true) {
                continue;
            }
            let mut trial = state.clone();
            if !(self.matches)(pattern, candidate, self.ctx, &mut trial) {
                continue;
            }

            set_flag(used, candidate_idx, true);
            if self.assign(fixed_idx + 1, used, &mut trial) {
                *state = trial;
                return true;
            }
            set_flag(used, candidate_idx, false);
        }
        false
    }

    /// Shares the unpaired candidates among the quantified wildcards.
    fn distribute(&self, used: &[bool], state: &mut MatchState<'a>) -> bool {
        let leftovers: Vec<Node<'a>> = self
            .candidates
            .iter()
            .zip(used)
            .filter(|(_, is_used)| !**is_used)
            .map(|(candidate, _)| candidate.bound_node())
            .collect();

        if self.quantified.is_empty() {
            return leftovers.is_empty();
        }

        let mut buckets = vec![Vec::new(); self.quantified.len()];
        self.fill(&leftovers, 0, &mut buckets, state)
    }

    fn fill(
        &self,
        leftovers: &[Node<'a>],
        leftover_idx: usize,
        buckets: &mut [Vec<Node<'a>>],
        state: &mut MatchState<'a>,
    ) -> bool {
        let Some(node) = leftovers.get(leftover_idx).copied() else {
            return self.bind_buckets(buckets, state);
        };

        for (handler, bucket_idx) in self.quantified.iter().zip(0..) {
            let Some(bucket) = buckets.get_mut(bucket_idx) else {
                continue;
            };
            if bucket.len() >= handler.quantifier(self.ctx).max()
                || !handler.accepts(node, 0, self.ctx)
            {
                continue;
            }

            bucket.push(node);
            if self.fill(leftovers, leftover_idx + 1, buckets, state) {
                return true;
            }
            if let Some(undo) = buckets.get_mut(bucket_idx) {
                undo.pop();
            }
        }
        false
    }

    fn bind_buckets(&self, buckets: &[Vec<Node<'a>>], state: &mut MatchState<'a>) -> bool {
        let anchor = self.parent.start_byte();
        let mut trial = state.clone();
        let bound = self
            .quantified
            .iter()
            .zip(buckets)
            .all(|(handler, bucket)| handler.validate_run(bucket, anchor, self.ctx, &mut trial));
        if bound {
            *state = trial;
        }
        bound
    }
}

fn set_flag(flags: &mut [bool], index: usize, value: bool) {
    if let Some(flag) = flags.get_mut(index) {
        *flag = value;
    }
}
