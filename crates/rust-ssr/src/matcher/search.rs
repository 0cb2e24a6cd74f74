//! Pre-order search over a candidate tree.

use tree_sitter::Node;

use crate::matcher::context::{MatchContext, MatchState};
use crate::matcher::substrate::match_nodes;
use crate::matcher::{MatchResult, Matcher};
use crate::parser::ParseResult;
use crate::syntax::{named_children, next_item};

/// Collects matches in pre-order, up to the configured limit.
pub(super) fn find_all<'a>(matcher: &Matcher<'_>, parsed: &'a ParseResult) -> Vec<MatchResult<'a>> {
    let limit = matcher.pattern.config().max_matches();
    let mut results = Vec::new();
    if limit == 0 {
        return results;
    }
    walk(matcher, parsed, |found| {
        results.push(found);
        results.len() < limit
    });
    results
}

pub(super) fn find_first<'a>(matcher: &Matcher<'_>, parsed: &'a ParseResult) -> Option<MatchResult<'a>> {
    let mut first = None;
    walk(matcher, parsed, |found| {
        first = Some(found);
        false
    });
    first
}

/// Visits candidate anchors in pre-order, handing each match to `on_match`
/// until it returns `false`.
fn walk<'a, F>(matcher: &Matcher<'_>, parsed: &'a ParseResult, mut on_match: F)
where
    F: FnMut(MatchResult<'a>) -> bool,
{
    let ctx = MatchContext::new(matcher.pattern, parsed.source());
    let mut pending = vec![parsed.root_node()];
    while let Some(node) = pending.pop() {
        if let Some(found) = match_at(matcher, node, &ctx) {
            let (line, column) = found.start_position();
            tracing::debug!(line, column, kind = node.kind(), "template matched");
            if !on_match(found) {
                return;
            }
        }
        pending.extend(named_children(node).into_iter().rev());
    }
}

/// Tries every template root against consecutive statements starting at
/// `anchor`, with fresh bindings.
pub(super) fn match_at<'a, 'p>(
    matcher: &Matcher<'p>,
    anchor: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
) -> Option<MatchResult<'a>> {
    if anchor.kind() == "attribute_item" || anchor.is_extra() {
        return None;
    }

    let mut state = MatchState::new();
    let mut matched = Vec::with_capacity(matcher.roots.len());
    let mut current = Some(anchor);
    for (index, root) in matcher.roots.iter().enumerate() {
        let candidate = current?;
        if !match_nodes(*root, candidate, ctx, &mut state) {
            if index > 0 {
                tracing::trace!(root = index, kind = candidate.kind(), "partial multi-item match abandoned");
            }
            return None;
        }
        matched.push(candidate);
        current = next_item(candidate);
    }

    MatchResult::from_run(matched, ctx.source(), state.into_captures().into_inner())
}
