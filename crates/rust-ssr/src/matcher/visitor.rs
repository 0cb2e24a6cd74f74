//! Structural comparison, one strategy per [`NodeKind`].
//!
//! Every strategy is a conjunction of child comparisons. Children are read by
//! field name where the grammar provides one and by kind otherwise.

use tree_sitter::Node;

use crate::matcher::context::{MatchContext, MatchState};
use crate::matcher::substrate::{
    SequenceItem, match_in_any_order, match_in_any_order_with, match_nodes, match_optional,
    match_sequentially, match_sequentially_with,
};
use crate::syntax::{
    LiteralValues, NodeKind, TupleField, child_of_kind, elements, first_unfielded_child,
    has_token, is_generic_parameter, is_path_expression, is_path_like, last_path_segment,
    named_children, outer_attributes, significant_children, token_groups, token_text,
    tuple_fields, within_attribute,
};

/// Compares a structurally handled pattern node with a candidate.
pub(crate) fn visit<'a, 'p>(
    pattern: Node<'p>,
    candidate: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    let (p, c) = (pattern, candidate);
    match NodeKind::of(p) {
        NodeKind::StructItem => struct_item(p, c, ctx, state),
        NodeKind::TypeParameters | NodeKind::TraitBounds | NodeKind::WhereClause => {
            same_kind(p, c) && match_in_any_order(&elements(p), &elements(c), c, ctx, state)
        }
        NodeKind::TypeArguments | NodeKind::Arguments | NodeKind::FieldDeclarationList => {
            same_kind(p, c) && match_sequentially(&elements(p), &elements(c), c, ctx, state)
        }
        NodeKind::WherePredicate => {
            same_kind(p, c)
                && match_field(p, c, "left", ctx, state)
                && match_field(p, c, "bounds", ctx, state)
        }
        NodeKind::TypeParameter => type_parameter(p, c, ctx, state),
        NodeKind::LifetimeParameter => {
            same_kind(p, c)
                && match_field(p, c, "name", ctx, state)
                && match_field(p, c, "bounds", ctx, state)
        }
        NodeKind::ConstParameter => {
            same_kind(p, c)
                && match_field(p, c, "type", ctx, state)
                && match_field(p, c, "name", ctx, state)
                && match_field(p, c, "value", ctx, state)
        }
        NodeKind::HigherRankedTraitBound => {
            same_kind(p, c)
                && match_field(p, c, "type_parameters", ctx, state)
                && match_field(p, c, "type", ctx, state)
        }
        NodeKind::ConstItem => const_item(p, c, ctx, state),
        NodeKind::FieldDeclaration => {
            same_kind(p, c)
                && match_attributes(p, c, ctx, state)
                && match_child_of_kind(p, c, "visibility_modifier", ctx, state)
                && match_field(p, c, "name", ctx, state)
                && match_field(p, c, "type", ctx, state)
        }
        NodeKind::OrderedFieldDeclarationList => same_kind(p, c) && tuple_field_list(p, c, ctx, state),
        NodeKind::RefLikeType => {
            same_kind(p, c)
                && same_marker(p, c, "mutable_specifier")
                && same_marker(p, c, "const")
                && match_child_of_kind(p, c, "lifetime", ctx, state)
                && match_field(p, c, "type", ctx, state)
        }
        NodeKind::Lifetime | NodeKind::Label => quote_identifier(p, c, ctx, state),
        NodeKind::Visibility => {
            same_kind(p, c)
                && token_text(p, ctx.pattern().parsed().source()) == token_text(c, ctx.source())
        }
        NodeKind::ContinueExpression => {
            same_kind(p, c)
                && match_child_of_kind(p, c, "label", ctx, state)
                && match_attributes(p, c, ctx, state)
        }
        NodeKind::BreakExpression => {
            same_kind(p, c)
                && match_child_of_kind(p, c, "label", ctx, state)
                && match_attributes(p, c, ctx, state)
                && match_optional(break_value(p), break_value(c), ctx, state)
        }
        NodeKind::AttributeItem => {
            same_kind(p, c) && match_child_of_kind(p, c, "attribute", ctx, state)
        }
        NodeKind::Attribute => {
            same_kind(p, c)
                && match_optional(first_unfielded_child(p), first_unfielded_child(c), ctx, state)
                && match_field(p, c, "value", ctx, state)
                && match_field(p, c, "arguments", ctx, state)
        }
        NodeKind::TokenTree if within_attribute(p) => same_kind(p, c) && meta_arguments(p, c, ctx, state),
        NodeKind::ScopedIdentifier => scoped_identifier(p, c, ctx, state),
        NodeKind::Literal => {
            NodeKind::of(c) == NodeKind::Literal
                && LiteralValues::of(p, ctx.pattern().parsed().source())
                    == LiteralValues::of(c, ctx.source())
        }
        NodeKind::ExpressionStatement => {
            same_kind(p, c)
                && match_attributes(p, c, ctx, state)
                && match_optional(first_expression(p), first_expression(c), ctx, state)
        }
        NodeKind::CallExpression => {
            same_kind(p, c)
                && match_field(p, c, "function", ctx, state)
                && match_field(p, c, "arguments", ctx, state)
        }
        NodeKind::Identifier => identifier(p, c, ctx, state),
        NodeKind::TokenTree | NodeKind::Other => fallback(p, c, ctx, state),
    }
}

fn same_kind(p: Node<'_>, c: Node<'_>) -> bool {
    p.kind() == c.kind()
}

/// Presence of a keyword or specifier must agree on both sides.
fn same_marker(p: Node<'_>, c: Node<'_>, kind: &str) -> bool {
    has_token(p, kind) == has_token(c, kind)
}

fn match_field<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    field: &str,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match_optional(
        p.child_by_field_name(field),
        c.child_by_field_name(field),
        ctx,
        state,
    )
}

fn match_child_of_kind<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    kind: &str,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match_optional(child_of_kind(p, kind), child_of_kind(c, kind), ctx, state)
}

fn match_attributes<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match_in_any_order(&outer_attributes(p), &outer_attributes(c), c, ctx, state)
}

fn struct_item<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    matches!(c.kind(), "struct_item" | "union_item")
        && same_marker(p, c, "union")
        && match_attributes(p, c, ctx, state)
        && match_child_of_kind(p, c, "visibility_modifier", ctx, state)
        && match_field(p, c, "name", ctx, state)
        && match_field(p, c, "type_parameters", ctx, state)
        && match_child_of_kind(p, c, "where_clause", ctx, state)
        && match_field(p, c, "body", ctx, state)
}

fn type_parameter<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    if !is_generic_parameter(c) {
        return false;
    }
    if c.kind() != "type_parameter" {
        return ctx.pattern_text(p) == ctx.candidate_text(c);
    }
    match_attributes(p, c, ctx, state)
        && match_field(p, c, "bounds", ctx, state)
        && match_field(p, c, "default_type", ctx, state)
        && match_field(p, c, "name", ctx, state)
}

fn const_item<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    matches!(c.kind(), "const_item" | "static_item")
        && same_marker(p, c, "static")
        && same_marker(p, c, "mutable_specifier")
        && match_field(p, c, "name", ctx, state)
        && match_child_of_kind(p, c, "visibility_modifier", ctx, state)
        && match_field(p, c, "type", ctx, state)
        && match_field(p, c, "value", ctx, state)
        && match_attributes(p, c, ctx, state)
}

impl<'t> SequenceItem<'t> for TupleField<'t> {
    fn placeholder(&self) -> Option<Node<'t>> {
        (self.attributes.is_empty() && self.visibility.is_none()).then_some(self.ty)
    }

    fn bound_node(&self) -> Node<'t> {
        self.ty
    }
}

fn tuple_field_list<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match_sequentially_with(
        &tuple_fields(p),
        &tuple_fields(c),
        c,
        ctx,
        state,
        &|pf: &TupleField<'p>, cf: &TupleField<'a>, cx, st| {
            match_in_any_order(&pf.attributes, &cf.attributes, cf.ty, cx, st)
                && match_optional(pf.visibility, cf.visibility, cx, st)
                && match_nodes(pf.ty, cf.ty, cx, st)
        },
    )
}

/// Lifetimes and labels: a wildcard binds the name after the quote.
fn quote_identifier<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    if !same_kind(p, c) {
        return false;
    }
    let wildcard = child_of_kind(p, "identifier").and_then(|name| ctx.substitution(name));
    match wildcard {
        Some(handler) => handler.validate(c, 1, ctx, state),
        None => ctx.pattern_text(p) == ctx.candidate_text(c),
    }
}

/// The value carried by `break`, if any.
fn break_value(node: Node<'_>) -> Option<Node<'_>> {
    named_children(node)
        .into_iter()
        .find(|child| child.kind() != "label")
}

fn first_expression(node: Node<'_>) -> Option<Node<'_>> {
    elements(node).into_iter().next()
}

/// A comma-separated argument inside an attribute, such as `Debug` in
/// `#[derive(Debug, Clone)]`.
struct TokenGroup<'t> {
    tokens: Vec<Node<'t>>,
    tree: Node<'t>,
}

impl<'t> SequenceItem<'t> for TokenGroup<'t> {
    fn placeholder(&self) -> Option<Node<'t>> {
        match self.tokens.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn bound_node(&self) -> Node<'t> {
        self.tokens.first().copied().unwrap_or(self.tree)
    }
}

fn groups_of(tree: Node<'_>) -> Vec<TokenGroup<'_>> {
    token_groups(tree)
        .into_iter()
        .map(|tokens| TokenGroup { tokens, tree })
        .collect()
}

fn meta_arguments<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    match_in_any_order_with(
        &groups_of(p),
        &groups_of(c),
        c,
        ctx,
        state,
        &|pg: &TokenGroup<'p>, cg: &TokenGroup<'a>, cx, st| {
            match_sequentially(&pg.tokens, &cg.tokens, cg.tree, cx, st)
        },
    )
}

/// A qualified path. An absent qualifier in the pattern accepts any
/// qualifier, including none.
fn scoped_identifier<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    let (qualifier, name) = match NodeKind::of(c) {
        NodeKind::ScopedIdentifier => (c.child_by_field_name("path"), c.child_by_field_name("name")),
        _ if c.child_count() == 0 => (None, Some(c)),
        _ => return false,
    };
    match_optional(p.child_by_field_name("name"), name, ctx, state)
        && match_optional(p.child_by_field_name("path"), qualifier, ctx, state)
}

fn identifier<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    if !is_path_expression(p) {
        return same_kind(p, c) && ctx.pattern_text(p) == ctx.candidate_text(c);
    }
    is_path_like(c)
        && ctx.pattern_text(p) == ctx.candidate_text(last_path_segment(c))
        && match_attributes(p, c, ctx, state)
}

fn fallback<'a, 'p>(
    p: Node<'p>,
    c: Node<'a>,
    ctx: &MatchContext<'a, 'p>,
    state: &mut MatchState<'a>,
) -> bool {
    if !same_kind(p, c) {
        return false;
    }
    if p.child_count() == 0 {
        return ctx.pattern_text(p) == ctx.candidate_text(c);
    }
    match_sequentially(&significant_children(p), &significant_children(c), c, ctx, state)
}
