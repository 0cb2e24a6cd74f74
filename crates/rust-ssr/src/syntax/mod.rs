//! Typed view over Tree-sitter Rust nodes.
//!
//! Tree-sitter exposes node kinds as strings. The matcher dispatches on the
//! closed [`NodeKind`] enum instead, and reads children through the helpers
//! here so that comments never take part in a comparison.

mod literal;

use tree_sitter::Node;

pub(crate) use literal::LiteralValues;

/// Node kinds that have a dedicated matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// `struct` or `union` item.
    StructItem,
    TypeParameters,
    WhereClause,
    WherePredicate,
    TypeParameter,
    LifetimeParameter,
    ConstParameter,
    TypeArguments,
    TraitBounds,
    HigherRankedTraitBound,
    /// `const` or `static` item.
    ConstItem,
    FieldDeclarationList,
    FieldDeclaration,
    OrderedFieldDeclarationList,
    /// `&T` or `*const T` / `*mut T`.
    RefLikeType,
    Lifetime,
    Label,
    Visibility,
    ContinueExpression,
    BreakExpression,
    /// `#[...]` or `#![...]`.
    AttributeItem,
    Attribute,
    TokenTree,
    ScopedIdentifier,
    Literal,
    ExpressionStatement,
    CallExpression,
    Arguments,
    Identifier,
    Other,
}

impl NodeKind {
    pub(crate) fn of(node: Node<'_>) -> Self {
        match node.kind() {
            "struct_item" | "union_item" => Self::StructItem,
            "type_parameters" => Self::TypeParameters,
            "where_clause" => Self::WhereClause,
            "where_predicate" => Self::WherePredicate,
            "type_parameter" => Self::TypeParameter,
            "lifetime_parameter" => Self::LifetimeParameter,
            "const_parameter" => Self::ConstParameter,
            "type_arguments" => Self::TypeArguments,
            "trait_bounds" => Self::TraitBounds,
            "higher_ranked_trait_bound" => Self::HigherRankedTraitBound,
            "const_item" | "static_item" => Self::ConstItem,
            "field_declaration_list" => Self::FieldDeclarationList,
            "field_declaration" => Self::FieldDeclaration,
            "ordered_field_declaration_list" => Self::OrderedFieldDeclarationList,
            "reference_type" | "pointer_type" => Self::RefLikeType,
            "lifetime" => Self::Lifetime,
            "label" => Self::Label,
            "visibility_modifier" => Self::Visibility,
            "continue_expression" => Self::ContinueExpression,
            "break_expression" => Self::BreakExpression,
            "attribute_item" | "inner_attribute_item" => Self::AttributeItem,
            "attribute" => Self::Attribute,
            "token_tree" => Self::TokenTree,
            "scoped_identifier" | "scoped_type_identifier" => Self::ScopedIdentifier,
            "expression_statement" => Self::ExpressionStatement,
            "call_expression" => Self::CallExpression,
            "arguments" => Self::Arguments,
            "identifier" | "self" => Self::Identifier,
            kind if is_literal_kind(kind) => Self::Literal,
            _ => Self::Other,
        }
    }
}

fn is_literal_kind(kind: &str) -> bool {
    matches!(
        kind,
        "integer_literal"
            | "float_literal"
            | "boolean_literal"
            | "char_literal"
            | "string_literal"
            | "raw_string_literal"
    )
}

/// Parents whose identifier children name something rather than evaluate it.
const NON_EXPRESSION_PARENTS: &[&str] = &[
    "attribute",
    "label",
    "lifetime",
    "macro_invocation",
    "scoped_identifier",
    "scoped_type_identifier",
    "scoped_use_list",
    "token_tree",
    "use_as_clause",
    "use_declaration",
    "use_list",
    "use_wildcard",
];

/// Fields whose identifier children name something rather than evaluate it.
const NON_EXPRESSION_FIELDS: &[&str] = &[
    "alias", "field", "label", "macro", "name", "path", "pattern", "type",
];

/// Returns whether `node` is a path used as an expression, such as the callee
/// in `foo()` or the operand in `x + 1`.
pub(crate) fn is_path_expression(node: Node<'_>) -> bool {
    if !matches!(
        node.kind(),
        "identifier" | "scoped_identifier" | "self" | "generic_function"
    ) {
        return false;
    }

    let Some(parent) = node.parent() else {
        return false;
    };
    if NON_EXPRESSION_PARENTS.contains(&parent.kind()) || parent.kind().ends_with("pattern") {
        return false;
    }
    field_name_of(node).is_none_or(|field| !NON_EXPRESSION_FIELDS.contains(&field))
}

/// Returns whether a candidate node can stand where a path expression does.
pub(crate) fn is_path_like(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "identifier" | "scoped_identifier" | "self" | "generic_function"
    )
}

/// Returns whether `node` is a generic parameter of any flavour.
pub(crate) fn is_generic_parameter(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "type_parameter" | "lifetime_parameter" | "const_parameter"
    ) || (node.kind() == "type_identifier"
        && node.parent().is_some_and(|p| p.kind() == "type_parameters"))
}

/// Returns the field name under which `node` hangs from its parent.
pub(crate) fn field_name_of(node: Node<'_>) -> Option<&'static str> {
    let parent = node.parent()?;
    let mut cursor = parent.walk();
    if !cursor.goto_first_child() {
        return None;
    }
    loop {
        if cursor.node() == node {
            return cursor.field_name();
        }
        if !cursor.goto_next_sibling() {
            return None;
        }
    }
}

/// Returns every child except comments and comma separators.
pub(crate) fn significant_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_extra() && (child.is_named() || child.kind() != ","))
        .collect()
}

/// Returns named children, skipping comments.
pub(crate) fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Returns named children other than comments and attribute items.
pub(crate) fn elements(node: Node<'_>) -> Vec<Node<'_>> {
    named_children(node)
        .into_iter()
        .filter(|child| child.kind() != "attribute_item")
        .collect()
}

/// Returns the first named child of the given kind.
pub(crate) fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    named_children(node)
        .into_iter()
        .find(|child| child.kind() == kind)
}

/// Returns whether any child, named or anonymous, has the given kind.
pub(crate) fn has_token(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| child.kind() == kind)
}

/// Returns the first named child that is not attached to a field.
pub(crate) fn first_unfielded_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return None;
    }
    loop {
        let child = cursor.node();
        if child.is_named() && !child.is_extra() && cursor.field_name().is_none() {
            return Some(child);
        }
        if !cursor.goto_next_sibling() {
            return None;
        }
    }
}

/// Collects the outer attributes of `node`.
///
/// Tree-sitter places `#[...]` items as siblings ahead of the item they
/// decorate, so this walks backwards over attribute items and comments.
pub(crate) fn outer_attributes(node: Node<'_>) -> Vec<Node<'_>> {
    let mut attributes = Vec::new();
    let mut current = node.prev_named_sibling();
    while let Some(sibling) = current {
        if sibling.kind() == "attribute_item" {
            attributes.push(sibling);
        } else if !sibling.is_extra() {
            break;
        }
        current = sibling.prev_named_sibling();
    }
    attributes.reverse();
    attributes
}

/// Returns the items of a statement list in order.
///
/// Attribute items that decorate a following sibling are folded into that
/// sibling and skipped.
pub(crate) fn items(parent: Node<'_>) -> Vec<Node<'_>> {
    named_children(parent)
        .into_iter()
        .filter(|child| !(child.kind() == "attribute_item" && decorates_sibling(*child)))
        .collect()
}

fn decorates_sibling(attribute: Node<'_>) -> bool {
    let mut next = attribute.next_named_sibling();
    while let Some(sibling) = next {
        if !sibling.is_extra() {
            return true;
        }
        next = sibling.next_named_sibling();
    }
    false
}

/// Returns the node following `node` in a statement list.
pub(crate) fn next_item(node: Node<'_>) -> Option<Node<'_>> {
    let mut next = node.next_named_sibling();
    while let Some(sibling) = next {
        if !sibling.is_extra() && sibling.kind() != "attribute_item" {
            return Some(sibling);
        }
        next = sibling.next_named_sibling();
    }
    None
}

/// Returns the last segment of a path, or the node itself.
pub(crate) fn last_path_segment(node: Node<'_>) -> Node<'_> {
    match node.kind() {
        "scoped_identifier" | "scoped_type_identifier" => {
            node.child_by_field_name("name").unwrap_or(node)
        }
        "generic_function" => node
            .child_by_field_name("function")
            .map_or(node, last_path_segment),
        _ => node,
    }
}

/// Returns the source text covered by `node`.
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Concatenates the leaf tokens of `node` without the whitespace between them.
pub(crate) fn token_text(node: Node<'_>, source: &str) -> String {
    let mut text = String::new();
    push_tokens(node, source, &mut text);
    text
}

fn push_tokens(node: Node<'_>, source: &str, out: &mut String) {
    if node.child_count() == 0 {
        out.push_str(node_text(node, source));
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.is_extra() {
            push_tokens(child, source, out);
        }
    }
}

/// One field of a tuple struct: attributes, visibility and type.
///
/// `ordered_field_declaration_list` holds these flat, so they are regrouped
/// before matching.
#[derive(Debug, Clone)]
pub(crate) struct TupleField<'t> {
    pub(crate) attributes: Vec<Node<'t>>,
    pub(crate) visibility: Option<Node<'t>>,
    pub(crate) ty: Node<'t>,
}

pub(crate) fn tuple_fields(list: Node<'_>) -> Vec<TupleField<'_>> {
    let mut fields = Vec::new();
    let mut attributes = Vec::new();
    let mut visibility = None;

    let mut cursor = list.walk();
    if !cursor.goto_first_child() {
        return fields;
    }
    loop {
        let child = cursor.node();
        if cursor.field_name() == Some("type") {
            fields.push(TupleField {
                attributes: std::mem::take(&mut attributes),
                visibility: visibility.take(),
                ty: child,
            });
        } else if child.kind() == "attribute_item" {
            attributes.push(child);
        } else if child.kind() == "visibility_modifier" {
            visibility = Some(child);
        }
        if !cursor.goto_next_sibling() {
            return fields;
        }
    }
}

/// Splits the contents of a token tree into comma-separated groups.
///
/// The enclosing delimiters are dropped, as is a trailing comma.
pub(crate) fn token_groups(tree: Node<'_>) -> Vec<Vec<Node<'_>>> {
    let mut cursor = tree.walk();
    let children: Vec<_> = tree
        .children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    let inner = match children.as_slice() {
        [open, inner @ .., close] if is_delimiter(*open) && is_delimiter(*close) => inner,
        all => all,
    };

    let mut groups = Vec::new();
    let mut current = Vec::new();
    for child in inner {
        if !child.is_named() && child.kind() == "," {
            groups.push(std::mem::take(&mut current));
        } else {
            current.push(*child);
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn is_delimiter(node: Node<'_>) -> bool {
    !node.is_named() && matches!(node.kind(), "(" | ")" | "[" | "]" | "{" | "}")
}

/// Returns whether `node` sits inside an attribute.
pub(crate) fn within_attribute(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "attribute" => return true,
            "token_tree" => current = parent.parent(),
            _ => return false,
        }
    }
    false
}
