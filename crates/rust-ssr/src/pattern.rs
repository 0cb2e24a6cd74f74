//! Search template compilation.
//!
//! Compiling a template runs the template front-end, parses the normalised
//! text as Rust, and hands the resulting top-level nodes to the compiling
//! visitor. Templates that are not valid at file level (a bare expression or
//! statement) are parsed again as the body of a function.

use tree_sitter::Node;

use crate::compiler::{CompilingVisitor, HandlerTable};
use crate::config::SearchConfig;
use crate::error::SsrError;
use crate::parser::{ParseResult, Parser};
use crate::syntax::items;
use crate::template::{Template, Variable};

const WRAPPER_NAME: &str = "__ssr_template__";

/// A compiled structural search template.
///
/// Compilation happens once per template; the result is immutable and can be
/// shared between threads running independent searches.
#[derive(Debug)]
pub struct Pattern {
    source: String,
    template: Template,
    parsed: ParseResult,
    wrapped_in_function: bool,
    handlers: HandlerTable,
    config: SearchConfig,
}

impl Pattern {
    /// Compiles a template with the default [`SearchConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the template has malformed variables or does not
    /// parse as Rust.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_ssr::Pattern;
    ///
    /// // Any call with exactly one argument.
    /// let pattern = Pattern::compile("'_('_)")?;
    /// assert_eq!(pattern.variables().len(), 2);
    /// # Ok::<(), rust_ssr::SsrError>(())
    /// ```
    pub fn compile(source: &str) -> Result<Self, SsrError> {
        Self::compile_with_config(source, &SearchConfig::default())
    }

    /// Compiles a template with explicit limits and constraint settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the template has malformed variables, invalid
    /// regular expressions, or does not parse as Rust.
    pub fn compile_with_config(source: &str, config: &SearchConfig) -> Result<Self, SsrError> {
        let template = Template::parse(source, config)?;
        let mut parser = Parser::new()?;
        let (parsed, wrapped_in_function) = parse_template(&mut parser, template.normalised())?;

        let handlers = {
            let roots = top_level_nodes(&parsed, wrapped_in_function);
            if roots.is_empty() {
                return Err(SsrError::pattern_compile("template contains no Rust syntax"));
            }
            CompilingVisitor::new(&template, parsed.source()).compile(&roots)
        };

        tracing::debug!(
            template = source,
            nodes = handlers.node_count(),
            roots = handlers.root_count(),
            wildcards = handlers.wildcard_count(),
            wrapped = wrapped_in_function,
            "compiled search template"
        );

        Ok(Self {
            source: source.to_owned(),
            template,
            parsed,
            wrapped_in_function,
            handlers,
            config: config.clone(),
        })
    }

    /// Returns the template as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the variables declared by the template, in order of first
    /// appearance.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        self.template.variables()
    }

    /// Looks up a named variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables()
            .iter()
            .find(|variable| !variable.is_anonymous() && variable.name() == name)
    }

    /// Returns the configuration the template was compiled with.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the parsed, normalised template.
    #[must_use]
    pub const fn parsed(&self) -> &ParseResult {
        &self.parsed
    }

    /// Returns whether the template had to be wrapped in a function to parse.
    #[must_use]
    pub const fn wrapped_in_function(&self) -> bool {
        self.wrapped_in_function
    }

    /// Returns how many consecutive items a match spans.
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.handlers.root_count()
    }

    pub(crate) const fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// Returns the match roots in source order.
    pub(crate) fn roots(&self) -> Vec<Node<'_>> {
        top_level_nodes(&self.parsed, self.wrapped_in_function)
            .into_iter()
            .filter(|node| self.handlers.is_match_root(*node))
            .collect()
    }
}

fn parse_template(parser: &mut Parser, normalised: &str) -> Result<(ParseResult, bool), SsrError> {
    let parsed = parser.parse(normalised)?;
    if !parsed.has_errors() {
        return Ok((parsed, false));
    }

    let wrapped = parser.parse(&wrap_in_function(normalised))?;
    if let Some(error) = wrapped.errors().first() {
        return Err(SsrError::pattern_compile(format!(
            "template does not parse as Rust ({error})"
        )));
    }
    Ok((wrapped, true))
}

/// Places a statement-level template inside a function body, terminating a
/// trailing expression so that it parses as an expression statement.
fn wrap_in_function(normalised: &str) -> String {
    let trimmed = normalised.trim_end();
    let needs_semicolon = !trimmed.is_empty() && !trimmed.ends_with(';') && !trimmed.ends_with('}');
    let statement = if needs_semicolon {
        format!("{trimmed};")
    } else {
        trimmed.to_owned()
    };
    format!("fn {WRAPPER_NAME}() {{ {statement} }}")
}

fn top_level_nodes(parsed: &ParseResult, wrapped_in_function: bool) -> Vec<Node<'_>> {
    let root = parsed.root_node();
    if !wrapped_in_function {
        return items(root);
    }
    items(root)
        .into_iter()
        .find(|item| item.kind() == "function_item")
        .and_then(|function| function.child_by_field_name("body"))
        .map(items)
        .unwrap_or_default()
}
