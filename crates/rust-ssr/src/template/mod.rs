//! Search template front-end.
//!
//! A template is Rust source with typed wildcards mixed in. A wildcard is
//! written `'_` followed by an optional name, and may carry modifiers after a
//! colon:
//!
//! - `'_` matches one node without recording it
//! - `'_name` matches one node and binds it as `name`
//! - `'_name:*`, `'_name:+`, `'_name:?`, `'_name:{2}`, `'_name:{1,3}` set how
//!   many sibling nodes the wildcard consumes
//! - `'_name:[regex(foo.*)]` requires the matched text to match the regular
//!   expression in full, and `[!regex(...)]` requires that it does not
//!
//! `\'` writes a literal quote, which is how labels and lifetimes are spelt:
//! `break \''_label`. `\\` writes a literal backslash.
//!
//! Each occurrence is replaced by a unique placeholder identifier so that the
//! normalised text can be parsed by the Rust grammar.

mod lexer;

use std::collections::HashMap;
use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::config::SearchConfig;
use crate::error::SsrError;
use lexer::{RawVariable, Segment};

const PLACEHOLDER_PREFIX: &str = "__ssr_var_";
const PLACEHOLDER_SUFFIX: &str = "__";

/// How many adjacent nodes a wildcard may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    min: usize,
    max: usize,
}

impl Quantifier {
    /// Upper bound used by `*`, `+` and `{n,}`.
    pub const UNBOUNDED: usize = usize::MAX;

    /// Exactly one occurrence, the default for every wildcard.
    pub const ONE: Self = Self::new(1, 1);

    /// Creates a quantifier accepting `min..=max` occurrences.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Returns the minimum number of occurrences.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Returns the maximum number of occurrences.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Returns whether the quantifier is exactly one occurrence.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.min == 1 && self.max == 1
    }

    /// Returns whether `count` occurrences satisfy the quantifier.
    #[must_use]
    pub const fn admits(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl Default for Quantifier {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, Self::UNBOUNDED) => f.write_str("*"),
            (1, Self::UNBOUNDED) => f.write_str("+"),
            (0, 1) => f.write_str("?"),
            (min, Self::UNBOUNDED) => write!(f, "{{{min},}}"),
            (min, max) if min == max => write!(f, "{{{min}}}"),
            (min, max) => write!(f, "{{{min},{max}}}"),
        }
    }
}

/// A regular-expression constraint on the text a wildcard binds.
///
/// The expression must match the whole text, not a substring.
#[derive(Debug, Clone)]
pub struct TextConstraint {
    pattern: String,
    regex: Regex,
    negated: bool,
}

impl TextConstraint {
    pub(crate) fn new(pattern: &str, negated: bool, case_sensitive: bool) -> Result<Self, SsrError> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| SsrError::invalid_constraint(pattern, e.to_string()))?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
            negated,
        })
    }

    /// Returns the expression as written in the template.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns whether the constraint was written `[!regex(...)]`.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns whether `text` satisfies the constraint.
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.negated
    }
}

impl PartialEq for TextConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.negated == other.negated
    }
}

/// A wildcard declared in a template.
///
/// Every occurrence of a named wildcard refers to the same variable, so all
/// occurrences must bind equal text. The anonymous wildcard `'_` is a fresh
/// variable at each occurrence and is never recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    quantifier: Quantifier,
    constraint: Option<TextConstraint>,
}

impl Variable {
    /// Returns the binding name, empty for anonymous wildcards.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the wildcard is anonymous.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns the occurrence quantifier.
    #[must_use]
    pub const fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// Returns the text constraint, if any.
    #[must_use]
    pub const fn constraint(&self) -> Option<&TextConstraint> {
        self.constraint.as_ref()
    }
}

/// A template after variable extraction.
#[derive(Debug)]
pub(crate) struct Template {
    normalised: String,
    variables: Vec<Variable>,
    /// Variable index for each placeholder, in placeholder order.
    occurrences: Vec<usize>,
}

impl Template {
    /// Extracts variables from `source` and rewrites it into parseable Rust.
    pub(crate) fn parse(source: &str, config: &SearchConfig) -> Result<Self, SsrError> {
        let mut builder = TemplateBuilder::default();
        for segment in lexer::scan(source, config.case_sensitive())? {
            match segment {
                Segment::Text(text) => builder.normalised.push_str(&text),
                Segment::Variable(raw) => builder.push_variable(raw)?,
            }
        }

        tracing::trace!(
            template = source,
            normalised = builder.normalised.as_str(),
            variables = builder.variables.len(),
            "normalised search template"
        );

        Ok(Self {
            normalised: builder.normalised,
            variables: builder.variables.into_iter().map(|slot| slot.variable).collect(),
            occurrences: builder.occurrences,
        })
    }

    pub(crate) fn normalised(&self) -> &str {
        &self.normalised
    }

    pub(crate) fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Resolves placeholder text to the index of the variable it stands for.
    pub(crate) fn variable_for_placeholder(&self, text: &str) -> Option<usize> {
        let index = text
            .strip_prefix(PLACEHOLDER_PREFIX)?
            .strip_suffix(PLACEHOLDER_SUFFIX)?
            .parse::<usize>()
            .ok()?;
        self.occurrences.get(index).copied()
    }
}

#[derive(Default)]
struct TemplateBuilder {
    normalised: String,
    variables: Vec<VariableSlot>,
    by_name: HashMap<String, usize>,
    occurrences: Vec<usize>,
}

struct VariableSlot {
    variable: Variable,
    explicit_quantifier: bool,
}

impl TemplateBuilder {
    fn push_variable(&mut self, raw: RawVariable) -> Result<(), SsrError> {
        let index = match self.by_name.get(&raw.name).copied() {
            Some(index) => {
                self.merge(index, raw)?;
                index
            }
            None => self.declare(raw),
        };

        self.normalised.push_str(&placeholder(self.occurrences.len()));
        self.occurrences.push(index);
        Ok(())
    }

    fn declare(&mut self, raw: RawVariable) -> usize {
        let index = self.variables.len();
        if !raw.name.is_empty() {
            self.by_name.insert(raw.name.clone(), index);
        }
        self.variables.push(VariableSlot {
            explicit_quantifier: raw.quantifier.is_some(),
            variable: Variable {
                name: raw.name,
                quantifier: raw.quantifier.unwrap_or_default(),
                constraint: raw.constraint,
            },
        });
        index
    }

    fn merge(&mut self, index: usize, raw: RawVariable) -> Result<(), SsrError> {
        let Some(slot) = self.variables.get_mut(index) else {
            return Err(SsrError::invalid_variable("unknown variable slot"));
        };

        if let Some(quantifier) = raw.quantifier {
            if slot.explicit_quantifier && slot.variable.quantifier != quantifier {
                return Err(SsrError::invalid_variable(format!(
                    "variable `{}` at offset {} redeclares quantifier {} as {}",
                    raw.name, raw.offset, slot.variable.quantifier, quantifier
                )));
            }
            slot.variable.quantifier = quantifier;
            slot.explicit_quantifier = true;
        }

        if let Some(constraint) = raw.constraint {
            if slot
                .variable
                .constraint
                .as_ref()
                .is_some_and(|existing| *existing != constraint)
            {
                return Err(SsrError::invalid_variable(format!(
                    "variable `{}` at offset {} has conflicting text constraints",
                    raw.name, raw.offset
                )));
            }
            slot.variable.constraint = Some(constraint);
        }
        Ok(())
    }
}

fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}{PLACEHOLDER_SUFFIX}")
}
