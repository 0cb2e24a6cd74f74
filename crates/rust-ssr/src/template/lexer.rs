//! Scanner that splits a template into literal text and variable occurrences.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::SsrError;
use crate::template::{Quantifier, TextConstraint};

/// One piece of a scanned template.
#[derive(Debug)]
pub(super) enum Segment {
    /// Literal Rust text with escapes already resolved.
    Text(String),
    /// A variable occurrence such as `'_name:+[regex(x)]`.
    Variable(RawVariable),
}

/// A variable occurrence before same-name occurrences are merged.
#[derive(Debug)]
pub(super) struct RawVariable {
    pub(super) name: String,
    pub(super) offset: usize,
    pub(super) quantifier: Option<Quantifier>,
    pub(super) constraint: Option<TextConstraint>,
}

pub(super) fn scan(source: &str, case_sensitive: bool) -> Result<Vec<Segment>, SsrError> {
    Scanner {
        chars: source.char_indices().peekable(),
        case_sensitive,
    }
    .run()
}

struct Scanner<'s> {
    chars: Peekable<CharIndices<'s>>,
    case_sensitive: bool,
}

impl Scanner<'_> {
    fn run(mut self) -> Result<Vec<Segment>, SsrError> {
        let mut segments = Vec::new();
        let mut text = String::new();

        while let Some((offset, ch)) = self.chars.next() {
            match ch {
                '\\' => match self.peek_char() {
                    Some(escaped @ ('\'' | '\\')) => {
                        self.chars.next();
                        text.push(escaped);
                    }
                    _ => text.push('\\'),
                },
                '\'' if self.starts_variable() => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Variable(self.variable(offset)?));
                }
                other => text.push(other),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(segments)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Returns whether the quote just consumed opens a variable.
    ///
    /// `'_` opens a variable unless the name is closed by another quote, which
    /// makes it a character literal such as `'_'`.
    fn starts_variable(&self) -> bool {
        let mut probe = self.chars.clone();
        if probe.next().map(|(_, c)| c) != Some('_') {
            return false;
        }
        while probe
            .peek()
            .is_some_and(|(_, c)| is_variable_name_char(*c))
        {
            probe.next();
        }
        probe.peek().map(|(_, c)| *c) != Some('\'')
    }

    fn variable(&mut self, offset: usize) -> Result<RawVariable, SsrError> {
        // Leading underscore of the `'_` sigil.
        self.chars.next();

        let mut name = String::new();
        while let Some(c) = self.peek_char().filter(|c| is_variable_name_char(*c)) {
            name.push(c);
            self.chars.next();
        }

        let mut variable = RawVariable {
            name,
            offset,
            quantifier: None,
            constraint: None,
        };

        if self.modifiers_follow() {
            self.chars.next();
            variable.quantifier = self.quantifier()?;
            variable.constraint = self.constraints(offset)?;
        }
        Ok(variable)
    }

    fn modifiers_follow(&self) -> bool {
        let mut probe = self.chars.clone();
        if probe.next().map(|(_, c)| c) != Some(':') {
            return false;
        }
        probe
            .peek()
            .is_some_and(|(_, c)| matches!(c, '*' | '+' | '?' | '{' | '['))
    }

    fn quantifier(&mut self) -> Result<Option<Quantifier>, SsrError> {
        let quantifier = match self.peek_char() {
            Some('*') => Quantifier::new(0, Quantifier::UNBOUNDED),
            Some('+') => Quantifier::new(1, Quantifier::UNBOUNDED),
            Some('?') => Quantifier::new(0, 1),
            Some('{') => {
                self.chars.next();
                return self.braced_quantifier().map(Some);
            }
            _ => return Ok(None),
        };
        self.chars.next();
        Ok(Some(quantifier))
    }

    /// Parses `n}`, `n,}` or `n,m}` after an opening brace.
    fn braced_quantifier(&mut self) -> Result<Quantifier, SsrError> {
        let min = self.number()?;
        let max = match self.chars.next().map(|(_, c)| c) {
            Some('}') => return Ok(Quantifier::new(min, min)),
            Some(',') if self.peek_char() == Some('}') => Quantifier::UNBOUNDED,
            Some(',') => self.number()?,
            _ => {
                return Err(SsrError::invalid_variable(
                    "quantifier must have the form {n}, {n,} or {n,m}",
                ));
            }
        };

        if self.chars.next().map(|(_, c)| c) != Some('}') {
            return Err(SsrError::invalid_variable("unterminated quantifier"));
        }
        if min > max {
            return Err(SsrError::invalid_variable(format!(
                "quantifier minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Quantifier::new(min, max))
    }

    fn number(&mut self) -> Result<usize, SsrError> {
        let mut digits = String::new();
        while let Some(c) = self.peek_char().filter(char::is_ascii_digit) {
            digits.push(c);
            self.chars.next();
        }
        digits
            .parse()
            .map_err(|_| SsrError::invalid_variable("quantifier bound must be a number"))
    }

    fn constraints(&mut self, offset: usize) -> Result<Option<TextConstraint>, SsrError> {
        let mut constraint = None;
        while self.peek_char() == Some('[') {
            self.chars.next();
            let negated = self.peek_char() == Some('!');
            if negated {
                self.chars.next();
            }
            self.keyword("regex(").map_err(|()| {
                SsrError::invalid_variable(format!(
                    "unknown constraint for variable at offset {offset}"
                ))
            })?;

            let pattern = self.constraint_body(offset)?;
            if constraint.is_some() {
                return Err(SsrError::invalid_variable(format!(
                    "variable at offset {offset} has more than one text constraint"
                )));
            }
            constraint = Some(TextConstraint::new(&pattern, negated, self.case_sensitive)?);
        }
        Ok(constraint)
    }

    fn keyword(&mut self, keyword: &str) -> Result<(), ()> {
        for expected in keyword.chars() {
            match self.chars.next() {
                Some((_, c)) if c == expected => {}
                _ => return Err(()),
            }
        }
        Ok(())
    }

    /// Reads the regular expression up to the closing `)]`.
    fn constraint_body(&mut self, offset: usize) -> Result<String, SsrError> {
        let mut body = String::new();
        while let Some((_, c)) = self.chars.next() {
            if c == ')' && self.peek_char() == Some(']') {
                self.chars.next();
                return Ok(body);
            }
            body.push(c);
        }
        Err(SsrError::invalid_variable(format!(
            "unterminated regex constraint for variable at offset {offset}"
        )))
    }
}

const fn is_variable_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
