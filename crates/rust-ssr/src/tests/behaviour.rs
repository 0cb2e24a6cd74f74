//! Behaviour-driven tests for structural search.

use std::collections::BTreeMap;
use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::{MatchResult, ParseResult, Parser, Pattern, SsrError};

// ---------------------------------------------------------------------------
// Typed wrappers for Gherkin step parameters
// ---------------------------------------------------------------------------

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

/// Owned copy of a match, since results borrow the parsed source.
#[derive(Debug)]
struct MatchSnapshot {
    text: String,
    captures: BTreeMap<String, String>,
}

impl From<&MatchResult<'_>> for MatchSnapshot {
    fn from(found: &MatchResult<'_>) -> Self {
        Self {
            text: found.text().to_owned(),
            captures: found
                .captures()
                .iter()
                .map(|(name, value)| (name.clone(), value.text().to_owned()))
                .collect(),
        }
    }
}

#[derive(Default)]
struct TestWorld {
    parsed: Option<ParseResult>,
    pattern: Option<Pattern>,
    compile_error: Option<SsrError>,
    matches: Vec<MatchSnapshot>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("the Rust source {source}")]
fn given_source(world: &mut TestWorld, source: QuotedString) {
    let mut parser = Parser::new().expect("parser init");
    world.parsed = Some(parser.parse(source.as_str()).expect("parse"));
}

#[given("the template {template}")]
fn given_template(world: &mut TestWorld, template: QuotedString) {
    match Pattern::compile(template.as_str()) {
        Ok(pattern) => world.pattern = Some(pattern),
        Err(err) => world.compile_error = Some(err),
    }
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the template is searched for")]
fn when_searched(world: &mut TestWorld) {
    let parsed = world.parsed.as_ref().expect("source should be set");
    let pattern = world.pattern.as_ref().expect("template should compile");
    world.matches = pattern.find_all(parsed).iter().map(MatchSnapshot::from).collect();
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("{count} matches are found")]
fn then_match_count(world: &mut TestWorld, count: usize) {
    assert_eq!(
        world.matches.len(),
        count,
        "unexpected matches: {:?}",
        world.matches
    );
}

#[then("a match has text {text}")]
fn then_match_text(world: &mut TestWorld, text: QuotedString) {
    assert!(
        world.matches.iter().any(|m| m.text == text.as_str()),
        "no match with text '{}', got: {:?}",
        text.as_str(),
        world.matches
    );
}

#[then("a match binds {name} to {value}")]
fn then_match_binding(world: &mut TestWorld, name: QuotedString, value: QuotedString) {
    let bound = world
        .matches
        .iter()
        .any(|m| m.captures.get(name.as_str()).is_some_and(|v| v == value.as_str()));
    assert!(
        bound,
        "no match binds '{}' to '{}', got: {:?}",
        name.as_str(),
        value.as_str(),
        world.matches
    );
}

#[then("compilation fails with {fragment}")]
fn then_compile_error(world: &mut TestWorld, fragment: QuotedString) {
    let err = world
        .compile_error
        .as_ref()
        .expect("template should have been rejected");
    assert!(
        err.to_string().contains(fragment.as_str()),
        "expected error to mention '{}', got: {err}",
        fragment.as_str()
    );
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/rust_ssr.feature")]
fn rust_ssr_behaviour(world: TestWorld) {
    let _ = world;
}
