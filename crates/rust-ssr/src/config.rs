//! Search configuration for match limits and constraint behaviour.

use serde::Deserialize;

/// Limits and switches applied while compiling and running a search.
///
/// # Defaults
///
/// - `max_matches`: 10 000
/// - `max_depth`: 512
/// - `case_sensitive`: `true`
///
/// The configuration deserialises from any serde format, with missing keys
/// falling back to the defaults above.
///
/// # Example
///
/// ```
/// use rust_ssr::SearchConfig;
///
/// let config = SearchConfig::default().with_max_matches(5);
/// assert_eq!(config.max_matches(), 5);
/// assert!(config.case_sensitive());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum number of matches reported by a single search.
    max_matches: usize,
    /// Maximum nesting depth of the structural comparison.
    max_depth: usize,
    /// Whether text constraints compare case-sensitively.
    case_sensitive: bool,
}

impl SearchConfig {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(max_matches: usize, max_depth: usize, case_sensitive: bool) -> Self {
        Self {
            max_matches,
            max_depth,
            case_sensitive,
        }
    }

    /// Returns the maximum number of matches per search.
    #[must_use]
    pub const fn max_matches(&self) -> usize {
        self.max_matches
    }

    /// Returns the maximum comparison depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns whether text constraints are case-sensitive.
    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns a copy with a different match limit.
    #[must_use]
    pub const fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = max_matches;
        self
    }

    /// Returns a copy with a different depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns a copy with different constraint case sensitivity.
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_matches: 10_000,
            max_depth: 512,
            case_sensitive: true,
        }
    }
}
