use serde::{Deserialize, Serialize};

/// Options for building a [`Grammar`](crate::Grammar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrammarOptions {
    /// Fail construction on invalid patterns, instead of disabling them.
    #[serde(default)]
    pub strict_patterns: bool,
}

impl GrammarOptions {
    /// Gets the configured strict-patterns value.
    pub fn strict_patterns(&self) -> bool {
        self.strict_patterns
    }

    /// Sets the configured strict-patterns value.
    ///
    /// When strict, a pattern which does not compile is a
    /// [`GrammarError::InvalidPattern`](crate::GrammarError::InvalidPattern);
    /// otherwise its matcher is disabled and never matches.
    pub fn set_strict_patterns(
        &mut self,
        strict: bool,
    ) {
        self.strict_patterns = strict;
    }

    /// Sets the configured strict-patterns value.
    ///
    /// See: [`set_strict_patterns`](Self::set_strict_patterns)
    pub fn with_strict_patterns(
        mut self,
        strict: bool,
    ) -> Self {
        self.set_strict_patterns(strict);
        self
    }
}

/// Options for a single [`Grammar::match_with`](crate::Grammar::match_with) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Added to every position of the result.
    pub offset: usize,

    /// Return scoped rules after their begin match, leaving the scope open.
    pub possibly_incomplete: bool,
}

impl MatchOptions {
    /// Sets the result offset.
    ///
    /// Used when `text` is a slice of a larger document.
    pub fn with_offset(
        self,
        offset: usize,
    ) -> Self {
        Self { offset, ..self }
    }

    /// Sets the possibly-incomplete mode.
    ///
    /// In this mode the caller drives scope content and end matching
    /// one call at a time, so unterminated scopes are never scanned
    /// to the end of the text.
    pub fn with_possibly_incomplete(
        self,
        possibly_incomplete: bool,
    ) -> Self {
        Self {
            possibly_incomplete,
            ..self
        }
    }
}
