//! # Error Types

use crate::regex::ErrorWrapper;

/// Errors from scopelex operations.
///
/// Every variant except [`GrammarError::DisabledMatcher`] and
/// [`GrammarError::PositionOutOfBounds`] describes a defect in a grammar
/// definition; these are fatal and are never swallowed by the engine.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// A match rule's capture groups do not contiguously cover its full match.
    #[error(
        "malformed capture groups in /{pattern}/: captures {captured:?} do not reconstruct match {matched:?}"
    )]
    MalformedCaptureGroups {
        /// The offending pattern source.
        pattern: String,

        /// The full match text.
        matched: String,

        /// The concatenation of the capture texts.
        captured: String,
    },

    /// An `include` names an entry absent from the repository.
    #[error("unknown include: {name:?}")]
    UnknownInclude {
        /// The include reference as written.
        name: String,
    },

    /// An `include` names a bare node, which cannot match text.
    #[error("include {name:?} names a node, not a rule")]
    IncludeNotRule {
        /// The include reference as written.
        name: String,
    },

    /// A capture map key is not a group index.
    #[error("rule {rule:?}: capture key {key:?} is not a group index")]
    InvalidCaptureIndex {
        /// The rule declaring the captures.
        rule: String,

        /// The offending key.
        key: String,
    },

    /// A rule definition has an inconsistent shape.
    #[error("rule {rule:?}: {reason}")]
    InvalidRuleDefinition {
        /// The rule id.
        rule: String,

        /// What is wrong with it.
        reason: String,
    },

    /// A pattern failed to compile (only raised in strict mode).
    #[error("invalid pattern /{pattern}/: {source}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,

        /// The regex engine error.
        source: ErrorWrapper,
    },

    /// A disabled matcher was invoked directly.
    #[error("matcher for /{pattern}/ is disabled")]
    DisabledMatcher {
        /// The pattern source which failed to compile.
        pattern: String,
    },

    /// The backtracking regex engine failed while matching.
    #[error("regex runtime failure in /{pattern}/: {message}")]
    RegexRuntime {
        /// The pattern source.
        pattern: String,

        /// The engine's message.
        message: String,
    },

    /// A match position is past the end of the text, or not on a char boundary.
    #[error("position {pos} is not a char boundary of text with length {len}")]
    PositionOutOfBounds {
        /// The requested position.
        pos: usize,

        /// The text length.
        len: usize,
    },

    /// The grammar definition could not be deserialized.
    #[error("grammar definition: {0}")]
    Definition(#[from] serde_json::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for scopelex operations.
pub type GResult<T> = core::result::Result<T, GrammarError>;
