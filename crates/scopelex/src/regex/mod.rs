//! # Regex Utilities
//!
//! Grammar authors write patterns in the `TextMate` tradition, which freely
//! uses look-ahead and look-behind. The DFA-backed `regex-automata` engine is
//! much faster but rejects those; so patterns are labeled and compiled
//! adaptively:
//!
//! * Labeling Patterns - [`RegexPattern`]
//!   * [`RegexPattern::Basic`] - a pattern written for `regex-automata`.
//!   * [`RegexPattern::Fancy`] - a pattern written for [`fancy_regex`].
//!   * [`RegexPattern::Adaptive`] - unknown target, try basic; then fall-up to fancy.
//! * Wrapping Compiled Regex - [`RegexWrapper`]
//! * Anchored matching with capture validation - [`RegExpMatcher`]

pub mod backrefs;
pub mod regex_matcher;
pub mod regex_wrapper;

#[doc(inline)]
pub use regex_matcher::{RegExpMatch, RegExpMatcher};
#[doc(inline)]
pub use regex_wrapper::{ErrorWrapper, RegexPattern, RegexWrapper, RegexWrapperHandle};
