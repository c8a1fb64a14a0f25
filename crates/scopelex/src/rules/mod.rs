//! # Rules
//!
//! The three primitive pattern kinds a grammar declares:
//! * [`MatchRule`] - one regex, with optional per-group [`CaptureTarget`]s.
//! * [`ScopedRule`] - a begin / content / end region, tracked on the
//!   [`GrammarStack`](crate::state::GrammarStack).
//! * [`SwitchRule`] - an ordered alternation.
//!
//! Rules live in a [`GrammarRepository`] arena and refer to each other by [`RuleId`].

mod capture_target;
mod match_rule;
mod scoped_rule;
mod switch_rule;

#[doc(inline)]
pub use capture_target::*;
#[doc(inline)]
pub use match_rule::*;
#[doc(inline)]
pub use scoped_rule::*;
#[doc(inline)]
pub use switch_rule::*;

use std::sync::Arc;

use crate::{
    errors::GResult,
    matched::Matched,
    nodes::NodeId,
    repository::GrammarRepository,
    state::GrammarState,
};

/// Index of a [`Rule`] in its [`GrammarRepository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    /// Wrap a raw arena index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for RuleId {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// A grammar rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// See [`MatchRule`].
    Match(MatchRule),

    /// See [`ScopedRule`].
    Scoped(ScopedRule),

    /// See [`SwitchRule`].
    Switch(SwitchRule),
}

impl Rule {
    /// The rule's unique name.
    pub fn name(&self) -> &str {
        match self {
            Self::Match(rule) => rule.name(),
            Self::Scoped(rule) => rule.name(),
            Self::Switch(rule) => rule.name(),
        }
    }

    /// The rule's node; [`NodeId::NONE`] if it emits none.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Match(rule) => rule.node(),
            Self::Scoped(rule) => rule.node(),
            Self::Switch(rule) => rule.node(),
        }
    }

    /// The nested pattern list, for scoped and switch rules.
    pub fn patterns(&self) -> Option<&Arc<[RuleId]>> {
        match self {
            Self::Match(_) => None,
            Self::Scoped(rule) => Some(rule.patterns()),
            Self::Switch(rule) => Some(rule.patterns()),
        }
    }

    /// View as a scoped rule.
    pub fn as_scoped(&self) -> Option<&ScopedRule> {
        match self {
            Self::Scoped(rule) => Some(rule),
            _ => None,
        }
    }

    /// View as a switch rule.
    pub fn as_switch(&self) -> Option<&SwitchRule> {
        match self {
            Self::Switch(rule) => Some(rule),
            _ => None,
        }
    }

    pub(crate) fn set_patterns(
        &mut self,
        patterns: Arc<[RuleId]>,
    ) {
        match self {
            Self::Match(_) => {}
            Self::Scoped(rule) => rule.set_patterns(patterns),
            Self::Switch(rule) => rule.set_patterns(patterns),
        }
    }

    /// Try to match at `pos`.
    ///
    /// ## Arguments
    /// * `repository` - the repository owning this rule.
    /// * `text` - the text being tokenized.
    /// * `pos` - the byte offset the match must start at.
    /// * `state` - the caller's cursor; scoped rules push and pop frames.
    /// * `possibly_incomplete` - scoped rules return after their begin match.
    pub fn match_at(
        &self,
        repository: &GrammarRepository,
        text: &str,
        pos: usize,
        state: &mut GrammarState,
        possibly_incomplete: bool,
    ) -> GResult<Option<Matched>> {
        match self {
            Self::Match(rule) => rule.match_at(repository, text, pos, state),
            Self::Scoped(rule) => rule.match_at(repository, text, pos, state, possibly_incomplete),
            Self::Switch(rule) => rule.match_at(repository, text, pos, state, possibly_incomplete),
        }
    }
}

/// Try `rules` in order; return the first result which consumed text or
/// changed the stack depth.
pub(crate) fn first_progress(
    repository: &GrammarRepository,
    rules: &[RuleId],
    text: &str,
    pos: usize,
    state: &mut GrammarState,
    possibly_incomplete: bool,
) -> GResult<Option<Matched>> {
    for &id in rules {
        let depth = state.stack().len();
        if let Some(found) =
            repository
                .rule(id)
                .match_at(repository, text, pos, state, possibly_incomplete)?
            && (found.length > 0 || state.stack().len() != depth)
        {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// A one-character anonymous leaf at `pos`; `None` at end of text.
pub(crate) fn char_filler(
    node: NodeId,
    text: &str,
    pos: usize,
) -> Option<Matched> {
    text[pos..]
        .chars()
        .next()
        .map(|c| Matched::leaf(node, pos, c.len_utf8()))
}
