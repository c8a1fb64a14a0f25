//! # Capture Targets

use core::ops::Range;

use crate::{
    errors::GResult,
    matched::Matched,
    nodes::NodeId,
    repository::GrammarRepository,
    rules::{RuleId, char_filler},
    state::GrammarState,
};

/// What a capture group of a [`MatchRule`](crate::rules::MatchRule) becomes.
///
/// Resolved once, when the grammar is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureTarget {
    /// A FULL leaf of this node over the group's span.
    Node(NodeId),

    /// The group's text, re-tokenized with this [`SwitchRule`](crate::rules::SwitchRule).
    Switch(RuleId),
}

impl CaptureTarget {
    /// Build the children covering `span` of `text`.
    ///
    /// `span` must be non-empty. The result tiles `span` exactly.
    pub(crate) fn expand(
        self,
        repository: &GrammarRepository,
        text: &str,
        span: Range<usize>,
        state: &mut GrammarState,
    ) -> GResult<Vec<Matched>> {
        match self {
            Self::Node(node) => Ok(vec![Matched::leaf(node, span.start, span.len())]),
            Self::Switch(switch) => retokenize(repository, switch, text, span, state),
        }
    }
}

/// Tokenize the substring `span` of `text` with `switch`.
///
/// Positions without a match become one-character `NONE` fillers. Scopes
/// opened inside the substring are closed when it ends.
fn retokenize(
    repository: &GrammarRepository,
    switch: RuleId,
    text: &str,
    span: Range<usize>,
    state: &mut GrammarState,
) -> GResult<Vec<Matched>> {
    let rule = repository.rule(switch);
    let sub = &text[span.clone()];
    let depth = state.stack().len();

    let mut children = Vec::new();
    let mut pos = 0;
    while pos < sub.len() {
        let found = match rule.match_at(repository, sub, pos, state, false)? {
            Some(found) if found.length > 0 => found,
            _ => match char_filler(NodeId::NONE, sub, pos) {
                Some(filler) => filler,
                None => break,
            },
        };
        pos = found.to();
        children.push(found);
    }
    state.stack_mut().truncate(depth);

    for child in &mut children {
        child.offset(span.start);
    }
    Ok(children)
}
