//! # Match Rules

use std::collections::BTreeMap;

use crate::{
    errors::GResult,
    matched::{Matched, Wrapping},
    nodes::NodeId,
    regex::{RegExpMatch, RegExpMatcher},
    repository::GrammarRepository,
    rules::CaptureTarget,
    state::GrammarState,
};

/// A single regex, with optional per-group capture targets.
#[derive(Debug, Clone)]
pub struct MatchRule {
    name: String,
    node: NodeId,
    matcher: RegExpMatcher,
    captures: BTreeMap<usize, CaptureTarget>,
}

impl MatchRule {
    /// Build a rule with no captures.
    ///
    /// ## Arguments
    /// * `name` - the unique rule name.
    /// * `node` - the node the whole match is typed with.
    /// * `matcher` - the pattern.
    pub fn new<S: Into<String>>(
        name: S,
        node: NodeId,
        matcher: RegExpMatcher,
    ) -> Self {
        Self {
            name: name.into(),
            node,
            matcher,
            captures: BTreeMap::new(),
        }
    }

    /// Add a capture target; group `0` is ignored.
    pub fn with_capture(
        mut self,
        group: usize,
        target: CaptureTarget,
    ) -> Self {
        self.set_capture(group, target);
        self
    }

    pub(crate) fn set_capture(
        &mut self,
        group: usize,
        target: CaptureTarget,
    ) {
        if group > 0 {
            self.captures.insert(group, target);
        }
    }

    /// The unique rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the whole match is typed with.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The pattern.
    pub fn matcher(&self) -> &RegExpMatcher {
        &self.matcher
    }

    /// Capture targets by group index.
    pub fn captures(&self) -> &BTreeMap<usize, CaptureTarget> {
        &self.captures
    }

    /// Try to match at `pos`.
    pub fn match_at(
        &self,
        repository: &GrammarRepository,
        text: &str,
        pos: usize,
        state: &mut GrammarState,
    ) -> GResult<Option<Matched>> {
        Ok(self
            .match_using(&self.matcher, repository, text, pos, state)?
            .map(|(matched, _)| matched))
    }

    /// Match with `matcher` standing in for this rule's own pattern.
    ///
    /// ## Returns
    /// The match tree, and the raw group spans it was built from.
    pub(crate) fn match_using(
        &self,
        matcher: &RegExpMatcher,
        repository: &GrammarRepository,
        text: &str,
        pos: usize,
        state: &mut GrammarState,
    ) -> GResult<Option<(Matched, RegExpMatch)>> {
        let Some(found) = matcher.match_enabled(text, pos)? else {
            return Ok(None);
        };
        let range = found.range();

        // Re-tokenizing one of our own captures reached us again over the same text.
        if pos == 0 && range.len() == text.len() && state.is_expanding(&self.name, text.len()) {
            return Ok(None);
        }

        let mut children = Vec::new();
        if !self.captures.is_empty() {
            for group in 1..=found.group_count() {
                let Some(span) = found.group(group).filter(|span| !span.is_empty()) else {
                    continue;
                };
                let Some(target) = self.captures.get(&group) else {
                    children.push(Matched::filler(span.start, span.len()));
                    continue;
                };

                let whole = span == range;
                if whole {
                    state.enter_capture(&self.name, span.len());
                }
                let expanded = target.expand(repository, text, span, state);
                if whole {
                    state.leave_capture();
                }
                children.extend(expanded?);
            }
        }

        let matched = if children.is_empty() {
            Matched::leaf(self.node, range.start, range.len())
        } else {
            Matched::branch(self.node, range.start, range.len(), children, Wrapping::Full)
        };
        Ok(Some((matched, found)))
    }
}
