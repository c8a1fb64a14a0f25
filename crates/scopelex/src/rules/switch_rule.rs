//! # Switch Rules

use std::sync::Arc;

use crate::{
    errors::GResult,
    matched::{Matched, Wrapping},
    nodes::NodeId,
    repository::GrammarRepository,
    rules::RuleId,
    state::GrammarState,
};

/// An ordered alternation; the first matching pattern wins.
#[derive(Debug, Clone)]
pub struct SwitchRule {
    name: String,
    node: NodeId,
    patterns: Arc<[RuleId]>,
    emit: bool,
}

impl SwitchRule {
    /// Build a switch.
    ///
    /// ## Arguments
    /// * `name` - the unique rule name.
    /// * `node` - the node results are wrapped in when `emit` is set.
    /// * `patterns` - the alternatives, in priority order.
    /// * `emit` - wrap results in `node`.
    pub fn new<S: Into<String>>(
        name: S,
        node: NodeId,
        patterns: Arc<[RuleId]>,
        emit: bool,
    ) -> Self {
        Self {
            name: name.into(),
            node,
            patterns,
            emit,
        }
    }

    /// The unique rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapping node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The alternatives.
    pub fn patterns(&self) -> &Arc<[RuleId]> {
        &self.patterns
    }

    /// Are results wrapped in [`SwitchRule::node`]?
    pub fn emits(&self) -> bool {
        self.emit
    }

    pub(crate) fn set_patterns(
        &mut self,
        patterns: Arc<[RuleId]>,
    ) {
        self.patterns = patterns;
    }

    /// Return the first alternative's match at `pos`.
    pub fn match_at(
        &self,
        repository: &GrammarRepository,
        text: &str,
        pos: usize,
        state: &mut GrammarState,
        possibly_incomplete: bool,
    ) -> GResult<Option<Matched>> {
        for &id in self.patterns.iter() {
            if let Some(found) =
                repository
                    .rule(id)
                    .match_at(repository, text, pos, state, possibly_incomplete)?
            {
                return Ok(Some(if self.emit && !self.node.is_none() {
                    found.wrap(self.node, Wrapping::Full)
                } else {
                    found
                }));
            }
        }
        Ok(None)
    }
}
