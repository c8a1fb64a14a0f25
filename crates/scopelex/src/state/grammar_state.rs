//! # Tokenizer State

use std::collections::BTreeMap;

use crate::state::{GrammarFrame, GrammarStack};

/// The caller-owned tokenizer cursor for one document.
///
/// Cloning a state snapshots it; re-running matching from a snapshot
/// reproduces the same results. States share nothing mutable.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarState {
    stack: GrammarStack,
    props: BTreeMap<String, String>,

    /// Match rules whose whole match is being re-tokenized as a capture,
    /// with that match's length. Empty between calls.
    expanding: Vec<(String, usize)>,
}

impl GrammarState {
    /// A state whose stack holds only `root`.
    pub fn new(root: GrammarFrame) -> Self {
        Self {
            stack: GrammarStack::new(root),
            props: BTreeMap::new(),
            expanding: Vec::new(),
        }
    }

    /// The open scopes.
    pub fn stack(&self) -> &GrammarStack {
        &self.stack
    }

    /// The open scopes, mutably.
    pub fn stack_mut(&mut self) -> &mut GrammarStack {
        &mut self.stack
    }

    /// Read a host property.
    pub fn get(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// Set a host property.
    ///
    /// ## Returns
    /// The previous value, if any.
    pub fn set<K: Into<String>, V: Into<String>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<String> {
        self.props.insert(key.into(), value.into())
    }

    /// Remove a host property.
    pub fn remove(
        &mut self,
        key: &str,
    ) -> Option<String> {
        self.props.remove(key)
    }

    /// All host properties.
    pub fn props(&self) -> &BTreeMap<String, String> {
        &self.props
    }

    pub(crate) fn enter_capture(
        &mut self,
        rule: &str,
        len: usize,
    ) {
        self.expanding.push((rule.to_string(), len));
    }

    pub(crate) fn leave_capture(&mut self) {
        self.expanding.pop();
    }

    /// Is `rule` re-tokenizing a whole match of exactly `len` bytes?
    pub(crate) fn is_expanding(
        &self,
        rule: &str,
        len: usize,
    ) -> bool {
        self.expanding
            .iter()
            .any(|(name, expanding)| name == rule && *expanding == len)
    }
}
