//! # Compiled Tokens

use core::ops::Range;

use serde::{Serialize, Serializer, ser::SerializeSeq};

use crate::nodes::NodeId;

/// One flat, compiled lexical span.
///
/// `kind` is `None` for anonymous spans (fillers, bracket-only spans).
/// `opened_by` lists the scopes which open at this token, outermost first;
/// `closed_by` lists the scopes which close at it, innermost first.
///
/// Serializes to the wire tuple `[kind|null, from, to, opened?, closed?]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Token {
    /// The type of the span, if any.
    pub kind: Option<NodeId>,

    /// Start byte offset.
    pub from: usize,

    /// End byte offset (exclusive).
    pub to: usize,

    /// Scopes opened at this token.
    pub opened_by: Vec<NodeId>,

    /// Scopes closed at this token.
    pub closed_by: Vec<NodeId>,
}

impl Token {
    /// Build a token with no brackets.
    pub fn new(
        kind: Option<NodeId>,
        from: usize,
        to: usize,
    ) -> Self {
        Self {
            kind,
            from,
            to,
            ..Default::default()
        }
    }

    /// Set the scopes opened at this token.
    pub fn opening<I: IntoIterator<Item = NodeId>>(
        self,
        opened_by: I,
    ) -> Self {
        Self {
            opened_by: opened_by.into_iter().collect(),
            ..self
        }
    }

    /// Set the scopes closed at this token.
    pub fn closing<I: IntoIterator<Item = NodeId>>(
        self,
        closed_by: I,
    ) -> Self {
        Self {
            closed_by: closed_by.into_iter().collect(),
            ..self
        }
    }

    /// The covered byte range.
    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    /// The covered byte length.
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Is this a zero-width token?
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let len = if !self.closed_by.is_empty() {
            5
        } else if !self.opened_by.is_empty() {
            4
        } else {
            3
        };

        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.kind)?;
        seq.serialize_element(&self.from)?;
        seq.serialize_element(&self.to)?;
        if len > 3 {
            seq.serialize_element(&self.opened_by)?;
        }
        if len > 4 {
            seq.serialize_element(&self.closed_by)?;
        }
        seq.end()
    }
}
