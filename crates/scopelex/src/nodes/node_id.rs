//! # Node Ids

use serde::{Deserialize, Serialize};

/// Dense type index of a [`GrammarNode`](crate::nodes::GrammarNode).
///
/// Indices below [`NodeId::FIRST_USER`] are reserved for [`SentinelNode`]s.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// "No token type"; structural wrappers and fillers.
    pub const NONE: NodeId = NodeId(SentinelNode::None as u32);

    /// The document root.
    pub const TOP: NodeId = NodeId(SentinelNode::Top as u32);

    /// A line break.
    pub const NEWLINE: NodeId = NodeId(SentinelNode::Newline as u32);

    /// Text no root pattern recognized.
    pub const ERROR_UNRECOGNIZED: NodeId = NodeId(SentinelNode::ErrorUnrecognized as u32);

    /// A construct cut short by the end of input.
    pub const ERROR_INCOMPLETE: NodeId = NodeId(SentinelNode::ErrorIncomplete as u32);

    /// The first index handed out to grammar-declared nodes.
    pub const FIRST_USER: NodeId = NodeId(SentinelNode::COUNT as u32);

    /// Wrap a raw type index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw type index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Is this the [`NodeId::NONE`] sentinel?
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Is this one of the reserved sentinel indices?
    pub const fn is_sentinel(self) -> bool {
        self.0 < Self::FIRST_USER.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of built-in node types shared by every grammar.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
    strum::Display,
)]
#[repr(u32)]
pub enum SentinelNode {
    /// See [`NodeId::NONE`].
    #[strum(serialize = "none")]
    None = 0,

    /// See [`NodeId::TOP`].
    #[strum(serialize = "top")]
    Top = 1,

    /// See [`NodeId::NEWLINE`].
    #[strum(serialize = "newline")]
    Newline = 2,

    /// See [`NodeId::ERROR_UNRECOGNIZED`].
    #[strum(serialize = "error.unrecognized")]
    ErrorUnrecognized = 3,

    /// See [`NodeId::ERROR_INCOMPLETE`].
    #[strum(serialize = "error.incomplete")]
    ErrorIncomplete = 4,
}

impl SentinelNode {
    /// The number of reserved indices.
    pub const COUNT: usize = <Self as strum::EnumCount>::COUNT;

    /// The reserved index of this sentinel.
    pub const fn id(self) -> NodeId {
        NodeId(self as u32)
    }

    /// The stable type id of this sentinel.
    pub fn type_id(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_sentinels_are_dense() {
        for (idx, sentinel) in SentinelNode::iter().enumerate() {
            assert_eq!(sentinel.id().index(), idx);
            assert!(sentinel.id().is_sentinel());
        }
        assert_eq!(NodeId::FIRST_USER.index(), SentinelNode::COUNT);
        assert!(!NodeId::FIRST_USER.is_sentinel());
    }

    #[test]
    fn test_type_ids() {
        assert_eq!(SentinelNode::None.type_id(), "none");
        assert_eq!(SentinelNode::ErrorUnrecognized.type_id(), "error.unrecognized");
        assert_eq!(SentinelNode::Top.to_string(), "top");
    }

    #[test]
    fn test_node_id() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::TOP.is_none());
        assert_eq!(NodeId::default(), NodeId::NONE);
        assert_eq!(NodeId::new(7).to_string(), "#7");
        assert_eq!(serde_json::to_string(&NodeId::new(7)).unwrap(), "7");
    }
}
