//! # Grammar Nodes

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    definition::RuleDefinition,
    nodes::{NodeId, SentinelNode},
};

/// Arbitrary grammar-author metadata attached to a node.
pub type NodeProps = BTreeMap<String, serde_json::Value>;

/// A token type.
///
/// Exactly one `GrammarNode` exists per declared rule or node name
/// in a [`Grammar`](crate::Grammar).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarNode {
    /// Dense, unique type index.
    pub id: NodeId,

    /// Stable human-readable name.
    pub type_id: String,

    /// Metadata merged from the definition and the declarator.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub props: NodeProps,
}

impl GrammarNode {
    /// Build the node for a sentinel.
    pub fn sentinel(sentinel: SentinelNode) -> Self {
        Self {
            id: sentinel.id(),
            type_id: sentinel.type_id().to_string(),
            props: NodeProps::new(),
        }
    }

    /// Look up a prop.
    pub fn prop(
        &self,
        key: &str,
    ) -> Option<&serde_json::Value> {
        self.props.get(key)
    }
}

/// Host hook attaching extra props to every declared node.
///
/// Closures `Fn(NodeId, &str, &RuleDefinition) -> NodeProps` implement this.
pub trait NodeDeclarator {
    /// Produce extra props for a newly declared node.
    ///
    /// ## Arguments
    /// * `id` - the node's type index.
    /// * `type_id` - the node's name.
    /// * `definition` - the rule definition declaring the node.
    fn declare(
        &self,
        id: NodeId,
        type_id: &str,
        definition: &RuleDefinition,
    ) -> NodeProps;
}

impl<F> NodeDeclarator for F
where
    F: Fn(NodeId, &str, &RuleDefinition) -> NodeProps,
{
    fn declare(
        &self,
        id: NodeId,
        type_id: &str,
        definition: &RuleDefinition,
    ) -> NodeProps {
        self(id, type_id, definition)
    }
}

/// The declarator used when the host supplies none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeclarator;

impl NodeDeclarator for NoDeclarator {
    fn declare(
        &self,
        _id: NodeId,
        _type_id: &str,
        _definition: &RuleDefinition,
    ) -> NodeProps {
        NodeProps::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sentinel_node() {
        let node = GrammarNode::sentinel(SentinelNode::Newline);
        assert_eq!(node.id, NodeId::NEWLINE);
        assert_eq!(node.type_id, "newline");
        assert!(node.props.is_empty());
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"id": 2, "type_id": "newline"})
        );
    }

    #[test]
    fn test_closure_declarator() {
        let declarator = |id: NodeId, type_id: &str, _: &RuleDefinition| {
            NodeProps::from([("tag".to_string(), json!(format!("{type_id}@{}", id.index())))])
        };
        let props = declarator.declare(NodeId::new(9), "str", &RuleDefinition::default());
        assert_eq!(props.get("tag"), Some(&json!("str@9")));

        assert!(
            NoDeclarator
                .declare(NodeId::new(9), "str", &RuleDefinition::default())
                .is_empty()
        );
    }
}
