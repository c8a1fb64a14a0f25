//! # Match Trees

use core::ops::Range;

use serde::Serialize;

use crate::{matched::Token, nodes::NodeId};

/// How a [`Matched`] node's type annotates the tokens beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Wrapping {
    /// The node opens at its first token and closes at its last.
    #[default]
    Full,

    /// The node opens at its first token and stays open past the branch.
    Begin,

    /// The node closes at its last token; it was opened by an earlier branch.
    End,
}

impl Wrapping {
    fn opens(self) -> bool {
        matches!(self, Self::Full | Self::Begin)
    }

    fn closes(self) -> bool {
        matches!(self, Self::Full | Self::End)
    }
}

/// The result tree of a successful match.
///
/// Leaves have no children. A zero-length match is always the sole child of
/// a [`NodeId::NONE`] branch; see [`Matched::leaf`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matched {
    /// The node type; [`NodeId::NONE`] for anonymous spans and wrappers.
    pub node: NodeId,

    /// Start byte offset.
    pub from: usize,

    /// Byte length.
    pub length: usize,

    /// Sub-matches, tiling `from..from + length` in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Matched>,

    /// How `node` annotates the compiled tokens.
    pub wrapping: Wrapping,
}

impl Matched {
    /// A FULL leaf; zero-length leaves come back wrapped in a `NONE` branch.
    pub fn leaf(
        node: NodeId,
        from: usize,
        length: usize,
    ) -> Self {
        let leaf = Self {
            node,
            from,
            length,
            children: Vec::new(),
            wrapping: Wrapping::Full,
        };
        if length == 0 {
            Self::branch(NodeId::NONE, from, 0, vec![leaf], Wrapping::Full)
        } else {
            leaf
        }
    }

    /// An anonymous leaf.
    pub fn filler(
        from: usize,
        length: usize,
    ) -> Self {
        Self::leaf(NodeId::NONE, from, length)
    }

    /// A branch over `children`.
    pub fn branch(
        node: NodeId,
        from: usize,
        length: usize,
        children: Vec<Matched>,
        wrapping: Wrapping,
    ) -> Self {
        Self {
            node,
            from,
            length,
            children,
            wrapping,
        }
    }

    /// Wrap this match in `node`.
    ///
    /// A non-empty anonymous leaf is re-tagged in place rather than nested.
    /// A zero-length result is itself the sole child of a `NONE` branch.
    pub fn wrap(
        self,
        node: NodeId,
        wrapping: Wrapping,
    ) -> Self {
        let (from, length) = (self.from, self.length);
        if self.is_leaf() && self.node.is_none() && length > 0 {
            return Self {
                node,
                wrapping,
                ..self
            };
        }
        let wrapped = Self::branch(node, from, length, vec![self], wrapping);
        if length == 0 && !node.is_none() {
            return Self::branch(NodeId::NONE, from, 0, vec![wrapped], wrapping);
        }
        wrapped
    }

    /// Is this a leaf?
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// End byte offset (exclusive).
    pub fn to(&self) -> usize {
        self.from + self.length
    }

    /// The covered byte range.
    pub fn range(&self) -> Range<usize> {
        self.from..self.to()
    }

    /// Shift this tree by `by` bytes.
    pub fn offset(
        &mut self,
        by: usize,
    ) {
        if by == 0 {
            return;
        }
        self.from += by;
        for child in &mut self.children {
            child.offset(by);
        }
    }

    /// Flatten into renderer-friendly tokens.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn compile(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.compile_into(&mut tokens);
        tokens
    }

    /// Append this tree's tokens to `tokens`.
    pub fn compile_into(
        &self,
        tokens: &mut Vec<Token>,
    ) {
        if self.is_leaf() {
            tokens.push(self.compile_leaf());
            return;
        }

        let start = tokens.len();
        for child in &self.children {
            child.compile_into(tokens);
        }
        if self.node.is_none() || tokens.len() == start {
            return;
        }

        if self.wrapping.opens() {
            tokens[start].opened_by.insert(0, self.node);
        }
        if self.wrapping.closes()
            && let Some(last) = tokens.last_mut()
        {
            last.closed_by.push(self.node);
        }
    }

    fn compile_leaf(&self) -> Token {
        let token = Token::new(None, self.from, self.to());
        if self.node.is_none() {
            return token;
        }
        match self.wrapping {
            Wrapping::Full => Token {
                kind: Some(self.node),
                ..token
            },
            Wrapping::Begin => token.opening([self.node]),
            Wrapping::End => token.closing([self.node]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(idx: u32) -> NodeId {
        NodeId::new(idx)
    }

    #[test]
    fn test_zero_length_wrap_is_isolated() {
        let begin = Matched::filler(3, 0).wrap(n(5), Wrapping::Begin);
        assert!(begin.node.is_none());
        assert_eq!(begin.wrapping, Wrapping::Begin);
        assert_eq!(begin.range(), 3..3);
        assert_eq!(begin.children.len(), 1);

        let scope = &begin.children[0];
        assert_eq!((scope.node, scope.range()), (n(5), 3..3));
        assert_eq!(begin.compile(), vec![Token::new(None, 3, 3).opening([n(5)])]);

        let anonymous = Matched::filler(3, 0).wrap(NodeId::NONE, Wrapping::Full);
        assert!(anonymous.children[0].is_leaf());
    }

    #[test]
    fn test_leaf_compile() {
        assert_eq!(Matched::leaf(n(7), 2, 4).compile(), vec![Token::new(Some(n(7)), 2, 6)]);
        assert_eq!(Matched::filler(2, 1).compile(), vec![Token::new(None, 2, 3)]);

        let begin = Matched::filler(0, 2).wrap(n(5), Wrapping::Begin);
        assert!(begin.is_leaf());
        assert_eq!(begin.compile(), vec![Token::new(None, 0, 2).opening([n(5)])]);

        let end = Matched::filler(5, 2).wrap(n(5), Wrapping::End);
        assert_eq!(end.compile(), vec![Token::new(None, 5, 7).closing([n(5)])]);
    }

    #[test]
    fn test_zero_length_is_wrapped() {
        let leaf = Matched::leaf(n(8), 4, 0);
        assert_eq!(leaf.node, NodeId::NONE);
        assert_eq!(leaf.length, 0);
        assert_eq!(leaf.children.len(), 1);
        assert_eq!(leaf.children[0].node, n(8));
        assert_eq!(leaf.compile(), vec![Token::new(Some(n(8)), 4, 4)]);
    }

    #[test]
    fn test_branch_brackets() {
        // "bc" with quotes: [str [null "] [body bc] [null "]]
        let tree = Matched::branch(
            n(5),
            2,
            4,
            vec![Matched::filler(2, 1), Matched::leaf(n(6), 3, 2), Matched::filler(5, 1)],
            Wrapping::Full,
        );
        assert_eq!(
            tree.compile(),
            vec![
                Token::new(None, 2, 3).opening([n(5)]),
                Token::new(Some(n(6)), 3, 5),
                Token::new(None, 5, 6).closing([n(5)]),
            ]
        );

        // A single-token FULL branch opens and closes on the same token.
        let tree = Matched::leaf(n(6), 0, 1).wrap(n(5), Wrapping::Full);
        assert_eq!(
            tree.compile(),
            vec![Token::new(Some(n(6)), 0, 1).opening([n(5)]).closing([n(5)])]
        );
    }

    #[test]
    fn test_nested_bracket_order() {
        let inner = Matched::leaf(n(7), 0, 1).wrap(n(6), Wrapping::Full);
        let outer = inner.wrap(n(5), Wrapping::Full);
        assert_eq!(
            outer.compile(),
            vec![
                Token::new(Some(n(7)), 0, 1)
                    .opening([n(5), n(6)])
                    .closing([n(6), n(5)])
            ]
        );
    }

    #[test]
    fn test_none_branch_is_transparent() {
        let tree = Matched::branch(
            NodeId::NONE,
            0,
            3,
            vec![Matched::leaf(n(5), 0, 1), Matched::filler(1, 2)],
            Wrapping::Full,
        );
        assert_eq!(
            tree.compile(),
            vec![Token::new(Some(n(5)), 0, 1), Token::new(None, 1, 3)]
        );
    }

    #[test]
    fn test_compile_is_compositional() {
        let left = Matched::leaf(n(6), 0, 2).wrap(n(9), Wrapping::Begin);
        let right = Matched::filler(2, 3).wrap(n(9), Wrapping::End);
        let tree = Matched::branch(n(5), 0, 5, vec![left.clone(), right.clone()], Wrapping::Full);

        let mut spliced = left.compile();
        spliced.extend(right.compile());
        spliced[0].opened_by.insert(0, n(5));
        spliced.last_mut().unwrap().closed_by.push(n(5));

        assert_eq!(tree.compile(), spliced);
    }

    fn build(
        leaves: &[(u32, usize)],
        from: usize,
    ) -> Vec<Matched> {
        let mut pos = from;
        leaves
            .iter()
            .map(|&(kind, len)| {
                let leaf = if kind == 0 {
                    Matched::filler(pos, len)
                } else {
                    Matched::leaf(n(4 + kind), pos, len)
                };
                pos += len;
                leaf
            })
            .collect()
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(200))]

        #[test]
        fn test_compile_tiles_and_splices(
            leaves in proptest::collection::vec((0u32..3, 1usize..4), 2..10),
            split in proptest::prelude::any::<proptest::sample::Index>(),
            from in 0usize..50,
        ) {
            let k = split.index(leaves.len() - 1) + 1;
            let children = build(&leaves, from);
            let mid = children[k].from;
            let end = children.last().unwrap().to();

            let left = Matched::branch(n(9), from, mid - from, children[..k].to_vec(), Wrapping::Begin);
            let right = Matched::branch(n(9), mid, end - mid, children[k..].to_vec(), Wrapping::End);
            let tree = Matched::branch(n(8), from, end - from, vec![left.clone(), right.clone()], Wrapping::Full);

            let tokens = tree.compile();
            proptest::prop_assert_eq!(tokens.len(), leaves.len());
            let mut pos = from;
            for token in &tokens {
                proptest::prop_assert_eq!(token.from, pos);
                pos = token.to;
            }
            proptest::prop_assert_eq!(pos, end);

            let mut spliced = left.compile();
            spliced.extend(right.compile());
            spliced[0].opened_by.insert(0, n(8));
            spliced.last_mut().unwrap().closed_by.push(n(8));
            proptest::prop_assert_eq!(tokens, spliced);
        }
    }

    #[test]
    fn test_offset() {
        let mut tree = Matched::leaf(n(6), 1, 2).wrap(n(5), Wrapping::Full);
        tree.offset(10);
        assert_eq!(tree.range(), 11..13);
        assert_eq!(tree.children[0].range(), 11..13);
    }
}
