//! # Scope Stack

use std::sync::Arc;

use crate::{nodes::NodeId, regex::RegExpMatcher, rules::RuleId};

/// One open scope.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarFrame {
    /// The scope's node; [`NodeId::TOP`] for the root frame.
    pub node: NodeId,

    /// The patterns tried while this scope is open.
    pub rules: Arc<[RuleId]>,

    /// The scoped rule which closes this frame; `None` for the root frame.
    pub end: Option<RuleId>,

    /// The end matcher with begin captures substituted, when the end
    /// pattern uses back-references.
    pub end_matcher: Option<Arc<RegExpMatcher>>,

    /// Where the scope's begin match started.
    pub opened_at: usize,
}

impl GrammarFrame {
    /// The bottom frame: the root pattern list, with no end rule.
    pub fn root(rules: Arc<[RuleId]>) -> Self {
        Self {
            node: NodeId::TOP,
            rules,
            end: None,
            end_matcher: None,
            opened_at: 0,
        }
    }

    /// Is this the root frame?
    pub fn is_root(&self) -> bool {
        self.end.is_none()
    }
}

/// The stack of currently open scopes.
///
/// Never empty: the root frame cannot be popped.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarStack {
    frames: Vec<GrammarFrame>,
}

impl GrammarStack {
    /// A stack holding only `root`.
    pub fn new(root: GrammarFrame) -> Self {
        Self { frames: vec![root] }
    }

    /// Open a scope.
    pub fn push(
        &mut self,
        frame: GrammarFrame,
    ) {
        log::trace!("push scope {} at {}", frame.node, frame.opened_at);
        self.frames.push(frame);
    }

    /// Close the innermost scope.
    ///
    /// ## Returns
    /// The closed frame; `None` if only the root frame remains.
    pub fn pop(&mut self) -> Option<GrammarFrame> {
        if self.frames.len() <= 1 {
            return None;
        }
        let frame = self.frames.pop();
        if let Some(frame) = &frame {
            log::trace!("pop scope {}", frame.node);
        }
        frame
    }

    /// The innermost frame.
    pub fn top(&self) -> &GrammarFrame {
        // `frames` is never empty.
        &self.frames[self.frames.len() - 1]
    }

    /// The number of frames, including the root.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Only the root frame?
    pub fn is_root(&self) -> bool {
        self.frames.len() == 1
    }

    /// Close every scope above `depth` frames; the root always survives.
    pub fn truncate(
        &mut self,
        depth: usize,
    ) {
        self.frames.truncate(depth.max(1));
    }

    /// All frames, root first.
    pub fn frames(&self) -> &[GrammarFrame] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(
        node: u32,
        at: usize,
    ) -> GrammarFrame {
        GrammarFrame {
            node: NodeId::new(node),
            rules: Arc::from(vec![RuleId::new(1)]),
            end: Some(RuleId::new(node)),
            end_matcher: None,
            opened_at: at,
        }
    }

    #[test]
    fn test_push_pop() {
        let mut stack = GrammarStack::new(GrammarFrame::root(Arc::from(vec![])));
        assert!(stack.is_root());
        assert!(stack.top().is_root());
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.len(), 1);

        stack.push(scope(5, 0));
        stack.push(scope(6, 3));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.top().node, NodeId::new(6));

        assert_eq!(stack.pop().map(|f| f.opened_at), Some(3));
        assert_eq!(stack.top().node, NodeId::new(5));
        assert!(stack.pop().is_some());
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.top().node, NodeId::TOP);
    }

    #[test]
    fn test_truncate_keeps_root() {
        let mut stack = GrammarStack::new(GrammarFrame::root(Arc::from(vec![])));
        stack.push(scope(5, 0));
        stack.push(scope(6, 1));
        stack.truncate(2);
        assert_eq!(stack.len(), 2);
        stack.truncate(0);
        assert!(stack.is_root());
    }
}
