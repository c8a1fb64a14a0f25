//! # Scoped Rules

use std::sync::Arc;

use crate::{
    errors::GResult,
    matched::{Matched, Wrapping},
    nodes::NodeId,
    regex::RegExpMatcher,
    repository::GrammarRepository,
    rules::{MatchRule, RuleId, char_filler, first_progress},
    state::{GrammarFrame, GrammarState},
};

/// A `begin ... content ... end` region.
///
/// While the region is open, a [`GrammarFrame`] for it sits on the stack;
/// its content is matched against [`ScopedRule::patterns`].
#[derive(Debug, Clone)]
pub struct ScopedRule {
    id: RuleId,
    name: String,
    node: NodeId,
    begin: MatchRule,
    end: MatchRule,
    patterns: Arc<[RuleId]>,
}

impl ScopedRule {
    /// Build a scoped rule with no content patterns.
    ///
    /// ## Arguments
    /// * `id` - this rule's own index in its repository.
    /// * `name` - the unique rule name.
    /// * `node` - the scope node.
    /// * `begin` - opens the scope.
    /// * `end` - closes the scope; may use `\1`..`\9` back-references to `begin`.
    pub fn new<S: Into<String>>(
        id: RuleId,
        name: S,
        node: NodeId,
        begin: MatchRule,
        end: MatchRule,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            node,
            begin,
            end,
            patterns: Arc::from(Vec::new()),
        }
    }

    /// This rule's index in its repository.
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// The unique rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scope node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The opening rule.
    pub fn begin(&self) -> &MatchRule {
        &self.begin
    }

    /// The closing rule.
    pub fn end(&self) -> &MatchRule {
        &self.end
    }

    /// The content patterns.
    pub fn patterns(&self) -> &Arc<[RuleId]> {
        &self.patterns
    }

    pub(crate) fn begin_mut(&mut self) -> &mut MatchRule {
        &mut self.begin
    }

    pub(crate) fn end_mut(&mut self) -> &mut MatchRule {
        &mut self.end
    }

    pub(crate) fn set_patterns(
        &mut self,
        patterns: Arc<[RuleId]>,
    ) {
        self.patterns = patterns;
    }

    /// Is this rule already open at `pos`, with nothing consumed since?
    fn reenters(
        &self,
        state: &GrammarState,
        pos: usize,
    ) -> bool {
        state
            .stack()
            .frames()
            .iter()
            .rev()
            .take_while(|frame| !frame.is_root() && frame.opened_at == pos)
            .any(|frame| frame.end == Some(self.id))
    }

    /// Open the scope at `pos`.
    ///
    /// On success the scope's frame is pushed. With `possibly_incomplete`
    /// only the BEGIN-wrapped begin match is returned; otherwise the content
    /// is matched until the end pattern or the end of `text`, and the frame
    /// is popped again if the end matched.
    pub fn match_at(
        &self,
        repository: &GrammarRepository,
        text: &str,
        pos: usize,
        state: &mut GrammarState,
        possibly_incomplete: bool,
    ) -> GResult<Option<Matched>> {
        if self.reenters(state, pos) {
            return Ok(None);
        }
        let Some((begin, found)) =
            self.begin
                .match_using(self.begin.matcher(), repository, text, pos, state)?
        else {
            return Ok(None);
        };
        let begin = begin.wrap(self.node, Wrapping::Begin);

        let end_matcher = self
            .end
            .matcher()
            .has_backrefs()
            .then(|| Arc::new(self.end.matcher().with_backrefs(&found.texts(text)).into_owned()));
        state.stack_mut().push(GrammarFrame {
            node: self.node,
            rules: self.patterns.clone(),
            end: Some(self.id),
            end_matcher,
            opened_at: pos,
        });

        if possibly_incomplete {
            return Ok(Some(begin));
        }

        let depth = state.stack().len();
        let mut cursor = begin.to();
        let mut children = vec![begin];
        while state.stack().len() == depth {
            if let Some(end) = self.close_at(repository, text, cursor, state)? {
                cursor = end.to();
                children.push(end);
                break;
            }

            let before = state.stack().len();
            let next = match first_progress(repository, &self.patterns, text, cursor, state, false)? {
                Some(next) => next,
                None => match char_filler(NodeId::NONE, text, cursor) {
                    Some(filler) => filler,
                    None => break,
                },
            };
            if next.length == 0 && state.stack().len() == before {
                break;
            }
            cursor = next.to();
            children.push(next);
        }

        Ok(Some(Matched::branch(
            NodeId::NONE,
            pos,
            cursor - pos,
            children,
            Wrapping::Full,
        )))
    }

    /// Try to close the innermost frame, which must belong to this rule.
    ///
    /// On success the frame is popped and the END-wrapped end match returned.
    /// A zero-width end match where the frame opened is ignored.
    pub fn close_at(
        &self,
        repository: &GrammarRepository,
        text: &str,
        pos: usize,
        state: &mut GrammarState,
    ) -> GResult<Option<Matched>> {
        let frame = state.stack().top();
        let opened_at = frame.opened_at;
        let resolved: Option<Arc<RegExpMatcher>> = frame.end_matcher.clone();
        let matcher = resolved.as_deref().unwrap_or(self.end.matcher());

        let Some((end, _)) = self.end.match_using(matcher, repository, text, pos, state)? else {
            return Ok(None);
        };
        if end.length == 0 && pos == opened_at {
            return Ok(None);
        }
        state.stack_mut().pop();
        Ok(Some(end.wrap(self.node, Wrapping::End)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        definition::{GrammarDefinition, RuleDefinition},
        matched::Token,
        nodes::NoDeclarator,
    };

    fn build(definition: GrammarDefinition) -> GrammarRepository {
        GrammarRepository::from_definition(&definition, &NoDeclarator, Default::default()).unwrap()
    }

    fn scoped<'r>(
        repository: &'r GrammarRepository,
        name: &str,
    ) -> &'r ScopedRule {
        repository
            .include(&format!("#{name}"))
            .ok()
            .and_then(|id| repository.rule(id).as_scoped())
            .unwrap()
    }

    fn comment_grammar() -> GrammarDefinition {
        GrammarDefinition::default()
            .with_repository_entry("comment", RuleDefinition::scoped(r"/\*", r"\*/"))
            .with_pattern(RuleDefinition::including("#comment"))
    }

    #[test]
    fn test_block_comment() {
        let repository = build(comment_grammar());
        let rule = scoped(&repository, "comment");
        let comment = rule.node();
        let mut state = repository.start_state();

        let found = rule
            .match_at(&repository, "/* x */y", 0, &mut state, false)
            .unwrap()
            .unwrap();
        assert_eq!(found.range(), 0..7);
        assert!(state.stack().is_root());

        let tokens = found.compile();
        assert_eq!(tokens.first(), Some(&Token::new(None, 0, 2).opening([comment])));
        assert_eq!(tokens[1], Token::new(None, 2, 3));
        assert_eq!(tokens.last(), Some(&Token::new(None, 5, 7).closing([comment])));
        assert!(tokens.iter().all(|t| t.to <= 7));
    }

    #[test]
    fn test_unterminated_scope_stays_open() {
        let repository = build(comment_grammar());
        let rule = scoped(&repository, "comment");
        let mut state = repository.start_state();

        let found = rule
            .match_at(&repository, "/* never closed", 0, &mut state, false)
            .unwrap()
            .unwrap();
        assert_eq!(found.range(), 0..15);
        assert_eq!(state.stack().len(), 2);
        assert_eq!(state.stack().top().end, Some(rule.id()));

        let tokens = found.compile();
        assert!(tokens.iter().all(|t| t.closed_by.is_empty()));
    }

    #[test]
    fn test_possibly_incomplete_returns_begin() {
        let repository = build(comment_grammar());
        let rule = scoped(&repository, "comment");
        let mut state = repository.start_state();

        let found = rule
            .match_at(&repository, "/* x */", 0, &mut state, true)
            .unwrap()
            .unwrap();
        assert_eq!(found.range(), 0..2);
        assert_eq!(found.wrapping, Wrapping::Begin);
        assert_eq!(state.stack().len(), 2);

        assert_eq!(rule.close_at(&repository, "/* x */", 3, &mut state).unwrap(), None);
        let end = rule
            .close_at(&repository, "/* x */", 5, &mut state)
            .unwrap()
            .unwrap();
        assert_eq!(end.range(), 5..7);
        assert_eq!(end.wrapping, Wrapping::End);
        assert!(state.stack().is_root());
    }

    #[test]
    fn test_backref_end() {
        let repository = build(
            GrammarDefinition::default()
                .with_repository_entry(
                    "heredoc",
                    RuleDefinition::scoped(r"(<<)(\w+)", r"\2").with_id("heredoc"),
                )
                .with_pattern(RuleDefinition::including("#heredoc")),
        );
        let rule = scoped(&repository, "heredoc");
        let mut state = repository.start_state();

        let text = "<<EOT a EOF b EOT tail";
        let found = rule
            .match_at(&repository, text, 0, &mut state, false)
            .unwrap()
            .unwrap();
        assert_eq!(&text[found.range()], "<<EOT a EOF b EOT");
        assert!(state.stack().is_root());
    }

    #[test]
    fn test_nested_scopes_are_balanced() {
        let repository = build(
            GrammarDefinition::default()
                .with_repository_entry(
                    "paren",
                    RuleDefinition::scoped(r"\(", r"\)")
                        .with_id("paren")
                        .with_patterns([RuleDefinition::including("#paren")]),
                )
                .with_pattern(RuleDefinition::including("#paren")),
        );
        let rule = scoped(&repository, "paren");
        let paren = rule.node();
        let mut state = repository.start_state();

        let found = rule
            .match_at(&repository, "(a(b)c)", 0, &mut state, false)
            .unwrap()
            .unwrap();
        assert_eq!(found.range(), 0..7);
        assert!(state.stack().is_root());

        let tokens = found.compile();
        let opens: usize = tokens.iter().map(|t| t.opened_by.len()).sum();
        let closes: usize = tokens.iter().map(|t| t.closed_by.len()).sum();
        assert_eq!((opens, closes), (2, 2));
        assert_eq!(tokens[0].opened_by, vec![paren]);
        assert_eq!(tokens.last().unwrap().closed_by, vec![paren]);
    }

    #[test]
    fn test_zero_width_begin_does_not_recurse() {
        let repository = build(
            GrammarDefinition::default()
                .with_repository_entry(
                    "line",
                    RuleDefinition::scoped(r"(?=\w)", r"$")
                        .with_id("line")
                        .with_flags("m")
                        .with_patterns([RuleDefinition::including("#line")]),
                )
                .with_pattern(RuleDefinition::including("#line")),
        );
        let rule = scoped(&repository, "line");
        let mut state = repository.start_state();

        let found = rule
            .match_at(&repository, "ab\ncd", 0, &mut state, false)
            .unwrap()
            .unwrap();
        assert_eq!(found.range(), 0..2);
        assert!(state.stack().is_root());
    }
}
