//! # Grammar Facade

use std::path::Path;

use crate::{
    definition::GrammarDefinition,
    errors::{GResult, GrammarError},
    grammar::{GrammarOptions, MatchOptions},
    matched::{Matched, Token},
    nodes::{GrammarNode, NoDeclarator, NodeDeclarator, NodeId},
    repository::GrammarRepository,
    rules::{char_filler, first_progress},
    state::GrammarState,
};

/// A compiled grammar.
///
/// Immutable once built; share it freely across threads. Each document
/// being tokenized carries its own [`GrammarState`].
///
/// A rule with `captures` must have groups that cover its whole match,
/// back to back: group 0 is the concatenation of groups `1..n`. A
/// quoted-string rule written `"([^"]*)"` leaves both quotes outside any
/// group and fails with [`GrammarError::MalformedCaptureGroups`] on its
/// first match; write it `(")([^"]*)(")` instead.
///
/// ```rust,ignore
/// use scopelex::{Grammar, GrammarDefinition};
///
/// let grammar = Grammar::from_json(r#"{"patterns": [{"match": "\\d+", "id": "number"}]}"#)?;
/// let mut state = grammar.start_state();
/// let text = "12 34";
/// let mut pos = 0;
/// while let Some(found) = grammar.match_at(&mut state, text, pos)? {
///     pos = found.to();
///     for token in found.compile() {
///         println!("{token:?}");
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    repository: GrammarRepository,
    options: GrammarOptions,
}

impl Grammar {
    /// Build with default options and no declarator.
    pub fn new(definition: &GrammarDefinition) -> GResult<Self> {
        Self::with_options(definition, GrammarOptions::default())
    }

    /// Build with no declarator.
    pub fn with_options(
        definition: &GrammarDefinition,
        options: GrammarOptions,
    ) -> GResult<Self> {
        Self::with_declarator(definition, &NoDeclarator, options)
    }

    /// Build, consulting `declarator` for every declared node's extra props.
    ///
    /// ## Arguments
    /// * `definition` - the grammar definition.
    /// * `declarator` - the host's node hook.
    /// * `options` - build options.
    ///
    /// ## Errors
    /// Any grammar definition defect; see [`GrammarError`].
    pub fn with_declarator<D: NodeDeclarator>(
        definition: &GrammarDefinition,
        declarator: &D,
        options: GrammarOptions,
    ) -> GResult<Self> {
        let repository = GrammarRepository::from_definition(definition, declarator, options)?;
        Ok(Self {
            repository,
            options,
        })
    }

    /// Parse and build a JSON grammar definition.
    pub fn from_json(json: &str) -> GResult<Self> {
        Self::new(&GrammarDefinition::from_json(json)?)
    }

    /// Read, parse and build a JSON grammar definition file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> GResult<Self> {
        Self::new(&GrammarDefinition::from_json_file(path)?)
    }

    /// The build options.
    pub fn options(&self) -> &GrammarOptions {
        &self.options
    }

    /// The rule and node registry.
    pub fn repository(&self) -> &GrammarRepository {
        &self.repository
    }

    /// Every node, sorted by (and indexed by) type index.
    pub fn nodes(&self) -> &[GrammarNode] {
        self.repository.nodes()
    }

    /// The node with type index `id`.
    pub fn node(
        &self,
        id: NodeId,
    ) -> Option<&GrammarNode> {
        self.repository.node(id)
    }

    /// The node with type id `name`.
    pub fn node_by_name(
        &self,
        name: &str,
    ) -> Option<&GrammarNode> {
        self.repository.node_by_name(name)
    }

    /// A fresh state at the start of a document.
    pub fn start_state(&self) -> GrammarState {
        self.repository.start_state()
    }

    /// Match the next span at `pos`, with default [`MatchOptions`].
    pub fn match_at(
        &self,
        state: &mut GrammarState,
        text: &str,
        pos: usize,
    ) -> GResult<Option<Matched>> {
        self.match_with(state, text, pos, &MatchOptions::default())
    }

    /// Match the next span at `pos`.
    ///
    /// Tries, in order: closing the innermost open scope; the innermost
    /// scope's patterns; a one-character fallback (`NONE` inside a scope,
    /// `error.unrecognized` at the root).
    ///
    /// ## Returns
    /// The match, shifted by `options.offset`; `None` only at the end of `text`.
    ///
    /// ## Errors
    /// * [`GrammarError::PositionOutOfBounds`] if `pos` is not a char boundary of `text`.
    /// * Grammar defects surfaced while matching, such as
    ///   [`GrammarError::MalformedCaptureGroups`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, state, text, options), fields(len = text.len()))
    )]
    pub fn match_with(
        &self,
        state: &mut GrammarState,
        text: &str,
        pos: usize,
        options: &MatchOptions,
    ) -> GResult<Option<Matched>> {
        if !text.is_char_boundary(pos) {
            return Err(GrammarError::PositionOutOfBounds {
                pos,
                len: text.len(),
            });
        }

        let mut found = self.next_match(state, text, pos, options.possibly_incomplete)?;
        if let Some(found) = &mut found {
            found.offset(options.offset);
        }
        Ok(found)
    }

    fn next_match(
        &self,
        state: &mut GrammarState,
        text: &str,
        pos: usize,
        possibly_incomplete: bool,
    ) -> GResult<Option<Matched>> {
        if let Some(scope) = state
            .stack()
            .top()
            .end
            .and_then(|end| self.repository.rule(end).as_scoped())
            && let Some(end) = scope.close_at(&self.repository, text, pos, state)?
        {
            return Ok(Some(end));
        }

        let rules = state.stack().top().rules.clone();
        if let Some(found) = first_progress(
            &self.repository,
            &rules,
            text,
            pos,
            state,
            possibly_incomplete,
        )? {
            return Ok(Some(found));
        }

        let fallback = if state.stack().is_root() {
            NodeId::ERROR_UNRECOGNIZED
        } else {
            NodeId::NONE
        };
        Ok(char_filler(fallback, text, pos))
    }

    /// Tokenize all of `text` from a fresh state.
    pub fn tokenize(
        &self,
        text: &str,
    ) -> GResult<Vec<Token>> {
        let mut state = self.start_state();
        self.tokenize_from(&mut state, text, &MatchOptions::default())
    }

    /// Tokenize all of `text`, continuing from `state`.
    ///
    /// ## Returns
    /// The concatenated compiled tokens; `state` is left at the end of `text`.
    pub fn tokenize_from(
        &self,
        state: &mut GrammarState,
        text: &str,
        options: &MatchOptions,
    ) -> GResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some(found) = self.match_with(state, text, pos, &options.with_offset(0))? else {
                break;
            };
            pos = found.to();

            let start = tokens.len();
            found.compile_into(&mut tokens);
            if options.offset > 0 {
                for token in &mut tokens[start..] {
                    token.from += options.offset;
                    token.to += options.offset;
                }
            }
        }
        Ok(tokens)
    }
}
