//! # Grammar Definitions
//!
//! Data-only description of a grammar, in the `TextMate` tradition:
//!
//! ```json
//! {
//!   "patterns": [{ "include": "#string" }, { "match": "\\d+", "id": "number" }],
//!   "repository": {
//!     "string": {
//!       "begin": "\"", "end": "\"", "id": "string",
//!       "patterns": [{ "match": "\\\\.", "id": "escape" }]
//!     }
//!   }
//! }
//! ```
//!
//! A [`RuleDefinition`] is classified by shape; see [`RuleDefinition::kind`].

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::GResult;

/// Capture-group index (as a decimal string) to capture definition.
pub type CaptureDefinitions = BTreeMap<String, RuleDefinition>;

/// The root of a grammar definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarDefinition {
    /// The root pattern list.
    #[serde(default)]
    pub patterns: Vec<RuleDefinition>,

    /// Named, reusable fragments addressed by `{"include": "#name"}`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repository: BTreeMap<String, RuleDefinition>,

    /// Any other root keys (`scopeName`, `fileTypes`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl GrammarDefinition {
    /// Parse a JSON grammar definition.
    pub fn from_json(json: &str) -> GResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON grammar definition file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> GResult<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Add a root pattern.
    pub fn with_pattern(
        mut self,
        pattern: RuleDefinition,
    ) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Add a repository entry.
    pub fn with_repository_entry<S: Into<String>>(
        mut self,
        name: S,
        definition: RuleDefinition,
    ) -> Self {
        self.repository.insert(name.into(), definition);
        self
    }
}

/// The shape a [`RuleDefinition`] was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `{"include": ...}`.
    Include,

    /// `{"match": ...}`.
    Match,

    /// `{"begin": ..., "end": ...}`.
    Scoped,

    /// `{"patterns": [...]}` without `begin`.
    Switch,

    /// None of the above; declares a node only.
    Node,
}

/// One rule (or bare node) definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    /// Unique rule name and node type id.
    ///
    /// Not the `TextMate` `name` key: scope names are shared by many rules,
    /// so `name` is kept with the other props.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Reference to a repository entry (`#name`) or the root (`$self`, `$base`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    /// Single-pattern rule source.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_: Option<String>,

    /// Regex flags applied to `match`, `begin` and `end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,

    /// Captures of `match`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captures: Option<CaptureDefinitions>,

    /// Scope opening pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,

    /// Captures of `begin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_captures: Option<CaptureDefinitions>,

    /// Scope closing pattern; may use `\1`..`\9` to refer to `begin` captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Captures of `end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_captures: Option<CaptureDefinitions>,

    /// Nested patterns (scope content, or switch alternatives).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<RuleDefinition>>,

    /// For switches: wrap the chosen alternative in the switch's own node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit: Option<bool>,

    /// For scopes: give begin/end their own linked bracket nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brackets: Option<bool>,

    /// Every other key; becomes the node's props.
    #[serde(flatten)]
    pub props: BTreeMap<String, serde_json::Value>,
}

impl RuleDefinition {
    /// A `{"match": pattern}` definition.
    pub fn matching<S: Into<String>>(pattern: S) -> Self {
        Self {
            match_: Some(pattern.into()),
            ..Default::default()
        }
    }

    /// A `{"begin": begin, "end": end}` definition.
    pub fn scoped<B: Into<String>, E: Into<String>>(
        begin: B,
        end: E,
    ) -> Self {
        Self {
            begin: Some(begin.into()),
            end: Some(end.into()),
            ..Default::default()
        }
    }

    /// A `{"patterns": [...]}` definition.
    pub fn switch<I: IntoIterator<Item = RuleDefinition>>(patterns: I) -> Self {
        Self {
            patterns: Some(patterns.into_iter().collect()),
            ..Default::default()
        }
    }

    /// An `{"include": name}` definition.
    pub fn including<S: Into<String>>(name: S) -> Self {
        Self {
            include: Some(name.into()),
            ..Default::default()
        }
    }

    /// A bare `{"id": id}` node definition.
    pub fn node<S: Into<String>>(id: S) -> Self {
        Self::default().with_id(id)
    }

    /// Set the id.
    pub fn with_id<S: Into<String>>(
        self,
        id: S,
    ) -> Self {
        Self {
            id: Some(id.into()),
            ..self
        }
    }

    /// Set the flags.
    pub fn with_flags<S: Into<String>>(
        self,
        flags: S,
    ) -> Self {
        Self {
            flags: Some(flags.into()),
            ..self
        }
    }

    /// Set the nested patterns.
    pub fn with_patterns<I: IntoIterator<Item = RuleDefinition>>(
        self,
        patterns: I,
    ) -> Self {
        Self {
            patterns: Some(patterns.into_iter().collect()),
            ..self
        }
    }

    /// Add a `match` capture.
    pub fn with_capture(
        mut self,
        group: usize,
        capture: RuleDefinition,
    ) -> Self {
        self.captures
            .get_or_insert_with(Default::default)
            .insert(group.to_string(), capture);
        self
    }

    /// Add a `begin` capture.
    pub fn with_begin_capture(
        mut self,
        group: usize,
        capture: RuleDefinition,
    ) -> Self {
        self.begin_captures
            .get_or_insert_with(Default::default)
            .insert(group.to_string(), capture);
        self
    }

    /// Add an `end` capture.
    pub fn with_end_capture(
        mut self,
        group: usize,
        capture: RuleDefinition,
    ) -> Self {
        self.end_captures
            .get_or_insert_with(Default::default)
            .insert(group.to_string(), capture);
        self
    }

    /// Set `emit`.
    pub fn with_emit(
        self,
        emit: bool,
    ) -> Self {
        Self {
            emit: Some(emit),
            ..self
        }
    }

    /// Set `brackets`.
    pub fn with_brackets(
        self,
        brackets: bool,
    ) -> Self {
        Self {
            brackets: Some(brackets),
            ..self
        }
    }

    /// Add a prop.
    pub fn with_prop<S: Into<String>>(
        mut self,
        key: S,
        value: serde_json::Value,
    ) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Classify by shape.
    ///
    /// `include` wins over everything; then `match`; then `begin`;
    /// then `patterns`; anything else declares a bare node.
    pub fn kind(&self) -> DefinitionKind {
        if self.include.is_some() {
            DefinitionKind::Include
        } else if self.match_.is_some() {
            DefinitionKind::Match
        } else if self.begin.is_some() {
            DefinitionKind::Scoped
        } else if self.patterns.is_some() {
            DefinitionKind::Switch
        } else {
            DefinitionKind::Node
        }
    }
}
