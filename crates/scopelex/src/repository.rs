//! # Grammar Repository
//!
//! The registry of every rule and node in a grammar.
//!
//! Building is two-phase:
//! 1. [`GrammarRepositoryBuilder::add`] registers definitions by name;
//!    `include` references are only recorded.
//! 2. [`GrammarRepositoryBuilder::build`] resolves every recorded include
//!    against the complete name table, so entries may refer forward and
//!    to each other.
//!
//! The built [`GrammarRepository`] is immutable.

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    definition::{CaptureDefinitions, DefinitionKind, GrammarDefinition, RuleDefinition},
    errors::{GResult, GrammarError},
    grammar::GrammarOptions,
    nodes::{GrammarNode, NodeDeclarator, NodeId, NodeProps, SentinelNode},
    regex::RegExpMatcher,
    rules::{CaptureTarget, MatchRule, Rule, RuleId, ScopedRule, SwitchRule},
    state::{GrammarFrame, GrammarState},
    types::{SLHashMap, hash_map_new},
};

/// The name of the root pattern list; also reachable as `$base`.
pub const ROOT_NAME: &str = "$self";

/// What a name is registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryEntry {
    /// A bare node.
    Node(NodeId),

    /// A rule.
    Rule(RuleId),
}

#[derive(Debug, Clone)]
enum PatternRef {
    Rule(RuleId),
    Include(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureSlot {
    Match,
    Begin,
    End,
}

fn resolve_include(
    names: &SLHashMap<String, RepositoryEntry>,
    root: RuleId,
    name: &str,
) -> GResult<RuleId> {
    if name == ROOT_NAME || name == "$base" {
        return Ok(root);
    }
    let key = name.strip_prefix('#').unwrap_or(name);
    match names.get(key) {
        Some(RepositoryEntry::Rule(id)) => Ok(*id),
        Some(RepositoryEntry::Node(_)) => Err(GrammarError::IncludeNotRule {
            name: name.to_string(),
        }),
        None => Err(GrammarError::UnknownInclude {
            name: name.to_string(),
        }),
    }
}

/// Registration phase of a [`GrammarRepository`].
pub struct GrammarRepositoryBuilder<'d> {
    declarator: &'d dyn NodeDeclarator,
    options: GrammarOptions,

    nodes: Vec<GrammarNode>,
    rules: Vec<Rule>,
    names: SLHashMap<String, RepositoryEntry>,
    root: Option<RuleId>,

    pending_patterns: Vec<(RuleId, Vec<PatternRef>)>,
    pending_captures: Vec<(RuleId, CaptureSlot, usize, String)>,
}

impl<'d> GrammarRepositoryBuilder<'d> {
    /// Start a repository holding only the sentinel nodes.
    pub fn new(
        declarator: &'d dyn NodeDeclarator,
        options: GrammarOptions,
    ) -> Self {
        Self {
            declarator,
            options,
            nodes: SentinelNode::iter().map(GrammarNode::sentinel).collect(),
            rules: Vec::new(),
            names: hash_map_new(),
            root: None,
            pending_patterns: Vec::new(),
            pending_captures: Vec::new(),
        }
    }

    /// Look up a registered name. No side effects.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<RepositoryEntry> {
        self.names.get(name).copied()
    }

    /// Register a definition.
    ///
    /// Registration is idempotent by name: if the definition's name is
    /// already registered, the existing entry is returned unchanged.
    ///
    /// ## Arguments
    /// * `definition` - the rule or node definition.
    /// * `fallback` - the name to use when the definition has no `id`.
    pub fn add(
        &mut self,
        definition: &RuleDefinition,
        fallback: Option<&str>,
    ) -> GResult<RepositoryEntry> {
        let name = match (&definition.id, fallback) {
            (Some(id), _) => id.clone(),
            (None, Some(fallback)) => fallback.to_string(),
            (None, None) => format!("anonymous/{}", self.rules.len()),
        };
        if let Some(entry) = self.get(&name) {
            return Ok(entry);
        }

        match definition.kind() {
            DefinitionKind::Node => {
                let id = self.declare_node(&name, definition, NodeProps::new());
                let entry = RepositoryEntry::Node(id);
                self.names.insert(name, entry);
                Ok(entry)
            }
            DefinitionKind::Include => {
                let include = definition.include.clone().unwrap_or_default();
                let id = self.push_rule(
                    &name,
                    Rule::Switch(SwitchRule::new(&name, NodeId::NONE, Arc::from(Vec::new()), false)),
                );
                self.pending_patterns
                    .push((id, vec![PatternRef::Include(include)]));
                Ok(RepositoryEntry::Rule(id))
            }
            DefinitionKind::Match => self.add_match(&name, definition).map(RepositoryEntry::Rule),
            DefinitionKind::Scoped => self.add_scoped(&name, definition).map(RepositoryEntry::Rule),
            DefinitionKind::Switch => self.add_switch(&name, definition).map(RepositoryEntry::Rule),
        }
    }

    /// Bind an extra `name` to a registered entry, such as a repository key
    /// whose definition carries a different `id`.
    ///
    /// ## Errors
    /// [`GrammarError::InvalidRuleDefinition`] if `name` is already bound to
    /// a different entry.
    pub fn bind(
        &mut self,
        name: &str,
        entry: RepositoryEntry,
    ) -> GResult<()> {
        match self.get(name) {
            None => {
                self.names.insert(name.to_string(), entry);
                Ok(())
            }
            Some(existing) if existing == entry => Ok(()),
            Some(_) => Err(GrammarError::InvalidRuleDefinition {
                rule: name.to_string(),
                reason: "repository key is already bound to another entry".to_string(),
            }),
        }
    }

    /// Register the root pattern list.
    pub fn add_root(
        &mut self,
        patterns: &[RuleDefinition],
    ) -> GResult<RuleId> {
        let id = self.push_rule(
            ROOT_NAME,
            Rule::Switch(SwitchRule::new(ROOT_NAME, NodeId::NONE, Arc::from(Vec::new()), false)),
        );
        self.root = Some(id);
        self.queue_patterns(id, ROOT_NAME, Some(patterns))?;
        Ok(id)
    }

    /// Resolve every include and freeze the repository.
    ///
    /// ## Errors
    /// * [`GrammarError::UnknownInclude`] / [`GrammarError::IncludeNotRule`]
    ///   for dangling includes.
    /// * [`GrammarError::InvalidRuleDefinition`] for switches which include
    ///   themselves without consuming text.
    pub fn build(mut self) -> GResult<GrammarRepository> {
        let root = match self.root {
            Some(root) => root,
            None => self.add_root(&[])?,
        };

        for (id, refs) in core::mem::take(&mut self.pending_patterns) {
            let patterns = refs
                .iter()
                .map(|pattern| match pattern {
                    PatternRef::Rule(id) => Ok(*id),
                    PatternRef::Include(name) => resolve_include(&self.names, root, name),
                })
                .collect::<GResult<Vec<_>>>()?;
            self.rules[id.index()].set_patterns(patterns.into());
        }

        for (id, slot, group, include) in core::mem::take(&mut self.pending_captures) {
            let target = resolve_include(&self.names, root, &include)?;
            let target = self.capture_target(target);
            self.capture_owner(id, slot)?.set_capture(group, target);
        }

        check_switch_cycles(&self.rules)?;

        log::debug!(
            "built grammar repository: {} rules, {} nodes",
            self.rules.len(),
            self.nodes.len()
        );
        Ok(GrammarRepository {
            nodes: self.nodes,
            rules: self.rules,
            names: self.names,
            root,
        })
    }

    fn declare_node(
        &mut self,
        type_id: &str,
        definition: &RuleDefinition,
        mut props: NodeProps,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        props.extend(definition.props.clone());
        props.extend(self.declarator.declare(id, type_id, definition));
        self.nodes.push(GrammarNode {
            id,
            type_id: type_id.to_string(),
            props,
        });
        id
    }

    fn push_rule(
        &mut self,
        name: &str,
        rule: Rule,
    ) -> RuleId {
        let id = RuleId::new(self.rules.len() as u32);
        self.rules.push(rule);
        self.names
            .insert(name.to_string(), RepositoryEntry::Rule(id));
        id
    }

    fn matcher(
        &self,
        source: &str,
        flags: &str,
    ) -> GResult<RegExpMatcher> {
        RegExpMatcher::build(source, flags, self.options.strict_patterns)
    }

    fn add_match(
        &mut self,
        name: &str,
        definition: &RuleDefinition,
    ) -> GResult<RuleId> {
        let source = definition.match_.as_deref().unwrap_or_default();
        let matcher = self.matcher(source, definition.flags.as_deref().unwrap_or_default())?;
        let node = self.declare_node(name, definition, NodeProps::new());

        let id = self.push_rule(name, Rule::Match(MatchRule::new(name, node, matcher)));
        self.add_captures(id, CaptureSlot::Match, name, definition.captures.as_ref())?;
        Ok(id)
    }

    fn add_scoped(
        &mut self,
        name: &str,
        definition: &RuleDefinition,
    ) -> GResult<RuleId> {
        let (Some(begin), Some(end)) = (definition.begin.as_deref(), definition.end.as_deref())
        else {
            return Err(GrammarError::InvalidRuleDefinition {
                rule: name.to_string(),
                reason: "`begin` requires an `end`".to_string(),
            });
        };
        let flags = definition.flags.as_deref().unwrap_or_default();
        let begin_matcher = self.matcher(begin, flags)?;
        let end_matcher = self.matcher(end, flags)?;

        let node = self.declare_node(name, definition, NodeProps::new());
        let begin_name = format!("{name}.begin");
        let end_name = format!("{name}.end");
        let (begin_node, end_node) = if definition.brackets.unwrap_or(false) {
            (
                self.declare_bracket(&begin_name, definition, "closedBy", &end_name),
                self.declare_bracket(&end_name, definition, "openedBy", &begin_name),
            )
        } else {
            (NodeId::NONE, NodeId::NONE)
        };

        let rule = ScopedRule::new(
            RuleId::new(self.rules.len() as u32),
            name,
            node,
            MatchRule::new(&begin_name, begin_node, begin_matcher),
            MatchRule::new(&end_name, end_node, end_matcher),
        );
        let id = self.push_rule(name, Rule::Scoped(rule));

        self.add_captures(id, CaptureSlot::Begin, &begin_name, definition.begin_captures.as_ref())?;
        self.add_captures(id, CaptureSlot::End, &end_name, definition.end_captures.as_ref())?;
        self.queue_patterns(id, name, definition.patterns.as_deref())?;
        Ok(id)
    }

    fn declare_bracket(
        &mut self,
        name: &str,
        definition: &RuleDefinition,
        link: &str,
        other: &str,
    ) -> NodeId {
        let id = self.nodes.len() as u32;
        let mut props = NodeProps::new();
        props.insert(link.to_string(), serde_json::Value::from(other));
        props.extend(self.declarator.declare(NodeId::new(id), name, definition));
        self.nodes.push(GrammarNode {
            id: NodeId::new(id),
            type_id: name.to_string(),
            props,
        });
        self.names
            .insert(name.to_string(), RepositoryEntry::Node(NodeId::new(id)));
        NodeId::new(id)
    }

    fn add_switch(
        &mut self,
        name: &str,
        definition: &RuleDefinition,
    ) -> GResult<RuleId> {
        let emit = definition.emit.unwrap_or(false);
        let node = if emit {
            self.declare_node(name, definition, NodeProps::new())
        } else {
            NodeId::NONE
        };
        let id = self.push_rule(
            name,
            Rule::Switch(SwitchRule::new(name, node, Arc::from(Vec::new()), emit)),
        );
        self.queue_patterns(id, name, definition.patterns.as_deref())?;
        Ok(id)
    }

    fn queue_patterns(
        &mut self,
        id: RuleId,
        parent: &str,
        definitions: Option<&[RuleDefinition]>,
    ) -> GResult<()> {
        let mut refs = Vec::new();
        for (idx, definition) in definitions.unwrap_or_default().iter().enumerate() {
            if let Some(include) = &definition.include {
                refs.push(PatternRef::Include(include.clone()));
                continue;
            }
            match self.add(definition, Some(&format!("{parent}/{idx}")))? {
                RepositoryEntry::Rule(rule) => refs.push(PatternRef::Rule(rule)),
                RepositoryEntry::Node(_) => {
                    return Err(GrammarError::InvalidRuleDefinition {
                        rule: parent.to_string(),
                        reason: format!("pattern {idx} declares a node, not a rule"),
                    });
                }
            }
        }
        self.pending_patterns.push((id, refs));
        Ok(())
    }

    fn add_captures(
        &mut self,
        id: RuleId,
        slot: CaptureSlot,
        owner: &str,
        captures: Option<&CaptureDefinitions>,
    ) -> GResult<()> {
        for (key, definition) in captures.into_iter().flatten() {
            let group: usize = key.parse().map_err(|_| GrammarError::InvalidCaptureIndex {
                rule: owner.to_string(),
                key: key.clone(),
            })?;
            if group == 0 {
                log::debug!("{owner}: ignoring capture 0");
                continue;
            }

            if let Some(include) = &definition.include {
                self.pending_captures
                    .push((id, slot, group, include.clone()));
                continue;
            }
            let target = match self.add(definition, Some(&format!("{owner}.captures.{group}")))? {
                RepositoryEntry::Node(node) => CaptureTarget::Node(node),
                RepositoryEntry::Rule(rule) => self.capture_target(rule),
            };
            self.capture_owner(id, slot)?.set_capture(group, target);
        }
        Ok(())
    }

    /// Captures re-tokenize through switches; wrap any other rule in one.
    fn capture_target(
        &mut self,
        rule: RuleId,
    ) -> CaptureTarget {
        let target = &self.rules[rule.index()];
        if target.as_switch().is_some() {
            return CaptureTarget::Switch(rule);
        }

        let name = format!("{}.switch", target.name());
        if let Some(RepositoryEntry::Rule(existing)) = self.get(&name) {
            return CaptureTarget::Switch(existing);
        }
        let switch = self.push_rule(
            &name,
            Rule::Switch(SwitchRule::new(&name, NodeId::NONE, Arc::from(vec![rule]), false)),
        );
        CaptureTarget::Switch(switch)
    }

    fn capture_owner(
        &mut self,
        id: RuleId,
        slot: CaptureSlot,
    ) -> GResult<&mut MatchRule> {
        match (&mut self.rules[id.index()], slot) {
            (Rule::Match(rule), CaptureSlot::Match) => Ok(rule),
            (Rule::Scoped(rule), CaptureSlot::Begin) => Ok(rule.begin_mut()),
            (Rule::Scoped(rule), CaptureSlot::End) => Ok(rule.end_mut()),
            (rule, _) => Err(GrammarError::InvalidRuleDefinition {
                rule: rule.name().to_string(),
                reason: format!("no {slot:?} captures"),
            }),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Reject switches reachable from themselves through switches only.
///
/// Such a loop would recurse at the same position forever.
fn check_switch_cycles(rules: &[Rule]) -> GResult<()> {
    fn visit(
        rules: &[Rule],
        marks: &mut [Mark],
        idx: usize,
    ) -> GResult<()> {
        marks[idx] = Mark::OnPath;
        if let Some(switch) = rules[idx].as_switch() {
            for next in switch.patterns().iter().map(|id| id.index()) {
                if rules[next].as_switch().is_none() {
                    continue;
                }
                match marks[next] {
                    Mark::OnPath => {
                        return Err(GrammarError::InvalidRuleDefinition {
                            rule: rules[next].name().to_string(),
                            reason: "switch includes itself".to_string(),
                        });
                    }
                    Mark::Unvisited => visit(rules, marks, next)?,
                    Mark::Done => {}
                }
            }
        }
        marks[idx] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; rules.len()];
    for idx in 0..rules.len() {
        if marks[idx] == Mark::Unvisited && rules[idx].as_switch().is_some() {
            visit(rules, &mut marks, idx)?;
        }
    }
    Ok(())
}

/// The immutable registry of a grammar's rules and nodes.
#[derive(Debug, Clone)]
pub struct GrammarRepository {
    nodes: Vec<GrammarNode>,
    rules: Vec<Rule>,
    names: SLHashMap<String, RepositoryEntry>,
    root: RuleId,
}

impl GrammarRepository {
    /// Start a [`GrammarRepositoryBuilder`].
    pub fn builder(
        declarator: &dyn NodeDeclarator,
        options: GrammarOptions,
    ) -> GrammarRepositoryBuilder<'_> {
        GrammarRepositoryBuilder::new(declarator, options)
    }

    /// Build from a full grammar definition.
    ///
    /// Repository entries are registered first, in name order, then the
    /// root patterns. Each entry is reachable by its repository key as well
    /// as by its `id`.
    pub fn from_definition(
        definition: &GrammarDefinition,
        declarator: &dyn NodeDeclarator,
        options: GrammarOptions,
    ) -> GResult<Self> {
        let mut builder = Self::builder(declarator, options);
        for (key, entry) in &definition.repository {
            let added = builder.add(entry, Some(key))?;
            builder.bind(key, added)?;
        }
        builder.add_root(&definition.patterns)?;
        builder.build()
    }

    /// Look up a registered name.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<RepositoryEntry> {
        self.names.get(name).copied()
    }

    /// Resolve an include reference: `#name`, `$self` or `$base`.
    pub fn include(
        &self,
        name: &str,
    ) -> GResult<RuleId> {
        resolve_include(&self.names, self.root, name)
    }

    /// The rule at `id`.
    ///
    /// ## Panics
    /// If `id` was not issued by this repository.
    pub fn rule(
        &self,
        id: RuleId,
    ) -> &Rule {
        &self.rules[id.index()]
    }

    /// Every rule, indexed by [`RuleId`].
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The root pattern switch.
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// A fresh state whose stack holds only the root pattern list.
    pub fn start_state(&self) -> GrammarState {
        let rules = self
            .rule(self.root)
            .patterns()
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()));
        GrammarState::new(GrammarFrame::root(rules))
    }

    /// Every node, sorted by (and indexed by) type index.
    pub fn nodes(&self) -> &[GrammarNode] {
        &self.nodes
    }

    /// The node with type index `id`.
    pub fn node(
        &self,
        id: NodeId,
    ) -> Option<&GrammarNode> {
        self.nodes.get(id.index())
    }

    /// The node with type id `name`.
    pub fn node_by_name(
        &self,
        name: &str,
    ) -> Option<&GrammarNode> {
        self.nodes.iter().find(|node| node.type_id == name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::nodes::NoDeclarator;

    fn build(json: serde_json::Value) -> GResult<GrammarRepository> {
        let definition: GrammarDefinition = serde_json::from_value(json)?;
        GrammarRepository::from_definition(&definition, &NoDeclarator, GrammarOptions::default())
    }

    #[test]
    fn test_sentinels_come_first() {
        let repository = build(json!({"patterns": [{"match": "a", "id": "a"}]})).unwrap();
        let nodes = repository.nodes();
        for sentinel in SentinelNode::iter() {
            assert_eq!(nodes[sentinel.id().index()].type_id, sentinel.type_id());
        }
        assert_eq!(repository.node_by_name("a").unwrap().id, NodeId::FIRST_USER);
    }

    #[test]
    fn test_idempotent_registration() {
        let mut builder = GrammarRepository::builder(&NoDeclarator, GrammarOptions::default());
        let definition = RuleDefinition::matching("x").with_id("x");

        assert_eq!(builder.get("x"), None);
        let first = builder.add(&definition, None).unwrap();
        assert_eq!(builder.get("x"), Some(first));
        let node_count = builder.nodes.len();

        assert_eq!(builder.add(&definition, None).unwrap(), first);
        assert_eq!(
            builder
                .add(&RuleDefinition::matching("different").with_id("x"), None)
                .unwrap(),
            first
        );
        assert_eq!(builder.nodes.len(), node_count);
    }

    #[test]
    fn test_repeated_includes_share_nodes() {
        let repository = build(json!({
            "patterns": [{"include": "#num"}, {"include": "#num"}, {
                "begin": "\\(", "end": "\\)", "id": "paren",
                "patterns": [{"include": "#num"}, {"include": "$self"}]
            }],
            "repository": {"num": {"match": "\\d+", "id": "number"}}
        }))
        .unwrap();

        let names: Vec<_> = repository.nodes().iter().map(|n| n.type_id.as_str()).collect();
        assert_eq!(names.iter().filter(|n| **n == "number").count(), 1);
        for (idx, node) in repository.nodes().iter().enumerate() {
            assert_eq!(node.id.index(), idx);
        }

        let root = repository.rule(repository.root()).patterns().unwrap().clone();
        assert_eq!(root[0], root[1]);
        assert_eq!(repository.include("$base").unwrap(), repository.root());
    }

    #[test]
    fn test_forward_references() {
        let repository = build(json!({
            "patterns": [{"include": "#a"}],
            "repository": {
                "a": {"patterns": [{"include": "#z"}]},
                "z": {"match": "z", "id": "zed"}
            }
        }))
        .unwrap();
        let a = repository.include("#a").unwrap();
        let z = repository.include("#z").unwrap();
        assert_eq!(repository.rule(a).patterns().unwrap().as_ref(), &[z]);
    }

    #[test]
    fn test_keys_and_ids_both_resolve() {
        let repository = build(json!({
            "patterns": [{"include": "#num"}, {"include": "#number"}],
            "repository": {"num": {"match": "\\d+", "id": "number"}}
        }))
        .unwrap();
        let by_key = repository.include("#num").unwrap();
        assert_eq!(repository.include("#number").unwrap(), by_key);

        let root = repository.rule(repository.root()).patterns().unwrap().clone();
        assert_eq!(root.as_ref(), &[by_key, by_key]);
        assert!(repository.node_by_name("num").is_none());
    }

    #[test]
    fn test_key_bound_to_another_entry() {
        let mut builder = GrammarRepository::builder(&NoDeclarator, GrammarOptions::default());
        let x = builder.add(&RuleDefinition::matching("x").with_id("x"), None).unwrap();
        let y = builder.add(&RuleDefinition::matching("y").with_id("y"), None).unwrap();

        builder.bind("ex", x).unwrap();
        builder.bind("ex", x).unwrap();
        assert_eq!(builder.get("ex"), Some(x));
        assert!(matches!(
            builder.bind("ex", y),
            Err(GrammarError::InvalidRuleDefinition { rule, .. }) if rule == "ex"
        ));
        assert!(builder.bind("x", y).is_err());
    }

    #[test]
    fn test_include_errors() {
        assert!(matches!(
            build(json!({"patterns": [{"include": "#missing"}]})),
            Err(GrammarError::UnknownInclude { name }) if name == "#missing"
        ));
        assert!(matches!(
            build(json!({"patterns": [{"include": "#bare"}], "repository": {"bare": {"id": "bare"}}})),
            Err(GrammarError::IncludeNotRule { .. })
        ));
        assert!(matches!(
            build(json!({"patterns": [{"match": "(a)", "captures": {"1": {"include": "#nope"}}}]})),
            Err(GrammarError::UnknownInclude { .. })
        ));
    }

    #[test]
    fn test_definition_errors() {
        assert!(matches!(
            build(json!({"patterns": [{"match": "(a)", "id": "r", "captures": {"one": {"id": "x"}}}]})),
            Err(GrammarError::InvalidCaptureIndex { rule, key }) if rule == "r" && key == "one"
        ));
        assert!(matches!(
            build(json!({"patterns": [{"begin": "a", "id": "open"}]})),
            Err(GrammarError::InvalidRuleDefinition { rule, .. }) if rule == "open"
        ));
        assert!(matches!(
            build(json!({
                "patterns": [{"include": "#a"}],
                "repository": {
                    "a": {"patterns": [{"include": "#b"}]},
                    "b": {"patterns": [{"include": "#a"}]}
                }
            })),
            Err(GrammarError::InvalidRuleDefinition { .. })
        ));
    }

    #[test]
    fn test_invalid_patterns() {
        let lenient = build(json!({"patterns": [{"match": "(", "id": "bad"}]})).unwrap();
        let id = lenient.include("#bad").unwrap();
        match lenient.rule(id) {
            Rule::Match(rule) => assert!(!rule.matcher().is_enabled()),
            other => panic!("unexpected {other:?}"),
        }

        let definition: GrammarDefinition =
            serde_json::from_value(json!({"patterns": [{"match": "(", "id": "bad"}]})).unwrap();
        let strict = GrammarRepository::from_definition(
            &definition,
            &NoDeclarator,
            GrammarOptions::default().with_strict_patterns(true),
        );
        assert!(matches!(strict, Err(GrammarError::InvalidPattern { .. })));
    }

    #[test]
    fn test_generated_ids() {
        let repository = build(json!({
            "patterns": [{"match": "a"}],
            "repository": {
                "s": {
                    "begin": "(<)", "end": ">", "brackets": true,
                    "beginCaptures": {"1": {"color": "red"}},
                    "patterns": [{"match": "b"}]
                }
            }
        }))
        .unwrap();

        for name in ["$self/0", "s", "s/0", "s.begin", "s.end", "s.begin.captures.1"] {
            assert!(repository.get(name).is_some(), "{name} not registered");
        }
        assert_eq!(
            repository.node_by_name("s.begin").unwrap().prop("closedBy"),
            Some(&json!("s.end"))
        );
        assert_eq!(
            repository.node_by_name("s.end").unwrap().prop("openedBy"),
            Some(&json!("s.begin"))
        );
        assert_eq!(
            repository.node_by_name("s.begin.captures.1").unwrap().prop("color"),
            Some(&json!("red"))
        );
    }

    #[test]
    fn test_declarator_props_win() {
        let definition: GrammarDefinition = serde_json::from_value(json!({
            "patterns": [{"match": "a", "id": "a", "color": "red", "bold": true}]
        }))
        .unwrap();
        let declarator = |_: NodeId, type_id: &str, _: &RuleDefinition| {
            NodeProps::from([("color".to_string(), json!(format!("{type_id}-blue")))])
        };
        let repository =
            GrammarRepository::from_definition(&definition, &declarator, GrammarOptions::default())
                .unwrap();
        let node = repository.node_by_name("a").unwrap();
        assert_eq!(node.prop("color"), Some(&json!("a-blue")));
        assert_eq!(node.prop("bold"), Some(&json!(true)));
    }

    #[test]
    fn test_capture_include_wraps_rules() {
        let repository = build(json!({
            "patterns": [{"match": "(\\w+)", "id": "outer", "captures": {"1": {"include": "#word"}}}],
            "repository": {"word": {"match": "\\w", "id": "letter"}}
        }))
        .unwrap();
        let outer = match repository.rule(repository.include("#outer").unwrap()) {
            Rule::Match(rule) => rule.clone(),
            other => panic!("unexpected {other:?}"),
        };
        let Some(CaptureTarget::Switch(switch)) = outer.captures().get(&1).copied() else {
            panic!("capture 1 is not a switch");
        };
        assert_eq!(repository.rule(switch).name(), "letter.switch");
    }
}
