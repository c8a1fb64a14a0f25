//! # `scopelex` Grammar-Driven Scope Tokenizer
//!
//! `scopelex` tokenizes text with declarative grammars in the `TextMate`
//! tradition: a tree of match, scoped (begin / end) and switch rules.
//! It classifies contiguous spans of text with node types and nesting
//! brackets; it does not build an AST.
//!
//! See:
//! * [`definition`] for the grammar definition data model.
//! * [`Grammar`] to build a grammar and match text.
//! * [`state`] for the caller-owned tokenizer cursor.
//! * [`matched`] for match trees and their compiled [`Token`]s.
//!
//! ## Tokenizing
//!
//! A caller holds one [`GrammarState`] per document, and calls
//! [`Grammar::match_at`] repeatedly, advancing by each match's length:
//!
//! ```rust,ignore
//! use scopelex::Grammar;
//!
//! let grammar = Grammar::from_json(r#"{
//!     "patterns": [{"include": "#string"}, {"match": "\\d+", "id": "number"}],
//!     "repository": {
//!         "string": {"begin": "\"", "end": "\"", "id": "string"}
//!     }
//! }"#)?;
//!
//! let text = r#"1 "two" 3"#;
//! let mut state = grammar.start_state();
//! let mut pos = 0;
//! while let Some(found) = grammar.match_at(&mut state, text, pos)? {
//!     pos = found.to();
//!     for token in found.compile() {
//!         println!("{}", serde_json::to_string(&token)?);
//!     }
//! }
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod definition;
pub mod errors;
pub mod grammar;
pub mod matched;
pub mod nodes;
pub mod regex;
pub mod repository;
pub mod rules;
pub mod state;
pub mod types;

#[doc(inline)]
pub use definition::{GrammarDefinition, RuleDefinition};
#[doc(inline)]
pub use errors::{GResult, GrammarError};
#[doc(inline)]
pub use grammar::{Grammar, GrammarOptions, MatchOptions};
#[doc(inline)]
pub use matched::{Matched, Token, Wrapping};
#[doc(inline)]
pub use nodes::{GrammarNode, NodeDeclarator, NodeId, NodeProps, SentinelNode};
#[doc(inline)]
pub use state::GrammarState;
