//! # Nodes
//!
//! A [`GrammarNode`] identifies a token type. Every grammar shares the
//! reserved [`SentinelNode`] indices; grammar-declared nodes are numbered
//! densely from [`NodeId::FIRST_USER`].

mod grammar_node;
mod node_id;

#[doc(inline)]
pub use grammar_node::*;
#[doc(inline)]
pub use node_id::*;
