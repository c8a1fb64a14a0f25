//! # Grammar
//!
//! [`Grammar`] builds a [`GrammarRepository`](crate::repository::GrammarRepository)
//! from a [`GrammarDefinition`](crate::definition::GrammarDefinition) and
//! drives matching over caller-owned [`GrammarState`](crate::state::GrammarState)s.

#[allow(clippy::module_inception)]
mod grammar;
mod grammar_options;

#[doc(inline)]
pub use grammar::*;
#[doc(inline)]
pub use grammar_options::*;
