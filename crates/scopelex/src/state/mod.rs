//! # Tokenizer State
//!
//! A [`GrammarState`] is threaded through every match call; its
//! [`GrammarStack`] records which scopes are open.

mod grammar_stack;
mod grammar_state;

#[doc(inline)]
pub use grammar_stack::*;
#[doc(inline)]
pub use grammar_state::*;
