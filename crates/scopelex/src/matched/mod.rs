//! # Match Results
//!
//! A successful match is a [`Matched`] tree; [`Matched::compile`] flattens it
//! into [`Token`]s carrying open/close bracket annotations.

#[allow(clippy::module_inception)]
mod matched;
mod token;

#[doc(inline)]
pub use matched::*;
#[doc(inline)]
pub use token::*;
