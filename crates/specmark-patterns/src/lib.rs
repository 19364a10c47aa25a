//! Shared step-text lexing utilities for specmark.
//!
//! The crate splits the text of a step line into literal text and parameter
//! tokens and renders the normalised form used to key steps. The parser and
//! the concept dictionary both go through these helpers so a concept heading
//! and a step invoking it always normalise to the same value.

mod errors;
mod special;
mod step;

pub use errors::{ParameterSyntax, StepSyntaxError};
pub use special::SpecialKind;
pub use step::{PARAMETER_MARKER, Segment, Token, lex_step, normalise, parameterise};
