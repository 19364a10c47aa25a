//! Diagnostics raised while lexing step text.

use std::fmt;

use thiserror::Error;

use crate::special::SpecialKind;

/// The delimiter family of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSyntax {
    /// `"value"`.
    Quoted,
    /// `<name>`, `<file:..>` or `<table:..>`.
    Angled,
}

impl ParameterSyntax {
    /// The character that closes a parameter of this family.
    #[must_use]
    pub const fn closing(self) -> char {
        match self {
            Self::Quoted => '"',
            Self::Angled => '>',
        }
    }
}

impl fmt::Display for ParameterSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Quoted => "quoted parameter",
            Self::Angled => "angle-bracket parameter",
        })
    }
}

/// Malformed step text.
///
/// Offsets are zero-based byte positions of the opening delimiter.
///
/// # Examples
/// ```
/// use specmark_patterns::{ParameterSyntax, StepSyntaxError, lex_step};
/// let err = lex_step("open <door").err();
/// assert_eq!(
///     err,
///     Some(StepSyntaxError::Unterminated {
///         syntax: ParameterSyntax::Angled,
///         start: 5,
///         partial: "door".into(),
///     })
/// );
/// assert_eq!(err.and_then(|e| e.position()), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StepSyntaxError {
    /// A parameter runs to the end of the line without its closing
    /// delimiter.
    #[error("{syntax} opened at byte {start} is never closed (read `{partial}`)")]
    Unterminated {
        /// Delimiter family.
        syntax: ParameterSyntax,
        /// Offset of the opening delimiter.
        start: usize,
        /// Text read before the line ended.
        partial: String,
    },
    /// `<>` or `< >`.
    #[error("angle-bracket parameter at byte {start} has no name")]
    EmptyName {
        /// Offset of the opening bracket.
        start: usize,
    },
    /// `<file:>` or `<table:>`.
    #[error("`{kind}:` parameter at byte {start} names no resource")]
    MissingReference {
        /// Prefix that was written.
        kind: SpecialKind,
        /// Offset of the opening bracket.
        start: usize,
    },
    /// Nothing follows the step marker.
    #[error("step text is empty")]
    Empty,
}

impl StepSyntaxError {
    /// Offset of the offending parameter; `None` for an empty step.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Unterminated { start, .. }
            | Self::EmptyName { start }
            | Self::MissingReference { start, .. } => Some(*start),
            Self::Empty => None,
        }
    }
}
