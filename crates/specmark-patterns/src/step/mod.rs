//! Step-text lexing and normalisation helpers.

mod lexer;
mod normalise;
mod parameter;
#[cfg(test)]
pub(crate) mod test_support;

use std::borrow::Cow;

use crate::special::SpecialKind;

pub use lexer::lex_step;
pub use normalise::{PARAMETER_MARKER, normalise, parameterise};

/// A piece of step text handed to [`parameterise`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text.
    Text(&'a str),
    /// A parameter, rendered as `<label>`.
    Parameter(Cow<'a, str>),
}

/// A lexed segment of step text, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, with escapes already applied.
    Text(String),
    /// A quoted parameter such as `"alice"`.
    Static {
        /// Byte offset of the opening quote.
        start: usize,
        /// The unquoted value.
        value: String,
    },
    /// An angle-bracket parameter such as `<user>`.
    Dynamic {
        /// Byte offset of the opening bracket.
        start: usize,
        /// The parameter name between the brackets.
        name: String,
    },
    /// A prefixed angle-bracket parameter such as `<file:notes.txt>`.
    Special {
        /// Byte offset of the opening bracket.
        start: usize,
        /// Resource kind selected by the prefix.
        kind: SpecialKind,
        /// The text after the prefix, trimmed.
        reference: String,
    },
}

impl Token {
    /// Whether the token is any kind of parameter.
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// The token as a rendering segment.
    ///
    /// Static parameters are labelled by their value, dynamic ones by their
    /// name and special ones by `prefix:reference`.
    #[must_use]
    pub fn segment(&self) -> Segment<'_> {
        match self {
            Self::Text(text) => Segment::Text(text),
            Self::Static { value, .. } => Segment::Parameter(Cow::Borrowed(value)),
            Self::Dynamic { name, .. } => Segment::Parameter(Cow::Borrowed(name)),
            Self::Special {
                kind, reference, ..
            } => Segment::Parameter(Cow::Owned(format!("{kind}:{reference}"))),
        }
    }

    /// Text of the token: literal text as written, or a parameter's label.
    ///
    /// # Examples
    /// ```
    /// use specmark_patterns::{SpecialKind, Token};
    /// let token = Token::Special { start: 0, kind: SpecialKind::File, reference: "a.txt".into() };
    /// assert_eq!(token.display_name(), "file:a.txt");
    /// ```
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.segment() {
            Segment::Text(text) => text.to_string(),
            Segment::Parameter(label) => label.into_owned(),
        }
    }
}
