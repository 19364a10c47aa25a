//! Semantic error types for specification parsing.
//!
//! Every failure inside the parsing core degrades to one of these values and
//! is reported against the file that produced it. Errors are `Clone` so a
//! [`ParseResult`](crate::ParseResult) can be copied into reports without
//! losing the diagnostic.

use specmark_patterns::StepSyntaxError;
use thiserror::Error;

use crate::model::TableError;

/// Errors that abort parsing of a single specification document.
///
/// Variants raised while reading a document carry the 1-based source line
/// they refer to; [`ParseError::line`] exposes it uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The document could not be read by the source reader.
    #[error("failed to read specification: {message}")]
    Io {
        /// Message reported by the I/O layer.
        message: String,
    },

    /// The text of a step is malformed.
    #[error("line {line}: {source}")]
    StepSyntax {
        /// Line of the offending step.
        line: usize,
        /// Lexer diagnostic.
        #[source]
        source: StepSyntaxError,
    },

    /// A table row does not fit the table it belongs to.
    #[error("line {line}: {source}")]
    Table {
        /// Line of the offending row.
        line: usize,
        /// Table diagnostic.
        #[source]
        source: TableError,
    },

    /// A table row appeared where no table may start.
    #[error("line {line}: table row appears outside a table context")]
    StrayTableRow {
        /// Line of the offending row.
        line: usize,
    },

    /// A scenario, step or tag line appeared before the specification heading.
    #[error("line {line}: {element} appears before the specification heading")]
    MissingHeading {
        /// Line of the offending element.
        line: usize,
        /// Human-readable element name.
        element: &'static str,
    },

    /// The document declares more than one specification heading.
    #[error("line {line}: specification heading is already defined")]
    DuplicateHeading {
        /// Line of the second heading.
        line: usize,
    },

    /// A step's parameter fragments and arguments disagree.
    #[error("line {line}: step has {fragments} parameter fragments but {args} arguments")]
    ArgumentMismatch {
        /// Line of the step.
        line: usize,
        /// Number of parameter fragments.
        fragments: usize,
        /// Number of arguments.
        args: usize,
    },

    /// A concept was invoked with the wrong number of arguments.
    #[error(
        "line {line}: concept `{concept}` expects {expected} arguments but {actual} were supplied"
    )]
    ConceptArity {
        /// Line of the invoking step.
        line: usize,
        /// Normalised value of the concept.
        concept: String,
        /// Number of parameters the concept declares.
        expected: usize,
        /// Number of arguments supplied by the caller.
        actual: usize,
    },

    /// A concept refers back to itself, directly or transitively.
    #[error("line {line}: concept cycle detected: {chain}")]
    ConceptCycle {
        /// Line of the top-level invoking step.
        line: usize,
        /// Expansion chain, joined with ` -> `.
        chain: String,
    },

    /// Concept expansion nested deeper than the configured limit.
    #[error("line {line}: concept `{concept}` exceeds the maximum expansion depth of {limit}")]
    ConceptDepth {
        /// Line of the top-level invoking step.
        line: usize,
        /// Concept at which the limit was reached.
        concept: String,
        /// Configured depth limit.
        limit: usize,
    },

    /// One top-level step expanded into more nested steps than allowed.
    #[error("line {line}: concept `{concept}` expands past the limit of {limit} steps")]
    ConceptSize {
        /// Line of the top-level invoking step.
        line: usize,
        /// Concept whose body crossed the limit.
        concept: String,
        /// Configured step budget.
        limit: usize,
    },

    /// A `<file:..>` or `<table:..>` parameter could not be loaded.
    #[error("line {line}: special parameter `{reference}` could not be resolved: {reason}")]
    SpecialParameter {
        /// Line of the step.
        line: usize,
        /// Parameter as written, e.g. `file:notes.txt`.
        reference: String,
        /// Why resolution failed.
        reason: String,
    },
}

impl ParseError {
    /// Return the 1-based source line the error refers to, when known.
    ///
    /// # Examples
    /// ```
    /// use specmark::ParseError;
    /// assert_eq!(ParseError::StrayTableRow { line: 4 }.line(), Some(4));
    /// assert_eq!(ParseError::Io { message: "gone".into() }.line(), None);
    /// ```
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::StepSyntax { line, .. }
            | Self::Table { line, .. }
            | Self::StrayTableRow { line }
            | Self::MissingHeading { line, .. }
            | Self::DuplicateHeading { line }
            | Self::ArgumentMismatch { line, .. }
            | Self::ConceptArity { line, .. }
            | Self::ConceptCycle { line, .. }
            | Self::ConceptDepth { line, .. }
            | Self::ConceptSize { line, .. }
            | Self::SpecialParameter { line, .. } => Some(*line),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_from_std_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ParseError = io_err.into();
        assert!(error.to_string().contains("file not found"));
        assert_eq!(error.line(), None);
    }

    #[test]
    fn step_syntax_error_is_prefixed_with_line() {
        let error = ParseError::StepSyntax {
            line: 7,
            source: StepSyntaxError::Empty,
        };
        assert_eq!(error.to_string(), "line 7: step text is empty");
        assert_eq!(error.line(), Some(7));
    }

    #[test]
    fn uneven_table_row_displays_counts() {
        let error = ParseError::Table {
            line: 3,
            source: TableError::UnevenRow {
                row_number: 2,
                expected: 2,
                actual: 3,
            },
        };
        assert_eq!(
            error.to_string(),
            "line 3: table row 2 has 3 cells but the header declares 2"
        );
    }

    #[test]
    fn config_error_displays_message() {
        let error = ConfigError::Invalid("unknown log level".to_string());
        assert_eq!(error.to_string(), "invalid configuration: unknown log level");
    }
}
