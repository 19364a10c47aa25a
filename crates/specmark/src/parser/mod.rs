//! Single-document specification parser.
//!
//! A document is read line by line. Each line is classified by its leading
//! marker, steps are lexed into fragments, tables are accumulated row by row
//! and every completed step is checked against the concept lookup. The first
//! structural problem aborts the document; no partial tree is returned.

use camino::Utf8PathBuf;

use crate::concept::{ConceptLookup, Expander};
use crate::config::{DEFAULT_MAX_CONCEPT_DEPTH, DEFAULT_MAX_EXPANDED_STEPS, ParserConfig};
use crate::dispatch::SourceReader;
use crate::error::ParseError;
use crate::model::Specification;

mod builder;
mod line;
mod special;
pub(crate) mod step;


use builder::DocumentBuilder;

/// Outcome of parsing one file.
///
/// A [`Specification`] accompanies the result exactly when `ok` is true.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseResult {
    /// Whether the document parsed cleanly.
    pub ok: bool,
    /// The failure, when `ok` is false.
    pub error: Option<ParseError>,
    /// Originating file identifier.
    pub file_name: Utf8PathBuf,
}

impl ParseResult {
    /// A successful result with no file attached yet.
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            file_name: Utf8PathBuf::new(),
        }
    }

    /// A failed result carrying `error`.
    #[must_use]
    pub fn failure(error: ParseError) -> Self {
        Self {
            ok: false,
            error: Some(error),
            file_name: Utf8PathBuf::new(),
        }
    }

    /// Stamp the result with the file it describes.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<Utf8PathBuf>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// Parses specification documents against a concept lookup.
///
/// # Examples
/// ```
/// use specmark::{ConceptDictionary, SpecParser};
/// let concepts = ConceptDictionary::default();
/// let parser = SpecParser::new(&concepts);
/// let (spec, result) = parser.parse("# Search\n## Finds items\n* search for \"rust\"\n");
/// assert!(result.ok);
/// assert_eq!(spec.map(|s| s.heading().to_string()).as_deref(), Some("Search"));
/// ```
#[derive(Clone, Copy)]
pub struct SpecParser<'a> {
    concepts: &'a dyn ConceptLookup,
    resources: Option<&'a dyn SourceReader>,
    max_concept_depth: usize,
    max_expanded_steps: usize,
}

impl<'a> SpecParser<'a> {
    /// Create a parser that resolves concepts through `concepts`.
    ///
    /// Special parameters cannot be resolved until a reader is attached with
    /// [`SpecParser::with_resources`].
    #[must_use]
    pub fn new(concepts: &'a dyn ConceptLookup) -> Self {
        Self {
            concepts,
            resources: None,
            max_concept_depth: DEFAULT_MAX_CONCEPT_DEPTH,
            max_expanded_steps: DEFAULT_MAX_EXPANDED_STEPS,
        }
    }

    /// Resolve `<file:..>` and `<table:..>` parameters through `reader`.
    #[must_use]
    pub fn with_resources(mut self, reader: &'a dyn SourceReader) -> Self {
        self.resources = Some(reader);
        self
    }

    /// Apply the parser-related settings of `config`.
    #[must_use]
    pub fn with_config(mut self, config: &ParserConfig) -> Self {
        self.max_concept_depth = config.max_concept_depth;
        self.max_expanded_steps = config.max_expanded_steps;
        self
    }

    /// Parse `text`, returning the specification or the first failure.
    ///
    /// # Errors
    /// Returns [`ParseError`] describing the first structural, table,
    /// concept or special-parameter problem in the document.
    pub fn try_parse(&self, text: &str) -> Result<Specification, ParseError> {
        let expander = Expander::new(self.concepts, self.max_concept_depth)
            .with_max_steps(self.max_expanded_steps);
        let mut builder = DocumentBuilder::new(expander, self.resources);
        for (idx, line) in text.lines().enumerate() {
            builder.feed(idx + 1, line)?;
        }
        builder.finish()
    }

    /// Parse `text` into an optional specification plus its result.
    #[must_use]
    pub fn parse(&self, text: &str) -> (Option<Specification>, ParseResult) {
        match self.try_parse(text) {
            Ok(spec) => (Some(spec), ParseResult::success()),
            Err(err) => {
                tracing::debug!(error = %err, "document failed to parse");
                (None, ParseResult::failure(err))
            }
        }
    }
}

/// Parse one document with default settings and no resource reader.
#[must_use]
pub fn parse_document(
    text: &str,
    concepts: &dyn ConceptLookup,
) -> (Option<Specification>, ParseResult) {
    SpecParser::new(concepts).parse(text)
}
