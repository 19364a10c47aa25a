//! Core library for `specmark`.
//!
//! The crate parses markdown-style test specifications into a syntax tree,
//! expands concept steps in place and converts the result into the canonical
//! wire messages used by runners and reporters.
//!
//! ```
//! use specmark::{ConceptDictionary, parse_document, wire};
//!
//! let mut concepts = ConceptDictionary::default();
//! concepts
//!     .define("log in as <user>", &["open the login page", "enter <user>"])
//!     .unwrap_or_else(|e| panic!("{e}"));
//!
//! let text = "# Accounts\n\n## Log in\n* log in as \"ann\"\n";
//! let (spec, result) = parse_document(text, &concepts);
//! assert!(result.ok);
//!
//! let message = spec.map(|spec| wire::convert_spec(&spec)).unwrap_or_default();
//! assert_eq!(message.spec_heading, "Accounts");
//! ```

mod concept;
mod config;
mod dispatch;
mod error;
mod logging;
mod model;
mod parser;
mod result;
pub mod wire;

pub use concept::{Concept, ConceptDictionary, ConceptError, ConceptLookup};
pub use config::{
    DEFAULT_MAX_CONCEPT_DEPTH, DEFAULT_MAX_EXPANDED_STEPS, LOG_LEVEL_VAR, LogLevel,
    MAX_CONCEPT_DEPTH_VAR, MAX_EXPANDED_STEPS_VAR, ParserConfig,
};
pub use dispatch::{
    FsReader, MemoryReader, ParseBatch, SourceReader, parse_spec_files,
    parse_spec_files_with_config,
};
pub use error::{ConfigError, ParseError};
pub use logging::{init_logging, parser_subscriber, try_init_logging};
pub use model::{
    ArgKind, Comment, Fragment, INLINE_TABLE_NAME, Item, ItemKind, Scenario, Specification, Step,
    StepArg, StepValue, Table, TableError, Tags,
};
pub use parser::{ParseResult, SpecParser, parse_document};
pub use result::{HookFailure, SpecResult, StepExecutionResult, SuiteResult};
