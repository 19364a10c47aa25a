//! Concepts: reusable step sequences invoked like a single step.
//!
//! The parser only sees concepts through [`ConceptLookup`], keyed by the
//! normalised step value. [`ConceptDictionary`] is a plain in-memory
//! implementation built from step text.

use hashbrown::HashMap;
use specmark_patterns::{StepSyntaxError, Token, lex_step, normalise};
use thiserror::Error;

use crate::error::ParseError;
use crate::model::{Step, StepArg};
use crate::parser::step::{build_step, plain_arg};

mod expand;

pub(crate) use expand::Expander;

/// Read-only access to concept definitions.
///
/// Implementations are shared across parser threads, so lookups must be
/// safe to call concurrently.
pub trait ConceptLookup: Send + Sync {
    /// Return the concept whose normalised heading equals `value`.
    fn lookup(&self, value: &str) -> Option<&Concept>;
}

/// Errors raised while defining a concept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConceptError {
    /// The heading text could not be lexed.
    #[error("invalid concept heading `{heading}`: {source}")]
    Heading {
        /// Heading as supplied.
        heading: String,
        /// Lexer diagnostic.
        #[source]
        source: StepSyntaxError,
    },
    /// A body step could not be built.
    #[error("invalid step in concept `{concept}`: {source}")]
    Step {
        /// Normalised concept value.
        concept: String,
        /// Underlying step failure.
        #[source]
        source: ParseError,
    },
    /// The heading declares a parameter that is not `<name>`.
    #[error("concept `{concept}` declares non-dynamic parameter `{parameter}`")]
    NonDynamicParameter {
        /// Normalised concept value.
        concept: String,
        /// Offending parameter as written.
        parameter: String,
    },
    /// A body step refers to a file or CSV resource.
    #[error("concept `{concept}` uses special parameter `{reference}`")]
    SpecialParameter {
        /// Normalised concept value.
        concept: String,
        /// Offending parameter as written.
        reference: String,
    },
    /// A concept with the same normalised heading already exists.
    #[error("concept `{concept}` is already defined")]
    Duplicate {
        /// Normalised concept value.
        concept: String,
    },
}

/// A concept definition: its heading step plus its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    step: Step,
    steps: Vec<Step>,
    parameter_names: Vec<String>,
}

impl Concept {
    /// The heading, parsed as a step.
    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Body steps in declaration order, unexpanded.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Declared parameter names in heading order.
    #[must_use]
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Normalised value the concept is keyed by.
    #[must_use]
    pub fn value(&self) -> &str {
        self.step.value()
    }
}

/// In-memory concept store keyed by normalised heading.
///
/// # Examples
/// ```
/// use specmark::{ConceptDictionary, ConceptLookup};
/// let mut concepts = ConceptDictionary::default();
/// concepts
///     .define("log in as <user>", &["open the login page", "enter <user>"])
///     .unwrap_or_else(|e| panic!("{e}"));
/// let concept = concepts.lookup("log in as {}").map(|c| c.steps().len());
/// assert_eq!(concept, Some(2));
/// assert_eq!(concepts.len(), 1);
/// assert!(!concepts.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConceptDictionary {
    concepts: HashMap<String, Concept>,
}

impl ConceptDictionary {
    /// Define a concept from its heading and body step texts.
    ///
    /// Body lines may keep their leading `*` marker. Every heading parameter
    /// must be dynamic; body steps may use static and dynamic parameters.
    ///
    /// # Errors
    /// Returns [`ConceptError`] when the heading or a body step is malformed,
    /// a parameter kind is not allowed, or the heading is already defined.
    pub fn define(&mut self, heading: &str, body: &[&str]) -> Result<(), ConceptError> {
        let heading = heading.trim().trim_start_matches('#').trim();
        let tokens = lex_step(heading).map_err(|source| ConceptError::Heading {
            heading: heading.to_string(),
            source,
        })?;
        let value = normalise(&tokens);
        if self.concepts.contains_key(&value) {
            return Err(ConceptError::Duplicate { concept: value });
        }

        let mut parameter_names = Vec::new();
        for token in tokens.iter().filter(|token| token.is_parameter()) {
            match token {
                Token::Dynamic { name, .. } => parameter_names.push(name.clone()),
                other => {
                    return Err(ConceptError::NonDynamicParameter {
                        concept: value,
                        parameter: other.display_name(),
                    });
                }
            }
        }

        let step = concept_step(&value, heading, 0)?;
        let steps = body
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let text = line.trim().trim_start_matches('*');
                concept_step(&value, text, idx + 1)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let body_len = steps.len();
        self.concepts.insert(
            value.clone(),
            Concept {
                step,
                steps,
                parameter_names,
            },
        );
        tracing::debug!(
            concept = %value,
            steps = body_len,
            defined = self.len(),
            "defined concept"
        );
        Ok(())
    }

    /// Number of defined concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Whether no concepts are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

impl ConceptLookup for ConceptDictionary {
    fn lookup(&self, value: &str) -> Option<&Concept> {
        self.concepts.get(value)
    }
}

fn concept_step(concept: &str, text: &str, line: usize) -> Result<Step, ConceptError> {
    let mut special = None;
    let step = build_step(text, line, |token| {
        plain_arg(token).ok_or_else(|| {
            special = Some(token.display_name());
            ParseError::SpecialParameter {
                line,
                reference: token.display_name(),
                reason: "special parameters are not allowed in concepts".to_string(),
            }
        })
    });
    match (step, special) {
        (Ok(step), _) => Ok(step),
        (Err(_), Some(reference)) => Err(ConceptError::SpecialParameter {
            concept: concept.to_string(),
            reference,
        }),
        (Err(source), None) => Err(ConceptError::Step {
            concept: concept.to_string(),
            source,
        }),
    }
}

/// Collect the caller's arguments under the concept's parameter names.
pub(crate) fn bind_arguments(concept: &Concept, args: &[StepArg]) -> HashMap<String, StepArg> {
    concept
        .parameter_names
        .iter()
        .cloned()
        .zip(args.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(defs: &[(&str, &[&str])]) -> ConceptDictionary {
        let mut concepts = ConceptDictionary::default();
        for (heading, body) in defs {
            concepts
                .define(heading, body)
                .unwrap_or_else(|e| panic!("concept should define: {e}"));
        }
        concepts
    }

    #[test]
    fn keys_concepts_by_normalised_heading() {
        let concepts = dictionary(&[(
            "# log in as <user>",
            &["* visit \"/login\"", "* type <user>"],
        )]);
        let concept = concepts
            .lookup("log in as {}")
            .unwrap_or_else(|| panic!("concept should be found"));
        assert_eq!(concept.parameter_names(), ["user"]);
        assert_eq!(concept.steps().len(), 2);
        assert_eq!(concept.steps().first().map(Step::value), Some("visit {}"));
    }

    #[test]
    fn rejects_duplicate_headings() {
        let mut concepts = dictionary(&[("log in as <user>", &["visit home"])]);
        let err = concepts
            .define("log in as <someone>", &["visit home"])
            .err()
            .unwrap_or_else(|| panic!("duplicate should be rejected"));
        assert_eq!(
            err,
            ConceptError::Duplicate {
                concept: "log in as {}".into()
            }
        );
    }

    #[test]
    fn rejects_static_heading_parameters() {
        let mut concepts = ConceptDictionary::default();
        let err = concepts
            .define("log in as \"admin\"", &["visit home"])
            .err()
            .unwrap_or_else(|| panic!("static heading parameter should be rejected"));
        assert!(matches!(err, ConceptError::NonDynamicParameter { .. }));
    }

    #[test]
    fn rejects_special_body_parameters() {
        let mut concepts = ConceptDictionary::default();
        let err = concepts
            .define("seed data", &["load <table:users.csv>"])
            .err()
            .unwrap_or_else(|| panic!("special parameter should be rejected"));
        assert_eq!(
            err,
            ConceptError::SpecialParameter {
                concept: "seed data".into(),
                reference: "table:users.csv".into(),
            }
        );
    }

    #[test]
    fn binds_arguments_positionally_by_name() {
        let concepts = dictionary(&[("copy <from> to <to>", &["read <from>", "write <to>"])]);
        let concept = concepts
            .lookup("copy {} to {}")
            .unwrap_or_else(|| panic!("concept should be found"));
        let args = [
            StepArg::Static { value: "a".into() },
            StepArg::Static { value: "b".into() },
        ];
        let bindings = bind_arguments(concept, &args);
        assert_eq!(bindings.get("from"), args.first());
        assert_eq!(bindings.get("to"), args.get(1));
    }
}
