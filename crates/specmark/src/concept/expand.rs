//! Recursive concept expansion with cycle, depth and size guards.

use super::{ConceptLookup, bind_arguments};
use crate::config::DEFAULT_MAX_EXPANDED_STEPS;
use crate::error::ParseError;
use crate::model::Step;

/// Expands steps that invoke concepts into owned nested step trees.
pub(crate) struct Expander<'a> {
    concepts: &'a dyn ConceptLookup,
    max_depth: usize,
    max_steps: usize,
    chain: Vec<String>,
    produced: usize,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(concepts: &'a dyn ConceptLookup, max_depth: usize) -> Self {
        Self {
            concepts,
            max_depth,
            max_steps: DEFAULT_MAX_EXPANDED_STEPS,
            chain: Vec::new(),
            produced: 0,
        }
    }

    /// Bound the nested steps one top-level step may expand into.
    pub(crate) fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Expand `step` if its value names a concept; return it unchanged
    /// otherwise.
    pub(crate) fn expand(&mut self, step: Step) -> Result<Step, ParseError> {
        let origin = step.line();
        self.produced = 0;
        self.expand_from(step, origin)
    }

    fn charge(&mut self, origin: usize, concept: &str) -> Result<(), ParseError> {
        self.produced += 1;
        if self.produced > self.max_steps {
            return Err(ParseError::ConceptSize {
                line: origin,
                concept: concept.to_string(),
                limit: self.max_steps,
            });
        }
        Ok(())
    }

    fn expand_from(&mut self, step: Step, origin: usize) -> Result<Step, ParseError> {
        let concepts = self.concepts;
        let Some(concept) = concepts.lookup(step.value()) else {
            return Ok(step);
        };
        let value = concept.value().to_string();

        if self.chain.contains(&value) {
            let mut chain = self.chain.clone();
            chain.push(value);
            return Err(ParseError::ConceptCycle {
                line: origin,
                chain: chain.join(" -> "),
            });
        }
        if self.chain.len() >= self.max_depth {
            return Err(ParseError::ConceptDepth {
                line: origin,
                concept: value,
                limit: self.max_depth,
            });
        }
        if concept.parameter_names().len() != step.args().len() {
            return Err(ParseError::ConceptArity {
                line: origin,
                concept: value,
                expected: concept.parameter_names().len(),
                actual: step.args().len(),
            });
        }

        let bindings = bind_arguments(concept, step.args());
        tracing::debug!(
            concept = %value,
            depth = self.chain.len() + 1,
            steps = concept.steps().len(),
            "expanding concept"
        );
        self.chain.push(value);
        let nested = concept
            .steps()
            .iter()
            .map(|body| {
                self.charge(origin, concept.value())?;
                self.expand_from(body.substitute(&bindings), origin)
            })
            .collect::<Result<Vec<_>, _>>();
        self.chain.pop();
        Ok(step.into_concept(nested?))
    }
}
