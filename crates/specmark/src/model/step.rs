//! Steps, their fragments and their arguments.

use std::borrow::Cow;

use hashbrown::HashMap;
use specmark_patterns::{PARAMETER_MARKER, Segment, parameterise};

use super::Table;
use crate::error::ParseError;

/// Name given to a table attached directly beneath a step.
pub const INLINE_TABLE_NAME: &str = "table";

/// Discriminator for [`StepArg`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// A literal quoted value.
    Static,
    /// A value bound from a data table column or concept parameter.
    Dynamic,
    /// A table written beneath the step.
    Table,
    /// The text of a `<file:..>` reference.
    SpecialString,
    /// The rows of a `<table:..>` reference.
    SpecialTable,
}

/// An argument supplied to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArg {
    /// A quoted literal such as `"alice"`.
    Static {
        /// Literal value.
        value: String,
    },
    /// A named placeholder such as `<user>`.
    Dynamic {
        /// Placeholder name, which doubles as its value until bound.
        name: String,
    },
    /// A table attached beneath the step.
    Table {
        /// Argument name.
        name: String,
        /// Table contents.
        table: Table,
    },
    /// A `<file:path>` reference resolved to the file's text.
    SpecialString {
        /// Reference as written, e.g. `file:notes.txt`.
        name: String,
        /// Loaded file contents.
        value: String,
    },
    /// A `<table:path>` reference resolved to a CSV table.
    SpecialTable {
        /// Reference as written, e.g. `table:users.csv`.
        name: String,
        /// Loaded table.
        table: Table,
    },
}

impl StepArg {
    /// Variant discriminator.
    #[must_use]
    pub fn kind(&self) -> ArgKind {
        match self {
            Self::Static { .. } => ArgKind::Static,
            Self::Dynamic { .. } => ArgKind::Dynamic,
            Self::Table { .. } => ArgKind::Table,
            Self::SpecialString { .. } => ArgKind::SpecialString,
            Self::SpecialTable { .. } => ArgKind::SpecialTable,
        }
    }

    /// Argument name; empty for static literals.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Static { .. } => "",
            Self::Dynamic { name }
            | Self::Table { name, .. }
            | Self::SpecialString { name, .. }
            | Self::SpecialTable { name, .. } => name,
        }
    }

    /// Scalar value for static, dynamic and file arguments.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Static { value } | Self::SpecialString { value, .. } => Some(value),
            Self::Dynamic { name } => Some(name),
            Self::Table { .. } | Self::SpecialTable { .. } => None,
        }
    }

    /// Embedded table for table arguments.
    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        match self {
            Self::Table { table, .. } | Self::SpecialTable { table, .. } => Some(table),
            Self::Static { .. } | Self::Dynamic { .. } | Self::SpecialString { .. } => None,
        }
    }

    /// Label used inside `<..>` when rendering the parameterised step value.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Static { value } => value,
            other => other.name(),
        }
    }
}

/// A left-to-right segment of a step's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Literal text between parameters.
    Text(String),
    /// A parameter position.
    Parameter(StepArg),
}

/// Keyed forms of a step used for implementation lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepValue {
    /// Normalised text with `{}` markers.
    pub value: String,
    /// Text with each parameter rendered as `<label>`.
    pub parameterized_value: String,
    /// Parameter labels in order.
    pub parameters: Vec<String>,
}

/// A single executable line of a specification.
///
/// A step that matches a concept carries its expanded body, which it owns
/// outright; [`Step::concept_steps`] exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    line_text: String,
    value: String,
    fragments: Vec<Fragment>,
    args: Vec<StepArg>,
    line: usize,
    concept: Option<Vec<Step>>,
}

impl Step {
    /// Create a step, checking that parameter fragments mirror `args`.
    ///
    /// # Errors
    /// Returns [`ParseError::ArgumentMismatch`] when the parameter fragments
    /// and the arguments differ in count or order.
    pub fn new(
        line_text: impl Into<String>,
        value: impl Into<String>,
        fragments: Vec<Fragment>,
        args: Vec<StepArg>,
        line: usize,
    ) -> Result<Self, ParseError> {
        let parameters: Vec<&StepArg> = fragments
            .iter()
            .filter_map(|fragment| match fragment {
                Fragment::Parameter(arg) => Some(arg),
                Fragment::Text(_) => None,
            })
            .collect();
        if parameters.len() != args.len() || !parameters.iter().zip(&args).all(|(a, b)| *a == b) {
            return Err(ParseError::ArgumentMismatch {
                line,
                fragments: parameters.len(),
                args: args.len(),
            });
        }
        Ok(Self {
            line_text: line_text.into(),
            value: value.into(),
            fragments,
            args,
            line,
            concept: None,
        })
    }

    /// Raw source text of the step, without the `*` marker.
    #[must_use]
    pub fn line_text(&self) -> &str {
        &self.line_text
    }

    /// Normalised value with `{}` in place of each parameter.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Fragments in source order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Arguments in source order.
    #[must_use]
    pub fn args(&self) -> &[StepArg] {
        &self.args
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether the step invokes a concept.
    #[must_use]
    pub fn is_concept(&self) -> bool {
        self.concept.is_some()
    }

    /// Expanded body of a concept step; empty for plain steps.
    #[must_use]
    pub fn concept_steps(&self) -> &[Step] {
        self.concept.as_deref().unwrap_or_default()
    }

    /// Attach a table written beneath the step as a trailing argument.
    #[must_use]
    pub fn with_inline_table(mut self, table: Table) -> Self {
        let arg = StepArg::Table {
            name: INLINE_TABLE_NAME.to_string(),
            table,
        };
        self.value = format!("{} {PARAMETER_MARKER}", self.value);
        self.fragments.push(Fragment::Text(" ".to_string()));
        self.fragments.push(Fragment::Parameter(arg.clone()));
        self.args.push(arg);
        self
    }

    /// Mark the step as a concept invocation owning `steps`.
    #[must_use]
    pub fn into_concept(mut self, steps: Vec<Step>) -> Self {
        self.concept = Some(steps);
        self
    }

    /// Replace dynamic arguments named in `bindings` with the bound values.
    ///
    /// Fragments are rewritten alongside the arguments so the two stay in
    /// step. Dynamic arguments without a binding are left untouched.
    #[must_use]
    pub fn substitute(&self, bindings: &HashMap<String, StepArg>) -> Self {
        let bind = |arg: &StepArg| match arg {
            StepArg::Dynamic { name } => bindings.get(name).cloned().unwrap_or_else(|| arg.clone()),
            other => other.clone(),
        };
        Self {
            line_text: self.line_text.clone(),
            value: self.value.clone(),
            fragments: self
                .fragments
                .iter()
                .map(|fragment| match fragment {
                    Fragment::Parameter(arg) => Fragment::Parameter(bind(arg)),
                    Fragment::Text(text) => Fragment::Text(text.clone()),
                })
                .collect(),
            args: self.args.iter().map(bind).collect(),
            line: self.line,
            concept: None,
        }
    }

    /// Keyed forms of the step.
    ///
    /// # Examples
    /// ```
    /// use specmark::{ConceptDictionary, parse_document};
    /// let text = "# S\n| role |\n| admin |\n## A\n* greet \"bob\" as <role>\n";
    /// let (spec, _) = parse_document(text, &ConceptDictionary::default());
    /// let spec = spec.unwrap_or_default();
    /// let step = spec.scenarios().next().and_then(|s| s.steps().next()).cloned();
    /// let value = step.map(|s| s.step_value()).map(|v| v.parameterized_value);
    /// assert_eq!(value.as_deref(), Some("greet <bob> as <role>"));
    /// ```
    #[must_use]
    pub fn step_value(&self) -> StepValue {
        let segments = self.fragments.iter().map(|fragment| match fragment {
            Fragment::Text(text) => Segment::Text(text),
            Fragment::Parameter(arg) => Segment::Parameter(Cow::Borrowed(arg.label())),
        });
        StepValue {
            value: self.value.clone(),
            parameterized_value: parameterise(segments),
            parameters: self.args.iter().map(|arg| arg.label().to_string()).collect(),
        }
    }
}
