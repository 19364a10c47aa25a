//! Line-by-line assembly of a [`Specification`].

use specmark_patterns::Token;

use super::line::{LineKind, classify};
use super::special::resolve_special;
use super::step::build_step;
use crate::concept::Expander;
use crate::dispatch::SourceReader;
use crate::error::ParseError;
use crate::model::{Comment, Item, Scenario, Specification, Step, StepArg, Table, Tags};

/// Where rows of the table under construction end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableTarget {
    /// Argument of the pending step.
    Step,
    /// Data table of the specification.
    Data,
}

#[derive(Debug)]
struct OpenScenario {
    heading: String,
    tags: Option<Tags>,
    items: Vec<Item>,
    line: usize,
}

pub(crate) struct DocumentBuilder<'a> {
    expander: Expander<'a>,
    resources: Option<&'a dyn SourceReader>,
    heading: Option<String>,
    spec_tags: Option<Tags>,
    items: Vec<Item>,
    scenario: Option<OpenScenario>,
    pending_step: Option<Step>,
    table: Option<(Table, TableTarget)>,
    data_headers: Option<Vec<String>>,
    previous_comment: Option<(usize, String)>,
}

impl<'a> DocumentBuilder<'a> {
    pub(crate) fn new(expander: Expander<'a>, resources: Option<&'a dyn SourceReader>) -> Self {
        Self {
            expander,
            resources,
            heading: None,
            spec_tags: None,
            items: Vec::new(),
            scenario: None,
            pending_step: None,
            table: None,
            data_headers: None,
            previous_comment: None,
        }
    }

    /// Consume one source line; `line` is 1-based.
    pub(crate) fn feed(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        let kind = classify(text);
        let previous_comment = self.previous_comment.take();
        match kind {
            LineKind::TableRow(cells) => self.table_row(line, cells),
            LineKind::TableSeparator => {
                if self.table.is_some() {
                    Ok(())
                } else {
                    Err(ParseError::StrayTableRow { line })
                }
            }
            LineKind::Blank => self.close_table(),
            other => {
                self.close_table()?;
                self.finish_step()?;
                self.structural(line, text, other, previous_comment)
            }
        }
    }

    /// Close every open construct and produce the specification.
    pub(crate) fn finish(mut self) -> Result<Specification, ParseError> {
        self.close_table()?;
        self.finish_step()?;
        self.close_scenario();
        Ok(Specification::new(
            self.heading.unwrap_or_default(),
            self.items,
            self.spec_tags,
        ))
    }

    fn structural(
        &mut self,
        line: usize,
        raw: &str,
        kind: LineKind<'_>,
        previous_comment: Option<(usize, String)>,
    ) -> Result<(), ParseError> {
        match kind {
            LineKind::SpecHeading(text) => self.spec_heading(line, text),
            LineKind::ScenarioHeading(text) => self.scenario_heading(line, text),
            LineKind::Step(text) => self.step(line, text),
            LineKind::Tags(values) => self.tags(line, values),
            LineKind::SpecUnderline => self.underline(line, raw, previous_comment, true),
            LineKind::ScenarioUnderline => self.underline(line, raw, previous_comment, false),
            LineKind::Comment(text) => {
                self.comment(line, text);
                self.previous_comment = Some((line, text.to_string()));
                Ok(())
            }
            LineKind::TableRow(_) | LineKind::TableSeparator | LineKind::Blank => Ok(()),
        }
    }

    /// Turn the comment just above a `===` or `---` line into a heading.
    fn underline(
        &mut self,
        line: usize,
        raw: &str,
        previous_comment: Option<(usize, String)>,
        spec_level: bool,
    ) -> Result<(), ParseError> {
        let Some((heading_line, heading)) = previous_comment else {
            self.comment(line, raw);
            return Ok(());
        };
        self.container().pop();
        if spec_level {
            self.spec_heading(heading_line, heading.trim())
        } else {
            self.scenario_heading(heading_line, heading.trim())
        }
    }

    fn spec_heading(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        if self.heading.is_some() {
            return Err(ParseError::DuplicateHeading { line });
        }
        self.heading = Some(text.to_string());
        Ok(())
    }

    fn scenario_heading(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        self.require_heading(line, "scenario heading")?;
        self.close_scenario();
        self.scenario = Some(OpenScenario {
            heading: text.to_string(),
            tags: None,
            items: Vec::new(),
            line,
        });
        Ok(())
    }

    fn step(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        self.require_heading(line, "step")?;
        let resources = self.resources;
        let data_headers = self.data_headers.as_deref();
        let step = build_step(text, line, |token| match token {
            Token::Static { value, .. } | Token::Text(value) => Ok(StepArg::Static {
                value: value.clone(),
            }),
            Token::Dynamic { name, .. } => Ok(dynamic_arg(name, line, data_headers)),
            Token::Special {
                kind, reference, ..
            } => resolve_special(*kind, reference, line, resources),
        })?;
        self.pending_step = Some(step);
        Ok(())
    }

    fn tags(&mut self, line: usize, values: Vec<String>) -> Result<(), ParseError> {
        self.require_heading(line, "tags")?;
        let target = match self.scenario.as_mut() {
            Some(scenario) => &mut scenario.tags,
            None => &mut self.spec_tags,
        };
        target
            .get_or_insert_with(Tags::default)
            .extend(values.iter().cloned());
        self.container().push(Item::Tags(Tags::new(values)));
        Ok(())
    }

    fn comment(&mut self, line: usize, text: &str) {
        self.container().push(Item::Comment(Comment {
            text: text.to_string(),
            line,
        }));
    }

    fn table_row(&mut self, line: usize, cells: Vec<String>) -> Result<(), ParseError> {
        if let Some((table, _)) = self.table.as_mut() {
            return table
                .add_row(cells)
                .map_err(|source| ParseError::Table { line, source });
        }
        let target = if self.pending_step.is_some() {
            TableTarget::Step
        } else if self.scenario.is_none() && self.heading.is_some() {
            TableTarget::Data
        } else {
            return Err(ParseError::StrayTableRow { line });
        };
        self.table = Some((Table::new(cells, line), target));
        Ok(())
    }

    fn close_table(&mut self) -> Result<(), ParseError> {
        match self.table.take() {
            Some((table, TableTarget::Step)) => {
                self.pending_step = self
                    .pending_step
                    .take()
                    .map(|step| step.with_inline_table(table));
                self.finish_step()
            }
            Some((table, TableTarget::Data)) => {
                if self.data_headers.is_none() {
                    self.data_headers = Some(table.headers().to_vec());
                }
                self.items.push(Item::Table(table));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn finish_step(&mut self) -> Result<(), ParseError> {
        let Some(step) = self.pending_step.take() else {
            return Ok(());
        };
        let step = self.expander.expand(step)?;
        self.container().push(Item::Step(step));
        Ok(())
    }

    fn close_scenario(&mut self) {
        if let Some(open) = self.scenario.take() {
            self.items.push(Item::Scenario(Scenario::new(
                open.heading,
                open.tags,
                open.items,
                open.line,
            )));
        }
    }

    fn require_heading(&self, line: usize, element: &'static str) -> Result<(), ParseError> {
        if self.heading.is_some() {
            Ok(())
        } else {
            Err(ParseError::MissingHeading { line, element })
        }
    }

    fn container(&mut self) -> &mut Vec<Item> {
        match self.scenario.as_mut() {
            Some(scenario) => &mut scenario.items,
            None => &mut self.items,
        }
    }
}

/// Keep a `<name>` parameter dynamic only when the data table declares it.
fn dynamic_arg(name: &str, line: usize, data_headers: Option<&[String]>) -> StepArg {
    if data_headers.is_some_and(|headers| headers.iter().any(|header| header == name)) {
        return StepArg::Dynamic {
            name: name.to_string(),
        };
    }
    tracing::warn!(
        line,
        parameter = name,
        "dynamic parameter is not a data table column; treating it as static"
    );
    StepArg::Static {
        value: format!("<{name}>"),
    }
}
