//! Syntax tree produced by the specification parser.
//!
//! The tree is built once per document and handed off read-only: every type
//! exposes accessors rather than public fields so nothing downstream can
//! break the invariants the parser established.

use camino::{Utf8Path, Utf8PathBuf};

mod step;
mod table;

pub use step::{ArgKind, Fragment, INLINE_TABLE_NAME, Step, StepArg, StepValue};
pub use table::{Table, TableError};

/// Ordered tag list; insertion order is preserved for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Wrap an ordered list of tags.
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Append tags, keeping their order.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, values: I) {
        self.0.extend(values);
    }

    /// Tags in insertion order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Whether no tags were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A free-text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Line text as written.
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

/// Discriminator for [`Item`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A scenario block.
    Scenario,
    /// A step.
    Step,
    /// A comment line.
    Comment,
    /// A table.
    Table,
    /// A tag declaration.
    Tags,
}

/// One entry in a specification or scenario body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A scenario block.
    Scenario(Scenario),
    /// A step.
    Step(Step),
    /// A comment line.
    Comment(Comment),
    /// A table.
    Table(Table),
    /// A tag declaration.
    Tags(Tags),
}

impl Item {
    /// Variant discriminator.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Scenario(_) => ItemKind::Scenario,
            Self::Step(_) => ItemKind::Step,
            Self::Comment(_) => ItemKind::Comment,
            Self::Table(_) => ItemKind::Table,
            Self::Tags(_) => ItemKind::Tags,
        }
    }
}

/// A named block of steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scenario {
    heading: String,
    tags: Option<Tags>,
    items: Vec<Item>,
    line: usize,
}

impl Scenario {
    /// Create a scenario from its parts.
    #[must_use]
    pub fn new(
        heading: impl Into<String>,
        tags: Option<Tags>,
        items: Vec<Item>,
        line: usize,
    ) -> Self {
        Self {
            heading: heading.into(),
            tags,
            items,
            line,
        }
    }

    /// Heading text without the marker.
    #[must_use]
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Declared tags, if any tag line appeared in the body.
    #[must_use]
    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }

    /// Body items in source order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Steps of the body, skipping other items.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.items.iter().filter_map(|item| match item {
            Item::Step(step) => Some(step),
            _ => None,
        })
    }

    /// 1-based line of the heading.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

/// One parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Specification {
    heading: String,
    items: Vec<Item>,
    tags: Option<Tags>,
    file_name: Utf8PathBuf,
}

impl Specification {
    /// Create a specification that is not yet bound to a file.
    #[must_use]
    pub fn new(heading: impl Into<String>, items: Vec<Item>, tags: Option<Tags>) -> Self {
        Self {
            heading: heading.into(),
            items,
            tags,
            file_name: Utf8PathBuf::new(),
        }
    }

    /// Stamp the specification with the file it was read from.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<Utf8PathBuf>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Heading text; empty when the document declared none.
    #[must_use]
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Top-level items in source order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Tags declared before the first scenario.
    #[must_use]
    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }

    /// Originating file identifier.
    #[must_use]
    pub fn file_name(&self) -> &Utf8Path {
        &self.file_name
    }

    /// Scenarios in source order.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.items.iter().filter_map(|item| match item {
            Item::Scenario(scenario) => Some(scenario),
            _ => None,
        })
    }

    /// The data table driving the specification, if one was declared.
    #[must_use]
    pub fn data_table(&self) -> Option<&Table> {
        self.items.iter().find_map(|item| match item {
            Item::Table(table) => Some(table),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_reports_its_kind() {
        let items = [
            Item::Scenario(Scenario::default()),
            Item::Comment(Comment {
                text: "note".into(),
                line: 1,
            }),
            Item::Table(Table::default()),
            Item::Tags(Tags::default()),
        ];
        let kinds: Vec<ItemKind> = items.iter().map(Item::kind).collect();
        assert_eq!(
            kinds,
            vec![ItemKind::Scenario, ItemKind::Comment, ItemKind::Table, ItemKind::Tags]
        );
    }

    #[test]
    fn tags_keep_insertion_order() {
        let mut tags = Tags::new(vec!["smoke".into()]);
        tags.extend(["api".to_string(), "fast".to_string()]);
        assert_eq!(tags.values(), ["smoke", "api", "fast"]);
    }

    #[test]
    fn data_table_finds_first_table_item() {
        let table = Table::new(vec!["user".into()], 2);
        let spec = Specification::new(
            "Login",
            vec![
                Item::Comment(Comment {
                    text: "intro".into(),
                    line: 1,
                }),
                Item::Table(table.clone()),
            ],
            None,
        )
        .with_file_name("specs/login.spec");
        assert_eq!(spec.data_table(), Some(&table));
        assert_eq!(spec.file_name().as_str(), "specs/login.spec");
    }
}
