//! Classify specification lines by their leading marker.

use std::sync::LazyLock;

use regex::Regex;

static TAGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^tags\s*:(.*)$").unwrap_or_else(|_| unreachable!("tags regex is valid"))
});

static SEPARATOR_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap_or_else(|_| unreachable!()));

static SPEC_UNDERLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=+$").unwrap_or_else(|_| unreachable!()));

static SCENARIO_UNDERLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-+$").unwrap_or_else(|_| unreachable!()));

/// What a single source line contributes to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    SpecHeading(&'a str),
    ScenarioHeading(&'a str),
    Step(&'a str),
    Tags(Vec<String>),
    TableRow(Vec<String>),
    TableSeparator,
    /// `===` beneath a text line.
    SpecUnderline,
    /// `---` beneath a text line.
    ScenarioUnderline,
    Blank,
    Comment(&'a str),
}

pub(crate) fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(rest) = trimmed.strip_prefix("##") {
        return if rest.starts_with('#') {
            LineKind::Comment(line)
        } else {
            LineKind::ScenarioHeading(rest.trim())
        };
    }
    if let Some(rest) = trimmed.strip_prefix('#') {
        return LineKind::SpecHeading(rest.trim());
    }
    if let Some(rest) = trimmed.strip_prefix('*') {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return LineKind::Step(rest.trim());
        }
        return LineKind::Comment(line);
    }
    if trimmed.starts_with('|') {
        let cells = split_cells(trimmed);
        if !cells.is_empty() && cells.iter().all(|cell| SEPARATOR_CELL_RE.is_match(cell)) {
            return LineKind::TableSeparator;
        }
        return LineKind::TableRow(cells);
    }
    if let Some(caps) = TAGS_RE.captures(trimmed) {
        let values = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::Tags(split_tags(values));
    }
    if SPEC_UNDERLINE_RE.is_match(trimmed) {
        return LineKind::SpecUnderline;
    }
    if SCENARIO_UNDERLINE_RE.is_match(trimmed) {
        return LineKind::ScenarioUnderline;
    }
    LineKind::Comment(line)
}

fn split_cells(row: &str) -> Vec<String> {
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn split_tags(values: &str) -> Vec<String> {
    values
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("# Login", LineKind::SpecHeading("Login"))]
    #[case("  #Checkout  ", LineKind::SpecHeading("Checkout"))]
    #[case("## Valid user", LineKind::ScenarioHeading("Valid user"))]
    #[case("### Notes", LineKind::Comment("### Notes"))]
    #[case("* open <page>", LineKind::Step("open <page>"))]
    #[case("*\tclick", LineKind::Step("click"))]
    #[case("*", LineKind::Step(""))]
    #[case("*emphasis*", LineKind::Comment("*emphasis*"))]
    #[case("", LineKind::Blank)]
    #[case("   ", LineKind::Blank)]
    #[case("====", LineKind::SpecUnderline)]
    #[case("---", LineKind::ScenarioUnderline)]
    #[case("|---|:---:|", LineKind::TableSeparator)]
    #[case("just prose", LineKind::Comment("just prose"))]
    fn classifies_lines(#[case] line: &str, #[case] expected: LineKind<'static>) {
        assert_eq!(classify(line), expected);
    }

    #[rstest]
    #[case("tags: smoke, api", &["smoke", "api"])]
    #[case("Tags : one", &["one"])]
    #[case("TAGS:a,,b ,", &["a", "b"])]
    #[case("tags:", &[])]
    fn classifies_tag_lines(#[case] line: &str, #[case] expected: &[&str]) {
        let LineKind::Tags(tags) = classify(line) else {
            panic!("expected tags for {line:?}");
        };
        assert_eq!(tags, expected);
    }

    #[test]
    fn splits_table_cells() {
        assert_eq!(
            classify("| id | name |"),
            LineKind::TableRow(vec!["id".into(), "name".into()])
        );
        assert_eq!(
            classify("|a| |c"),
            LineKind::TableRow(vec!["a".into(), String::new(), "c".into()])
        );
    }

    #[test]
    fn tags_keyword_must_lead_the_line() {
        assert_eq!(
            classify("the tags: are prose"),
            LineKind::Comment("the tags: are prose")
        );
    }
}
