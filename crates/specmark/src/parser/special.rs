//! Resolve `<file:..>` and `<table:..>` parameters through a source reader.

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord, Trim};
use specmark_patterns::SpecialKind;
use thiserror::Error;

use crate::dispatch::SourceReader;
use crate::error::ParseError;
use crate::model::{StepArg, Table, TableError};

pub(crate) fn resolve_special(
    kind: SpecialKind,
    reference: &str,
    line: usize,
    reader: Option<&dyn SourceReader>,
) -> Result<StepArg, ParseError> {
    let name = format!("{kind}:{reference}");
    let fail = |reason: String| ParseError::SpecialParameter {
        line,
        reference: name.clone(),
        reason,
    };
    let reader = reader.ok_or_else(|| fail("no resource reader is configured".to_string()))?;
    let contents = reader
        .read_file_contents(Utf8Path::new(reference))
        .map_err(|err| fail(err.to_string()))?;
    match kind {
        SpecialKind::File => Ok(StepArg::SpecialString {
            name,
            value: contents,
        }),
        SpecialKind::Table => {
            let table = parse_csv(&contents).map_err(|err| fail(err.to_string()))?;
            Ok(StepArg::SpecialTable { name, table })
        }
    }
}

/// Failure to turn CSV text into a [`Table`].
#[derive(Debug, Error)]
pub(crate) enum CsvError {
    #[error(transparent)]
    Read(#[from] csv::Error),
    #[error(transparent)]
    Shape(#[from] TableError),
}

/// Parse RFC 4180 text; the first record holds the headers.
///
/// Cells are trimmed and quotes removed. Blank lines are skipped.
pub(crate) fn parse_csv(contents: &str) -> Result<Table, CsvError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents.as_bytes());
    let headers = record_cells(reader.headers()?);
    let rows = reader
        .records()
        .map(|record| record.map(|record| record_cells(&record)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table::from_rows(headers, rows)?)
}

fn record_cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MemoryReader;

    fn reader() -> MemoryReader {
        let mut reader = MemoryReader::default();
        reader.insert("notes.txt", "remember the milk");
        reader.insert("users.csv", "id, name\n1, alice\n\n2, bob\n");
        reader.insert("broken.csv", "id,name\n1\n");
        reader.insert("quoted.csv", "name,bio\nann,\"likes tea, cake\"\n");
        reader.insert("single.csv", "name\n\"ann\"\n");
        reader
    }

    #[test]
    fn loads_file_contents_as_string() {
        let reader = reader();
        let arg = resolve_special(SpecialKind::File, "notes.txt", 2, Some(&reader))
            .unwrap_or_else(|e| panic!("file should resolve: {e}"));
        assert_eq!(
            arg,
            StepArg::SpecialString {
                name: "file:notes.txt".into(),
                value: "remember the milk".into(),
            }
        );
    }

    #[test]
    fn loads_csv_as_table() {
        let reader = reader();
        let arg = resolve_special(SpecialKind::Table, "users.csv", 2, Some(&reader))
            .unwrap_or_else(|e| panic!("table should resolve: {e}"));
        let table = arg.table().unwrap_or_else(|| panic!("expected a table"));
        assert_eq!(table.headers(), ["id", "name"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn quoted_cells_keep_their_commas() {
        let table = parse_csv("name,bio\nann,\"likes tea, cake\"\n")
            .unwrap_or_else(|e| panic!("quoted CSV should parse: {e}"));
        assert_eq!(table.headers(), ["name", "bio"]);
        assert_eq!(table.rows(), [vec!["ann".to_string(), "likes tea, cake".to_string()]]);
    }

    #[test]
    fn quotes_are_stripped_from_cells() {
        let reader = reader();
        let arg = resolve_special(SpecialKind::Table, "single.csv", 2, Some(&reader))
            .unwrap_or_else(|e| panic!("table should resolve: {e}"));
        let table = arg.table().unwrap_or_else(|| panic!("expected a table"));
        assert_eq!(table.rows(), [vec!["ann".to_string()]]);
    }

    #[test]
    fn quoted_table_resolves_with_two_cells() {
        let reader = reader();
        let arg = resolve_special(SpecialKind::Table, "quoted.csv", 2, Some(&reader))
            .unwrap_or_else(|e| panic!("table should resolve: {e}"));
        let table = arg.table().unwrap_or_else(|| panic!("expected a table"));
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.rows().first().and_then(|row| row.get(1)).map(String::as_str),
            Some("likes tea, cake")
        );
    }

    #[test]
    fn uneven_csv_fails() {
        let reader = reader();
        let err = resolve_special(SpecialKind::Table, "broken.csv", 5, Some(&reader))
            .err()
            .unwrap_or_else(|| panic!("uneven CSV should fail"));
        assert_eq!(err.line(), Some(5));
        assert!(err.to_string().contains("table:broken.csv"));
    }

    #[test]
    fn missing_reader_fails() {
        let err = resolve_special(SpecialKind::File, "notes.txt", 1, None)
            .err()
            .unwrap_or_else(|| panic!("resolution without a reader should fail"));
        assert!(err.to_string().contains("no resource reader"));
    }

    #[test]
    fn missing_file_fails() {
        let reader = reader();
        let result = resolve_special(SpecialKind::File, "absent.txt", 1, Some(&reader));
        assert!(matches!(result, Err(ParseError::SpecialParameter { .. })));
    }
}
