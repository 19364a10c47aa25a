//! Tables embedded in specifications and step arguments.

use thiserror::Error;

/// Errors raised while assembling a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TableError {
    /// A row contains more or fewer cells than the header declares.
    #[error("table row {row_number} has {actual} cells but the header declares {expected}")]
    UnevenRow {
        /// 1-based index of the row, counting the header as row 1.
        row_number: usize,
        /// Number of header cells.
        expected: usize,
        /// Number of cells present in the offending row.
        actual: usize,
    },
}

/// An ordered header row plus data rows aligned to it.
///
/// Every row holds exactly one cell per header; [`Table::add_row`] refuses
/// anything else, so the grid is always rectangular.
///
/// # Examples
/// ```
/// use specmark::Table;
/// let mut table = Table::new(vec!["name".into(), "role".into()], 1);
/// table.add_row(vec!["alice".into(), "admin".into()]).unwrap_or_default();
/// assert_eq!(table.row_count(), 1);
/// assert!(table.add_row(vec!["bob".into()]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    line: usize,
}

impl Table {
    /// Create an empty table from its header row and source line.
    #[must_use]
    pub fn new(headers: Vec<String>, line: usize) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            line,
        }
    }

    /// Build a table from a header row and data rows in one go.
    ///
    /// # Errors
    /// Returns [`TableError::UnevenRow`] for the first misaligned row.
    pub fn from_rows<I>(headers: Vec<String>, rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut table = Self::new(headers, 0);
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Append a data row.
    ///
    /// # Errors
    /// Returns [`TableError::UnevenRow`] when the row's cell count differs
    /// from the header count. The table is left unchanged.
    pub fn add_row(&mut self, cells: Vec<String>) -> Result<(), TableError> {
        if cells.len() != self.headers.len() {
            return Err(TableError::UnevenRow {
                row_number: self.rows.len() + 2,
                expected: self.headers.len(),
                actual: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// 1-based source line of the header row, or `0` when built in memory.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Mutable access to a single cell.
    ///
    /// Cells can be rewritten in place but never added or removed, which
    /// keeps rows aligned with the header.
    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut String> {
        self.rows.get_mut(row).and_then(|cells| cells.get_mut(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn accepts_aligned_rows() {
        let table = Table::from_rows(
            strings(&["id", "name"]),
            vec![strings(&["1", "alice"]), strings(&["2", "bob"])],
        )
        .unwrap_or_else(|e| panic!("aligned rows should be accepted: {e}"));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.headers(), strings(&["id", "name"]));
    }

    #[test]
    fn rejects_uneven_row_with_position() {
        let mut table = Table::new(strings(&["id", "name"]), 3);
        table
            .add_row(strings(&["1", "alice"]))
            .unwrap_or_else(|e| panic!("first row should fit: {e}"));
        let err = table
            .add_row(strings(&["2", "bob", "extra"]))
            .err()
            .unwrap_or_else(|| panic!("uneven row should be rejected"));
        assert_eq!(
            err,
            TableError::UnevenRow {
                row_number: 3,
                expected: 2,
                actual: 3,
            }
        );
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn cell_mut_rewrites_in_place() {
        let mut table = Table::from_rows(strings(&["a"]), vec![strings(&["x"])])
            .unwrap_or_else(|e| panic!("table should build: {e}"));
        if let Some(cell) = table.cell_mut(0, 0) {
            "y".clone_into(cell);
        }
        assert_eq!(table.rows(), &[strings(&["y"])]);
        assert!(table.cell_mut(0, 1).is_none());
    }
}
