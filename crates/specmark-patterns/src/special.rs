//! Special parameter prefixes recognised inside angle brackets.

use std::fmt;

/// Kind of resource a special parameter refers to.
///
/// Special parameters are written as `<prefix:reference>`; the prefix selects
/// how the referenced resource is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    /// `<file:path>`: the file's text becomes a string argument.
    File,
    /// `<table:path>`: a CSV file becomes a table argument.
    Table,
}

impl SpecialKind {
    /// Translate a parameter prefix into a special kind.
    ///
    /// Prefixes are matched exactly; anything else is an ordinary dynamic
    /// parameter whose name happens to contain a colon.
    ///
    /// # Examples
    /// ```
    /// use specmark_patterns::SpecialKind;
    /// assert_eq!(SpecialKind::from_prefix("file"), Some(SpecialKind::File));
    /// assert_eq!(SpecialKind::from_prefix("table"), Some(SpecialKind::Table));
    /// assert_eq!(SpecialKind::from_prefix("user"), None);
    /// ```
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "file" => Some(Self::File),
            "table" => Some(Self::Table),
            _ => None,
        }
    }

    /// Return the prefix as written in step text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_round_trip_through_display() {
        for kind in [SpecialKind::File, SpecialKind::Table] {
            assert_eq!(SpecialKind::from_prefix(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn prefix_matching_is_case_sensitive() {
        assert_eq!(SpecialKind::from_prefix("File"), None);
        assert_eq!(SpecialKind::from_prefix("TABLE"), None);
    }
}
