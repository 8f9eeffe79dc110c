//! Source positions captured from the parsing engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a source file, as presumed by the engine.
///
/// Lines and columns are 1-indexed. Positions the engine cannot resolve
/// (the translation unit cursor, builtin declarations) are captured as
/// `("", 0, 0)`; see [`SourceLocation::is_known`].
///
/// Fields are private so a captured location cannot be altered afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    file: String,
    line: u32,
    column: u32,
}

impl SourceLocation {
    /// Create a location from its parts.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// The location used when the engine reports none.
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Source file, as spelled by the engine (may be empty).
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number (1-indexed, 0 when unknown).
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column number (1-indexed, 0 when unknown).
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns `true` if the engine resolved this location to a real position.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.line > 0 && self.column > 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::simple("main.c", 1, 1, "main.c:1:1")]
    #[case::nested_path("src/lib/util.cpp", 42, 17, "src/lib/util.cpp:42:17")]
    #[case::unknown("", 0, 0, ":0:0")]
    fn display_formats_file_line_column(
        #[case] file: &str,
        #[case] line: u32,
        #[case] column: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(SourceLocation::new(file, line, column).to_string(), expected);
    }

    #[test]
    fn equality_requires_all_fields() {
        let base = SourceLocation::new("a.c", 3, 5);

        assert_eq!(base, SourceLocation::new("a.c", 3, 5));
        assert_ne!(base, SourceLocation::new("b.c", 3, 5));
        assert_ne!(base, SourceLocation::new("a.c", 4, 5));
        assert_ne!(base, SourceLocation::new("a.c", 3, 6));
    }

    #[test]
    fn unknown_location_is_not_known() {
        assert!(!SourceLocation::unknown().is_known());
        assert!(SourceLocation::new("a.c", 1, 1).is_known());
    }
}
