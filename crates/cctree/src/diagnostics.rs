//! Collection of engine diagnostics into one aggregate error.
//!
//! Diagnostics never stop a build. The collector reads the engine's finished
//! list once, before traversal, and hands it back next to the tree so the
//! caller can decide whether a missing header or a stray syntax error should
//! be fatal for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::engine::Session;

/// Severity the engine assigned to a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suppressed by the engine's configuration
    Ignored,
    /// Supplementary information attached to another diagnostic
    Note,
    /// Suspicious but valid code
    Warning,
    /// Invalid code; the tree may be partial
    Error,
    /// The engine gave up on the translation unit
    Fatal,
}

impl Severity {
    /// Returns `true` for `Error` and `Fatal`.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }

    /// Lowercase name, as printed by the CLI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message produced by the engine while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity assigned by the engine
    pub severity: Severity,
    /// Message text, formatted by the engine
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every diagnostic of one parse, in the order the engine reported them.
///
/// An empty aggregate means the parse was clean. A non-empty one is a
/// non-fatal error: it implements [`std::error::Error`] so callers can
/// propagate it, but it is always returned alongside a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic, keeping report order.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Number of diagnostics, regardless of severity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the parse produced no diagnostics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the diagnostics in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Iterate over the message texts in report order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|d| d.message.as_str())
    }

    /// Returns `true` if at least one diagnostic is an error or fatal.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity.is_error())
    }

    /// Count the diagnostics of one severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|d| d.severity == severity).count()
    }

    /// Convert into an error value: `None` when empty.
    #[must_use]
    pub fn into_error(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.items.len() {
            0 => return f.write_str("no diagnostics"),
            1 => write!(f, "1 error occurred:")?,
            n => write!(f, "{n} errors occurred:")?,
        }
        for diagnostic in &self.items {
            write!(f, "\n\t* {diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Drain the session's finished diagnostic list into one aggregate.
#[must_use]
pub fn collect<S: Session>(session: &S) -> Diagnostics {
    let diagnostics: Diagnostics = session.diagnostics().into_iter().collect();

    if !diagnostics.is_empty() {
        warn!(
            count = diagnostics.len(),
            errors = diagnostics.has_errors(),
            "Engine reported diagnostics; tree may be partial"
        );
        for diagnostic in &diagnostics {
            debug!(severity = %diagnostic.severity, message = %diagnostic.message, "Diagnostic");
        }
    }

    diagnostics
}
