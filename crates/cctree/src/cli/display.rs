//! Common display utilities for CLI commands.

use cctree::{Diagnostics, Severity};
use colored::{ColoredString, Colorize};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Colour a severity label the way compilers usually do.
pub fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Fatal | Severity::Error => severity.as_str().red().bold(),
        Severity::Warning => severity.as_str().yellow().bold(),
        Severity::Note => severity.as_str().cyan(),
        Severity::Ignored => severity.as_str().dimmed(),
    }
}

/// Print a short diagnostics summary to stderr.
///
/// Shows up to `MAX_DISPLAY_ITEMS` diagnostics; more are summarized as
/// "... and N more".
pub fn print_diagnostics_summary(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }

    eprintln!("{} ({}):", "Diagnostics".yellow().bold(), diagnostics.len());
    for diagnostic in diagnostics.iter().take(MAX_DISPLAY_ITEMS) {
        eprintln!(
            "  {} {}: {}",
            "•".dimmed(),
            severity_label(diagnostic.severity),
            diagnostic.message
        );
    }
    if diagnostics.len() > MAX_DISPLAY_ITEMS {
        eprintln!(
            "  {} ... and {} more",
            "•".dimmed(),
            diagnostics.len() - MAX_DISPLAY_ITEMS
        );
    }
}
