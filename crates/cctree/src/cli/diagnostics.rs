//! `cctree diagnostics` command implementation.

use cctree::{Error, Severity};
use colored::Colorize;

use super::SourceArgs;
use super::display::severity_label;

/// Run the diagnostics command.
pub fn run(source: &SourceArgs) -> Result<(), Error> {
    let parsed = source.parse()?;

    if parsed.diagnostics.is_empty() {
        println!(
            "{} {}",
            "No diagnostics for".green(),
            source.file.display()
        );
        return Ok(());
    }

    for diagnostic in &parsed.diagnostics {
        println!(
            "{}: {}",
            severity_label(diagnostic.severity),
            diagnostic.message
        );
    }

    println!();
    println!(
        "{} {} errors, {} warnings, {} notes",
        "Total:".white().bold(),
        parsed.diagnostics.count(Severity::Error) + parsed.diagnostics.count(Severity::Fatal),
        parsed.diagnostics.count(Severity::Warning),
        parsed.diagnostics.count(Severity::Note)
    );
    Ok(())
}
