//! `cctree print` command implementation.

use std::io::{self, Write};

use cctree::{Error, walk_with_depth};
use colored::Colorize;

use super::SourceArgs;
use super::display::print_diagnostics_summary;

/// Run the print command.
pub fn run(source: &SourceArgs, long: bool, strict: bool) -> Result<(), Error> {
    let parsed = source.parse()?;
    print_diagnostics_summary(&parsed.diagnostics);

    if strict && let Some(diagnostics) = parsed.error() {
        return Err(Error::Diagnostics(diagnostics.clone()));
    }

    if !long {
        cctree::print_tree(&parsed.root)?;
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut result = Ok(());
    walk_with_depth(&parsed.root, |node, depth| {
        if result.is_err() {
            return;
        }
        result = writeln!(
            out,
            "{}{} {} {}",
            "\t".repeat(depth),
            node.kind().cyan(),
            node.spelling().white().bold(),
            node.location().to_string().dimmed()
        );
    });
    result?;
    out.flush()?;
    Ok(())
}
