//! `cctree stats` command implementation.

use cctree::Error;
use colored::Colorize;

use super::SourceArgs;
use super::display::print_diagnostics_summary;

/// Run the stats command.
pub fn run(source: &SourceArgs, top: usize) -> Result<(), Error> {
    let parsed = source.parse()?;

    println!("{}", "cctree Tree Statistics".cyan().bold());
    println!();
    println!("  {}: {}", "File".white().bold(), source.file.display());
    println!(
        "  {}: {}",
        "Nodes".white().bold(),
        parsed.stats.nodes.to_string().green()
    );
    if parsed.stats.filtered > 0 {
        println!(
            "    {}: {}",
            "filtered".dimmed(),
            parsed.stats.filtered
        );
    }
    if parsed.stats.null_cursors > 0 {
        println!(
            "    {}: {}",
            "null cursors".dimmed(),
            parsed.stats.null_cursors
        );
    }
    if parsed.stats.collisions > 0 {
        println!(
            "  {}: {} fingerprint collisions (later nodes won; some may be misattached)",
            "Warning".yellow().bold(),
            parsed.stats.collisions.to_string().yellow()
        );
    }
    println!();

    // Sort by count descending, then by kind for deterministic output
    let mut kinds: Vec<_> = parsed.root.kind_histogram().into_iter().collect();
    kinds.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    println!("  {}:", "Kinds".white().bold());
    for (kind, count) in kinds.iter().take(top) {
        println!("    {}: {}", kind.dimmed(), count);
    }
    if kinds.len() > top {
        println!("    ... and {} more kinds", kinds.len() - top);
    }

    if !parsed.diagnostics.is_empty() {
        println!();
        print_diagnostics_summary(&parsed.diagnostics);
    }

    Ok(())
}
