//! `cctree json` command implementation.

use cctree::{Diagnostics, Error, Node};
use serde::Serialize;

use super::SourceArgs;

#[derive(Serialize)]
struct JsonOutput<'a> {
    file: String,
    diagnostics: &'a Diagnostics,
    root: &'a Node,
}

/// Run the json command.
pub fn run(source: &SourceArgs, compact: bool) -> Result<(), Error> {
    let parsed = source.parse()?;

    let output = JsonOutput {
        file: source.file.display().to_string(),
        diagnostics: &parsed.diagnostics,
        root: &parsed.root,
    };

    let rendered = if compact {
        serde_json::to_string(&output)
    } else {
        serde_json::to_string_pretty(&output)
    }
    .map_err(|e| Error::Io(e.into()))?;

    println!("{rendered}");
    Ok(())
}
