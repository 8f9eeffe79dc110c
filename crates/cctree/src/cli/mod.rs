//! CLI command implementations.

mod display;

pub mod diagnostics;
pub mod json;
pub mod print;
pub mod stats;

use std::path::PathBuf;

use cctree::{BuildOptions, FingerprintStrategy, ParseOptions, ParsedFile};
use clap::{Args, ValueEnum};

/// Fingerprint strategy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FingerprintArg {
    /// Cursor kind plus source location
    Structural,
    /// libclang's cursor hash
    Hash,
}

impl From<FingerprintArg> for FingerprintStrategy {
    fn from(arg: FingerprintArg) -> Self {
        match arg {
            FingerprintArg::Structural => Self::Structural,
            FingerprintArg::Hash => Self::EngineHash,
        }
    }
}

/// Source file, parser arguments and traversal settings shared by every command.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// C or C++ source file to parse
    pub file: PathBuf,

    /// Read extra parser arguments, one per line (`compile_flags.txt` format)
    #[arg(long, value_name = "PATH")]
    pub flags_file: Option<PathBuf>,

    /// How cursors are matched to their parents during traversal
    #[arg(long, value_enum, default_value_t = FingerprintArg::Structural)]
    pub fingerprint: FingerprintArg,

    /// Deepest level to materialize (the translation unit is level 0)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Leave out declarations coming from included files
    #[arg(long)]
    pub main_file_only: bool,

    /// Skip looking up definition locations
    #[arg(long)]
    pub no_definitions: bool,

    /// Arguments passed verbatim to the parser
    #[arg(last = true, value_name = "CLANG_ARGS")]
    pub clang_args: Vec<String>,
}

impl SourceArgs {
    /// Assemble parse options from the command line.
    pub fn options(&self) -> Result<ParseOptions, cctree::Error> {
        let mut build = BuildOptions::default()
            .with_fingerprint(self.fingerprint.into())
            .with_main_file_only(self.main_file_only)
            .with_definitions(!self.no_definitions);
        if let Some(depth) = self.max_depth {
            build = build.with_max_depth(depth);
        }

        let mut options = ParseOptions::new().build_options(build);
        if let Some(flags_file) = &self.flags_file {
            options = options.flags_file(flags_file)?;
        }
        Ok(options.args(self.clang_args.iter().cloned()))
    }

    /// Parse the file with the assembled options.
    pub fn parse(&self) -> Result<ParsedFile, cctree::Error> {
        let options = self.options()?;
        tracing::info!(
            file = %self.file.display(),
            args = options.arguments().len(),
            "Parsing"
        );
        cctree::parse_file_with(&self.file, &options)
    }
}
