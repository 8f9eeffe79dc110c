//! # cctree: Owned Syntax Trees for C and C++
//!
//! cctree parses a C or C++ source file with libclang and turns the engine's
//! callback-driven cursor traversal into an ordinary Rust tree, together
//! with every diagnostic the engine produced.
//!
//! ## Design Philosophy
//!
//! - **Diagnostics are data** - a missing header still yields the partial
//!   tree the engine recovered, with the diagnostics returned beside it
//! - **Sound by default** - [`parse_file`] returns a [`Node`] tree that
//!   copied everything it needs and refers to nothing the engine owns
//! - **Bound trees are scoped** - when lazy engine queries are needed, a
//!   [`Tree`] can be built inside [`engine::clang::with_session`]; its type
//!   borrows the session and cannot escape the closure
//! - **Engine agnostic core** - the builder speaks to the [`Cursor`] and
//!   [`Session`] traits; [`ScriptedEngine`] stands in for libclang in tests
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "libclang")]
//! # fn main() -> cctree::Result<()> {
//! let parsed = cctree::parse_file("src/main.c", &["-std=c11", "-Iinclude"])?;
//!
//! if let Some(diagnostics) = parsed.error() {
//!     eprintln!("{diagnostics}");
//! }
//! cctree::print_tree(&parsed.root)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "libclang"))]
//! # fn main() {}
//! ```

pub mod engine;

mod builder;
mod diagnostics;
mod error;
mod identity;
mod location;
mod options;
mod traverse;
mod tree;

pub use builder::{BuildOptions, BuildStats, build};
pub use diagnostics::{Diagnostic, Diagnostics, Severity, collect as collect_diagnostics};
pub use engine::scripted::{ScriptId, ScriptedCursor, ScriptedEngine};
pub use engine::{ChildVisit, Cursor, Session};
pub use error::{Error, Result};
pub use identity::{Fingerprint, FingerprintStrategy, IdentityResolver};
pub use location::SourceLocation;
pub use options::{ParseOptions, read_flags_file};
pub use traverse::{print_tree, render_tree, walk, walk_with_depth, write_tree};
pub use tree::{Node, NodeData, NodeId, Tree};

#[cfg(feature = "libclang")]
use std::path::Path;

use tracing::debug;

/// The result of parsing one file: a detached tree and its diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Root of the tree (the translation unit)
    pub root: Node,
    /// Every diagnostic the engine reported, possibly none
    pub diagnostics: Diagnostics,
    /// Counters from the build pass
    pub stats: BuildStats,
}

impl ParsedFile {
    /// The aggregate error, or `None` if the parse was clean.
    #[must_use]
    pub fn error(&self) -> Option<&Diagnostics> {
        if self.diagnostics.is_empty() {
            None
        } else {
            Some(&self.diagnostics)
        }
    }

    /// Split into the tree and the aggregate error.
    #[must_use]
    pub fn into_parts(self) -> (Node, Option<Diagnostics>) {
        (self.root, self.diagnostics.into_error())
    }

    /// Treat any diagnostic as fatal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Diagnostics`] if the engine reported anything.
    pub fn into_result(self) -> Result<Node> {
        match self.diagnostics.into_error() {
            None => Ok(self.root),
            Some(diagnostics) => Err(Error::Diagnostics(diagnostics)),
        }
    }
}

/// Collect diagnostics from an open session and build its detached tree.
///
/// Works with any engine; [`parse_file`] is this function run inside a
/// libclang session.
///
/// # Panics
///
/// Panics if the engine breaks the traversal contract (see [`build`]).
pub fn parse_session<S: Session>(session: &S, options: &BuildOptions) -> ParsedFile {
    let diagnostics = diagnostics::collect(session);
    let tree = build(session.root(), options);
    let stats = *tree.stats();
    let root = tree.detach();
    debug!(nodes = stats.nodes, diagnostics = diagnostics.len(), "Parsed session");
    ParsedFile {
        root,
        diagnostics,
        stats,
    }
}

/// Parse `path` with libclang, passing `arguments` through verbatim.
///
/// A tree is returned whenever libclang could start parsing, even if the
/// source has errors; inspect [`ParsedFile::error`] for those. The libclang
/// session is closed before this function returns.
///
/// # Errors
///
/// - [`Error::Config`] if the path or an argument cannot be passed to libclang
/// - [`Error::EngineUnavailable`] if libclang cannot be initialised
/// - [`Error::ParseFailure`] if libclang cannot create a translation unit
#[cfg(feature = "libclang")]
pub fn parse_file<P, S>(path: P, arguments: &[S]) -> Result<ParsedFile>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let options = ParseOptions::new().args(arguments.iter().map(|a| a.as_ref().to_string()));
    parse_file_with(path, &options)
}

/// Parse `path` with libclang using fully configured options.
///
/// # Errors
///
/// Same as [`parse_file`].
#[cfg(feature = "libclang")]
pub fn parse_file_with<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<ParsedFile> {
    let path = path.as_ref();
    options.validate(path)?;
    engine::clang::with_session(path, options.arguments(), |session| {
        parse_session(session, options.build())
    })
}
