//! libclang-backed sessions.
//!
//! libclang allows a single engine instance per process at a time, so every
//! session runs behind a process-wide lock. A session only exists inside the
//! closure given to [`with_session`]; the translation unit, index and engine
//! are released when the closure returns or unwinds, and the closure's
//! return type cannot borrow the session.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use clang::diagnostic::Severity as ClangSeverity;
use clang::{Clang, Entity, EntityVisitResult, Index, TranslationUnit};
use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, Severity};
use crate::engine::{ChildVisit, Cursor, Session};
use crate::error::{Error, Result};
use crate::location::SourceLocation;

static ENGINE_LOCK: Mutex<()> = Mutex::new(());

/// One translation unit parsed by libclang.
pub struct ClangSession<'i> {
    path: PathBuf,
    tu: TranslationUnit<'i>,
}

impl ClangSession<'_> {
    /// The source file this session parsed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Session for ClangSession<'_> {
    type Cursor<'s>
        = Entity<'s>
    where
        Self: 's;

    fn root(&self) -> Entity<'_> {
        self.tu.get_entity()
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.tu
            .get_diagnostics()
            .iter()
            .map(|d| Diagnostic::new(severity_from_clang(d.get_severity()), d.get_text()))
            .collect()
    }
}

fn severity_from_clang(severity: ClangSeverity) -> Severity {
    match severity {
        ClangSeverity::Ignored => Severity::Ignored,
        ClangSeverity::Note => Severity::Note,
        ClangSeverity::Warning => Severity::Warning,
        ClangSeverity::Error => Severity::Error,
        ClangSeverity::Fatal => Severity::Fatal,
    }
}

/// Parse `path` with `arguments` and run `f` against the open session.
///
/// Arguments are passed to libclang verbatim. The session is closed before
/// this function returns, whatever `f` does.
///
/// # Errors
///
/// - [`Error::EngineUnavailable`] if libclang cannot be initialised
/// - [`Error::ParseFailure`] if libclang cannot build a translation unit at all
///
/// Compiler diagnostics are not errors here; read them from the session.
pub fn with_session<S, F, R>(path: &Path, arguments: &[S], f: F) -> Result<R>
where
    S: AsRef<str>,
    F: FnOnce(&ClangSession<'_>) -> R,
{
    let _guard = ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let clang = Clang::new().map_err(Error::EngineUnavailable)?;
    let index = Index::new(&clang, false, false);

    debug!(path = %path.display(), args = arguments.len(), "Opening translation unit");
    let tu = index
        .parser(path)
        .arguments(arguments)
        .parse()
        .map_err(|e| Error::ParseFailure {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let session = ClangSession {
        path: path.to_path_buf(),
        tu,
    };
    let result = f(&session);

    drop(session);
    trace!(path = %path.display(), "Closed translation unit");
    Ok(result)
}

/// Captures the bytes `Entity`'s `Hash` impl writes.
///
/// The `clang` crate feeds the raw `clang_hashCursor` value to the hasher
/// as its native-endian bytes and exposes it no other way; reading them
/// back yields the engine's own 32-bit hash.
#[derive(Debug, Default)]
struct CursorHash {
    bytes: Vec<u8>,
}

impl CursorHash {
    fn value(&self) -> u32 {
        match <[u8; 4]>::try_from(self.bytes.as_slice()) {
            Ok(raw) => u32::from_ne_bytes(raw),
            // Not a bare `c_uint`; fold whatever was written.
            Err(_) => self
                .bytes
                .iter()
                .fold(0_u32, |acc, &b| acc.rotate_left(5) ^ u32::from(b)),
        }
    }
}

impl Hasher for CursorHash {
    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        u64::from(self.value())
    }
}

impl<'tu> Cursor for Entity<'tu> {
    fn is_null(&self) -> bool {
        // The clang crate filters null cursors out before they reach Rust.
        false
    }

    fn kind(&self) -> String {
        format!("{:?}", self.get_kind())
    }

    fn spelling(&self) -> String {
        self.get_name().unwrap_or_default()
    }

    fn location(&self) -> SourceLocation {
        self.get_location()
            .map_or_else(SourceLocation::unknown, |location| {
                let (file, line, column) = location.get_presumed_location();
                SourceLocation::new(file, line, column)
            })
    }

    fn engine_hash(&self) -> u32 {
        let mut hasher = CursorHash::default();
        self.hash(&mut hasher);
        hasher.value()
    }

    fn definition(&self) -> Option<Self> {
        self.get_definition()
    }

    fn display_name(&self) -> String {
        self.get_display_name()
            .unwrap_or_else(|| Cursor::spelling(self))
    }

    fn visit_children<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(Self, Self) -> ChildVisit,
    {
        Entity::visit_children(self, |cursor, parent| match visitor(cursor, parent) {
            ChildVisit::Continue => EntityVisitResult::Continue,
            ChildVisit::Recurse => EntityVisitResult::Recurse,
            ChildVisit::Break => EntityVisitResult::Break,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_hash_returns_the_written_u32_unchanged() {
        let mut hasher = CursorHash::default();
        0xdead_beef_u32.hash(&mut hasher);

        assert_eq!(hasher.value(), 0xdead_beef);
        assert_eq!(hasher.finish(), 0xdead_beef);
    }

    #[test]
    fn cursor_hash_folds_unexpected_widths() {
        let mut wide = CursorHash::default();
        0x0102_0304_0506_0708_u64.hash(&mut wide);
        let mut other = CursorHash::default();
        0x0102_0304_0506_0709_u64.hash(&mut other);

        assert_ne!(wide.value(), other.value());
    }
}
