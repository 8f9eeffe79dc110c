//! An in-memory engine that replays a scripted tree.
//!
//! `ScriptedEngine` lets the builder be exercised without libclang. Beyond a
//! plain tree it can also misbehave on purpose: hand out null cursors, report
//! a parent that was never visited, or give two cursors the same hash.
//!
//! ```
//! use cctree::{BuildOptions, ScriptedEngine, SourceLocation, parse_session};
//!
//! let mut engine = ScriptedEngine::new("main.c");
//! let main = engine.child(engine.root_id(), "FunctionDecl", "main", SourceLocation::new("main.c", 1, 5));
//! engine.child(main, "CompoundStmt", "", SourceLocation::new("main.c", 1, 11));
//!
//! let parsed = parse_session(&engine, &BuildOptions::default());
//! assert_eq!(parsed.root.node_count(), 3);
//! ```

use std::fmt;

use crate::diagnostics::{Diagnostic, Severity};
use crate::engine::{ChildVisit, Cursor, Session};
use crate::location::SourceLocation;

/// Identifies a scripted cursor while the script is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptId(usize);

#[derive(Debug, Clone)]
struct Entry {
    kind: String,
    spelling: String,
    location: SourceLocation,
    hash: u32,
    null: bool,
    children: Vec<usize>,
    reported_parent: Option<usize>,
    definition: Option<usize>,
}

impl Entry {
    fn new(id: usize, kind: &str, spelling: &str, location: SourceLocation) -> Self {
        Self {
            kind: kind.to_string(),
            spelling: spelling.to_string(),
            location,
            hash: u32::try_from(id).unwrap_or(u32::MAX),
            null: false,
            children: Vec::new(),
            reported_parent: None,
            definition: None,
        }
    }
}

/// A scripted translation unit and its diagnostics.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    entries: Vec<Entry>,
    diagnostics: Vec<Diagnostic>,
}

impl ScriptedEngine {
    /// Start a script whose root is a `TranslationUnit` spelled `file`.
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            entries: vec![Entry::new(
                0,
                "TranslationUnit",
                &file,
                SourceLocation::unknown(),
            )],
            diagnostics: Vec::new(),
        }
    }

    /// The translation-unit cursor's id.
    #[must_use]
    pub fn root_id(&self) -> ScriptId {
        ScriptId(0)
    }

    /// Number of scripted cursors, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a script has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a child to `parent`, after any existing children.
    pub fn child(
        &mut self,
        parent: ScriptId,
        kind: &str,
        spelling: &str,
        location: SourceLocation,
    ) -> ScriptId {
        let id = self.detached(kind, spelling, location);
        self.entries[parent.0].children.push(id.0);
        id
    }

    /// Append a null cursor to `parent`.
    pub fn null_child(&mut self, parent: ScriptId) -> ScriptId {
        let id = self.child(parent, "", "", SourceLocation::unknown());
        self.entries[id.0].null = true;
        id
    }

    /// Create a cursor that is never visited on its own.
    ///
    /// Useful as a definition target or as a phantom parent for
    /// [`report_parent`](Self::report_parent).
    pub fn detached(&mut self, kind: &str, spelling: &str, location: SourceLocation) -> ScriptId {
        let id = self.entries.len();
        self.entries.push(Entry::new(id, kind, spelling, location));
        ScriptId(id)
    }

    /// Make the visitor receive `reported` instead of the real parent of `node`.
    pub fn report_parent(&mut self, node: ScriptId, reported: ScriptId) {
        self.entries[node.0].reported_parent = Some(reported.0);
    }

    /// Override the engine hash of `node`.
    pub fn set_hash(&mut self, node: ScriptId, hash: u32) {
        self.entries[node.0].hash = hash;
    }

    /// Point the definition of `node` at `definition`.
    pub fn set_definition(&mut self, node: ScriptId, definition: ScriptId) {
        self.entries[node.0].definition = Some(definition.0);
    }

    /// Record a diagnostic.
    pub fn diagnostic(&mut self, severity: Severity, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(severity, message));
    }

    fn cursor(&self, id: usize) -> ScriptedCursor<'_> {
        ScriptedCursor { engine: self, id }
    }

    fn visit<'e, F>(&'e self, id: usize, visitor: &mut F) -> bool
    where
        F: FnMut(ScriptedCursor<'e>, ScriptedCursor<'e>) -> ChildVisit,
    {
        for &child in &self.entries[id].children {
            let parent = self.entries[child].reported_parent.unwrap_or(id);
            match visitor(self.cursor(child), self.cursor(parent)) {
                ChildVisit::Break => return true,
                ChildVisit::Continue => {}
                ChildVisit::Recurse => {
                    if self.visit(child, visitor) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl Session for ScriptedEngine {
    type Cursor<'s> = ScriptedCursor<'s>;

    fn root(&self) -> ScriptedCursor<'_> {
        self.cursor(0)
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }
}

/// A cursor into a [`ScriptedEngine`].
#[derive(Clone, Copy)]
pub struct ScriptedCursor<'e> {
    engine: &'e ScriptedEngine,
    id: usize,
}

impl ScriptedCursor<'_> {
    fn entry(&self) -> &Entry {
        &self.engine.entries[self.id]
    }

    /// The script id this cursor was created from.
    #[must_use]
    pub fn script_id(&self) -> ScriptId {
        ScriptId(self.id)
    }
}

impl fmt::Debug for ScriptedCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedCursor")
            .field("id", &self.id)
            .field("kind", &self.entry().kind)
            .finish()
    }
}

impl<'e> Cursor for ScriptedCursor<'e> {
    fn is_null(&self) -> bool {
        self.entry().null
    }

    fn kind(&self) -> String {
        self.entry().kind.clone()
    }

    fn spelling(&self) -> String {
        self.entry().spelling.clone()
    }

    fn location(&self) -> SourceLocation {
        self.entry().location.clone()
    }

    fn engine_hash(&self) -> u32 {
        self.entry().hash
    }

    fn definition(&self) -> Option<Self> {
        self.entry().definition.map(|id| self.engine.cursor(id))
    }

    fn visit_children<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(Self, Self) -> ChildVisit,
    {
        self.engine.visit(self.id, &mut visitor)
    }
}
