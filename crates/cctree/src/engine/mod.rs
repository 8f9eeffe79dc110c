//! The seam between cctree and a parsing engine.
//!
//! An engine exposes two things: a [`Session`] (one parsed translation unit
//! plus its diagnostics) and the [`Cursor`]s reachable from it. The builder
//! only ever talks to these traits, so the libclang backend and the
//! in-memory [`scripted`] engine are interchangeable.
//!
//! ## Lifetimes
//!
//! A cursor is a non-owning handle into session memory. Sessions hand out
//! cursors through a generic associated type that borrows the session, so
//! anything holding a cursor (including a bound [`Tree`](crate::Tree)) cannot
//! outlive the session that produced it.

#[cfg(feature = "libclang")]
pub mod clang;
pub mod scripted;

use crate::diagnostics::Diagnostic;
use crate::location::SourceLocation;

/// What the engine should do after the visitor handled a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildVisit {
    /// Move on to the next sibling without descending
    Continue,
    /// Descend into the cursor's children, then continue with its siblings
    Recurse,
    /// Stop the whole traversal
    Break,
}

/// A handle to one construct in a parsed translation unit.
///
/// Every query goes back to the engine, so results are only meaningful while
/// the owning session is alive. Implementations must be cheap to clone.
pub trait Cursor: Clone {
    /// Returns `true` for the engine's sentinel "no cursor" value.
    fn is_null(&self) -> bool;

    /// Category of the construct, as spelled by the engine (e.g. `FunctionDecl`).
    fn kind(&self) -> String;

    /// Name or text of the construct; empty when the engine has none.
    fn spelling(&self) -> String;

    /// Presumed start location (honours `#line` directives).
    fn location(&self) -> SourceLocation;

    /// The engine's own 32-bit hash of this cursor.
    fn engine_hash(&self) -> u32;

    /// The cursor for the definition of the entity this cursor refers to.
    fn definition(&self) -> Option<Self>;

    /// Presentation name, which may include more than the spelling
    /// (a function's parameter list, for example).
    fn display_name(&self) -> String {
        self.spelling()
    }

    /// Visit the children of this cursor depth-first.
    ///
    /// `visitor` receives each cursor together with the cursor the engine
    /// reports as its parent, and steers the traversal with its return
    /// value. Returns `true` if the traversal was stopped by
    /// [`ChildVisit::Break`].
    fn visit_children<F>(&self, visitor: F) -> bool
    where
        F: FnMut(Self, Self) -> ChildVisit;
}

/// One open parse of one source file.
///
/// Closing a session is dropping it; the borrow checker refuses to drop it
/// while any cursor (or a build driven by one) still borrows it.
pub trait Session {
    /// Cursor type handed out by this session.
    type Cursor<'s>: Cursor
    where
        Self: 's;

    /// The translation-unit cursor.
    fn root(&self) -> Self::Cursor<'_>;

    /// The finished list of diagnostics, in engine order.
    fn diagnostics(&self) -> Vec<Diagnostic>;
}
