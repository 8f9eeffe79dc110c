//! Re-identifying cursors across visitor callbacks.
//!
//! The engine hands the visitor a child and its parent, but never a pointer
//! to the node already built for that parent. Cursor handles are not usable
//! as map keys (the engine may reuse or rebuild them between callbacks), so
//! each cursor is reduced to a [`Fingerprint`] and nodes are looked up by it.
//!
//! ## Strategies
//!
//! | Strategy | Key | Known weakness |
//! |----------|-----|----------------|
//! | `Structural` | kind + presumed location | two nodes of one kind at one location (macro expansions, implicit expressions) collide |
//! | `EngineHash` | engine's 32-bit cursor hash (`clang_hashCursor`, unmodified) | meaning changes between engine versions; not collision-free |
//!
//! A resolver is created for exactly one build pass with exactly one
//! strategy, so fingerprints from different strategies never meet in one map.
//!
//! On a collision the most recent registration wins. Traversal is
//! depth-first, so the latest node with a fingerprint is the one whose
//! children are still being delivered: nested casts that share kind and
//! location (`UnexposedExpr` inside `UnexposedExpr`) chain correctly.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::Cursor;
use crate::location::SourceLocation;
use crate::tree::NodeId;

/// How cursors are fingerprinted during a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintStrategy {
    /// Kind plus presumed source location; stable across engine versions
    #[default]
    Structural,
    /// The engine's own cursor hash; cheaper, engine-version dependent
    EngineHash,
}

/// A key identifying one traversal position within one build pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Kind and location of the cursor
    Structural {
        /// Engine spelling of the cursor kind
        kind: String,
        /// Presumed start location
        location: SourceLocation,
    },
    /// Engine-computed cursor hash
    Engine(u32),
}

impl Fingerprint {
    /// Fingerprint `cursor` with `strategy`.
    pub fn of<C: Cursor>(strategy: FingerprintStrategy, cursor: &C) -> Self {
        match strategy {
            FingerprintStrategy::Structural => Self::Structural {
                kind: cursor.kind(),
                location: cursor.location(),
            },
            FingerprintStrategy::EngineHash => Self::Engine(cursor.engine_hash()),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { kind, location } => write!(f, "{kind}_{location}"),
            Self::Engine(hash) => write!(f, "#{hash:08x}"),
        }
    }
}

/// Maps fingerprints to the nodes already materialized for them.
#[derive(Debug)]
pub struct IdentityResolver {
    strategy: FingerprintStrategy,
    nodes: HashMap<Fingerprint, NodeId>,
}

impl IdentityResolver {
    /// Create an empty resolver bound to one strategy.
    #[must_use]
    pub fn new(strategy: FingerprintStrategy) -> Self {
        Self {
            strategy,
            nodes: HashMap::new(),
        }
    }

    /// The strategy every fingerprint of this resolver uses.
    #[must_use]
    pub fn strategy(&self) -> FingerprintStrategy {
        self.strategy
    }

    /// Fingerprint `cursor` with this resolver's strategy.
    pub fn fingerprint<C: Cursor>(&self, cursor: &C) -> Fingerprint {
        Fingerprint::of(self.strategy, cursor)
    }

    /// Register `node` under `fingerprint`, replacing any earlier node.
    ///
    /// Returns `false` if the fingerprint was already taken, i.e. on a
    /// collision.
    pub fn register(&mut self, fingerprint: Fingerprint, node: NodeId) -> bool {
        self.nodes.insert(fingerprint, node).is_none()
    }

    /// Find the node most recently registered under `fingerprint`.
    #[must_use]
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<NodeId> {
        self.nodes.get(fingerprint).copied()
    }

    /// Number of registered fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
