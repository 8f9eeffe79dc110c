//! Turning the engine's push-style visitor into an owned tree.
//!
//! The engine drives control flow: it calls back once per cursor with the
//! cursor and the cursor it considers the parent. The builder's callback
//! captures an [`IdentityResolver`] and the in-progress [`Tree`], finds the
//! parent's node by fingerprint, appends a new node to it, and registers the
//! new node so its own children can find it in turn.
//!
//! A parent that cannot be found means the engine visited a child before its
//! parent (or the fingerprint strategy is broken). That is a contract
//! violation, not a data error, and the builder panics.

use tracing::{debug, trace};

use crate::engine::{ChildVisit, Cursor};
use crate::identity::{FingerprintStrategy, IdentityResolver};
use crate::tree::{NodeData, NodeId, Tree};

/// Options steering one build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// How cursors are re-identified across callbacks
    pub fingerprint: FingerprintStrategy,
    /// Deepest level materialized (the root is level 0); `None` for no limit
    pub max_depth: Option<usize>,
    /// Skip cursors whose presumed file is not the parsed file itself
    pub main_file_only: bool,
    /// Copy each cursor's definition location into its node
    pub resolve_definitions: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            fingerprint: FingerprintStrategy::Structural,
            max_depth: None,
            main_file_only: false,
            resolve_definitions: true,
        }
    }
}

impl BuildOptions {
    /// Use `strategy` to fingerprint cursors.
    #[must_use]
    pub fn with_fingerprint(mut self, strategy: FingerprintStrategy) -> Self {
        self.fingerprint = strategy;
        self
    }

    /// Stop materializing below `depth`.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Only keep cursors located in the parsed file.
    #[must_use]
    pub fn with_main_file_only(mut self, enabled: bool) -> Self {
        self.main_file_only = enabled;
        self
    }

    /// Enable or disable eager definition lookup.
    #[must_use]
    pub fn with_definitions(mut self, enabled: bool) -> Self {
        self.resolve_definitions = enabled;
        self
    }
}

/// Counters recorded during one build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Nodes materialized, the root included
    pub nodes: usize,
    /// Null cursors the engine handed over and the builder skipped
    pub null_cursors: usize,
    /// Cursors left out by `max_depth` or `main_file_only`
    pub filtered: usize,
    /// Nodes whose fingerprint was already taken by an earlier node
    pub collisions: usize,
}

/// Materialize the tree below `root`.
///
/// # Panics
///
/// Panics if the engine reports a parent cursor that was never visited.
/// With libclang the callback runs inside an `extern "C"` frame, so the panic
/// aborts the process after printing its message.
pub fn build<C: Cursor>(root: C, options: &BuildOptions) -> Tree<C> {
    let mut resolver = IdentityResolver::new(options.fingerprint);
    let mut stats = BuildStats {
        nodes: 1,
        ..BuildStats::default()
    };

    let root_data = NodeData::capture(&root, options.resolve_definitions);
    let main_file = root_data.spelling().to_string();
    resolver.register(resolver.fingerprint(&root), NodeId::ROOT);
    let mut tree = Tree::with_root(root_data, root.clone());

    root.visit_children(|cursor, parent| {
        if cursor.is_null() {
            stats.null_cursors += 1;
            return ChildVisit::Continue;
        }

        let Some(parent_id) = resolver.lookup(&resolver.fingerprint(&parent)) else {
            panic!(
                "unable to locate node of parent cursor {}({})",
                parent.kind(),
                parent.spelling()
            );
        };

        let depth = tree.depth(parent_id) + 1;
        if options.max_depth.is_some_and(|max| depth > max) {
            stats.filtered += 1;
            return ChildVisit::Continue;
        }

        let data = NodeData::capture(&cursor, options.resolve_definitions);
        if options.main_file_only && data.location().file() != main_file {
            stats.filtered += 1;
            return ChildVisit::Continue;
        }

        let fingerprint = resolver.fingerprint(&cursor);
        let id = tree.append(parent_id, data, cursor);
        if !resolver.register(fingerprint.clone(), id) {
            stats.collisions += 1;
            debug!(%fingerprint, node = id.index(), "Fingerprint collision; latest node wins");
        }
        stats.nodes += 1;
        trace!(kind = %tree.get(id).kind(), depth, "Materialized node");

        if options.max_depth.is_some_and(|max| depth >= max) {
            ChildVisit::Continue
        } else {
            ChildVisit::Recurse
        }
    });

    debug!(
        nodes = stats.nodes,
        null_cursors = stats.null_cursors,
        filtered = stats.filtered,
        collisions = stats.collisions,
        strategy = ?options.fingerprint,
        "Built tree"
    );
    tree.set_stats(stats);
    tree
}
