//! Materialized syntax trees.
//!
//! Two shapes exist, one per side of the session boundary:
//!
//! - [`Tree<C>`] is the arena the builder fills. Each slot keeps the engine's
//!   cursor handle next to the cached fields, so lazy queries (definition
//!   cursors, display names) remain possible. `C` borrows the session, so a
//!   bound tree cannot outlive it.
//! - [`Node`] is the detached, owned tree produced by [`Tree::detach`]. It
//!   holds cached fields only and is valid forever.
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Child links | `NodeId` indices | appends never invalidate existing links |
//! | Parent link | non-owning `NodeId` | callers of `Node` never need one |
//! | Definitions | location copied eagerly | the defining cursor dies with the session |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::BuildStats;
use crate::engine::Cursor;
use crate::location::SourceLocation;

/// Index of a node inside one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The translation-unit node of every tree.
    pub const ROOT: Self = Self(0);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in visitation (pre-)order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fields copied out of a cursor when its node is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    kind: String,
    spelling: String,
    location: SourceLocation,
    definition: Option<SourceLocation>,
}

impl NodeData {
    /// Read every cached field from `cursor` now.
    pub fn capture<C: Cursor>(cursor: &C, resolve_definition: bool) -> Self {
        let definition = if resolve_definition {
            cursor.definition().map(|d| d.location())
        } else {
            None
        };
        Self {
            kind: cursor.kind(),
            spelling: cursor.spelling(),
            location: cursor.location(),
            definition,
        }
    }

    /// Engine spelling of the construct's kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Name or text of the construct.
    #[must_use]
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Presumed start location.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Location of the construct's definition, if resolved.
    #[must_use]
    pub fn definition(&self) -> Option<&SourceLocation> {
        self.definition.as_ref()
    }
}

#[derive(Debug)]
struct Slot<C> {
    data: NodeData,
    handle: C,
    parent: Option<NodeId>,
    depth: usize,
    children: Vec<NodeId>,
}

/// A tree still bound to the session that produced it.
///
/// Node ids are assigned in visitation order, which makes slot order the
/// tree's pre-order and guarantees every child id is larger than its
/// parent's.
///
/// Accessors taking a [`NodeId`] panic if the id came from another tree.
#[derive(Debug)]
pub struct Tree<C> {
    slots: Vec<Slot<C>>,
    stats: BuildStats,
}

impl<C> Tree<C> {
    pub(crate) fn with_root(data: NodeData, handle: C) -> Self {
        Self {
            slots: vec![Slot {
                data,
                handle,
                parent: None,
                depth: 0,
                children: Vec::new(),
            }],
            stats: BuildStats::default(),
        }
    }

    pub(crate) fn append(&mut self, parent: NodeId, data: NodeData, handle: C) -> NodeId {
        let id = NodeId(self.slots.len());
        let depth = self.slots[parent.0].depth + 1;
        self.slots.push(Slot {
            data,
            handle,
            parent: Some(parent),
            depth,
            children: Vec::new(),
        });
        self.slots[parent.0].children.push(id);
        id
    }

    pub(crate) fn set_stats(&mut self, stats: BuildStats) {
        self.stats = stats;
    }

    /// The root node's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Cached fields of `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.slots[id.0].data
    }

    /// Children of `id`, in visitation order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// Parent of `id`; `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    /// Distance from the root (the root is at depth 0).
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.slots[id.0].depth
    }

    /// The engine's cursor for `id`.
    ///
    /// Valid only while the session lives, which `C`'s lifetime enforces.
    #[must_use]
    pub fn handle(&self, id: NodeId) -> &C {
        &self.slots[id.0].handle
    }

    /// Every node id in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.slots.len()).map(NodeId)
    }

    /// Statistics recorded while building this tree.
    #[must_use]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Drop every engine handle, keeping the cached fields as an owned tree.
    #[must_use]
    pub fn detach(mut self) -> Node {
        detach_at(&mut self.slots, NodeId::ROOT)
    }
}

impl<C: Cursor> Tree<C> {
    /// Ask the engine for the definition cursor of `id`.
    #[must_use]
    pub fn definition_cursor(&self, id: NodeId) -> Option<C> {
        self.handle(id).definition()
    }

    /// Ask the engine for the display name of `id`.
    #[must_use]
    pub fn display_name(&self, id: NodeId) -> String {
        self.handle(id).display_name()
    }
}

fn detach_at<C>(slots: &mut [Slot<C>], id: NodeId) -> Node {
    let children = std::mem::take(&mut slots[id.0].children);
    let data = std::mem::take(&mut slots[id.0].data);
    Node {
        kind: data.kind,
        spelling: data.spelling,
        location: data.location,
        definition: data.definition,
        children: children
            .into_iter()
            .map(|child| detach_at(slots, child))
            .collect(),
    }
}

/// One construct of a parsed source file, detached from the engine.
///
/// All fields are copies made while the session was open; none of them
/// refer back into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    kind: String,
    spelling: String,
    location: SourceLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    definition: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    /// Create a leaf node.
    #[must_use]
    pub fn new(kind: impl Into<String>, spelling: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: kind.into(),
            spelling: spelling.into(),
            location,
            definition: None,
            children: Vec::new(),
        }
    }

    /// Return this node with `children` appended after its existing ones.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Return this node with its definition location set.
    #[must_use]
    pub fn with_definition(mut self, definition: SourceLocation) -> Self {
        self.definition = Some(definition);
        self
    }

    /// Engine spelling of the construct's kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Name or text of the construct.
    #[must_use]
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Presumed start location.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Location of the construct's definition, if it was resolved.
    #[must_use]
    pub fn definition(&self) -> Option<&SourceLocation> {
        self.definition.as_ref()
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of nodes in this subtree, this node included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// How many nodes of each kind this subtree contains.
    #[must_use]
    pub fn kind_histogram(&self) -> BTreeMap<String, usize> {
        let mut histogram = BTreeMap::new();
        crate::traverse::walk(self, |node| {
            *histogram.entry(node.kind.clone()).or_insert(0) += 1;
        });
        histogram
    }

    /// Every node of `kind` in this subtree, in pre-order.
    #[must_use]
    pub fn find_all(&self, kind: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        collect_kind(self, kind, &mut found);
        found
    }
}

fn collect_kind<'a>(node: &'a Node, kind: &str, found: &mut Vec<&'a Node>) {
    if node.kind == kind {
        found.push(node);
    }
    for child in &node.children {
        collect_kind(child, kind, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32, column: u32) -> SourceLocation {
        SourceLocation::new("t.c", line, column)
    }

    fn data(kind: &str, spelling: &str, line: u32) -> NodeData {
        NodeData {
            kind: kind.to_string(),
            spelling: spelling.to_string(),
            location: at(line, 1),
            definition: None,
        }
    }

    #[test]
    fn append_links_parent_child_and_depth() {
        let mut tree = Tree::with_root(data("TranslationUnit", "t.c", 0), ());
        let f = tree.append(NodeId::ROOT, data("FunctionDecl", "f", 1), ());
        let body = tree.append(f, data("CompoundStmt", "", 1), ());

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.children(NodeId::ROOT), [f]);
        assert_eq!(tree.children(f), [body]);
        assert_eq!(tree.parent(body), Some(f));
        assert_eq!(tree.parent(NodeId::ROOT), None);
        assert_eq!(tree.depth(body), 2);
        assert!(body > f, "child ids must follow their parent's");
    }

    #[test]
    fn detach_preserves_structure_and_order() {
        let mut tree = Tree::with_root(data("TranslationUnit", "t.c", 0), ());
        let a = tree.append(NodeId::ROOT, data("FunctionDecl", "a", 1), ());
        tree.append(a, data("ParmDecl", "x", 1), ());
        tree.append(NodeId::ROOT, data("FunctionDecl", "b", 2), ());

        let root = tree.detach();

        assert_eq!(root.kind(), "TranslationUnit");
        let names: Vec<_> = root.children().iter().map(Node::spelling).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(root.children()[0].children()[0].spelling(), "x");
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn ids_are_preorder() {
        let mut tree = Tree::with_root(data("TranslationUnit", "t.c", 0), ());
        let a = tree.append(NodeId::ROOT, data("FunctionDecl", "a", 1), ());
        let a1 = tree.append(a, data("ParmDecl", "a1", 1), ());
        let b = tree.append(NodeId::ROOT, data("FunctionDecl", "b", 2), ());

        assert_eq!(tree.ids().collect::<Vec<_>>(), [NodeId::ROOT, a, a1, b]);
    }

    #[test]
    fn histogram_and_find_all_cover_subtree() {
        let root = Node::new("TranslationUnit", "t.c", SourceLocation::unknown()).with_children([
            Node::new("FunctionDecl", "f", at(1, 5))
                .with_children([Node::new("ReturnStmt", "", at(1, 12))]),
            Node::new("FunctionDecl", "g", at(2, 5)),
        ]);

        let histogram = root.kind_histogram();
        assert_eq!(histogram.get("FunctionDecl"), Some(&2));
        assert_eq!(histogram.get("ReturnStmt"), Some(&1));

        let functions: Vec<_> = root
            .find_all("FunctionDecl")
            .into_iter()
            .map(Node::spelling)
            .collect();
        assert_eq!(functions, ["f", "g"]);
    }

    #[test]
    fn serializes_without_empty_optional_fields() {
        let node = Node::new("IntegerLiteral", "", at(1, 19));

        let json = serde_json::to_value(&node).expect("node should serialize");

        assert_eq!(json["kind"], "IntegerLiteral");
        assert_eq!(json["location"]["line"], 1);
        assert!(json.get("children").is_none());
        assert!(json.get("definition").is_none());
    }
}
