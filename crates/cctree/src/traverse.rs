//! Walking and printing detached trees.
//!
//! Everything here works on [`Node`] alone and never touches the engine.

use std::io::{self, Write};

use crate::tree::Node;

/// Call `f` on every node of the tree, pre-order.
///
/// A node is visited before its children, and siblings in stored order.
pub fn walk<F>(root: &Node, mut f: F)
where
    F: FnMut(&Node),
{
    walk_with_depth(root, |node, _| f(node));
}

/// Like [`walk`], also passing each node's depth (the root is at depth 0).
pub fn walk_with_depth<F>(root: &Node, mut f: F)
where
    F: FnMut(&Node, usize),
{
    walk_at(root, 0, &mut f);
}

fn walk_at<F>(node: &Node, depth: usize, f: &mut F)
where
    F: FnMut(&Node, usize),
{
    f(node, depth);
    for child in node.children() {
        walk_at(child, depth + 1, f);
    }
}

/// Write one line per node, its kind indented by one tab per level.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_tree<W: Write>(root: &Node, out: &mut W) -> io::Result<()> {
    let mut result = Ok(());
    walk_with_depth(root, |node, depth| {
        if result.is_ok() {
            result = writeln!(out, "{}{}", "\t".repeat(depth), node.kind());
        }
    });
    result
}

/// Render [`write_tree`]'s output into a string.
#[must_use]
pub fn render_tree(root: &Node) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_tree(root, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Print [`write_tree`]'s output to stdout.
///
/// # Errors
///
/// Returns an error if stdout is closed or otherwise unwritable.
pub fn print_tree(root: &Node) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_tree(root, &mut lock)?;
    lock.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SourceLocation;

    fn node(kind: &str, spelling: &str) -> Node {
        Node::new(kind, spelling, SourceLocation::unknown())
    }

    fn sample() -> Node {
        node("TranslationUnit", "t.c").with_children([
            node("FunctionDecl", "f").with_children([
                node("ParmDecl", "x"),
                node("CompoundStmt", "").with_children([node("ReturnStmt", "")]),
            ]),
            node("VarDecl", "g"),
        ])
    }

    #[test]
    fn walk_is_preorder() {
        let mut seen = Vec::new();
        walk(&sample(), |n| seen.push(n.kind().to_string()));

        assert_eq!(
            seen,
            [
                "TranslationUnit",
                "FunctionDecl",
                "ParmDecl",
                "CompoundStmt",
                "ReturnStmt",
                "VarDecl"
            ]
        );
    }

    #[test]
    fn walk_with_depth_reports_levels() {
        let mut depths = Vec::new();
        walk_with_depth(&sample(), |_, depth| depths.push(depth));

        assert_eq!(depths, [0, 1, 2, 2, 3, 1]);
    }

    #[test]
    fn render_indents_with_tabs() {
        let rendered = render_tree(&sample());

        assert_eq!(
            rendered,
            "TranslationUnit\n\tFunctionDecl\n\t\tParmDecl\n\t\tCompoundStmt\n\t\t\tReturnStmt\n\tVarDecl\n"
        );
    }

    #[test]
    fn write_tree_stops_at_first_error() {
        struct Failing(usize);

        impl Write for Failing {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0 += 1;
                if self.0 > 1 {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
                }
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut out = Failing(0);
        let error = write_tree(&sample(), &mut out).expect_err("second write should fail");

        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(out.0, 2);
    }
}
