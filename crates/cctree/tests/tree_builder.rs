//! Integration tests for building trees from a scripted engine.
//!
//! These exercise the public API end to end without libclang: session →
//! diagnostics → build → detach → walk/print.

use cctree::{
    BuildOptions, ChildVisit, Cursor, FingerprintStrategy, Node, ParsedFile, Session, Severity,
    SourceLocation, build, parse_session, render_tree, walk,
};
use proptest::prelude::*;
use rstest::rstest;

mod common;
use common::{engine_from_parents, expected_preorder, location_of, main_returning_zero};

fn spellings(root: &Node) -> Vec<String> {
    let mut seen = Vec::new();
    walk(root, |node| seen.push(node.spelling().to_string()));
    seen
}

// ============================================================================
// Scenario tests
// ============================================================================

#[test]
fn main_returning_zero_has_function_with_return() {
    let parsed = parse_session(&main_returning_zero(), &BuildOptions::default());

    assert!(parsed.error().is_none());
    assert_eq!(parsed.root.kind(), "TranslationUnit");
    assert_eq!(parsed.root.children().len(), 1);

    let main = &parsed.root.children()[0];
    assert_eq!(main.kind(), "FunctionDecl");
    assert_eq!(main.spelling(), "main");
    assert!(!main.find_all("ReturnStmt").is_empty());
}

#[rstest]
#[case::one(&["missing terminating '\"' character"])]
#[case::three(&[
    "'missing.h' file not found",
    "use of undeclared identifier 'x'",
    "expected ';' after expression",
])]
fn diagnostic_count_matches_engine(#[case] messages: &[&str]) {
    let mut engine = main_returning_zero();
    for message in messages {
        engine.diagnostic(Severity::Error, *message);
    }

    let parsed: ParsedFile = parse_session(&engine, &BuildOptions::default());

    let error = parsed.error().expect("diagnostics should surface as an error");
    assert_eq!(error.len(), messages.len());
    assert_eq!(error.messages().collect::<Vec<_>>(), messages);
    assert_eq!(parsed.root.node_count(), 5, "tree is still returned");
}

#[rstest]
#[case::structural(FingerprintStrategy::Structural)]
#[case::engine_hash(FingerprintStrategy::EngineHash)]
fn both_strategies_build_the_same_tree(#[case] strategy: FingerprintStrategy) {
    let engine = main_returning_zero();
    let reference = parse_session(&engine, &BuildOptions::default()).root;

    let parsed = parse_session(&engine, &BuildOptions::default().with_fingerprint(strategy));

    assert_eq!(parsed.root, reference);
}

#[test]
#[should_panic(expected = "unable to locate node of parent cursor")]
fn child_of_unvisited_parent_panics() {
    let mut engine = main_returning_zero();
    let phantom = engine.detached("ClassDecl", "Hidden", SourceLocation::new("main.c", 9, 7));
    let method = engine.child(
        engine.root_id(),
        "CXXMethod",
        "run",
        SourceLocation::new("main.c", 10, 10),
    );
    engine.report_parent(method, phantom);

    let _ = parse_session(&engine, &BuildOptions::default());
}

#[test]
fn detached_tree_outlives_the_engine() {
    let root = {
        let engine = main_returning_zero();
        parse_session(&engine, &BuildOptions::default()).root
    };

    // The engine is gone; cached fields are still readable.
    assert_eq!(root.children()[0].spelling(), "main");
    assert_eq!(root.children()[0].location().to_string(), "main.c:1:5");
}

#[test]
fn bound_tree_answers_lazy_queries_while_engine_lives() {
    let engine = main_returning_zero();

    let tree = build(engine.root(), &BuildOptions::default());
    let main = tree.children(tree.root())[0];

    assert_eq!(tree.display_name(main), "main");
    assert_eq!(tree.handle(main).kind(), "FunctionDecl");
    assert!(tree.definition_cursor(main).is_none());
}

#[test]
fn break_from_a_custom_visitor_stops_early() {
    let engine = engine_from_parents(&[0, 1, 1, 0]);

    let mut visited = 0;
    let stopped = engine.root().visit_children(|_, _| {
        visited += 1;
        if visited == 2 {
            ChildVisit::Break
        } else {
            ChildVisit::Recurse
        }
    });

    assert!(stopped);
    assert_eq!(visited, 2);
}

// ============================================================================
// Property tests
// ============================================================================

fn parent_lists() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<prop::sample::Index>(), 0..64).prop_map(|indices| {
        indices
            .iter()
            .enumerate()
            .map(|(i, index)| index.index(i + 1))
            .collect()
    })
}

proptest! {
    #[test]
    fn walk_matches_engine_preorder(parents in parent_lists()) {
        let engine = engine_from_parents(&parents);

        let parsed = parse_session(&engine, &BuildOptions::default());

        prop_assert_eq!(spellings(&parsed.root), expected_preorder(&parents));
    }

    #[test]
    fn cached_fields_match_the_cursor(parents in parent_lists()) {
        let engine = engine_from_parents(&parents);

        let parsed = parse_session(&engine, &BuildOptions::default());

        let mut ok = true;
        walk(&parsed.root, |node| {
            if let Some(n) = node.spelling().strip_prefix('n') {
                let n: usize = n.parse().unwrap_or(0);
                ok &= *node.location() == location_of(n);
            }
        });
        prop_assert!(ok);
    }

    #[test]
    fn printed_lines_equal_node_count(parents in parent_lists()) {
        let parsed = parse_session(&engine_from_parents(&parents), &BuildOptions::default());

        let rendered = render_tree(&parsed.root);
        let mut walked = 0;
        walk(&parsed.root, |_| walked += 1);

        prop_assert_eq!(rendered.lines().count(), walked);
        prop_assert_eq!(walked, parents.len() + 1);
    }

    #[test]
    fn printing_is_idempotent(parents in parent_lists()) {
        let parsed = parse_session(&engine_from_parents(&parents), &BuildOptions::default());

        prop_assert_eq!(render_tree(&parsed.root), render_tree(&parsed.root));
    }

    #[test]
    fn strategies_agree_without_collisions(parents in parent_lists()) {
        let engine = engine_from_parents(&parents);

        let structural = parse_session(&engine, &BuildOptions::default());
        let hashed = parse_session(
            &engine,
            &BuildOptions::default().with_fingerprint(FingerprintStrategy::EngineHash),
        );

        prop_assert_eq!(structural.stats.collisions, 0);
        prop_assert_eq!(structural.root, hashed.root);
    }
}
