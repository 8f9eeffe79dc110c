//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use cctree::{ScriptId, ScriptedEngine, SourceLocation};

const KINDS: [&str; 5] = [
    "FunctionDecl",
    "CompoundStmt",
    "DeclStmt",
    "VarDecl",
    "CallExpr",
];

/// Build a script where node `i + 1` hangs below node `parents[i]`.
///
/// Node 0 is the translation unit. Every other node gets a unique spelling
/// (`n1`, `n2`, ...) and a unique line, so both fingerprint strategies see
/// distinct keys.
///
/// # Panics
///
/// Panics if `parents[i] > i`.
pub fn engine_from_parents(parents: &[usize]) -> ScriptedEngine {
    let mut engine = ScriptedEngine::new("gen.c");
    let mut ids: Vec<ScriptId> = vec![engine.root_id()];
    for (i, &parent) in parents.iter().enumerate() {
        assert!(parent <= i, "parent {parent} of node {} not yet created", i + 1);
        let n = i + 1;
        let id = engine.child(
            ids[parent],
            KINDS[n % KINDS.len()],
            &format!("n{n}"),
            location_of(n),
        );
        ids.push(id);
    }
    engine
}

/// Location given to node `n` by [`engine_from_parents`].
pub fn location_of(n: usize) -> SourceLocation {
    SourceLocation::new("gen.c", u32::try_from(n).expect("small test trees"), 1)
}

/// Spellings in the pre-order the engine will visit them.
pub fn expected_preorder(parents: &[usize]) -> Vec<String> {
    let mut children = vec![Vec::new(); parents.len() + 1];
    for (i, &parent) in parents.iter().enumerate() {
        children[parent].push(i + 1);
    }

    let mut order = Vec::new();
    let mut stack = vec![0];
    while let Some(n) = stack.pop() {
        order.push(if n == 0 {
            "gen.c".to_string()
        } else {
            format!("n{n}")
        });
        stack.extend(children[n].iter().rev());
    }
    order
}

/// Script for `int main(){return 0;}`.
pub fn main_returning_zero() -> ScriptedEngine {
    let at = |column| SourceLocation::new("main.c", 1, column);
    let mut engine = ScriptedEngine::new("main.c");
    let main = engine.child(engine.root_id(), "FunctionDecl", "main", at(5));
    let body = engine.child(main, "CompoundStmt", "", at(11));
    let ret = engine.child(body, "ReturnStmt", "", at(12));
    engine.child(ret, "IntegerLiteral", "", at(19));
    engine
}
