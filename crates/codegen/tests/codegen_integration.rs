//! Integration tests for the full generation pipeline.
//!
//! These drive the parser and generator together against a filesystem
//! sink and verify the emitted Java files, mirroring how the CLI uses
//! the crates.

use std::fs;

use astgen_codegen::{DirectorySink, Generator};
use astgen_core::parser;

const EXPR_GRAMMAR: &str = "\
#root Node
#generate_root yes
#visitor NodeVisitor
Expr ::= Lit(val: int) | Add(l: Expr, r: Expr)
";

#[test]
fn generates_expected_file_set() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut sink = DirectorySink::new(dir.path());
    let mut gen = Generator::new(&mut sink);

    parser::parse(EXPR_GRAMMAR, "expr.ast", &mut gen).expect("parse failed");
    gen.finish();
    assert!(gen.warnings().is_empty(), "warnings: {:?}", gen.warnings());
    assert!(gen.emit_failures().is_empty());
    drop(gen);

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "Add.java",
            "Expr.java",
            "Lit.java",
            "Node.java",
            "NodeVisitor.java"
        ]
    );
}

#[test]
fn visitor_class_lists_methods_in_emission_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut sink = DirectorySink::new(dir.path());
    let mut gen = Generator::new(&mut sink);
    parser::parse(EXPR_GRAMMAR, "expr.ast", &mut gen).expect("parse failed");
    gen.finish();
    drop(gen);

    let visitor = fs::read_to_string(dir.path().join("NodeVisitor.java")).unwrap();
    assert!(visitor.contains("abstract class NodeVisitor {"));
    assert_eq!(visitor.matches("public abstract").count(), 2);
    let lit = visitor.find("public abstract void visitLit (Lit n);").unwrap();
    let add = visitor.find("public abstract void visitAdd (Add n);").unwrap();
    assert!(lit < add);
}

#[test]
fn generated_class_is_complete() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut sink = DirectorySink::new(dir.path());
    let mut gen = Generator::new(&mut sink);
    parser::parse(EXPR_GRAMMAR, "expr.ast", &mut gen).expect("parse failed");
    gen.finish();
    drop(gen);

    let add = fs::read_to_string(dir.path().join("Add.java")).unwrap();
    assert!(add.starts_with("// Add.java\n"));
    assert!(add.contains("class Add extends Expr {"));
    assert!(add.contains("private Expr l;"));
    assert!(add.contains("private Expr r;"));
    assert!(add.contains("public Add (Expr l, Expr r) {"));
    assert!(add.contains("this.l = l;"));
    assert!(add.contains("public Expr getL () { return l; }"));
    assert!(add.contains("public void accept (NodeVisitor v) {"));
    assert!(add.contains("v.visitAdd(this);"));

    let root = fs::read_to_string(dir.path().join("Node.java")).unwrap();
    assert!(root.contains("abstract class Node {"));
    assert!(root.contains("public abstract void accept (NodeVisitor v);"));
}

#[test]
fn overwrites_on_repeated_generation() {
    let dir = tempfile::tempdir().expect("temp dir");
    for _ in 0..2 {
        let mut sink = DirectorySink::new(dir.path());
        let mut gen = Generator::new(&mut sink);
        parser::parse("Point ::= Point(x: int)", "point.ast", &mut gen).expect("parse failed");
        gen.finish();
        assert!(gen.emit_failures().is_empty());
    }
    let point = fs::read_to_string(dir.path().join("Point.java")).unwrap();
    assert!(point.contains("class Point extends Object {"));
}

#[test]
fn emit_failures_name_the_artifact() {
    // Point the sink at a path that cannot be a directory.
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut sink = DirectorySink::new(&blocker);
    let mut gen = Generator::new(&mut sink);
    parser::parse("Point ::= Point(x: int)", "point.ast", &mut gen).expect("parse failed");
    gen.finish();
    assert_eq!(gen.emit_failures().len(), 1);
    assert_eq!(gen.emit_failures()[0].artifact, "Point");
}
