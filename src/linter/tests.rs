#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the graph linter

use crate::graph::{Edge, Endpoint, Field, Graph, HttpMethod, Node, NodeKind, Rule};
use crate::linter::{has_errors, lint_graph, lint_graph_file, LintIssue, LintSeverity};
use std::io::Write;
use tempfile::NamedTempFile;

fn of_kind<'a>(issues: &'a [LintIssue], kind: &str) -> Vec<&'a LintIssue> {
    issues.iter().filter(|i| i.kind == kind).collect()
}

#[test]
fn test_clean_graph_has_no_issues() {
    let graph = Graph::new(
        vec![
            Node::model("m1", "User", vec![Field::new("email", "String", true)]),
            Node::service("s1", "Accounts", vec![Rule::new("Register", "")]),
        ],
        vec![Edge::new("e1", "s1", "m1")],
    );
    assert_eq!(lint_graph(&graph), vec![]);
}

#[test]
fn test_duplicate_node_id_is_an_error() {
    let graph = Graph::new(
        vec![
            Node::model("x", "User", vec![]),
            Node::model("x", "Order", vec![]),
            Node::model("x", "Item", vec![]),
        ],
        vec![],
    );
    let issues = lint_graph(&graph);
    let dupes = of_kind(&issues, "duplicate_node_id");
    assert_eq!(dupes.len(), 1, "reported once per id");
    assert_eq!(dupes[0].severity, LintSeverity::Error);
    assert!(has_errors(&issues));
}

#[test]
fn test_dangling_edge_and_self_loop() {
    let graph = Graph::new(
        vec![Node::model("m1", "User", vec![])],
        vec![Edge::new("e1", "m1", "ghost"), Edge::new("e2", "m1", "m1")],
    );
    let issues = lint_graph(&graph);

    let dangling = of_kind(&issues, "dangling_edge");
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].location, "edge:e1");
    assert!(dangling[0].message.contains("ghost"));

    let loops = of_kind(&issues, "self_loop");
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].severity, LintSeverity::Info);
    assert!(!has_errors(&issues));
}

#[test]
fn test_labels() {
    let graph = Graph::new(
        vec![
            Node::model("m1", "", vec![]),
            Node::service("s1", "Store", vec![]),
            Node::service("s2", "STORE", vec![]),
            Node::controller("c1", "Store", vec![]),
        ],
        vec![],
    );
    let issues = lint_graph(&graph);
    assert_eq!(of_kind(&issues, "empty_label").len(), 1);
    let collisions = of_kind(&issues, "file_name_collision");
    assert_eq!(collisions.len(), 1, "only same-kind labels collide");
    assert_eq!(collisions[0].location, "node:s2");
}

#[test]
fn test_model_fields() {
    let graph = Graph::new(
        vec![Node::model(
            "m1",
            "User",
            vec![
                Field::new("email", "String", true),
                Field::new("email", "String", false),
                Field::new("tags", "Array", false),
            ],
        )],
        vec![],
    );
    let issues = lint_graph(&graph);
    let dupes = of_kind(&issues, "duplicate_field");
    assert_eq!(dupes.len(), 1);
    assert_eq!(dupes[0].location, "model:User.email");

    let unknown = of_kind(&issues, "unknown_field_type");
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].message.contains("'Array'"));
    assert!(unknown[0].suggestion.is_some());
}

#[test]
fn test_empty_rule_name() {
    let graph = Graph::new(
        vec![Node::controller(
            "c1",
            "Shop",
            vec![Rule::new("Checkout", ""), Rule::new("  ", "blank")],
        )],
        vec![],
    );
    let issues = lint_graph(&graph);
    let empty = of_kind(&issues, "empty_rule_name");
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].location, "controller:Shop.rules[1]");
}

#[test]
fn test_route_collision_after_normalization() {
    let graph = Graph::new(
        vec![
            Node::route(
                "r1",
                "Users",
                vec![Endpoint::new("List", HttpMethod::Get, "users")],
            ),
            Node::route(
                "r2",
                "Admin",
                vec![
                    Endpoint::new("ListAll", HttpMethod::Get, "/users"),
                    Endpoint::new("Create", HttpMethod::Post, "/users"),
                ],
            ),
        ],
        vec![],
    );
    let issues = lint_graph(&graph);
    let collisions = of_kind(&issues, "route_collision");
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].location, "route:Admin.ListAll");
    assert!(collisions[0].message.contains("Users.List"));
}

#[test]
fn test_annotation_only_nodes() {
    let graph = Graph::new(
        vec![
            Node::new("d1", "MainDb", NodeKind::Database),
            Node::new("a1", "Jwt", NodeKind::Auth),
            Node::new("w1", "Cors", NodeKind::Middleware),
        ],
        vec![],
    );
    let issues = lint_graph(&graph);
    let notes = of_kind(&issues, "annotation_only");
    assert_eq!(notes.len(), 3);
    assert!(notes.iter().all(|i| i.severity == LintSeverity::Info));
    assert!(notes[0].message.starts_with("database node 'MainDb'"));
}

#[test]
fn test_lint_graph_file() {
    let mut temp = NamedTempFile::with_suffix(".json").expect("create temp file");
    temp.write_all(
        br#"{"nodes":[{"id":"m1","type":"model","data":{"label":"User"}}],"edges":[{"id":"e1","source":"m1","target":"zz"}]}"#,
    )
    .expect("write graph");
    temp.flush().expect("flush");
    let issues = lint_graph_file(temp.path()).expect("lint graph");
    assert_eq!(of_kind(&issues, "dangling_edge").len(), 1);
}
