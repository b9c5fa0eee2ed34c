//! # Graph Linter Module
//!
//! Advisory checks for architecture graphs. Generation never consults the
//! linter; it tolerates every problem reported here, usually by dropping or
//! overwriting something. The linter tells the user what will happen.
//!
//! ## Checks Performed
//!
//! 1. **duplicate_node_id** - two nodes share an id (error)
//! 2. **dangling_edge** - an edge endpoint names no node (warning)
//! 3. **self_loop** - an edge connects a node to itself (info)
//! 4. **empty_label** - a node without a label yields unnamed files (warning)
//! 5. **file_name_collision** - same-kind nodes whose labels differ only in case
//!    write the same file (warning)
//! 6. **duplicate_field** - a model declares a field twice (warning)
//! 7. **unknown_field_type** - the field becomes the target's "any" type (info)
//! 8. **empty_rule_name** - the stub gets a positional name (warning)
//! 9. **route_collision** - two endpoints share method and path; the last one
//!    wins in the descriptor (warning)
//! 10. **annotation_only** - database/auth/middleware nodes emit nothing (info)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arachnet::linter::{lint_graph_file, print_lint_issues};
//!
//! let issues = lint_graph_file("architecture.json".as_ref())?;
//! print_lint_issues(&issues);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use anyhow::Context;

use crate::graph::{load_graph, Graph, NodeKind};

#[cfg(test)]
mod tests;

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Error - the graph is ambiguous and output depends on node order
    Error,
    /// Warning - generation silently drops or overwrites something
    Warning,
    /// Info - worth knowing, nothing is lost
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        })
    }
}

/// A lint issue found in a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "node:m1", "edge:e3", "model:User.email")
    pub location: String,
    pub severity: LintSeverity,
    /// Check that produced the issue (e.g., "dangling_edge")
    pub kind: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Load a graph file and lint it.
pub fn lint_graph_file(path: &Path) -> anyhow::Result<Vec<LintIssue>> {
    let graph =
        load_graph(path).with_context(|| format!("Failed to load graph {}", path.display()))?;
    Ok(lint_graph(&graph))
}

/// Run every check; issues are ordered by check, then by graph order.
pub fn lint_graph(graph: &Graph) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    lint_node_ids(graph, &mut issues);
    lint_edges(graph, &mut issues);
    lint_labels(graph, &mut issues);
    lint_fields(graph, &mut issues);
    lint_rules(graph, &mut issues);
    lint_routes(graph, &mut issues);
    lint_annotation_nodes(graph, &mut issues);
    issues
}

pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

fn lint_node_ids(graph: &Graph, issues: &mut Vec<LintIssue>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
            issues.push(
                LintIssue::new(
                    format!("node:{}", node.id),
                    LintSeverity::Error,
                    "duplicate_node_id",
                    format!("Node id '{}' is used by more than one node", node.id),
                )
                .with_suggestion("Give every node a unique id; edges resolve to all of them"),
            );
        }
    }
}

fn lint_edges(graph: &Graph, issues: &mut Vec<LintIssue>) {
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &graph.edges {
        let location = format!("edge:{}", edge.id);
        for end in [&edge.source, &edge.target] {
            if !ids.contains(end.as_str()) {
                issues.push(
                    LintIssue::new(
                        location.clone(),
                        LintSeverity::Warning,
                        "dangling_edge",
                        format!("Edge endpoint '{end}' does not match any node"),
                    )
                    .with_suggestion("Remove the edge or restore the missing node"),
                );
            }
        }
        if edge.source == edge.target {
            issues.push(LintIssue::new(
                location,
                LintSeverity::Info,
                "self_loop",
                format!("Edge connects '{}' to itself", edge.source),
            ));
        }
    }
}

fn lint_labels(graph: &Graph, issues: &mut Vec<LintIssue>) {
    let mut stems: HashMap<(String, String), &str> = HashMap::new();
    for node in &graph.nodes {
        if node.node_type().is_annotation_only() {
            continue;
        }
        if node.label.trim().is_empty() {
            issues.push(
                LintIssue::new(
                    format!("node:{}", node.id),
                    LintSeverity::Warning,
                    "empty_label",
                    format!("{} node '{}' has no label", node.node_type(), node.id),
                )
                .with_suggestion("Label the node; generated file and type names come from it"),
            );
            continue;
        }
        let key = (
            node.node_type().as_str().to_string(),
            node.label.to_lowercase(),
        );
        if let Some(first) = stems.get(&key) {
            issues.push(LintIssue::new(
                format!("node:{}", node.id),
                LintSeverity::Warning,
                "file_name_collision",
                format!(
                    "{} '{}' generates the same file as '{}'; the later node overwrites it",
                    node.node_type(),
                    node.label,
                    first
                ),
            ));
        } else {
            stems.insert(key, node.label.as_str());
        }
    }
}

fn lint_fields(graph: &Graph, issues: &mut Vec<LintIssue>) {
    for node in &graph.nodes {
        let NodeKind::Model { fields } = &node.kind else {
            continue;
        };
        let mut seen = HashSet::new();
        for field in fields {
            let location = format!("model:{}.{}", node.label, field.name);
            if !seen.insert(field.name.as_str()) {
                issues.push(LintIssue::new(
                    location.clone(),
                    LintSeverity::Warning,
                    "duplicate_field",
                    format!("Field '{}' is declared more than once", field.name),
                ));
            }
            if !field.field_type.is_recognized() {
                issues.push(
                    LintIssue::new(
                        location,
                        LintSeverity::Info,
                        "unknown_field_type",
                        format!(
                            "Field type '{}' is not recognized and maps to each target's generic type",
                            field.field_type.as_str()
                        ),
                    )
                    .with_suggestion("Use String, Number, Boolean, Date or ObjectId"),
                );
            }
        }
    }
}

fn lint_rules(graph: &Graph, issues: &mut Vec<LintIssue>) {
    for node in &graph.nodes {
        for (i, rule) in node.rules().iter().enumerate() {
            if rule.name.trim().is_empty() {
                issues.push(LintIssue::new(
                    format!("{}:{}.rules[{i}]", node.node_type(), node.label),
                    LintSeverity::Warning,
                    "empty_rule_name",
                    "Rule has no name; its stub gets a positional name",
                ));
            }
        }
    }
}

fn lint_routes(graph: &Graph, issues: &mut Vec<LintIssue>) {
    let mut seen: HashMap<(String, &'static str), String> = HashMap::new();
    for node in &graph.nodes {
        for endpoint in node.endpoints() {
            let path = endpoint.normalized_path();
            let key = (path.clone(), endpoint.method.as_str());
            let owner = format!("{}.{}", node.label, endpoint.name);
            if let Some(previous) = seen.insert(key, owner.clone()) {
                issues.push(
                    LintIssue::new(
                        format!("route:{owner}"),
                        LintSeverity::Warning,
                        "route_collision",
                        format!(
                            "{} {path} is also declared by {previous}; only the last declaration is described",
                            endpoint.method
                        ),
                    )
                    .with_suggestion("Give each endpoint a distinct method and path"),
                );
            }
        }
    }
}

fn lint_annotation_nodes(graph: &Graph, issues: &mut Vec<LintIssue>) {
    for node in &graph.nodes {
        if node.node_type().is_annotation_only() {
            issues.push(LintIssue::new(
                format!("node:{}", node.id),
                LintSeverity::Info,
                "annotation_only",
                format!(
                    "{} node '{}' is documentation only and does not affect generated code",
                    node.node_type(),
                    node.label
                ),
            ));
        }
    }
}

fn print_group(title: &str, issues: &[&LintIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("{title}");
    for issue in issues {
        println!("   [{}] {}", issue.kind, issue.location);
        println!("      {}", issue.message);
        if let Some(suggestion) = &issue.suggestion {
            println!("      💡 Suggestion: {}", suggestion);
        }
    }
    println!();
}

/// Print lint issues in a formatted way
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let by = |severity: LintSeverity| -> Vec<&LintIssue> {
        issues.iter().filter(|i| i.severity == severity).collect()
    };
    let errors = by(LintSeverity::Error);
    let warnings = by(LintSeverity::Warning);
    let infos = by(LintSeverity::Info);

    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    print_group("❌ Errors (must fix):", &errors);
    print_group("⚠️  Warnings (should fix):", &warnings);
    print_group("ℹ️  Info:", &infos);
}

/// Exit with error code if there are any error-level lint issues
pub fn fail_if_errors(issues: &[LintIssue]) {
    if has_errors(issues) {
        print_lint_issues(issues);
        std::process::exit(1);
    }
}
