use std::collections::HashSet;

use super::types::{Edge, Node, NodeType};

/// Nodes connected to `node_id` by any edge, optionally restricted to one kind.
///
/// Edges are undirected for this purpose: a node is a neighbor whether it was
/// recorded as `source` or `target`. The result follows the order of `nodes`,
/// not the order of `edges`. Edge endpoints that name no node simply produce no
/// match.
pub fn neighbors<'g>(
    node_id: &str,
    edges: &[Edge],
    nodes: &'g [Node],
    filter: Option<NodeType>,
) -> Vec<&'g Node> {
    let connected: HashSet<&str> = edges.iter().filter_map(|e| e.other_end(node_id)).collect();
    if connected.is_empty() {
        return Vec::new();
    }
    nodes
        .iter()
        .filter(|n| connected.contains(n.id.as_str()))
        .filter(|n| filter.map_or(true, |t| n.node_type() == t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Field, Rule};

    fn ids(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn sample() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::model("m1", "User", vec![Field::new("email", "String", true)]),
            Node::model("m2", "Order", vec![]),
            Node::service("s1", "Store", vec![Rule::new("Checkout", "")]),
            Node::controller("c1", "Store", vec![]),
        ];
        let edges = vec![
            Edge::new("e1", "s1", "m2"),
            Edge::new("e2", "m1", "s1"),
            Edge::new("e3", "s1", "c1"),
        ];
        (nodes, edges)
    }

    #[test]
    fn test_neighbors_follow_node_order() {
        let (nodes, edges) = sample();
        let found = neighbors("s1", &edges, &nodes, None);
        assert_eq!(ids(&found), vec!["m1", "m2", "c1"]);
    }

    #[test]
    fn test_neighbors_filter_by_type() {
        let (nodes, edges) = sample();
        let found = neighbors("s1", &edges, &nodes, Some(NodeType::Model));
        assert_eq!(ids(&found), vec!["m1", "m2"]);
        let found = neighbors("s1", &edges, &nodes, Some(NodeType::Route));
        assert!(found.is_empty());
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let (nodes, edges) = sample();
        for edge in &edges {
            let from_source = neighbors(&edge.source, &edges, &nodes, None);
            let from_target = neighbors(&edge.target, &edges, &nodes, None);
            assert!(from_source.iter().any(|n| n.id == edge.target));
            assert!(from_target.iter().any(|n| n.id == edge.source));
        }
    }

    #[test]
    fn test_dangling_edges_are_ignored() {
        let (nodes, mut edges) = sample();
        edges.push(Edge::new("e4", "s1", "ghost"));
        edges.push(Edge::new("e5", "ghost", "m1"));
        let found = neighbors("s1", &edges, &nodes, None);
        assert_eq!(ids(&found), vec!["m1", "m2", "c1"]);
        assert!(neighbors("ghost", &edges, &nodes, None)
            .iter()
            .all(|n| n.id == "s1" || n.id == "m1"));
    }

    #[test]
    fn test_unconnected_node_has_no_neighbors() {
        let (nodes, edges) = sample();
        assert!(neighbors("missing", &edges, &nodes, None).is_empty());
    }

    #[test]
    fn test_parallel_edges_yield_node_once() {
        let (nodes, mut edges) = sample();
        edges.push(Edge::new("e6", "m2", "s1"));
        let found = neighbors("s1", &edges, &nodes, Some(NodeType::Model));
        assert_eq!(ids(&found), vec!["m1", "m2"]);
    }
}
