use serde_json::Value;
use std::path::Path;
use tracing::debug;

use super::types::Graph;
use super::GraphError;

/// Serialization formats accepted for graph payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Json,
    Yaml,
}

impl GraphFormat {
    /// Pick a format from a file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => GraphFormat::Yaml,
            _ => GraphFormat::Json,
        }
    }
}

/// Keys under which callers commonly nest the graph: the generate request body
/// (`graph`) and the persisted project record (`graphData` / `graph_data`).
const ENVELOPE_KEYS: [&str; 3] = ["graph", "graphData", "graph_data"];

fn unwrap_envelope(mut value: Value) -> Value {
    for key in ENVELOPE_KEYS {
        if let Some(inner) = value.get_mut(key) {
            if inner.is_object() {
                return inner.take();
            }
        }
    }
    value
}

/// Parse a graph from text.
///
/// Accepts either a bare `{ nodes, edges }` document or one wrapped in a
/// request/project envelope.
pub fn parse_graph(content: &str, format: GraphFormat) -> Result<Graph, GraphError> {
    let value: Value = match format {
        GraphFormat::Json => serde_json::from_str(content)?,
        GraphFormat::Yaml => serde_yaml::from_str(content)?,
    };
    let graph: Graph = serde_json::from_value(unwrap_envelope(value))?;
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "parsed graph"
    );
    Ok(graph)
}

/// Read and parse a graph file, choosing the format from its extension.
pub fn load_graph(path: &Path) -> Result<Graph, GraphError> {
    let content = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph(&content, GraphFormat::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FieldType, HttpMethod, NodeKind, NodeType};

    const EDITOR_JSON: &str = r#"{
        "nodes": [
            { "id": "1", "type": "model", "position": { "x": 100, "y": 100 },
              "data": { "label": "User", "fields": [
                  { "name": "email", "type": "String", "required": true },
                  { "name": "meta", "type": "Json" }
              ] } },
            { "id": "2", "type": "service", "data": { "label": "AuthService" } },
            { "id": "3", "type": "route", "data": { "label": "AuthRoutes",
              "fields": [], "rules": [],
              "endpoints": [{ "method": "POST", "path": "/register", "name": "Register" }] } },
            { "id": "4", "type": "database", "data": { "label": "Postgres" } },
            { "id": "5", "type": "controller", "data": { "label": "AuthController", "rules": null } }
        ],
        "edges": [ { "id": "e1-2", "source": "1", "target": "2" } ]
    }"#;

    #[test]
    fn test_parse_editor_payload() {
        let graph = parse_graph(EDITOR_JSON, GraphFormat::Json).unwrap();
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.edges.len(), 1);

        let user = graph.node("1").unwrap();
        assert_eq!(user.label, "User");
        assert_eq!(user.fields().len(), 2);
        assert!(user.fields()[0].required);
        assert!(!user.fields()[1].required);
        assert_eq!(user.fields()[1].field_type, FieldType::Other("Json".into()));
        assert!(user.extra.contains_key("position"));

        let service = graph.node("2").unwrap();
        assert_eq!(service.kind, NodeKind::Service { rules: vec![] });

        let route = graph.node("3").unwrap();
        assert_eq!(route.endpoints()[0].method, HttpMethod::Post);

        assert_eq!(graph.node("4").unwrap().node_type(), NodeType::Database);
        assert!(graph.node("5").unwrap().rules().is_empty());
    }

    #[test]
    fn test_parse_request_envelope() {
        let body = format!(r#"{{ "graph": {EDITOR_JSON}, "language": "node" }}"#);
        let graph = parse_graph(&body, GraphFormat::Json).unwrap();
        assert_eq!(graph.nodes.len(), 5);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
nodes:
  - id: m
    type: model
    data:
      label: Product
      fields:
        - { name: price, type: Number, required: true }
edges: []
"#;
        let graph = parse_graph(yaml, GraphFormat::Yaml).unwrap();
        assert_eq!(graph.nodes[0].fields()[0].field_type, FieldType::Number);
    }

    #[test]
    fn test_unknown_node_type_is_rejected() {
        let json = r#"{ "nodes": [ { "id": "x", "type": "queue", "data": { "label": "Q" } } ] }"#;
        let err = parse_graph(json, GraphFormat::Json).unwrap_err();
        assert!(err.to_string().contains("queue"));
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let graph = parse_graph("{}", GraphFormat::Json).unwrap();
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_load_graph_missing_file() {
        let err = load_graph(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }

    #[test]
    fn test_round_trip_keeps_editor_keys() {
        let graph = parse_graph(EDITOR_JSON, GraphFormat::Json).unwrap();
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"][0]["position"]["x"], 100);
        assert_eq!(json["nodes"][0]["type"], "model");
        assert_eq!(json["nodes"][0]["data"]["fields"][1]["type"], "Json");
        let again: Graph = serde_json::from_value(json).unwrap();
        assert_eq!(again, graph);
    }

    #[test]
    fn test_round_trip_keeps_unknown_data_and_edge_keys() {
        let json = r#"{
            "nodes": [
                { "id": "s", "type": "service", "selected": true,
                  "data": { "label": "Billing", "config": { "retries": 3 },
                            "fields": [], "rules": [{ "name": "Charge", "description": "" }] } },
                { "id": "d", "type": "database",
                  "data": { "label": "Postgres", "endpoints": [] } }
            ],
            "edges": [ { "id": "e", "source": "s", "target": "d",
                         "sourceHandle": "right", "animated": true } ]
        }"#;
        let graph = parse_graph(json, GraphFormat::Json).unwrap();
        let service = graph.node("s").unwrap();
        assert_eq!(service.rules().len(), 1);
        assert_eq!(service.data_extra["fields"], serde_json::json!([]));
        assert_eq!(graph.edges[0].extra["sourceHandle"], "right");

        let saved = serde_json::to_value(&graph).unwrap();
        let data = &saved["nodes"][0]["data"];
        assert_eq!(data["config"]["retries"], 3);
        assert_eq!(data["fields"], serde_json::json!([]));
        assert_eq!(data["rules"][0]["name"], "Charge");
        assert_eq!(saved["nodes"][0]["selected"], true);
        assert_eq!(saved["nodes"][1]["data"]["endpoints"], serde_json::json!([]));
        assert_eq!(saved["edges"][0]["sourceHandle"], "right");
        assert_eq!(saved["edges"][0]["animated"], true);

        let again: Graph = serde_json::from_value(saved).unwrap();
        assert_eq!(again, graph);
    }
}
