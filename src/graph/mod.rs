//! # Graph Module
//!
//! In-memory representation of the architecture graph drawn in the editor, plus
//! loading and connectivity helpers.
//!
//! - [`types`] - nodes, edges and per-kind payloads (fields, rules, endpoints)
//! - [`load`] - JSON/YAML parsing, tolerant of missing collections
//! - [`connectivity`] - undirected neighbor resolution
//!
//! The generation core treats a [`Graph`] as immutable input for one request.

pub mod connectivity;
mod load;
mod types;

use std::path::PathBuf;
use thiserror::Error;

pub use connectivity::neighbors;
pub use load::{load_graph, parse_graph, GraphFormat};
pub use types::{
    normalize_path, Edge, Endpoint, Field, FieldType, Graph, HttpMethod, Node, NodeKind,
    NodeType, Rule,
};

/// Errors raised while reading a graph payload.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("failed to read graph file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid graph YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("unknown HTTP method '{0}'")]
    UnknownMethod(String),
}
