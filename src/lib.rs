//! # Arachnet
//!
//! **Arachnet** turns an architecture diagram, a graph of models, services,
//! controllers and routes, into a runnable backend scaffold for one of five
//! stacks, together with an [OpenAPI 3.0](https://spec.openapis.org/oas/v3.0.0)
//! descriptor of the API the graph declares.
//!
//! ## Architecture
//!
//! - **[`graph`]** - graph types, JSON/YAML loading and neighbor resolution
//! - **[`descriptor`]** - OpenAPI descriptor built from models and endpoints
//! - **[`generator`]** - target registry, the shared emission skeleton and the
//!   five stack dialects
//! - **[`assembler`]** - zip packaging, previews and directory output
//! - **[`store`]** - save and reload graphs by id
//! - **[`linter`]** - advisory graph checks
//! - **[`config`]** / **[`logging`]** - TOML + environment configuration and
//!   `tracing` setup
//! - **[`cli`]** - the `arachnet-gen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(arachnet-gen)
//!     participant Registry as EmitterRegistry
//!     participant Skeleton as emit_project
//!     participant Dialect as Dialect<br/>(node/python/go/java/csharp)
//!     participant Assembler as assembler
//!
//!     User->>CLI: generate --graph g.json --target go
//!     CLI->>Registry: resolve("go")
//!     Registry-->>CLI: &dyn Emitter
//!     CLI->>Skeleton: emit_with(tree, graph, options)
//!     Skeleton->>Skeleton: build_descriptor → openapi.json
//!     loop every node
//!         Skeleton->>Skeleton: resolve neighbors
//!         Skeleton->>Dialect: model/service/controller/route file
//!         Dialect-->>Skeleton: SourceFile
//!     end
//!     Skeleton-->>CLI: FileTree
//!     CLI->>Assembler: serialize(tree)
//!     Assembler-->>User: <project>.zip
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use arachnet::generator::Generator;
//! use arachnet::graph::load_graph;
//! use std::path::Path;
//!
//! let graph = load_graph(Path::new("architecture.json")).expect("load graph");
//! let archive = Generator::default()
//!     .archive(&graph, "python", Some("shop"))
//!     .expect("generate");
//! std::fs::write(&archive.file_name, &archive.bytes).expect("write archive");
//! ```
//!
//! ## Graph Format
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "1", "type": "model",
//!       "data": { "label": "User",
//!                 "fields": [{ "name": "email", "type": "String", "required": true }] } },
//!     { "id": "2", "type": "route",
//!       "data": { "label": "Users",
//!                 "endpoints": [{ "name": "ListUsers", "method": "GET", "path": "/users" }] } }
//!   ],
//!   "edges": [{ "id": "e1", "source": "2", "target": "1" }]
//! }
//! ```
//!
//! Edges are undirected. Database, auth and middleware nodes are accepted and
//! preserved but produce no code.

pub mod assembler;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod generator;
pub mod graph;
pub mod linter;
pub mod logging;
pub mod store;

pub use descriptor::{build_descriptor, Descriptor, DescriptorInfo};
pub use generator::{EmitterRegistry, GenerateError, Generator, Target};
pub use graph::{load_graph, parse_graph, Graph, GraphError, Node, NodeKind};
