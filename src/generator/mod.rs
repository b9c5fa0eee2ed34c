//! # Generator Module
//!
//! Turns an architecture [`Graph`](crate::graph::Graph) into a runnable project
//! scaffold for one of five backend stacks.
//!
//! ## Overview
//!
//! Every target produces the same kinds of artifacts:
//! - **Descriptor** - `openapi.json`, identical across targets
//! - **Manifest + Entrypoint** - dependency file and a runnable server that
//!   serves the descriptor
//! - **Models** - one record/type definition per model node
//! - **Services** - one data-access stub per connected model plus one stub per rule
//! - **Controllers** - handlers forwarding to the connected services
//! - **Routes** - one registration per endpoint, normalized path
//! - **Packaging** - `Dockerfile`, `README.md` and ecosystem extras
//!
//! ## Architecture
//!
//! ```text
//! Graph → EmitterRegistry::resolve(target) → emit_project(dialect) → FileTree
//! ```
//!
//! The traversal in [`emit_project`] is written once. It resolves every
//! relationship through the graph's undirected edges and hands read-only views
//! to a [`Dialect`], which only decides how each artifact is spelled (type table,
//! casing, file naming, persistence boilerplate). Any `Dialect` is an
//! [`Emitter`], and the [`EmitterRegistry`] maps [`Target`]s to emitters.
//!
//! ## Targets
//!
//! | Selector | Stack |
//! |----------|-------|
//! | `node`   | Express + Mongoose |
//! | `python` | FastAPI + SQLAlchemy + Pydantic |
//! | `go`     | Gin + GORM |
//! | `java`   | Spring Boot + JPA + Lombok |
//! | `csharp` | ASP.NET Core + EF Core |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arachnet::generator::Generator;
//!
//! let generator = Generator::default();
//! let archive = generator.archive(&graph, "python", Some("shop"))?;
//! std::fs::write(&archive.file_name, archive.bytes)?;
//! ```
//!
//! ## Template Customization
//!
//! Fixed boilerplate (manifests, entrypoints, Dockerfiles, READMEs) is rendered
//! from Askama templates under `templates/`; graph-dependent sources are
//! assembled line by line with [`naming::SourceBuilder`].

mod dialect;
pub mod naming;
mod project;
mod registry;
mod skeleton;
mod target;
pub mod targets;
mod templates;
mod tree;

use thiserror::Error;

pub use dialect::{
    ControllerView, Dialect, ModelView, ProjectContext, RouteView, ServiceLink, ServiceView,
    SourceFile, TypeTable,
};
pub use project::{GeneratedArchive, Generator};
pub use registry::EmitterRegistry;
pub use skeleton::{emit_project, EmitOptions, Emitter, DEFAULT_PACKAGE_NAME, DESCRIPTOR_FILE};
pub use target::Target;
pub use tree::{Entry, FileTree, TreeError, TreeItem};

/// Failures selecting what to generate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("unsupported target '{0}'")]
    UnsupportedTarget(String),

    #[error("no emitter registered for target '{0}'")]
    NotRegistered(Target),
}
