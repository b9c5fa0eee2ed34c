//! The five shipped dialects.
//!
//! Each module holds a unit struct implementing [`Dialect`](super::Dialect):
//! its type table, directory layout and the per-artifact spelling. Nothing in
//! here walks the graph; that is [`emit_project`](super::emit_project)'s job.

mod csharp;
mod go;
mod java;
mod node;
mod python;

pub use csharp::CSharpDialect;
pub use go::GoDialect;
pub use java::JavaDialect;
pub use node::NodeDialect;
pub use python::PythonDialect;

use crate::graph::{NodeKind, NodeType};

use super::dialect::{ProjectContext, SourceFile};
use super::naming::{capitalize_first, file_stem, lower_first};
use super::target::Target;
use super::templates::{render, EndpointLine, ReadmeTemplate, RouteMount};

/// Route modules an entrypoint mounts, in graph order.
fn route_mounts(ctx: &ProjectContext<'_>) -> Vec<RouteMount> {
    ctx.labels(NodeType::Route)
        .into_iter()
        .map(|label| RouteMount {
            stem: file_stem(label),
            ident: capitalize_first(label),
            var: lower_first(label),
        })
        .collect()
}

fn readme(
    ctx: &ProjectContext<'_>,
    target: Target,
    run: Vec<&'static str>,
    docs_path: &'static str,
) -> anyhow::Result<SourceFile> {
    let endpoints = ctx
        .graph
        .nodes
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Route { endpoints } => Some(endpoints),
            _ => None,
        })
        .flatten()
        .map(|ep| EndpointLine {
            method: ep.method.as_str().to_string(),
            path: ep.normalized_path(),
            name: ep.name.clone(),
        })
        .collect();
    let info = &ctx.descriptor.info;
    render(
        &ReadmeTemplate {
            title: &info.title,
            description: &info.description,
            stack: target.display_name(),
            run,
            docs_path,
            models: ctx
                .labels(NodeType::Model)
                .into_iter()
                .map(str::to_string)
                .collect(),
            endpoints,
        },
        "README.md",
    )
}
