use anyhow::Context;
use tracing::{debug, info};

use crate::descriptor::{build_descriptor_with, DescriptorInfo};
use crate::graph::{Graph, NodeKind, NodeType};

use super::dialect::{
    ControllerView, Dialect, ModelView, ProjectContext, RouteView, ServiceLink, ServiceView,
    SourceFile,
};
use super::naming::slugify;
use super::target::Target;
use super::tree::FileTree;

/// File name of the descriptor copy every target carries at its root.
pub const DESCRIPTOR_FILE: &str = "openapi.json";

/// Package name used when the caller does not name the project.
pub const DEFAULT_PACKAGE_NAME: &str = "arachnet-api";

/// Per-request knobs shared by every target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Metadata for the generated descriptor.
    pub info: DescriptorInfo,
    /// Slug used for package/module names in manifests.
    pub package_name: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            info: DescriptorInfo::default(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
        }
    }
}

impl EmitOptions {
    /// Derive the package slug from a user supplied project name, keeping the
    /// default when the name has no usable characters.
    pub fn with_project_name(mut self, name: Option<&str>) -> Self {
        if let Some(slug) = name.map(slugify).filter(|s| !s.is_empty()) {
            self.package_name = slug;
        }
        self
    }
}

/// Translates a graph into one target ecosystem's source tree.
pub trait Emitter: Send + Sync {
    fn target(&self) -> Target;

    fn emit_with(
        &self,
        tree: &mut FileTree,
        graph: &Graph,
        options: &EmitOptions,
    ) -> anyhow::Result<()>;

    fn emit(&self, tree: &mut FileTree, graph: &Graph) -> anyhow::Result<()> {
        self.emit_with(tree, graph, &EmitOptions::default())
    }
}

impl<D: Dialect> Emitter for D {
    fn target(&self) -> Target {
        Dialect::target(self)
    }

    fn emit_with(
        &self,
        tree: &mut FileTree,
        graph: &Graph,
        options: &EmitOptions,
    ) -> anyhow::Result<()> {
        emit_project(self, tree, graph, options)
    }
}

fn write(tree: &mut FileTree, file: SourceFile) -> anyhow::Result<()> {
    debug!(path = %file.path, bytes = file.contents.len(), "emitting file");
    tree.add_file(&file.path, file.contents)
        .with_context(|| format!("Failed to add {} to the project tree", file.path))
}

fn write_all(tree: &mut FileTree, files: Vec<SourceFile>) -> anyhow::Result<()> {
    files.into_iter().try_for_each(|f| write(tree, f))
}

/// The traversal every target shares.
///
/// 1. descriptor, layout directories, manifest and entrypoint
/// 2. one artifact set per model, service, controller and route node, with
///    relationships resolved through the graph's undirected edges
/// 3. graph-independent packaging files
pub fn emit_project<D: Dialect + ?Sized>(
    dialect: &D,
    tree: &mut FileTree,
    graph: &Graph,
    options: &EmitOptions,
) -> anyhow::Result<()> {
    let target = Dialect::target(dialect);
    let descriptor = build_descriptor_with(graph, options.info.clone());
    let ctx = ProjectContext {
        graph,
        descriptor: &descriptor,
        package_name: options.package_name.clone(),
    };

    let descriptor_json = descriptor
        .to_pretty_json()
        .context("Failed to serialize the interface descriptor")?;
    write(tree, SourceFile::new(DESCRIPTOR_FILE, descriptor_json))?;

    for dir in dialect.layout() {
        tree.ensure_dir(dir)
            .with_context(|| format!("Failed to create directory {dir}"))?;
    }
    write_all(tree, dialect.project_files(&ctx)?)?;

    for node in &graph.nodes {
        match &node.kind {
            NodeKind::Model { fields } => {
                let view = ModelView { node, fields };
                write_all(tree, dialect.model_files(&view, &ctx))?;
            }
            NodeKind::Service { rules } => {
                let models = graph.neighbors(&node.id, Some(NodeType::Model));
                debug!(service = %node.label, models = models.len(), "resolved service models");
                let view = ServiceView {
                    node,
                    rules,
                    models,
                };
                if let Some(file) = dialect.service_file(&view, &ctx) {
                    write(tree, file)?;
                }
            }
            NodeKind::Controller { rules } => {
                let services: Vec<ServiceLink<'_>> = graph
                    .neighbors(&node.id, Some(NodeType::Service))
                    .into_iter()
                    .map(|service| ServiceLink {
                        service,
                        models: graph.neighbors(&service.id, Some(NodeType::Model)),
                    })
                    .collect();
                debug!(controller = %node.label, services = services.len(), "resolved controller services");
                let view = ControllerView {
                    node,
                    rules,
                    services,
                };
                if let Some(file) = dialect.controller_file(&view, &ctx) {
                    write(tree, file)?;
                }
            }
            NodeKind::Route { endpoints } => {
                let controllers = graph.neighbors(&node.id, Some(NodeType::Controller));
                debug!(route = %node.label, controllers = controllers.len(), "resolved route controllers");
                let view = RouteView {
                    node,
                    endpoints,
                    controllers,
                };
                if let Some(file) = dialect.route_file(&view, &ctx) {
                    write(tree, file)?;
                }
            }
            NodeKind::Database | NodeKind::Auth | NodeKind::Middleware => {
                debug!(node = %node.id, kind = %node.node_type(), "annotation-only node, nothing to emit");
            }
        }
    }

    write_all(tree, dialect.support_files(&ctx)?)?;

    info!(
        stack = %target,
        project = tree.root(),
        files = tree.file_paths().len(),
        "generated project"
    );
    Ok(())
}
