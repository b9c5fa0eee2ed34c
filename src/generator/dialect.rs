use crate::descriptor::Descriptor;
use crate::graph::{Endpoint, Field, FieldType, Graph, Node, NodeType, Rule};

use super::target::Target;

/// A generated file, path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Closed mapping from model field types to a target's type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTable {
    pub string: &'static str,
    pub number: &'static str,
    pub boolean: &'static str,
    pub date: &'static str,
    pub object_id: &'static str,
    /// Most permissive type, used for unrecognized field types.
    pub any: &'static str,
}

impl TypeTable {
    pub fn map(&self, field_type: &FieldType) -> &'static str {
        match field_type {
            FieldType::String => self.string,
            FieldType::Number => self.number,
            FieldType::Boolean => self.boolean,
            FieldType::Date => self.date,
            FieldType::ObjectId => self.object_id,
            FieldType::Other(_) => self.any,
        }
    }
}

/// Project-wide data available to every dialect hook.
#[derive(Debug)]
pub struct ProjectContext<'g> {
    pub graph: &'g Graph,
    pub descriptor: &'g Descriptor,
    /// Slug used for package/module names in manifests.
    pub package_name: String,
}

impl<'g> ProjectContext<'g> {
    /// Labels of all nodes of one kind, in graph order.
    pub fn labels(&self, node_type: NodeType) -> Vec<&'g str> {
        self.graph
            .nodes_of(node_type)
            .map(|n| n.label.as_str())
            .collect()
    }

    pub fn title(&self) -> &str {
        &self.descriptor.info.title
    }
}

#[derive(Debug)]
pub struct ModelView<'g> {
    pub node: &'g Node,
    pub fields: &'g [Field],
}

impl ModelView<'_> {
    pub fn name(&self) -> &str {
        &self.node.label
    }
}

/// A service node with the models it is connected to.
#[derive(Debug)]
pub struct ServiceView<'g> {
    pub node: &'g Node,
    pub rules: &'g [Rule],
    pub models: Vec<&'g Node>,
}

impl ServiceView<'_> {
    pub fn name(&self) -> &str {
        &self.node.label
    }
}

/// A service reachable from a controller, together with that service's models.
#[derive(Debug)]
pub struct ServiceLink<'g> {
    pub service: &'g Node,
    pub models: Vec<&'g Node>,
}

impl ServiceLink<'_> {
    pub fn name(&self) -> &str {
        &self.service.label
    }
}

#[derive(Debug)]
pub struct ControllerView<'g> {
    pub node: &'g Node,
    pub rules: &'g [Rule],
    pub services: Vec<ServiceLink<'g>>,
}

impl ControllerView<'_> {
    pub fn name(&self) -> &str {
        &self.node.label
    }

    /// Every (service, model) pair, in resolution order.
    pub fn handler_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.services.iter().flat_map(|link| {
            link.models
                .iter()
                .map(move |m| (link.service.label.as_str(), m.label.as_str()))
        })
    }
}

#[derive(Debug)]
pub struct RouteView<'g> {
    pub node: &'g Node,
    pub endpoints: &'g [Endpoint],
    pub controllers: Vec<&'g Node>,
}

impl RouteView<'_> {
    pub fn name(&self) -> &str {
        &self.node.label
    }
}

/// Per-target rendering hooks driven by the shared traversal skeleton.
///
/// A dialect only decides *how* each artifact is spelled; which artifacts
/// exist and how nodes are related is resolved once by the skeleton.
pub trait Dialect: Send + Sync {
    fn target(&self) -> Target;

    fn types(&self) -> &'static TypeTable;

    /// Directories always present in the output, even when empty.
    fn layout(&self) -> &'static [&'static str];

    /// Dependency manifest(s) and the runnable entrypoint.
    fn project_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>>;

    fn model_files(&self, model: &ModelView<'_>, ctx: &ProjectContext<'_>) -> Vec<SourceFile>;

    fn service_file(&self, service: &ServiceView<'_>, ctx: &ProjectContext<'_>)
        -> Option<SourceFile>;

    fn controller_file(
        &self,
        controller: &ControllerView<'_>,
        ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile>;

    fn route_file(&self, route: &RouteView<'_>, ctx: &ProjectContext<'_>) -> Option<SourceFile>;

    /// Graph-independent packaging files (Dockerfile, README, ...).
    fn support_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>>;
}
