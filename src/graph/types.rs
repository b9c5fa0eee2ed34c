use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::connectivity;
use super::GraphError;

/// Architecture graph as produced by the editor: typed nodes plus the edges
/// connecting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Graph { nodes, edges }
    }

    /// Look up a node by id. With duplicate ids the first occurrence wins.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes of one kind, in graph order.
    pub fn nodes_of(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |n| n.node_type() == node_type)
    }

    /// Neighbors of `node_id`, see [`connectivity::neighbors`].
    pub fn neighbors(&self, node_id: &str, filter: Option<NodeType>) -> Vec<&Node> {
        connectivity::neighbors(node_id, &self.edges, &self.nodes, filter)
    }
}

/// The fixed set of component kinds a node can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Model,
    Controller,
    Service,
    Route,
    Database,
    Auth,
    Middleware,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Model,
        NodeType::Controller,
        NodeType::Service,
        NodeType::Route,
        NodeType::Database,
        NodeType::Auth,
        NodeType::Middleware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Model => "model",
            NodeType::Controller => "controller",
            NodeType::Service => "service",
            NodeType::Route => "route",
            NodeType::Database => "database",
            NodeType::Auth => "auth",
            NodeType::Middleware => "middleware",
        }
    }

    /// Kinds that are drawn on the canvas but never reach generated output.
    pub fn is_annotation_only(&self) -> bool {
        matches!(
            self,
            NodeType::Database | NodeType::Auth | NodeType::Middleware
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GraphError::UnknownNodeType(s.to_string()))
    }
}

/// Per-kind payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Model { fields: Vec<Field> },
    Controller { rules: Vec<Rule> },
    Service { rules: Vec<Rule> },
    Route { endpoints: Vec<Endpoint> },
    Database,
    Auth,
    Middleware,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Model { .. } => NodeType::Model,
            NodeKind::Controller { .. } => NodeType::Controller,
            NodeKind::Service { .. } => NodeType::Service,
            NodeKind::Route { .. } => NodeType::Route,
            NodeKind::Database => NodeType::Database,
            NodeKind::Auth => NodeType::Auth,
            NodeKind::Middleware => NodeType::Middleware,
        }
    }
}

/// A component on the canvas.
///
/// `extra` keeps editor-only keys (`position`, `width`, `selected`, ...) and
/// `data_extra` the unknown keys under `data`, so a save/load round trip keeps
/// them. Collections that do not belong to the node's kind (the `fields: []`
/// the editor seeds on every node) are kept in `data_extra` too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub kind: NodeKind,
    pub extra: Map<String, Value>,
    pub data_extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
            description: None,
            kind,
            extra: Map::new(),
            data_extra: Map::new(),
        }
    }

    pub fn model(id: impl Into<String>, label: impl Into<String>, fields: Vec<Field>) -> Self {
        Node::new(id, label, NodeKind::Model { fields })
    }

    pub fn service(id: impl Into<String>, label: impl Into<String>, rules: Vec<Rule>) -> Self {
        Node::new(id, label, NodeKind::Service { rules })
    }

    pub fn controller(id: impl Into<String>, label: impl Into<String>, rules: Vec<Rule>) -> Self {
        Node::new(id, label, NodeKind::Controller { rules })
    }

    pub fn route(id: impl Into<String>, label: impl Into<String>, endpoints: Vec<Endpoint>) -> Self {
        Node::new(id, label, NodeKind::Route { endpoints })
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            NodeKind::Model { fields } => fields,
            _ => &[],
        }
    }

    pub fn rules(&self) -> &[Rule] {
        match &self.kind {
            NodeKind::Service { rules } | NodeKind::Controller { rules } => rules,
            _ => &[],
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        match &self.kind {
            NodeKind::Route { endpoints } => endpoints,
            _ => &[],
        }
    }
}

/// Wire shape of a node: `{ id, type, data: { label, fields?, rules?, endpoints? }, ... }`.
///
/// Collections may be absent or `null`; both read as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    data: RawNodeData,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawNodeData {
    #[serde(default)]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rules: Option<Vec<Rule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoints: Option<Vec<Endpoint>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Move a collection the node kind does not use into `extra`.
fn keep_foreign<T: Serialize>(
    extra: &mut Map<String, Value>,
    key: &str,
    collection: Option<T>,
) -> Result<(), GraphError> {
    if let Some(collection) = collection {
        extra.insert(key.to_string(), serde_json::to_value(collection)?);
    }
    Ok(())
}

impl TryFrom<RawNode> for Node {
    type Error = GraphError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let RawNodeData {
            label,
            description,
            mut fields,
            mut rules,
            mut endpoints,
            extra: mut data_extra,
        } = raw.data;
        let kind = match raw.node_type.parse::<NodeType>()? {
            NodeType::Model => NodeKind::Model {
                fields: fields.take().unwrap_or_default(),
            },
            NodeType::Controller => NodeKind::Controller {
                rules: rules.take().unwrap_or_default(),
            },
            NodeType::Service => NodeKind::Service {
                rules: rules.take().unwrap_or_default(),
            },
            NodeType::Route => NodeKind::Route {
                endpoints: endpoints.take().unwrap_or_default(),
            },
            NodeType::Database => NodeKind::Database,
            NodeType::Auth => NodeKind::Auth,
            NodeType::Middleware => NodeKind::Middleware,
        };
        keep_foreign(&mut data_extra, "fields", fields)?;
        keep_foreign(&mut data_extra, "rules", rules)?;
        keep_foreign(&mut data_extra, "endpoints", endpoints)?;
        Ok(Node {
            id: raw.id,
            label: label.unwrap_or_default(),
            description,
            kind,
            extra: raw.extra,
            data_extra,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let node_type = node.node_type().as_str().to_string();
        let mut data = RawNodeData {
            label: Some(node.label),
            description: node.description,
            extra: node.data_extra,
            ..RawNodeData::default()
        };
        match node.kind {
            NodeKind::Model { fields } => data.fields = Some(fields),
            NodeKind::Controller { rules } | NodeKind::Service { rules } => {
                data.rules = Some(rules)
            }
            NodeKind::Route { endpoints } => data.endpoints = Some(endpoints),
            NodeKind::Database | NodeKind::Auth | NodeKind::Middleware => {}
        }
        RawNode {
            id: node.id,
            node_type,
            data,
            extra: node.extra,
        }
    }
}

/// Closed vocabulary of model field types. Anything else is kept verbatim in
/// `Other` and rendered as the target's most permissive type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    ObjectId,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
            FieldType::Date => "Date",
            FieldType::ObjectId => "ObjectId",
            FieldType::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "String" => FieldType::String,
            "Number" => FieldType::Number,
            "Boolean" => FieldType::Boolean,
            "Date" => FieldType::Date,
            "ObjectId" => FieldType::ObjectId,
            _ => FieldType::Other(raw),
        }
    }
}

impl From<&str> for FieldType {
    fn from(raw: &str) -> Self {
        FieldType::from(raw.to_string())
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

fn default_field_type() -> FieldType {
    FieldType::String
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>, required: bool) -> Self {
        Field {
            name: name.into(),
            field_type: field_type.into(),
            required,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Lowercase verb, used as the OpenAPI operation key and by most routers.
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(GraphError::UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub name: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub path: String,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Endpoint {
            name: name.into(),
            method,
            path: path.into(),
        }
    }

    pub fn normalized_path(&self) -> String {
        normalize_path(&self.path)
    }
}

/// Free-text business-logic marker; generation only emits a named stub for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Rule {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Undirected link between two nodes. `extra` keeps editor keys such as
/// `sourceHandle` and `animated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: Map::new(),
        }
    }

    /// The endpoint opposite `node_id`, if the edge touches it at all.
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(&self.target)
        } else if self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Prefix `path` with `/` unless it already starts with one.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
