//! # Interface Descriptor
//!
//! Derives the canonical, language-neutral API description (an OpenAPI 3.0
//! document) from a [`Graph`]. Every emitter writes this document verbatim as
//! `openapi.json`, and the descriptor-only path returns it on its own.
//!
//! The descriptor is intentionally shallow:
//!
//! - **Model nodes** become `components.schemas` entries keyed by label.
//!   `Number` maps to `number`, `Boolean` to `boolean`, everything else to
//!   `string`. A `required` list is attached only when at least one field is
//!   required.
//! - **Route nodes** contribute one operation per endpoint under the normalized
//!   path and the lowercased method, with a fixed placeholder `200` response.
//!   When two endpoints land on the same `{path, method}` the one processed
//!   last wins.
//!
//! No authentication, parameter or request-body schemas are derived. Output is
//! deterministic: maps are ordered and no wall-clock data is embedded.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::graph::{Field, FieldType, Graph, NodeKind};

pub const OPENAPI_VERSION: &str = "3.0.0";

/// Document metadata (`info` block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorInfo {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Default for DescriptorInfo {
    fn default() -> Self {
        DescriptorInfo {
            title: "Arachnet Generated API".to_string(),
            version: "1.0.0".to_string(),
            description: "API documentation generated by Arachnet".to_string(),
        }
    }
}

/// The generated OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    pub openapi: String,
    pub info: DescriptorInfo,
    pub paths: BTreeMap<String, PathItem>,
    pub components: Components,
}

/// Operations of one path keyed by lowercase method.
pub type PathItem = BTreeMap<String, Operation>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Components {
    pub schemas: BTreeMap<String, SchemaObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaObject {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Properties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
}

/// Schema properties in field order.
///
/// Re-inserting a name replaces the value but keeps the original position, the
/// same way an object literal behaves when a key is assigned twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, PropertySchema)>);

impl Properties {
    pub fn insert(&mut self, name: &str, schema: PropertySchema) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = schema,
            None => self.0.push((name.to_string(), schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub summary: String,
    pub responses: BTreeMap<String, ResponseObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseObject {
    pub description: String,
    pub content: BTreeMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaType {
    pub schema: Value,
}

impl Descriptor {
    pub fn schema(&self, name: &str) -> Option<&SchemaObject> {
        self.components.schemas.get(name)
    }

    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(method))
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Pretty-printed JSON, as written to `openapi.json`.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// OpenAPI primitive for a model field type.
pub fn schema_type_for(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Number => "number",
        FieldType::Boolean => "boolean",
        _ => "string",
    }
}

fn model_schema(fields: &[Field]) -> SchemaObject {
    let mut properties = Properties::default();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(
            &field.name,
            PropertySchema {
                schema_type: schema_type_for(&field.field_type),
            },
        );
        if field.required {
            required.push(field.name.clone());
        }
    }
    SchemaObject {
        schema_type: "object".to_string(),
        properties,
        required,
    }
}

fn placeholder_operation(summary: &str) -> Operation {
    let media = MediaType {
        schema: json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" }
            }
        }),
    };
    let response = ResponseObject {
        description: "Successful response".to_string(),
        content: BTreeMap::from([("application/json".to_string(), media)]),
    };
    Operation {
        summary: summary.to_string(),
        responses: BTreeMap::from([("200".to_string(), response)]),
    }
}

/// Build the descriptor with the default `info` block.
pub fn build_descriptor(graph: &Graph) -> Descriptor {
    build_descriptor_with(graph, DescriptorInfo::default())
}

/// Build the descriptor with caller-supplied metadata.
pub fn build_descriptor_with(graph: &Graph, info: DescriptorInfo) -> Descriptor {
    let mut descriptor = Descriptor {
        openapi: OPENAPI_VERSION.to_string(),
        info,
        paths: BTreeMap::new(),
        components: Components::default(),
    };

    for node in &graph.nodes {
        match &node.kind {
            NodeKind::Model { fields } => {
                descriptor
                    .components
                    .schemas
                    .insert(node.label.clone(), model_schema(fields));
            }
            NodeKind::Route { endpoints } => {
                for endpoint in endpoints {
                    let path = endpoint.normalized_path();
                    let previous = descriptor
                        .paths
                        .entry(path.clone())
                        .or_default()
                        .insert(
                            endpoint.method.as_lower().to_string(),
                            placeholder_operation(&endpoint.name),
                        );
                    if previous.is_some() {
                        debug!(%path, method = %endpoint.method, "operation replaced by later endpoint");
                    }
                }
            }
            NodeKind::Controller { .. }
            | NodeKind::Service { .. }
            | NodeKind::Database
            | NodeKind::Auth
            | NodeKind::Middleware => {}
        }
    }

    descriptor
}
