//! Project persistence.
//!
//! Generation never depends on storage; the store only lets a graph be saved
//! under an id and fed back into generation later. Saving an existing id
//! replaces it.

use anyhow::Context;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::graph::Graph;

/// A saved project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProject {
    pub id: String,
    pub name: String,
    #[serde(rename = "graph_data")]
    pub graph: Graph,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid project id '{0}'")]
    InvalidId(String),
}

pub trait ProjectStore: Send + Sync {
    /// Insert or replace the project stored under `id`.
    fn save(&self, id: &str, name: &str, graph: &Graph) -> anyhow::Result<()>;

    /// `Ok(None)` when nothing is stored under `id`.
    fn load(&self, id: &str) -> anyhow::Result<Option<StoredProject>>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: DashMap<String, StoredProject>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn save(&self, id: &str, name: &str, graph: &Graph) -> anyhow::Result<()> {
        self.projects.insert(
            id.to_string(),
            StoredProject {
                id: id.to_string(),
                name: name.to_string(),
                graph: graph.clone(),
            },
        );
        Ok(())
    }

    fn load(&self, id: &str) -> anyhow::Result<Option<StoredProject>> {
        Ok(self.projects.get(id).map(|entry| entry.value().clone()))
    }
}

/// One pretty-printed JSON document per project: `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct FileProjectStore {
    dir: PathBuf,
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

impl FileProjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileProjectStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl ProjectStore for FileProjectStore {
    fn save(&self, id: &str, name: &str, graph: &Graph) -> anyhow::Result<()> {
        let path = self.path_for(id)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory {}", self.dir.display()))?;
        let project = StoredProject {
            id: id.to_string(),
            name: name.to_string(),
            graph: graph.clone(),
        };
        let json = serde_json::to_string_pretty(&project)
            .with_context(|| format!("Failed to serialize project {id}"))?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(id, path = %path.display(), "saved project");
        Ok(())
    }

    fn load(&self, id: &str) -> anyhow::Result<Option<StoredProject>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            debug!(id, "project not found");
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let project = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(project))
    }
}
