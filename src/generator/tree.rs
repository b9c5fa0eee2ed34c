use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// A node in the virtual file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(String),
    Dir(BTreeMap<String, Entry>),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid tree path '{0}'")]
    InvalidPath(String),

    #[error("'{0}' is a file, cannot use it as a directory")]
    NotADirectory(String),

    #[error("'{0}' is a directory, cannot overwrite it with a file")]
    NotAFile(String),
}

/// In-memory project tree produced by an emitter and consumed by the assembler.
///
/// `root` is the top-level folder name used inside the download archive; paths
/// handed to [`FileTree::add_file`] are relative to it and `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    root: String,
    entries: BTreeMap<String, Entry>,
}

/// One element of a depth-first walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeItem<'a> {
    Dir { path: String },
    File { path: String, contents: &'a str },
}

impl TreeItem<'_> {
    pub fn path(&self) -> &str {
        match self {
            TreeItem::Dir { path } | TreeItem::File { path, .. } => path,
        }
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, TreeError> {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() || parts.iter().any(|p| *p == "." || *p == "..") {
        return Err(TreeError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

fn descend<'t>(
    mut dir: &'t mut BTreeMap<String, Entry>,
    parts: &[&str],
    full: &str,
) -> Result<&'t mut BTreeMap<String, Entry>, TreeError> {
    for part in parts {
        let entry = dir
            .entry((*part).to_string())
            .or_insert_with(|| Entry::Dir(BTreeMap::new()));
        dir = match entry {
            Entry::Dir(children) => children,
            Entry::File(_) => return Err(TreeError::NotADirectory(full.to_string())),
        };
    }
    Ok(dir)
}

impl FileTree {
    pub fn new(root: impl Into<String>) -> Self {
        FileTree {
            root: root.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Create a directory (and its parents) if missing.
    pub fn ensure_dir(&mut self, path: &str) -> Result<(), TreeError> {
        let parts = split_path(path)?;
        descend(&mut self.entries, &parts, path).map(|_| ())
    }

    /// Write a file, creating parent directories. An existing file at the same
    /// path is replaced.
    pub fn add_file(&mut self, path: &str, contents: impl Into<String>) -> Result<(), TreeError> {
        let parts = split_path(path)?;
        let (name, parents) = parts
            .split_last()
            .ok_or_else(|| TreeError::InvalidPath(path.to_string()))?;
        let dir = descend(&mut self.entries, parents, path)?;
        match dir.get(*name) {
            Some(Entry::Dir(_)) => return Err(TreeError::NotAFile(path.to_string())),
            Some(Entry::File(_)) => warn!(path, "overwriting generated file"),
            None => {}
        }
        dir.insert((*name).to_string(), Entry::File(contents.into()));
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        let parts = split_path(path).ok()?;
        let (name, parents) = parts.split_last()?;
        let mut dir = &self.entries;
        for part in parents {
            match dir.get(*part)? {
                Entry::Dir(children) => dir = children,
                Entry::File(_) => return None,
            }
        }
        dir.get(*name)
    }

    /// Contents of the file at `path`, if it is a file.
    pub fn file(&self, path: &str) -> Option<&str> {
        match self.get(path)? {
            Entry::File(contents) => Some(contents),
            Entry::Dir(_) => None,
        }
    }

    /// Depth-first walk in lexicographic order; each directory precedes its children.
    pub fn walk(&self) -> Vec<TreeItem<'_>> {
        let mut items = Vec::new();
        walk_into(&self.entries, "", &mut items);
        items
    }

    /// Relative paths of every file, in walk order.
    pub fn file_paths(&self) -> Vec<String> {
        self.walk()
            .into_iter()
            .filter_map(|item| match item {
                TreeItem::File { path, .. } => Some(path),
                TreeItem::Dir { .. } => None,
            })
            .collect()
    }
}

fn walk_into<'a>(dir: &'a BTreeMap<String, Entry>, prefix: &str, items: &mut Vec<TreeItem<'a>>) {
    for (name, entry) in dir {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        match entry {
            Entry::File(contents) => items.push(TreeItem::File { path, contents }),
            Entry::Dir(children) => {
                items.push(TreeItem::Dir { path: path.clone() });
                walk_into(children, &path, items);
            }
        }
    }
}
