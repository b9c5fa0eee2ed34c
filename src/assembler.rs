//! # Project Assembler
//!
//! Packages a [`FileTree`] for delivery:
//!
//! - [`serialize`] - zip archive with every entry under `<root>/`
//! - [`flatten`] - relative path → contents map for previews
//! - [`write_to_dir`] - materialize the tree on disk
//!
//! Archives carry no wall-clock timestamps, so the same tree always serializes
//! to the same bytes.

use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::generator::{FileTree, TreeItem};

/// Archive/root folder name when the caller supplies none.
pub const DEFAULT_PROJECT_NAME: &str = "arachnet-project";

/// Archive root folder for a user supplied project name.
///
/// Path separators split the name; empty, `.` and `..` parts are dropped and
/// the rest joined with `-`, so the root is always one plain directory name.
/// Falls back to [`DEFAULT_PROJECT_NAME`].
pub fn project_root(project_name: Option<&str>) -> String {
    let name = project_name
        .unwrap_or_default()
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect::<Vec<_>>()
        .join("-");
    if name.is_empty() {
        DEFAULT_PROJECT_NAME.to_string()
    } else {
        name
    }
}

/// `<root>.zip`, see [`project_root`].
pub fn archive_file_name(project_name: Option<&str>) -> String {
    format!("{}.zip", project_root(project_name))
}

/// Serialize the tree into a zip archive.
///
/// Any failure aborts the whole archive; no partial output is returned.
pub fn serialize(tree: &FileTree) -> anyhow::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let root = tree.root();

    zip.add_directory(format!("{root}/"), options)
        .context("Failed to add project root to archive")?;
    for item in tree.walk() {
        match item {
            TreeItem::Dir { path } => {
                zip.add_directory(format!("{root}/{path}/"), options)
                    .with_context(|| format!("Failed to add directory {path} to archive"))?;
            }
            TreeItem::File { path, contents } => {
                zip.start_file(format!("{root}/{path}"), options)
                    .with_context(|| format!("Failed to add {path} to archive"))?;
                zip.write_all(contents.as_bytes())
                    .with_context(|| format!("Failed to write {path} to archive"))?;
            }
        }
    }

    let cursor = zip.finish().context("Failed to finalize archive")?;
    Ok(cursor.into_inner())
}

/// Relative path → contents for every file, directories omitted.
pub fn flatten(tree: &FileTree) -> BTreeMap<String, String> {
    tree.walk()
        .into_iter()
        .filter_map(|item| match item {
            TreeItem::File { path, contents } => Some((path, contents.to_string())),
            TreeItem::Dir { .. } => None,
        })
        .collect()
}

/// What [`write_to_dir`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write the tree's contents under `dir`, creating directories as needed.
///
/// Existing files are left alone unless `force` is set.
pub fn write_to_dir(tree: &FileTree, dir: &Path, force: bool) -> anyhow::Result<WriteSummary> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut summary = WriteSummary::default();
    for item in tree.walk() {
        match item {
            TreeItem::Dir { path } => {
                let target = dir.join(&path);
                fs::create_dir_all(&target)
                    .with_context(|| format!("Failed to create {}", target.display()))?;
            }
            TreeItem::File { path, contents } => {
                let target = dir.join(&path);
                if target.exists() && !force {
                    warn!(path = %target.display(), "skipping existing file (use --force to overwrite)");
                    summary.skipped.push(target);
                    continue;
                }
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&target, contents)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                debug!(path = %target.display(), "wrote file");
                summary.written.push(target);
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn sample_tree() -> FileTree {
        let mut tree = FileTree::new("shop");
        tree.add_file("openapi.json", "{}").unwrap();
        tree.add_file("models/user.model.js", "module.exports = {};").unwrap();
        tree.ensure_dir("routes").unwrap();
        tree
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name(None), "arachnet-project.zip");
        assert_eq!(archive_file_name(Some("")), "arachnet-project.zip");
        assert_eq!(archive_file_name(Some("shop")), "shop.zip");
        assert_eq!(archive_file_name(Some("../evil")), "evil.zip");
    }

    #[test]
    fn test_project_root_is_a_single_directory() {
        assert_eq!(project_root(Some("Pet Store")), "Pet Store");
        assert_eq!(project_root(Some("../evil")), "evil");
        assert_eq!(project_root(Some("/etc/passwd")), "etc-passwd");
        assert_eq!(project_root(Some(r"..\..\win")), "win");
        assert_eq!(project_root(Some("../..")), DEFAULT_PROJECT_NAME);
        assert_eq!(project_root(Some("  ")), DEFAULT_PROJECT_NAME);
        assert_eq!(project_root(None), DEFAULT_PROJECT_NAME);
    }

    #[test]
    fn test_serialize_nests_everything_under_root() {
        let bytes = serialize(&sample_tree()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "shop/",
                "shop/models/",
                "shop/models/user.model.js",
                "shop/openapi.json",
                "shop/routes/",
            ]
        );

        let mut contents = String::new();
        archive
            .by_name("shop/models/user.model.js")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "module.exports = {};");
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let tree = sample_tree();
        assert_eq!(serialize(&tree).unwrap(), serialize(&tree).unwrap());
    }

    #[test]
    fn test_flatten_lists_files_only() {
        let files = flatten(&sample_tree());
        assert_eq!(
            files.keys().collect::<Vec<_>>(),
            vec!["models/user.model.js", "openapi.json"]
        );
        assert_eq!(files["openapi.json"], "{}");
    }

    #[test]
    fn test_write_to_dir_respects_force() {
        let dir = TempDir::new().unwrap();
        let tree = sample_tree();

        let first = write_to_dir(&tree, dir.path(), false).unwrap();
        assert_eq!(first.written.len(), 2);
        assert!(dir.path().join("routes").is_dir());

        fs::write(dir.path().join("openapi.json"), "edited").unwrap();
        let second = write_to_dir(&tree, dir.path(), false).unwrap();
        assert_eq!(second.skipped.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("openapi.json")).unwrap(),
            "edited"
        );

        let forced = write_to_dir(&tree, dir.path(), true).unwrap();
        assert_eq!(forced.written.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("openapi.json")).unwrap(),
            "{}"
        );
    }
}
