use std::collections::BTreeMap;

use anyhow::Context;
use tracing::info;

use crate::assembler::{archive_file_name, flatten, project_root, serialize};
use crate::config::GeneratorConfig;
use crate::descriptor::{build_descriptor_with, Descriptor, DescriptorInfo};
use crate::graph::Graph;

use super::registry::EmitterRegistry;
use super::skeleton::EmitOptions;
use super::tree::FileTree;

/// Root folder used for preview trees; it never reaches the caller.
const PREVIEW_ROOT: &str = "preview";

/// A downloadable project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArchive {
    /// Suggested download name, `<project>.zip`
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The three request paths of the service: download, preview and
/// descriptor-only.
#[derive(Debug)]
pub struct Generator {
    registry: EmitterRegistry,
    info: DescriptorInfo,
    project_name: Option<String>,
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new(EmitterRegistry::with_defaults())
    }
}

impl Generator {
    pub fn new(registry: EmitterRegistry) -> Self {
        Generator {
            registry,
            info: DescriptorInfo::default(),
            project_name: None,
        }
    }

    /// Generator with the default registry and the descriptor metadata and
    /// fallback project name taken from `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Generator {
            registry: EmitterRegistry::with_defaults(),
            info: config.info.clone(),
            project_name: config.project_name.clone(),
        }
    }

    pub fn with_info(mut self, info: DescriptorInfo) -> Self {
        self.info = info;
        self
    }

    pub fn registry(&self) -> &EmitterRegistry {
        &self.registry
    }

    fn effective_name<'a>(&'a self, name: Option<&'a str>) -> Option<&'a str> {
        name.map(str::trim)
            .filter(|n| !n.is_empty())
            .or(self.project_name.as_deref())
    }

    fn options(&self, name: Option<&str>) -> EmitOptions {
        EmitOptions {
            info: self.info.clone(),
            ..EmitOptions::default()
        }
        .with_project_name(name)
    }

    /// The interface descriptor on its own.
    pub fn descriptor(&self, graph: &Graph) -> Descriptor {
        build_descriptor_with(graph, self.info.clone())
    }

    /// Emit the project tree for `target` rooted at the project name.
    pub fn project(
        &self,
        graph: &Graph,
        target: &str,
        name: Option<&str>,
    ) -> anyhow::Result<FileTree> {
        let emitter = self.registry.resolve(target)?;
        let name = self.effective_name(name);
        let mut tree = FileTree::new(project_root(name));
        emitter
            .emit_with(&mut tree, graph, &self.options(name))
            .with_context(|| format!("Failed to generate {target} project"))?;
        Ok(tree)
    }

    /// Emit and package the project as a zip archive.
    pub fn archive(
        &self,
        graph: &Graph,
        target: &str,
        name: Option<&str>,
    ) -> anyhow::Result<GeneratedArchive> {
        let tree = self.project(graph, target, name)?;
        let bytes = serialize(&tree)?;
        let file_name = archive_file_name(self.effective_name(name));
        info!(%file_name, bytes = bytes.len(), "packaged project archive");
        Ok(GeneratedArchive { file_name, bytes })
    }

    /// Relative path → contents of every file the project would contain.
    pub fn preview(
        &self,
        graph: &Graph,
        target: &str,
        name: Option<&str>,
    ) -> anyhow::Result<BTreeMap<String, String>> {
        let emitter = self.registry.resolve(target)?;
        let mut tree = FileTree::new(PREVIEW_ROOT);
        emitter
            .emit_with(&mut tree, graph, &self.options(self.effective_name(name)))
            .with_context(|| format!("Failed to generate {target} preview"))?;
        Ok(flatten(&tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerateError;
    use crate::graph::{Field, Node};

    fn graph() -> Graph {
        Graph::new(
            vec![Node::model("1", "User", vec![Field::new("email", "String", true)])],
            vec![],
        )
    }

    #[test]
    fn test_project_root_defaults() {
        let generator = Generator::default();
        let tree = generator.project(&graph(), "node", None).unwrap();
        assert_eq!(tree.root(), "arachnet-project");
        let tree = generator.project(&graph(), "node", Some("  ")).unwrap();
        assert_eq!(tree.root(), "arachnet-project");
        let tree = generator.project(&graph(), "node", Some("shop")).unwrap();
        assert_eq!(tree.root(), "shop");
    }

    #[test]
    fn test_archive_entries_stay_under_a_plain_root() {
        use std::io::Cursor;
        use zip::ZipArchive;

        let archive = Generator::default()
            .archive(&graph(), "node", Some("../evil"))
            .unwrap();
        assert_eq!(archive.file_name, "evil.zip");
        let zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        assert!(zip.file_names().all(|n| n.starts_with("evil/")));
        assert!(zip.file_names().all(|n| !n.split('/').any(|s| s == "..")));
    }

    #[test]
    fn test_configured_name_is_the_fallback() {
        let config = GeneratorConfig {
            project_name: Some("Pet Store".to_string()),
            ..GeneratorConfig::default()
        };
        let generator = Generator::from_config(&config);
        let archive = generator.archive(&graph(), "go", None).unwrap();
        assert_eq!(archive.file_name, "Pet Store.zip");
        let preview = generator.preview(&graph(), "go", None).unwrap();
        assert!(preview["go.mod"].starts_with("module pet-store\n"));
    }

    #[test]
    fn test_unsupported_target_surfaces() {
        let err = Generator::default()
            .archive(&graph(), "rust", None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::UnsupportedTarget(t)) if t == "rust"
        ));
    }

    #[test]
    fn test_preview_paths_are_relative() {
        let preview = Generator::default().preview(&graph(), "python", None).unwrap();
        assert!(preview.contains_key("models/user.py"));
        assert!(preview.contains_key("schemas/user.py"));
        assert!(preview.keys().all(|k| !k.starts_with("preview/")));
    }

    #[test]
    fn test_custom_info_flows_into_descriptor() {
        let info = DescriptorInfo {
            title: "Shop".into(),
            ..DescriptorInfo::default()
        };
        let generator = Generator::default().with_info(info);
        assert_eq!(generator.descriptor(&graph()).info.title, "Shop");
        let preview = generator.preview(&graph(), "node", None).unwrap();
        assert!(preview["openapi.json"].contains("\"title\": \"Shop\""));
        assert!(preview["README.md"].starts_with("# Shop\n"));
    }
}
