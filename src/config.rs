//! Generator configuration.
//!
//! Settings come from an optional `arachnet.toml` and are then overridden by
//! environment variables:
//!
//! ```toml
//! project_name = "shop"
//! default_target = "python"
//! store_dir = ".arachnet/projects"
//!
//! [info]
//! title = "Shop API"
//! version = "0.3.0"
//! description = "Orders and inventory"
//! ```
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ARACHNET_PROJECT_NAME` | `project_name` |
//! | `ARACHNET_DEFAULT_TARGET` | `default_target` |
//! | `ARACHNET_STORE_DIR` | `store_dir` |

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::descriptor::DescriptorInfo;

pub const CONFIG_FILE_NAME: &str = "arachnet.toml";

/// Store directory used when neither the config nor the command line names one.
pub const DEFAULT_STORE_DIR: &str = ".arachnet/projects";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fallback project name (archive root and package slug)
    pub project_name: Option<String>,
    /// Target used when a command does not pass `--target`
    pub default_target: Option<String>,
    /// Directory of the file-backed project store
    pub store_dir: Option<PathBuf>,
    /// `info` block of the generated descriptor
    pub info: DescriptorInfo,
}

impl GeneratorConfig {
    /// Apply `ARACHNET_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(name) = get("ARACHNET_PROJECT_NAME") {
            self.project_name = Some(name);
        }
        if let Some(target) = get("ARACHNET_DEFAULT_TARGET") {
            self.default_target = Some(target);
        }
        if let Some(dir) = get("ARACHNET_STORE_DIR") {
            self.store_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
    }
}

/// Load a configuration file. A missing file is `Ok(None)`.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// `arachnet.toml` in `dir`, if present.
pub fn auto_detect_config_path(dir: &Path) -> Option<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// An explicit path wins when it exists; otherwise look for `arachnet.toml`
/// in `dir`. A missing explicit path is logged and then ignored.
pub fn resolve_config_path(explicit_path: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!(
            path = %path.display(),
            "config file not found, falling back to auto-detection"
        );
    }

    auto_detect_config_path(dir)
}

/// File configuration (if any) with environment overrides applied.
pub fn load_effective(explicit_path: Option<&Path>, dir: &Path) -> anyhow::Result<GeneratorConfig> {
    let mut config = match resolve_config_path(explicit_path, dir) {
        Some(path) => {
            debug!(path = %path.display(), "loading generator config");
            load_config(&path)?.unwrap_or_default()
        }
        None => GeneratorConfig::default(),
    };
    config.apply_overrides(|key| env::var(key).ok());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME))
            .unwrap()
            .is_none());
        assert!(auto_detect_config_path(dir.path()).is_none());
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
project_name = "shop"
default_target = "python"
store_dir = "data/projects"

[info]
title = "Shop API"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.project_name.as_deref(), Some("shop"));
        assert_eq!(config.default_target.as_deref(), Some("python"));
        assert_eq!(config.store_dir(), PathBuf::from("data/projects"));
        assert_eq!(config.info.title, "Shop API");
        assert_eq!(config.info.version, "1.0.0");
        assert_eq!(resolve_config_path(None, dir.path()), Some(path));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "project_name = [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "").unwrap();
        assert_eq!(
            resolve_config_path(Some(&explicit), dir.path()),
            Some(explicit)
        );
        let missing = dir.path().join("missing.toml");
        assert_eq!(
            resolve_config_path(Some(&missing), dir.path()),
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ARACHNET_PROJECT_NAME", "env-project"),
            ("ARACHNET_DEFAULT_TARGET", ""),
            ("ARACHNET_STORE_DIR", "/tmp/store"),
        ]);
        let mut config = GeneratorConfig {
            default_target: Some("go".into()),
            ..GeneratorConfig::default()
        };
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.project_name.as_deref(), Some("env-project"));
        assert_eq!(config.default_target.as_deref(), Some("go"));
        assert_eq!(config.store_dir(), PathBuf::from("/tmp/store"));
    }

    #[test]
    fn test_default_store_dir() {
        assert_eq!(
            GeneratorConfig::default().store_dir(),
            PathBuf::from(DEFAULT_STORE_DIR)
        );
    }
}
