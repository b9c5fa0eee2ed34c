#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const GRAPH: &str = r#"
nodes:
  - id: m1
    type: model
    data:
      label: User
      fields:
        - { name: email, type: String, required: true }
  - id: s1
    type: service
    data: { label: Accounts }
  - id: r1
    type: route
    data:
      label: Users
      endpoints:
        - { name: ListUsers, method: GET, path: users }
edges:
  - { id: e1, source: s1, target: m1 }
"#;

fn write_graph(dir: &Path) -> String {
    let path = dir.join("graph.yaml");
    fs::write(&path, GRAPH).unwrap();
    path.to_string_lossy().into_owned()
}

fn arachnet(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_arachnet-gen"))
        .current_dir(dir)
        .env_remove("ARACHNET_DEFAULT_TARGET")
        .env_remove("ARACHNET_PROJECT_NAME")
        .env_remove("ARACHNET_STORE_DIR")
        .env_remove("ARACHNET_CONFIG")
        .env_remove("ARACHNET_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run arachnet-gen")
}

#[test]
fn test_cli_generate_writes_archive_named_after_project() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(dir.path());
    let output = arachnet(
        dir.path(),
        &["generate", "--graph", &graph, "--target", "java", "--name", "shop"],
    );
    assert!(output.status.success(), "{output:?}");
    assert!(dir.path().join("shop.zip").is_file());
}

#[test]
fn test_cli_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(dir.path());
    fs::write(
        dir.path().join("arachnet.toml"),
        "project_name = \"configured\"\ndefault_target = \"csharp\"\n",
    )
    .unwrap();

    let output = arachnet(dir.path(), &["generate", "--graph", &graph, "--dir"]);
    assert!(output.status.success(), "{output:?}");
    let project = dir.path().join("configured");
    assert!(project.join("Configured.csproj").is_file());
    assert!(project.join("Models/User.cs").is_file());
}

#[test]
fn test_cli_missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(dir.path());
    fs::write(
        dir.path().join("arachnet.toml"),
        "default_target = \"go\"\n",
    )
    .unwrap();

    let output = arachnet(
        dir.path(),
        &["--config", "nope.toml", "preview", "--graph", &graph],
    );
    assert!(output.status.success(), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "{stderr}");
    assert!(stderr.contains("nope.toml"), "{stderr}");

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(body["files"].as_object().unwrap().contains_key("go.mod"));
}

#[test]
fn test_cli_generate_without_target_fails() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(dir.path());
    let output = arachnet(dir.path(), &["generate", "--graph", &graph]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no target given"), "{stderr}");
}

#[test]
fn test_cli_preview_prints_files_json() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(dir.path());
    let output = arachnet(dir.path(), &["preview", "--graph", &graph, "--target", "python"]);
    assert!(output.status.success(), "{output:?}");

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = body["files"].as_object().unwrap();
    assert!(files.contains_key("main.py"));
    assert!(files.contains_key("models/user.py"));
    assert!(files["routes/users_routes.py"]
        .as_str()
        .unwrap()
        .contains("@router.get(\"/users\")"));
}

#[test]
fn test_cli_openapi_prints_descriptor() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(dir.path());
    let output = arachnet(dir.path(), &["openapi", "--graph", &graph]);
    assert!(output.status.success(), "{output:?}");

    let descriptor: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(descriptor["openapi"], "3.0.0");
    assert_eq!(
        descriptor["paths"]["/users"]["get"]["summary"],
        "ListUsers"
    );
}

#[test]
fn test_cli_lint_fail_on_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.json");
    fs::write(
        &path,
        r#"{"nodes":[{"id":"x","type":"model","data":{"label":"A"}},{"id":"x","type":"model","data":{"label":"B"}}]}"#,
    )
    .unwrap();
    let graph = path.to_string_lossy().into_owned();

    let lenient = arachnet(dir.path(), &["lint", "--graph", &graph]);
    assert!(lenient.status.success());
    assert!(String::from_utf8_lossy(&lenient.stdout).contains("duplicate_node_id"));

    let strict = arachnet(dir.path(), &["lint", "--graph", &graph, "--fail-on-error"]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn test_cli_targets_lists_every_stack() {
    let dir = TempDir::new().unwrap();
    let output = arachnet(dir.path(), &["targets"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for target in ["node", "python", "go", "java", "csharp"] {
        assert!(stdout.contains(target), "missing {target}: {stdout}");
    }
}

#[test]
fn test_graph_helper_counts_nodes() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(dir.path());
    let output = Command::new(env!("CARGO_BIN_EXE_graph_helper"))
        .arg(&graph)
        .output()
        .expect("run graph_helper");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nodes: 3"));
    assert!(stdout.contains("edges: 1"));
    assert!(stdout.contains("model: 1"));
}
