#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands};
use clap::Parser;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

const GRAPH: &str = r#"{
    "nodes": [
        { "id": "m1", "type": "model", "data": { "label": "User",
          "fields": [{ "name": "email", "type": "String", "required": true }] } },
        { "id": "r1", "type": "route", "data": { "label": "Users",
          "endpoints": [{ "name": "ListUsers", "method": "GET", "path": "users" }] } }
    ],
    "edges": []
}"#;

fn graph_file(dir: &TempDir) -> String {
    let path = dir.path().join("graph.json");
    fs::write(&path, GRAPH).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_generate_command_parses() {
    let cli = Cli::try_parse_from([
        "arachnet-gen",
        "generate",
        "--graph",
        "graph.json",
        "--target",
        "python",
        "--name",
        "shop",
        "--dir",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            graph,
            project,
            target,
            name,
            dir,
            force,
            ..
        } => {
            assert_eq!(graph.unwrap().to_string_lossy(), "graph.json");
            assert!(project.is_none());
            assert_eq!(target.as_deref(), Some("python"));
            assert_eq!(name.as_deref(), Some("shop"));
            assert!(dir);
            assert!(!force);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_requires_a_graph_source() {
    assert!(Cli::try_parse_from(["arachnet-gen", "generate", "--target", "go"]).is_err());
    assert!(Cli::try_parse_from([
        "arachnet-gen",
        "generate",
        "--graph",
        "g.json",
        "--project",
        "p1"
    ])
    .is_err());
    assert!(Cli::try_parse_from(["arachnet-gen", "generate", "--project", "p1"]).is_ok());
}

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "arachnet-gen",
        "lint",
        "--graph",
        "graph.yaml",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Lint {
            graph,
            fail_on_error,
            errors_only,
        } => {
            assert_eq!(graph.to_string_lossy(), "graph.yaml");
            assert!(fail_on_error);
            assert!(errors_only);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "arachnet-gen",
        "targets",
        "--verbose",
        "--config",
        "custom.toml",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config.unwrap().to_string_lossy(), "custom.toml");
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["arachnet-gen", "generate", "--graph", "g.json", "-t", "go"],
        vec!["arachnet-gen", "preview", "--graph", "g.json", "-t", "node"],
        vec!["arachnet-gen", "openapi", "--graph", "g.json"],
        vec!["arachnet-gen", "lint", "--graph", "g.json"],
        vec!["arachnet-gen", "save", "--graph", "g.json", "--id", "p1"],
        vec!["arachnet-gen", "targets"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_run_generate_writes_directory_tree() {
    let dir = TempDir::new().unwrap();
    let graph = graph_file(&dir);
    let out = dir.path().join("out");
    let cli = Cli::try_parse_from([
        "arachnet-gen",
        "generate",
        "--graph",
        &graph,
        "--target",
        "go",
        "--dir",
        "--output",
        out.to_str().unwrap(),
    ])
    .unwrap();
    run(cli).unwrap();

    assert!(out.join("openapi.json").is_file());
    assert!(out.join("models/user.go").is_file());
    let routes = fs::read_to_string(out.join("routes/users_routes.go")).unwrap();
    assert!(routes.contains("\"/users\""));
}

#[test]
fn test_run_generate_archive_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let graph = graph_file(&dir);
    let out = dir.path().join("shop.zip");
    let args = [
        "arachnet-gen",
        "generate",
        "--graph",
        graph.as_str(),
        "--target",
        "node",
        "--output",
        out.to_str().unwrap(),
    ];

    run(Cli::try_parse_from(args).unwrap()).unwrap();
    let bytes = fs::read(&out).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert!(archive
        .file_names()
        .any(|n| n == "arachnet-project/openapi.json"));

    let err = run(Cli::try_parse_from(args).unwrap()).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn test_run_save_then_generate_from_project() {
    let dir = TempDir::new().unwrap();
    let graph = graph_file(&dir);
    let store = dir.path().join("store");
    let store_arg = store.to_str().unwrap();

    run(Cli::try_parse_from([
        "arachnet-gen",
        "save",
        "--graph",
        &graph,
        "--id",
        "shop",
        "--name",
        "Shop",
        "--store",
        store_arg,
    ])
    .unwrap())
    .unwrap();
    assert!(store.join("shop.json").is_file());

    let out = dir.path().join("tree");
    run(Cli::try_parse_from([
        "arachnet-gen",
        "generate",
        "--project",
        "shop",
        "--store",
        store_arg,
        "--target",
        "python",
        "--dir",
        "--output",
        out.to_str().unwrap(),
    ])
    .unwrap())
    .unwrap();
    assert!(out.join("schemas/user.py").is_file());
}

#[test]
fn test_run_generate_unknown_project() {
    let dir = TempDir::new().unwrap();
    let err = run(Cli::try_parse_from([
        "arachnet-gen",
        "generate",
        "--project",
        "missing",
        "--store",
        dir.path().to_str().unwrap(),
        "--target",
        "go",
    ])
    .unwrap())
    .unwrap_err();
    assert!(err.to_string().contains("project 'missing' not found"));
}

#[test]
fn test_run_rejects_unsupported_target() {
    let dir = TempDir::new().unwrap();
    let graph = graph_file(&dir);
    let err = run(Cli::try_parse_from([
        "arachnet-gen",
        "preview",
        "--graph",
        &graph,
        "--target",
        "cobol",
    ])
    .unwrap())
    .unwrap_err();
    assert!(err.to_string().contains("unsupported target 'cobol'"));
}
