use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::assembler::write_to_dir;
use crate::config::{load_effective, GeneratorConfig};
use crate::generator::Generator;
use crate::graph::{load_graph, Graph};
use crate::linter::{fail_if_errors, lint_graph, print_lint_issues, LintSeverity};
use crate::logging::{init_logging, LogConfig};
use crate::store::{FileProjectStore, ProjectStore};

/// Command-line interface for the Arachnet generator
#[derive(Parser)]
#[command(name = "arachnet-gen", version)]
#[command(about = "Generate backend scaffolds from architecture graphs", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Path to the configuration file (default: ./arachnet.toml when present)
    #[arg(long, global = true, env = "ARACHNET_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a project archive (or directory) for one target stack
    Generate {
        /// Graph file (JSON or YAML)
        #[arg(short, long, conflicts_with = "project", required_unless_present = "project")]
        graph: Option<PathBuf>,

        /// Id of a saved project to generate from
        #[arg(long)]
        project: Option<String>,

        /// Project store directory (default: from config, else .arachnet/projects)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Target stack: node, python, go, java, csharp
        #[arg(short, long)]
        target: Option<String>,

        /// Project name; names the archive, its root folder and the package
        #[arg(short, long)]
        name: Option<String>,

        /// Archive path, or output directory with --dir (default: derived from the name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the project as a directory tree instead of a zip archive
        #[arg(long, default_value_t = false)]
        dir: bool,

        /// Overwrite existing files
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Print every generated file as JSON without packaging
    Preview {
        /// Graph file (JSON or YAML)
        #[arg(short, long)]
        graph: PathBuf,

        /// Target stack: node, python, go, java, csharp
        #[arg(short, long)]
        target: Option<String>,

        /// Project name used for package naming
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print the OpenAPI descriptor for a graph
    Openapi {
        /// Graph file (JSON or YAML)
        #[arg(short, long)]
        graph: PathBuf,
    },
    /// Lint an architecture graph
    ///
    /// Reports problems generation would silently tolerate:
    /// - duplicate node ids and dangling edges
    /// - empty labels and file name collisions
    /// - duplicate fields and unrecognized field types
    /// - route collisions
    Lint {
        /// Graph file (JSON or YAML)
        #[arg(short, long)]
        graph: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Save a graph in the project store
    Save {
        /// Graph file (JSON or YAML)
        #[arg(short, long)]
        graph: PathBuf,

        /// Project id; saving an existing id replaces it
        #[arg(long)]
        id: String,

        /// Display name (default: the id)
        #[arg(short, long)]
        name: Option<String>,

        /// Project store directory (default: from config, else .arachnet/projects)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// List supported target stacks
    Targets,
}

/// Parse arguments, install logging and execute the command.
///
/// # Errors
///
/// Returns an error if logging cannot be installed or the command fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    init_logging(&log_config)?;
    run(cli)
}

/// Execute an already-parsed command.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration or graph file cannot be read or parsed
/// - The target is missing or unsupported
/// - A saved project does not exist
/// - Output cannot be written
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = env::current_dir().context("Failed to resolve working directory")?;
    let config = load_effective(cli.config.as_deref(), &cwd)?;
    let generator = Generator::from_config(&config);

    match cli.command {
        Commands::Generate {
            graph,
            project,
            store,
            target,
            name,
            output,
            dir,
            force,
        } => {
            let (graph, stored_name) = match (graph, project) {
                (Some(path), _) => (read_graph(&path)?, None),
                (None, Some(id)) => {
                    let store = FileProjectStore::new(store.unwrap_or_else(|| config.store_dir()));
                    let saved = store.load(&id)?.ok_or_else(|| {
                        anyhow!("project '{id}' not found in {}", store.dir().display())
                    })?;
                    (saved.graph, Some(saved.name))
                }
                (None, None) => bail!("pass --graph <file> or --project <id>"),
            };
            let target = resolve_target(target, &config)?;
            let name = name.or(stored_name);

            if dir {
                let tree = generator.project(&graph, &target, name.as_deref())?;
                let out = output.unwrap_or_else(|| PathBuf::from(tree.root()));
                let summary = write_to_dir(&tree, &out, force)?;
                println!(
                    "✅ Generated {target} project in {} ({} written, {} skipped)",
                    out.display(),
                    summary.written.len(),
                    summary.skipped.len()
                );
            } else {
                let archive = generator.archive(&graph, &target, name.as_deref())?;
                let path = match output {
                    Some(path) if path.is_dir() => path.join(&archive.file_name),
                    Some(path) => path,
                    None => PathBuf::from(&archive.file_name),
                };
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                fs::write(&path, &archive.bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("✅ Wrote {} ({} bytes)", path.display(), archive.bytes.len());
            }
            Ok(())
        }
        Commands::Preview {
            graph,
            target,
            name,
        } => {
            let graph = read_graph(&graph)?;
            let target = resolve_target(target, &config)?;
            let files = generator.preview(&graph, &target, name.as_deref())?;
            let body = serde_json::to_string_pretty(&json!({ "files": files }))
                .context("Failed to serialize preview")?;
            println!("{body}");
            Ok(())
        }
        Commands::Openapi { graph } => {
            let graph = read_graph(&graph)?;
            let body = generator
                .descriptor(&graph)
                .to_pretty_json()
                .context("Failed to serialize descriptor")?;
            println!("{body}");
            Ok(())
        }
        Commands::Lint {
            graph,
            fail_on_error,
            errors_only,
        } => {
            let issues = lint_graph(&read_graph(&graph)?);

            if errors_only {
                let errors: Vec<_> = issues
                    .iter()
                    .filter(|i| i.severity == LintSeverity::Error)
                    .cloned()
                    .collect();
                print_lint_issues(&errors);
                if fail_on_error {
                    fail_if_errors(&errors);
                }
            } else {
                print_lint_issues(&issues);
                if fail_on_error {
                    fail_if_errors(&issues);
                }
            }

            Ok(())
        }
        Commands::Save {
            graph,
            id,
            name,
            store,
        } => {
            let graph = read_graph(&graph)?;
            let store = FileProjectStore::new(store.unwrap_or_else(|| config.store_dir()));
            let name = name.unwrap_or_else(|| id.clone());
            store.save(&id, &name, &graph)?;
            info!(id = %id, "project stored");
            println!("✅ Saved project '{id}' to {}", store.dir().display());
            Ok(())
        }
        Commands::Targets => {
            for target in generator.registry().targets() {
                println!("{:<8} {}", target.as_str(), target.display_name());
            }
            Ok(())
        }
    }
}

fn read_graph(path: &Path) -> anyhow::Result<Graph> {
    load_graph(path).with_context(|| format!("Failed to load graph {}", path.display()))
}

/// Explicit `--target`, else the configured default.
fn resolve_target(target: Option<String>, config: &GeneratorConfig) -> anyhow::Result<String> {
    target
        .or_else(|| config.default_target.clone())
        .ok_or_else(|| anyhow!("no target given; pass --target or set default_target in the config"))
}
