//! # CLI Module
//!
//! Command-line front end for the generator, exposed as the `arachnet-gen`
//! binary.
//!
//! ## Overview
//!
//! The CLI supports:
//! - **Generation** - package a project for one target as a zip or a directory
//! - **Preview** - dump every generated file as JSON
//! - **Descriptor** - print the OpenAPI document for a graph
//! - **Linting** - report graph problems that generation would tolerate
//! - **Storage** - save graphs under an id and generate from them later
//!
//! ## Commands
//!
//! ### `generate`
//!
//! ```bash
//! arachnet-gen generate --graph architecture.json --target python --name shop
//! ```
//!
//! Options:
//! - `--graph <FILE>` or `--project <ID>` - graph source (one is required)
//! - `--target <T>` - `node`, `python`, `go`, `java` or `csharp`
//!   (default: `default_target` from the config)
//! - `--name <NAME>` - project name (default: config, then `arachnet-project`)
//! - `--output <PATH>` - archive path, or directory with `--dir`
//! - `--dir` - write a directory tree instead of a zip
//! - `--force` - overwrite existing files
//!
//! ### `preview`, `openapi`, `lint`, `save`, `targets`
//!
//! ```bash
//! arachnet-gen preview --graph architecture.json --target go
//! arachnet-gen openapi --graph architecture.json > openapi.json
//! arachnet-gen lint --graph architecture.json --fail-on-error
//! arachnet-gen save --graph architecture.json --id shop --name "Shop"
//! arachnet-gen generate --project shop --target java
//! arachnet-gen targets
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use arachnet::cli::{run, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run(cli)?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
