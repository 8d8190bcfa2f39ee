//! Nuxt CLI - command-line front end for building, generating and serving
//! Nuxt applications.
//!
//! The crate is the glue between the command line and the framework's
//! subsystems. It declares the `dev`, `build`, `start` and `generate`
//! commands, parses arguments against each command's option schema, composes
//! the project configuration, and drives the builder or generator supplied
//! through a [`Toolchain`](toolchain::Toolchain).
//!
//! # Architecture
//!
//! - [`cli`] - Option schemas, argument parsing and help rendering
//! - [`command`] - Command descriptor, config composition, process outcome
//! - [`commands`] - The individual commands
//! - [`config`] - Configuration loading with figment
//! - [`toolchain`] - Collaborator traits and the stock [`Imports`] registry
//! - [`nuxt`] - Stock framework instance and static server
//! - [`run`] - Top-level dispatcher
//! - [`error`], [`logger`], [`ui`] - Errors, tracing and terminal output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nuxt_cli::{run, Imports, Outcome};
//!
//! # async fn example() {
//! let imports = Imports::new();
//! let args = vec!["build".to_string(), "--no-generate".to_string()];
//! match run::run_with(Arc::new(imports), args).await {
//!     Outcome::Exit(code) => std::process::exit(code),
//!     Outcome::Stay(watch) => std::process::exit(watch.wait().await),
//! }
//! # }
//! ```

pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod nuxt;
pub mod options;
pub mod run;
pub mod toolchain;
pub mod ui;

/// Program name shown in usage lines.
pub const PROGRAM: &str = "nuxt";

// Re-export commonly used types
pub use command::{CommandSpec, FatalWatch, NuxtCommand, Outcome};
pub use config::OptionsTree;
pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
pub use toolchain::{Builder, Framework, GenerateOptions, Generator, Imports, Toolchain};
