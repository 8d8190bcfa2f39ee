//! Error handling for the Nuxt CLI.
//!
//! This module provides a hierarchical error type system using `thiserror`.
//! Every error a command can hit ends up here and, eventually, in the fatal
//! reporter at the top of the dispatcher.
//!
//! # Architecture
//!
//! - **Top-level errors** (`CliError`) represent broad categories of failures
//! - **Domain-specific errors** (`ConfigError`, `BuildError`) carry the detail
//! - **Error conversion** is automatic via `#[from]` attributes
//! - **Context helpers** allow attaching additional information to errors
//!
//! # Example
//!
//! ```rust,no_run
//! use nuxt_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_config(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

pub mod miette;

pub use self::miette::cli_error_to_miette;

/// Top-level CLI error type.
///
/// This is the error type returned by commands, mutator hooks and
/// collaborator factories.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (missing file, invalid values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Build, generate or framework runtime errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A collaborator module could not be resolved
    #[error("Cannot import module '{module}'\n\nHint: {hint}")]
    ModuleNotFound {
        /// Name of the module that failed to resolve
        module: String,
        /// What the operator should do about it
        hint: String,
    },

    /// Unknown command name handed to the resolver
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server listener errors
    #[error("Server error: {0}")]
    Server(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
///
/// These errors occur while loading the project configuration and while
/// option mutators write CLI overrides into it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file named on the command line doesn't exist
    #[error("Could not load config file: {}\n\nHint: Check the path given to --config-file", .0.display())]
    NotFound(PathBuf),

    /// Config file or environment could not be extracted
    #[error("Failed to load configuration: {0}\n\nHint: Check the config file syntax and field types")]
    Load(#[from] Box<figment::Error>),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// A flag that requires a value was given without one
    #[error("Provided {0} argument has no value")]
    MissingValue(String),
}

/// Build pipeline errors.
///
/// These errors come from the builder, the generator, or the framework
/// instance reporting an `error` event while a pipeline runs.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The framework instance reported an error event
    #[error("{0}")]
    Framework(String),

    /// The builder's build operation failed
    #[error("Build failed: {0}")]
    Builder(String),

    /// The generator's generate operation failed
    #[error("Generate failed: {0}")]
    Generator(String),

    /// Build output required by `start` is missing
    #[error("No build files found in {}\n\nHint: Use either `nuxt build` or `nuxt generate` first", .0.display())]
    OutputMissing(PathBuf),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Config(err.into())
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Add a file path to the error context.
    ///
    /// Not-found I/O errors become [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }
}

impl CliError {
    /// Attribute a failure of `Builder::build` to the builder.
    ///
    /// Build errors, including framework `error` events, pass through.
    pub fn into_builder_error(self) -> Self {
        match self {
            CliError::Build(_) => self,
            other => BuildError::Builder(other.to_string()).into(),
        }
    }

    /// Attribute a failure of `Generator::generate` to the generator.
    pub fn into_generator_error(self) -> Self {
        match self {
            CliError::Build(_) => self,
            other => BuildError::Generator(other.to_string()).into(),
        }
    }
}
