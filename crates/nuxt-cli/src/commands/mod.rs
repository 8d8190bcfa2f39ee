//! Command modules.
//!
//! - [`dev`] - Build in development mode and serve
//! - [`build`] - Compile for production
//! - [`start`] - Serve a production build
//! - [`generate`] - Render a static site
//!
//! Each module exports a `spec()` returning its [`CommandSpec`].

pub mod build;
pub mod dev;
pub mod generate;
pub mod start;

use crate::command::CommandSpec;
use crate::error::{CliError, Result};

/// Resolve a command module by name.
pub async fn resolve(name: &str) -> Result<CommandSpec> {
    match name {
        "dev" => Ok(dev::spec()),
        "build" => Ok(build::spec()),
        "start" => Ok(start::spec()),
        "generate" => Ok(generate::spec()),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}
