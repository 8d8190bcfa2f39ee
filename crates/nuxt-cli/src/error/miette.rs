//! Miette diagnostic conversion for CLI errors.
//!
//! The fatal reporter renders every error through miette so that hints end
//! up in the help slot instead of being glued to the message.

use crate::error::{BuildError, CliError, ConfigError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => config_error_to_miette(e),
        CliError::ModuleNotFound { module, hint } => {
            miette::miette!(help = hint, "Cannot import module '{}'", module)
        }
        _ => miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound(path) => miette::miette!(
            help = "Check the path given to --config-file",
            "Could not load config file: {}",
            path.display()
        ),
        ConfigError::InvalidValue { field, value, hint } => {
            miette::miette!(help = hint, "Invalid value for '{}': {}", field, value)
        }
        _ => miette::miette!("Configuration error: {}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::OutputMissing(dir) => miette::miette!(
            help = "Use either `nuxt build` or `nuxt generate` first",
            "No build files found in {}",
            dir.display()
        ),
        _ => miette::miette!("{}", err),
    }
}
