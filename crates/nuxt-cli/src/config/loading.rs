use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Json, Toml},
    Figment,
};
use serde_json::Value;

use crate::cli::ParsedArgv;
use crate::config::{ensure_object, OptionsTree};
use crate::error::{ConfigError, Result};

/// Config file looked up in the project root when `--config-file` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "nuxt.config.json";

/// Load the project configuration for a parsed command line.
///
/// The project root is the first positional argument (default `.`). The
/// config file is resolved against it; a file named explicitly that does
/// not exist is an error, a missing default file is not.
pub fn load_nuxt_config(argv: &ParsedArgv) -> Result<OptionsTree> {
    let root_dir = root_dir(argv)?;
    let config_name = argv.string("config-file").unwrap_or(DEFAULT_CONFIG_FILE);
    let config_file = root_dir.join(config_name);

    let mut figment = Figment::new();

    if config_file.is_file() {
        tracing::debug!(path = %config_file.display(), "loading config file");
        figment = match config_file.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(&config_file)),
            _ => figment.merge(Json::file(&config_file)),
        };
    } else if config_name != DEFAULT_CONFIG_FILE {
        return Err(ConfigError::NotFound(config_file).into());
    }

    // NUXT_BUILD__QUIET=true -> build.quiet
    figment = figment.merge(
        Env::prefixed("NUXT_")
            .split("__")
            .ignore(&["port", "host", "debug"]),
    );

    let mut options: OptionsTree = figment.extract().map_err(ConfigError::from)?;

    if !options.get("rootDir").is_some_and(Value::is_string) {
        options.insert(
            "rootDir".to_string(),
            Value::String(root_dir.to_string_lossy().into_owned()),
        );
    }

    apply_server_env(&mut options);

    Ok(options)
}

fn root_dir(argv: &ParsedArgv) -> Result<PathBuf> {
    let dir = argv
        .positionals()
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    absolute(&dir)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let joined = std::env::current_dir()?.join(path);
    Ok(joined.canonicalize().unwrap_or(joined))
}

fn env_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
}

/// `NUXT_HOST`/`HOST` and `NUXT_PORT`/`PORT` fill in the server address.
fn apply_server_env(options: &mut OptionsTree) {
    let host = env_var(&["NUXT_HOST", "HOST"]);
    let port = env_var(&["NUXT_PORT", "PORT"]);
    if host.is_none() && port.is_none() {
        return;
    }

    let server = ensure_object(options, "server");
    if let Some(host) = host {
        server.insert("host".to_string(), Value::String(host));
    }
    if let Some(port) = port {
        let value = port
            .parse::<u16>()
            .map(Value::from)
            .unwrap_or(Value::String(port));
        server.insert("port".to_string(), value);
    }
}
