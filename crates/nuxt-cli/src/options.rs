//! Option tables shared between commands.

use serde_json::{json, Value};

use crate::cli::{CliOption, OptionSchema, ParsedArgv};
use crate::command::NuxtCommand;
use crate::config::{ensure_object, OptionsTree, DEFAULT_CONFIG_FILE};
use crate::error::{ConfigError, Result};

/// Options every command accepts.
pub fn common() -> OptionSchema {
    let mut options = OptionSchema::new();
    options.insert(
        "spa".into(),
        CliOption::boolean()
            .alias('s')
            .describe("Launch in SPA mode")
            .mutator(spa),
    );
    options.insert(
        "universal".into(),
        CliOption::boolean()
            .alias('u')
            .describe("Launch in Universal mode (default)")
            .mutator(universal),
    );
    options.insert(
        "config-file".into(),
        CliOption::string()
            .alias('c')
            .default_value(DEFAULT_CONFIG_FILE)
            .describe(format!("Path to Nuxt.js config file (default: {})", DEFAULT_CONFIG_FILE)),
    );
    options.insert(
        "version".into(),
        CliOption::boolean().alias('v').describe("Display the Nuxt version"),
    );
    options.insert(
        "help".into(),
        CliOption::boolean().alias('h').describe("Display this message"),
    );
    options
}

/// Options of the commands that start a server.
pub fn server() -> OptionSchema {
    let mut options = OptionSchema::new();
    options.insert(
        "hostname".into(),
        CliOption::string()
            .alias('H')
            .describe("Hostname on which to start the application")
            .mutator(hostname),
    );
    options.insert(
        "port".into(),
        CliOption::string()
            .alias('p')
            .describe("Port number on which to start the application")
            .mutator(port),
    );
    options.insert(
        "unix-socket".into(),
        CliOption::string()
            .alias('n')
            .describe("Path to a UNIX socket")
            .mutator(unix_socket),
    );
    options
}

fn spa(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    if argv.is_set("spa") {
        options.insert("mode".into(), json!("spa"));
    }
    Ok(())
}

fn universal(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    if argv.is_set("universal") {
        options.insert("mode".into(), json!("universal"));
    }
    Ok(())
}

fn hostname(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    match argv.string("hostname") {
        None => Ok(()),
        Some("") => Err(ConfigError::MissingValue("hostname".into()).into()),
        Some(host) => {
            ensure_object(options, "server").insert("host".into(), json!(host));
            Ok(())
        }
    }
}

fn port(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    let Some(raw) = argv.string("port") else {
        return Ok(());
    };
    let port: u16 = raw.parse().map_err(|_| ConfigError::InvalidValue {
        field: "port".into(),
        value: raw.to_string(),
        hint: "Use a number between 0 and 65535".into(),
    })?;
    ensure_object(options, "server").insert("port".into(), Value::from(port));
    Ok(())
}

fn unix_socket(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    if let Some(socket) = argv.string("unix-socket").filter(|s| !s.is_empty()) {
        ensure_object(options, "server").insert("socket".into(), json!(socket));
    }
    Ok(())
}
