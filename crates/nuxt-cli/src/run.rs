//! Top-level dispatcher.
//!
//! Picks the command from the first argument, prepares the runtime
//! environment, resolves the command module and runs it. Every error that
//! reaches this level is reported once, as fatal.

use std::sync::Arc;

use crate::command::{NuxtCommand, Outcome};
use crate::commands;
use crate::error::Result;
use crate::toolchain::{Imports, Toolchain};
use crate::ui;

/// Command run when the first argument names no command.
pub const DEFAULT_COMMAND: &str = "dev";

/// Commands the first argument may select.
pub const COMMANDS: [&str; 4] = [DEFAULT_COMMAND, "build", "start", "generate"];

/// Split the command name off `args`.
///
/// The first token is consumed only when it names a known command;
/// otherwise every token is kept and the default command is selected.
pub fn select_command(mut args: Vec<String>) -> (String, Vec<String>) {
    match args.first() {
        Some(first) if COMMANDS.contains(&first.as_str()) => {
            let name = args.remove(0);
            (name, args)
        }
        _ => (DEFAULT_COMMAND.to_string(), args),
    }
}

/// Process arguments after the program name and command token.
pub fn process_args() -> Vec<String> {
    select_command(std::env::args().skip(1).collect()).1
}

/// Prepare the process environment for a development or production run.
///
/// `NODE_ENV` is set only when the user has not set it.
pub fn setup(dev: bool) {
    let expected = if dev { "development" } else { "production" };
    match std::env::var("NODE_ENV") {
        Ok(current) if current != expected => ui::warning(&format!(
            "NODE_ENV is set to '{}', running with it instead of '{}'",
            current, expected
        )),
        Ok(_) => {}
        Err(_) => std::env::set_var("NODE_ENV", expected),
    }
    tracing::debug!(
        dev,
        node_env = %std::env::var("NODE_ENV").unwrap_or_default(),
        "runtime ready"
    );
}

/// Run the CLI with the stock toolchain.
pub async fn run(args: Vec<String>) -> Outcome {
    run_with(Arc::new(Imports::default()), args).await
}

/// Run the CLI with `toolchain` supplying configuration and collaborators.
///
/// Errors are reported through [`ui::fatal`] and become
/// [`Outcome::Exit`] with its exit code.
pub async fn run_with(toolchain: Arc<dyn Toolchain>, args: Vec<String>) -> Outcome {
    match dispatch(toolchain, args).await {
        Ok(outcome) => outcome,
        Err(err) => Outcome::Exit(ui::fatal(err)),
    }
}

async fn dispatch(toolchain: Arc<dyn Toolchain>, args: Vec<String>) -> Result<Outcome> {
    let (name, args) = select_command(args);
    tracing::debug!(command = %name, ?args, "dispatching");

    setup(name == DEFAULT_COMMAND);

    let spec = commands::resolve(&name).await?;
    let cmd = NuxtCommand::from(spec)
        .with_toolchain(toolchain)
        .with_args(args);
    cmd.run().await
}
