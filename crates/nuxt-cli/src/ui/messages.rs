//! Status message functions for terminal output.

use owo_colors::OwoColorize;

use crate::error::{cli_error_to_miette, CliError};

/// Exit code used by the binary after a fatal report.
pub const FATAL_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Status,
    Warning,
}

/// Quiet mode hides status lines; warnings always show.
fn visible(kind: Kind) -> bool {
    kind == Kind::Warning || !super::is_quiet()
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    if !visible(Kind::Status) {
        return;
    }
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print an info message to stderr.
///
/// # Examples
///
/// ```no_run
/// use nuxt_cli::ui::info;
///
/// info("Loading nuxt.config.json");
/// ```
pub fn info(message: &str) {
    if !visible(Kind::Status) {
        return;
    }
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message to stderr, in quiet mode too.
pub fn warning(message: &str) {
    if !visible(Kind::Warning) {
        return;
    }
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Announce that the server is accepting connections.
pub fn ready(url: &str) {
    if !visible(Kind::Status) {
        return;
    }
    eprintln!(
        "\n  {} {}\n",
        "Listening on:".bold(),
        url.cyan().underline()
    );
}

/// Report an error the command cannot recover from.
///
/// Renders the error through miette and returns the exit code the process
/// should terminate with.
pub fn fatal(err: CliError) -> i32 {
    tracing::error!(error = %err, "fatal");
    let report = cli_error_to_miette(err);
    eprintln!("{} {:?}", "FATAL".on_red().white().bold(), report);
    FATAL_EXIT_CODE
}
