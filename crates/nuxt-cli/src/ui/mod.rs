//! Terminal output for operators.
//!
//! Status messages, the fatal reporter, the spinner shown while a pipeline
//! runs, and duration formatting. Everything writes to stderr; stdout is
//! reserved for help and version text.
//!
//! # Examples
//!
//! ```no_run
//! use nuxt_cli::ui;
//!
//! let spinner = ui::Spinner::new("Compiling...");
//! spinner.finish("Compiled");
//!
//! ui::success("Generated static files");
//! ui::warning("NODE_ENV is set to test");
//! ```

mod format;
mod messages;
mod spinner;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::format_duration;
pub use messages::{fatal, info, ready, success, warning, FATAL_EXIT_CODE};
pub use spinner::Spinner;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence everything except errors and fatal reports.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Whether non-error output is currently silenced.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Quiet mode scoped to a command run.
///
/// Dropping the guard restores whatever was in effect before.
#[must_use = "quiet mode ends when the guard is dropped"]
pub struct QuietGuard {
    previous: bool,
}

impl QuietGuard {
    pub fn enable() -> Self {
        Self {
            previous: QUIET.swap(true, Ordering::Relaxed),
        }
    }
}

impl Drop for QuietGuard {
    fn drop(&mut self) {
        set_quiet(self.previous);
    }
}

/// Variables set by the common CI providers.
const CI_ENV_VARS: [&str; 5] = ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"];

pub fn is_ci() -> bool {
    CI_ENV_VARS.iter().any(|var| std::env::var_os(var).is_some())
}

/// Color for operator messages.
///
/// `NO_COLOR` always wins, `FORCE_COLOR` comes next, otherwise color is used
/// when stderr is a terminal.
pub fn should_use_color() -> bool {
    match (std::env::var_os("NO_COLOR"), std::env::var_os("FORCE_COLOR")) {
        (Some(_), _) => false,
        (None, Some(_)) => true,
        (None, None) => console::user_attended_stderr(),
    }
}

/// Whether an animated spinner makes sense in this environment.
pub fn should_animate() -> bool {
    !is_quiet() && !is_ci() && console::user_attended_stderr()
}
