//! Spinner shown while a build or generate pipeline is running.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Spinner for pipelines without a known duration.
///
/// Falls back to a hidden bar when stderr is not a terminal, in CI, or when
/// output is silenced, so callers never have to branch on the environment.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        if !super::should_animate() {
            let pb = ProgressBar::hidden();
            pb.set_message(message.to_string());
            return Self { pb };
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));

        Self { pb }
    }

    /// Finish with a green checkmark.
    pub fn finish(&self, message: &str) {
        if self.pb.is_hidden() {
            super::success(message);
            return;
        }
        self.pb
            .finish_with_message(format!("{} {}", "✓".green(), message));
    }

    /// Clear the spinner without a message; the fatal reporter takes over.
    pub fn abandon(&self) {
        self.pb.finish_and_clear();
    }
}
