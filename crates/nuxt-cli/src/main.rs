//! Nuxt CLI entry point.
//!
//! Initializes logging, hands the process arguments to the dispatcher and
//! turns its [`Outcome`] into the process exit.

use nuxt_cli::{logger, run, ui, Outcome};

#[tokio::main]
async fn main() {
    logger::init_logger(logger::debug_requested(), false, !ui::should_use_color());

    let args: Vec<String> = std::env::args().skip(1).collect();

    let code = match run::run(args).await {
        Outcome::Exit(code) => code,
        Outcome::Stay(watch) => watch.wait().await,
    };

    std::process::exit(code);
}
