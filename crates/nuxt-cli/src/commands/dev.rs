//! `nuxt dev`: build in development mode and serve the result.

use std::ops::ControlFlow;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;

use crate::command::{CommandSpec, FatalWatch, NuxtCommand, Outcome};
use crate::config::OptionsTree;
use crate::error::{CliError, Result};
use crate::options;
use crate::ui;

pub fn spec() -> CommandSpec {
    let mut options = options::common();
    options.extend(options::server());

    CommandSpec {
        name: "dev".into(),
        description: "Start the application in development mode (e.g. hot-code reloading, error reporting)".into(),
        usage: "dev <dir>".into(),
        options,
        run,
    }
}

fn run(cmd: &NuxtCommand) -> BoxFuture<'_, Result<Outcome>> {
    execute(cmd).boxed()
}

async fn execute(cmd: &NuxtCommand) -> Result<Outcome> {
    let argv = match cmd.get_argv(None)? {
        ControlFlow::Continue(argv) => argv,
        ControlFlow::Break(outcome) => return Ok(outcome),
    };

    let mut extra = OptionsTree::new();
    extra.insert("dev".into(), json!(true));
    let options = cmd.get_nuxt_config(&argv, extra).await?;

    let nuxt = cmd.get_nuxt(options).await?;
    let mut watch = FatalWatch::attach(&nuxt);
    let builder = cmd.get_builder(&nuxt).await?;

    let spinner = ui::Spinner::new("Compiling...");
    let start = Instant::now();
    if let Err(err) = watch.guard(builder.build()).await.map_err(CliError::into_builder_error) {
        spinner.abandon();
        return Err(err);
    }
    spinner.finish(&format!(
        "Compiled in {}",
        ui::format_duration(start.elapsed())
    ));

    let url = watch.guard(nuxt.listen()).await?;
    ui::ready(&url);

    Ok(Outcome::Stay(watch))
}
