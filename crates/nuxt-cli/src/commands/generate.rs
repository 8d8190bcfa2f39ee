//! `nuxt generate`: render every route to static HTML.

use std::ops::ControlFlow;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;

use crate::cli::{CliOption, ParsedArgv};
use crate::command::{CommandSpec, FatalWatch, NuxtCommand, Outcome};
use crate::config::{ensure_object, OptionsTree};
use crate::error::{CliError, Result};
use crate::options;
use crate::toolchain::GenerateOptions;
use crate::ui;

pub fn spec() -> CommandSpec {
    let mut options = options::common();
    options.insert(
        "build".into(),
        CliOption::boolean()
            .default_value(true)
            .describe("Only generate pages for dynamic routes. Nuxt has to be built once before using this option"),
    );
    options.insert(
        "modern".into(),
        CliOption::boolean()
            .alias('m')
            .describe("Generate app in modern build (modern mode can be only client)")
            .mutator(modern),
    );

    CommandSpec {
        name: "generate".into(),
        description: "Generate a static web application (server-rendered)".into(),
        usage: "generate <dir>".into(),
        options,
        run,
    }
}

fn modern(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    if argv.is_set("modern") {
        ensure_object(options, "build").insert("modern".into(), json!("client"));
    }
    Ok(())
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
    extra.insert("dev".into(), json!(false));
    let options = cmd.get_nuxt_config(&argv, extra).await?;

    let nuxt = cmd.get_nuxt(options).await?;
    let mut watch = FatalWatch::attach(&nuxt);
    let generator = cmd.get_generator(&nuxt).await?;

    let build = argv.flag("build").unwrap_or(true);
    let spinner = ui::Spinner::new(if build {
        "Building and generating..."
    } else {
        "Generating..."
    });
    let start = Instant::now();

    match watch
        .guard(generator.generate(GenerateOptions { build }))
        .await
        .map_err(CliError::into_generator_error)
    {
        Ok(()) => spinner.finish(&format!(
            "Generated in {}",
            ui::format_duration(start.elapsed())
        )),
        Err(err) => {
            spinner.abandon();
            return Err(err);
        }
    }

    Ok(Outcome::Exit(0))
}
