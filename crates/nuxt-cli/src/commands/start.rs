//! `nuxt start`: serve a production build.

use std::ops::ControlFlow;
use std::path::PathBuf;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;

use crate::command::{CommandSpec, FatalWatch, NuxtCommand, Outcome};
use crate::config::{get_str, OptionsTree};
use crate::error::{BuildError, Result};
use crate::options;
use crate::ui;

pub fn spec() -> CommandSpec {
    let mut options = options::common();
    options.extend(options::server());

    CommandSpec {
        name: "start".into(),
        description: "Start the application in production mode (the application should be compiled with `nuxt build` first)".into(),
        usage: "start <dir>".into(),
        options,
        run,
    }
}

fn run(cmd: &NuxtCommand) -> BoxFuture<'_, Result<Outcome>> {
    execute(cmd).boxed()
}

/// Directory that must exist before the server can start.
///
/// Universal apps need the compiled bundle under `<buildDir>/dist`; SPAs need
/// the generated site.
pub fn required_output(options: &OptionsTree) -> PathBuf {
    let root = PathBuf::from(get_str(options, "rootDir").unwrap_or("."));
    if get_str(options, "mode") == Some("spa") {
        root.join(get_str(options, "generate.dir").unwrap_or("dist"))
    } else {
        root.join(get_str(options, "buildDir").unwrap_or(".nuxt"))
            .join("dist")
    }
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

    let output = required_output(nuxt.options());
    if !output.is_dir() {
        return Err(BuildError::OutputMissing(output).into());
    }

    let url = watch.guard(nuxt.listen()).await?;
    ui::ready(&url);

    Ok(Outcome::Stay(watch))
}
