//! `nuxt build`: compile the application for production.
//!
//! Universal apps (and SPAs built with `--no-generate`) go through the
//! builder only. SPAs are built and rendered to static files in one step.
//! With the bundle analyzer enabled the process stays alive after the build
//! so the analyzer can keep serving its report.

use std::ops::ControlFlow;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};

use crate::cli::{CliOption, ParsedArgv};
use crate::command::{CommandSpec, FatalWatch, NuxtCommand, Outcome};
use crate::config::{ensure_object, is_analyze, OptionsTree};
use crate::error::{CliError, Result};
use crate::options;
use crate::toolchain::GenerateOptions;
use crate::ui;

pub fn spec() -> CommandSpec {
    let mut options = options::common();
    options.insert(
        "analyze".into(),
        CliOption::boolean()
            .alias('a')
            .describe("Launch webpack-bundle-analyzer to optimize your bundles")
            .mutator(analyze),
    );
    options.insert(
        "generate".into(),
        CliOption::boolean()
            .default_value(true)
            .describe("Don't generate static version for SPA mode (useful for nuxt start)"),
    );
    options.insert(
        "modern".into(),
        CliOption::boolean()
            .alias('m')
            .describe("Build app for modern browsers")
            .mutator(modern),
    );
    options.insert(
        "quiet".into(),
        CliOption::boolean()
            .alias('q')
            .describe("Disable output except for errors")
            .mutator(quiet),
    );

    CommandSpec {
        name: "build".into(),
        description: "Compiles the application for production deployment".into(),
        usage: "build <dir>".into(),
        options,
        run,
    }
}

fn analyze(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    let build = ensure_object(options, "build");
    if argv.is_set("analyze") && !build.get("analyze").is_some_and(Value::is_object) {
        build.insert("analyze".into(), json!(true));
    }
    Ok(())
}

fn modern(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    let build = ensure_object(options, "build");
    if argv.is_set("modern") {
        build.insert("modern".into(), json!(true));
    }
    Ok(())
}

fn quiet(_: &NuxtCommand, options: &mut OptionsTree, argv: &ParsedArgv) -> Result<()> {
    let build = ensure_object(options, "build");
    if argv.is_set("quiet") {
        build.insert("quiet".into(), json!(true));
    }
    Ok(())
}

fn run(cmd: &NuxtCommand) -> BoxFuture<'_, Result<Outcome>> {
    execute(cmd).boxed()
}

/// Whether the build skips static generation.
pub fn build_only(mode: &str, argv: &ParsedArgv) -> bool {
    mode != "spa" || argv.flag("generate") == Some(false)
}

async fn execute(cmd: &NuxtCommand) -> Result<Outcome> {
    let argv = match cmd.get_argv(None)? {
        ControlFlow::Continue(argv) => argv,
        ControlFlow::Break(outcome) => return Ok(outcome),
    };

    let mut extra = OptionsTree::new();
    extra.insert("dev".into(), json!(false));
    let options = cmd.get_nuxt_config(&argv, extra).await?;

    let _quiet = options
        .get("build")
        .and_then(|build| build.get("quiet"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
        .then(ui::QuietGuard::enable);

    let nuxt = cmd.get_nuxt(options).await?;
    let mut watch = FatalWatch::attach(&nuxt);

    let mode = nuxt
        .options()
        .get("mode")
        .and_then(Value::as_str)
        .unwrap_or("universal");
    let start = Instant::now();

    let result = if build_only(mode, &argv) {
        tracing::debug!(mode, "build only");
        let builder = cmd.get_builder(&nuxt).await?;
        let spinner = ui::Spinner::new("Building...");
        let result = watch
            .guard(builder.build())
            .await
            .map_err(CliError::into_builder_error);
        finish(&spinner, &result, "Built", start);
        result
    } else {
        tracing::debug!(mode, "build and generate");
        let generator = cmd.get_generator(&nuxt).await?;
        let spinner = ui::Spinner::new("Building and generating...");
        let result = watch
            .guard(generator.generate(GenerateOptions { build: true }))
            .await
            .map_err(CliError::into_generator_error);
        finish(&spinner, &result, "Generated", start);
        result
    };
    result?;

    if is_analyze(nuxt.options()) {
        ui::info("Bundle analyzer is running, press Ctrl-C to stop");
        return Ok(Outcome::Stay(watch));
    }

    Ok(Outcome::Exit(0))
}

fn finish(spinner: &ui::Spinner, result: &Result<()>, done: &str, start: Instant) {
    match result {
        Ok(()) => spinner.finish(&format!(
            "{} in {}",
            done,
            ui::format_duration(start.elapsed())
        )),
        Err(_) => spinner.abandon(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ArgValue, ParserConfig};

    fn argv(args: &[&str]) -> ParsedArgv {
        ParserConfig::from_schema(&spec().options)
            .unwrap()
            .parse(args.iter().copied())
            .unwrap()
    }

    fn mutate(args: &[&str], base: Value) -> OptionsTree {
        let cmd = NuxtCommand::from(spec());
        let argv = argv(args);
        let mut options = match base {
            Value::Object(map) => map,
            _ => OptionsTree::new(),
        };
        for option in cmd.options.values() {
            if let Some(mutator) = option.mutator {
                mutator(&cmd, &mut options, &argv).unwrap();
            }
        }
        options
    }

    #[test]
    fn test_schema_order_and_buckets() {
        let spec = spec();
        let names: Vec<&str> = spec.options.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "spa", "universal", "config-file", "version", "help", "analyze", "generate",
                "modern", "quiet"
            ]
        );

        let config = ParserConfig::from_schema(&spec.options).unwrap();
        assert_eq!(config.boolean, vec!["s", "u", "v", "h", "a", "generate", "m", "q"]);
        assert_eq!(config.string, vec!["c"]);
        assert_eq!(config.default.get("generate"), Some(&ArgValue::Bool(true)));
    }

    #[test]
    fn test_build_only_routing() {
        assert!(build_only("universal", &argv(&[])));
        assert!(!build_only("spa", &argv(&[])));
        assert!(build_only("spa", &argv(&["--no-generate"])));
    }

    #[test]
    fn test_mutators_always_create_build() {
        let options = mutate(&[], json!({}));
        assert_eq!(options.get("build"), Some(&json!({})));
    }

    #[test]
    fn test_analyze_sets_flag() {
        let options = mutate(&["-a"], json!({}));
        assert_eq!(options.get("build"), Some(&json!({ "analyze": true })));
        assert!(is_analyze(&options));
    }

    #[test]
    fn test_analyze_keeps_object_config() {
        let options = mutate(&["--analyze"], json!({ "build": { "analyze": { "port": 9000 } } }));
        assert_eq!(options.get("build"), Some(&json!({ "analyze": { "port": 9000 } })));
    }

    #[test]
    fn test_modern_and_quiet() {
        let options = mutate(&["-m", "-q"], json!({}));
        assert_eq!(options.get("build"), Some(&json!({ "modern": true, "quiet": true })));
    }

    #[test]
    fn test_help_mentions_negated_generate() {
        let help = NuxtCommand::from(spec()).get_help();
        assert!(help.contains("--no-generate"));
        assert!(help.contains("--analyze, -a"));
        assert!(help.contains("Usage: nuxt build <dir> [options]"));
    }
}
