//! Command descriptor and the operations every command shares.
//!
//! A [`NuxtCommand`] bundles a command's metadata, its option schema and its
//! entry function with the [`Toolchain`] that supplies configuration and
//! collaborators. Commands finish with an [`Outcome`]: exit now with a code,
//! or keep the process alive until a fatal event or Ctrl-C.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::cli::{help, OptionSchema, ParsedArgv, ParserConfig};
use crate::config::OptionsTree;
use crate::error::{BuildError, CliError, Result};
use crate::toolchain::{handler, Builder, Framework, Generator, HookArgs, Imports, Toolchain};
use crate::{ui, PROGRAM};

/// Entry function of a command.
pub type RunFn = fn(&NuxtCommand) -> BoxFuture<'_, Result<Outcome>>;

/// Declarative description of a command, as exported by a command module.
#[derive(Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub options: OptionSchema,
    pub run: RunFn,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// How the process should continue after a command returns.
pub enum Outcome {
    /// Terminate with this exit code.
    Exit(i32),
    /// Keep running; a long-lived task (server, bundle analyzer) owns the
    /// process until it reports a fatal error.
    Stay(FatalWatch),
}

impl Outcome {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Outcome::Exit(code) => Some(*code),
            Outcome::Stay(_) => None,
        }
    }

    pub fn is_stay(&self) -> bool {
        matches!(self, Outcome::Stay(_))
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Exit(code) => f.debug_tuple("Exit").field(code).finish(),
            Outcome::Stay(_) => f.write_str("Stay"),
        }
    }
}

/// Receives the framework's `error` events.
///
/// Created by [`FatalWatch::attach`], which registers an `error` hook on the
/// framework instance. While a pipeline runs, [`FatalWatch::guard`] turns an
/// event into the pipeline's error; afterwards [`FatalWatch::wait`] parks
/// the process until one arrives.
pub struct FatalWatch {
    events: mpsc::UnboundedReceiver<CliError>,
    nuxt: Arc<dyn Framework>,
}

impl FatalWatch {
    pub fn attach(nuxt: &Arc<dyn Framework>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        nuxt.hook(
            "error",
            handler(move |args| {
                if let HookArgs::Error(err) = args {
                    let _ = tx.send(BuildError::Framework(err.to_string()).into());
                }
            }),
        );
        Self {
            events,
            nuxt: nuxt.clone(),
        }
    }

    /// Run `pipeline`, failing early when an `error` event arrives first.
    pub async fn guard<T, F>(&mut self, pipeline: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            Some(err) = self.events.recv() => Err(err),
            result = pipeline => result,
        }
    }

    /// Next fatal event.
    pub async fn next_fatal(&mut self) -> Option<CliError> {
        self.events.recv().await
    }

    /// Park until a fatal event (reported, exit code 1) or Ctrl-C (exit 0).
    pub async fn wait(mut self) -> i32 {
        tokio::select! {
            Some(err) = self.events.recv() => ui::fatal(err),
            _ = tokio::signal::ctrl_c() => {
                if let Err(err) = self.nuxt.close().await {
                    ui::warning(&format!("Failed to close: {}", err));
                }
                0
            }
        }
    }
}

/// A command ready to run.
///
/// Built from a [`CommandSpec`] with `NuxtCommand::from`. Converting a
/// `NuxtCommand` again returns it unchanged.
///
/// ```
/// use nuxt_cli::command::NuxtCommand;
/// use nuxt_cli::commands;
///
/// let cmd = NuxtCommand::from(commands::build::spec());
/// let same = NuxtCommand::from(cmd.clone());
/// assert_eq!(cmd.name, same.name);
/// ```
#[derive(Clone)]
pub struct NuxtCommand {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub options: OptionSchema,
    run: RunFn,
    toolchain: Arc<dyn Toolchain>,
    args: Option<Vec<String>>,
}

impl From<CommandSpec> for NuxtCommand {
    fn from(spec: CommandSpec) -> Self {
        Self {
            name: spec.name,
            description: spec.description,
            usage: spec.usage,
            options: spec.options,
            run: spec.run,
            toolchain: Arc::new(Imports::default()),
            args: None,
        }
    }
}

impl NuxtCommand {
    /// Use `toolchain` for configuration and collaborators.
    pub fn with_toolchain(mut self, toolchain: Arc<dyn Toolchain>) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Parse these tokens instead of the process arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn toolchain(&self) -> &Arc<dyn Toolchain> {
        &self.toolchain
    }

    pub fn parser_config(&self) -> Result<ParserConfig> {
        ParserConfig::from_schema(&self.options)
    }

    /// Parse `args`, the tokens given to [`with_args`](Self::with_args), or
    /// the process arguments after the command name.
    ///
    /// `--version` prints the version and `--help` the help page; both
    /// break with [`Outcome::Exit`]`(0)` and the command must return it
    /// without doing anything else.
    pub fn get_argv(&self, args: Option<Vec<String>>) -> Result<ControlFlow<Outcome, ParsedArgv>> {
        let args = args
            .or_else(|| self.args.clone())
            .unwrap_or_else(crate::run::process_args);
        let argv = self.parser_config()?.parse(args)?;

        if argv.version() {
            self.show_version();
            return Ok(ControlFlow::Break(Outcome::Exit(0)));
        }
        if argv.help() {
            self.show_help();
            return Ok(ControlFlow::Break(Outcome::Exit(0)));
        }

        Ok(ControlFlow::Continue(argv))
    }

    /// Load the project configuration, apply `extra` on top of it, then run
    /// every option mutator in declaration order.
    pub async fn get_nuxt_config(&self, argv: &ParsedArgv, extra: OptionsTree) -> Result<OptionsTree> {
        let mut options = self.toolchain.load_config(argv).await?;
        options.extend(extra);

        for (name, option) in &self.options {
            if let Some(mutator) = option.mutator {
                tracing::debug!(option = %name, "applying option");
                mutator(self, &mut options, argv)?;
            }
        }

        Ok(options)
    }

    pub async fn get_nuxt(&self, options: OptionsTree) -> Result<Arc<dyn Framework>> {
        self.toolchain.core(options).await
    }

    pub async fn get_builder(&self, nuxt: &Arc<dyn Framework>) -> Result<Arc<dyn Builder>> {
        self.toolchain.builder(nuxt.clone()).await
    }

    /// Resolve the generator, then construct it around a fresh builder.
    pub async fn get_generator(&self, nuxt: &Arc<dyn Framework>) -> Result<Arc<dyn Generator>> {
        let generator = self.toolchain.generator().await?;
        let builder = self.get_builder(nuxt).await?;
        generator(nuxt.clone(), builder)
    }

    pub async fn run(&self) -> Result<Outcome> {
        (self.run)(self).await
    }

    pub fn get_help(&self) -> String {
        help::render(PROGRAM, &self.usage, &self.description, &self.options)
    }

    pub fn version_text() -> String {
        format!("{} v{}\n", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    pub fn show_version(&self) {
        print!("{}", Self::version_text());
    }

    pub fn show_help(&self) {
        print!("{}", self.get_help());
    }
}

impl std::fmt::Debug for NuxtCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NuxtCommand")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .field("args", &self.args)
            .finish()
    }
}
