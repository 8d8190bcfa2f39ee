//! Collaborator seams: framework instance, builder, generator.
//!
//! Commands never construct collaborators directly. They go through a
//! [`Toolchain`], which loads configuration and builds fresh collaborator
//! instances on every call. [`Imports`] is the stock toolchain; embedders
//! register the builder, bundler and generator it should hand out.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::cli::ParsedArgv;
use crate::config::{load_nuxt_config, OptionsTree};
use crate::error::{CliError, Result};
use crate::nuxt::Nuxt;

/// Payload delivered to hook handlers.
#[derive(Debug, Clone, Copy)]
pub enum HookArgs<'a> {
    /// The framework hit an error outside of an awaited call.
    Error(&'a CliError),
    /// The server is accepting connections.
    Listen { url: &'a str },
    /// The instance is shutting down.
    Close,
}

/// Hook handler.
pub type Hook = Arc<dyn Fn(&HookArgs<'_>) + Send + Sync>;

/// Wrap a closure as a [`Hook`].
///
/// ```
/// use nuxt_cli::toolchain::{handler, HookArgs, Hooks};
///
/// let hooks = Hooks::new();
/// hooks.hook("error", handler(|args| {
///     if let HookArgs::Error(err) = args {
///         eprintln!("{}", err);
///     }
/// }));
/// ```
pub fn handler<F>(f: F) -> Hook
where
    F: Fn(&HookArgs<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Hook registry shared by a framework instance and its server task.
///
/// Handlers run synchronously, in registration order.
#[derive(Clone, Default)]
pub struct Hooks {
    handlers: Arc<Mutex<IndexMap<String, Vec<Hook>>>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for the `name` event.
    pub fn hook(&self, name: &str, handler: Hook) {
        self.handlers
            .lock()
            .entry(name.to_string())
            .or_default()
            .push(handler);
    }

    /// Call every handler registered for `name`.
    pub fn call(&self, name: &str, args: &HookArgs<'_>) {
        // Handlers may register more hooks; never hold the lock while calling.
        let handlers = self.handlers.lock().get(name).cloned().unwrap_or_default();
        tracing::debug!(hook = name, handlers = handlers.len(), "calling hook");
        for handler in handlers {
            handler(args);
        }
    }

    /// Number of handlers registered for `name`.
    pub fn count(&self, name: &str) -> usize {
        self.handlers.lock().get(name).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.lock();
        let mut map = f.debug_map();
        for (name, list) in handlers.iter() {
            map.entry(name, &list.len());
        }
        map.finish()
    }
}

/// Application framework instance.
#[async_trait]
pub trait Framework: Send + Sync {
    /// Normalized options the instance was constructed from.
    fn options(&self) -> &OptionsTree;

    /// Register a handler for a named event (`error`, `listen`, `close`).
    fn hook(&self, name: &str, handler: Hook);

    /// Fire a named event.
    fn call_hook(&self, name: &str, args: &HookArgs<'_>);

    /// Start serving and return the URL the server listens on.
    async fn listen(&self) -> Result<String>;

    /// Stop serving and release resources.
    async fn close(&self) -> Result<()>;
}

/// Compiles the application.
#[async_trait]
pub trait Builder: Send + Sync {
    async fn build(&self) -> Result<()>;
}

/// Bundling strategy used by a [`Builder`].
#[async_trait]
pub trait BundleBuilder: Send + Sync {
    /// Bundle the compiled application.
    async fn build(&self) -> Result<()>;
}

/// Options for [`Generator::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Run the builder before rendering routes.
    pub build: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { build: true }
    }
}

/// Renders the application to static files.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, options: GenerateOptions) -> Result<()>;
}

/// Source of configuration and collaborator instances.
///
/// Every factory returns a fresh instance; nothing is cached.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Load the base configuration for a parsed command line.
    async fn load_config(&self, argv: &ParsedArgv) -> Result<OptionsTree>;

    /// Construct a framework instance from composed options.
    async fn core(&self, options: OptionsTree) -> Result<Arc<dyn Framework>>;

    /// Construct a builder bound to `nuxt`, with its bundling strategy.
    async fn builder(&self, nuxt: Arc<dyn Framework>) -> Result<Arc<dyn Builder>>;

    /// Resolve the generator constructor.
    ///
    /// Resolution comes before the builder it needs is constructed, so a
    /// missing generator is reported as such.
    async fn generator(&self) -> Result<GeneratorFactory>;
}

/// Constructor for a builder given its framework instance and bundler.
pub type BuilderFactory =
    Arc<dyn Fn(Arc<dyn Framework>, Arc<dyn BundleBuilder>) -> Result<Arc<dyn Builder>> + Send + Sync>;

/// Constructor for the bundling strategy.
pub type BundlerFactory = Arc<dyn Fn(Arc<dyn Framework>) -> Result<Arc<dyn BundleBuilder>> + Send + Sync>;

/// Constructor for a generator given its framework instance and builder.
pub type GeneratorFactory =
    Arc<dyn Fn(Arc<dyn Framework>, Arc<dyn Builder>) -> Result<Arc<dyn Generator>> + Send + Sync>;

const BUILDER_MODULE: &str = "@nuxt/builder";
const BUNDLER_MODULE: &str = "@nuxt/webpack";
const GENERATOR_MODULE: &str = "@nuxt/generator";

/// Stock toolchain.
///
/// Loads `nuxt.config.json` through [`load_nuxt_config`], constructs
/// [`Nuxt`] instances, and resolves builder, bundler and generator from the
/// constructors registered with [`Imports::with_builder`],
/// [`Imports::with_bundler`] and [`Imports::with_generator`].
///
/// ```no_run
/// use std::sync::Arc;
/// use nuxt_cli::toolchain::{Builder, BundleBuilder, Imports};
///
/// # fn bundler() -> Arc<dyn BundleBuilder> { unimplemented!() }
/// # fn builder(bundler: Arc<dyn BundleBuilder>) -> Arc<dyn Builder> { unimplemented!() }
/// let imports = Imports::new()
///     .with_bundler(|_nuxt| Ok(bundler()))
///     .with_builder(|_nuxt, bundler| Ok(builder(bundler)));
/// ```
#[derive(Clone, Default)]
pub struct Imports {
    builder: Option<BuilderFactory>,
    bundler: Option<BundlerFactory>,
    generator: Option<GeneratorFactory>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder<F>(mut self, factory: F) -> Self
    where
        F: Fn(Arc<dyn Framework>, Arc<dyn BundleBuilder>) -> Result<Arc<dyn Builder>> + Send + Sync + 'static,
    {
        self.builder = Some(Arc::new(factory));
        self
    }

    pub fn with_bundler<F>(mut self, factory: F) -> Self
    where
        F: Fn(Arc<dyn Framework>) -> Result<Arc<dyn BundleBuilder>> + Send + Sync + 'static,
    {
        self.bundler = Some(Arc::new(factory));
        self
    }

    pub fn with_generator<F>(mut self, factory: F) -> Self
    where
        F: Fn(Arc<dyn Framework>, Arc<dyn Builder>) -> Result<Arc<dyn Generator>> + Send + Sync + 'static,
    {
        self.generator = Some(Arc::new(factory));
        self
    }
}

fn not_registered(module: &str, registration: &str) -> CliError {
    CliError::ModuleNotFound {
        module: module.to_string(),
        hint: format!(
            "Install {} or register one with `Imports::{}`",
            module, registration
        ),
    }
}

#[async_trait]
impl Toolchain for Imports {
    async fn load_config(&self, argv: &ParsedArgv) -> Result<OptionsTree> {
        load_nuxt_config(argv)
    }

    async fn core(&self, options: OptionsTree) -> Result<Arc<dyn Framework>> {
        Ok(Arc::new(Nuxt::new(options)))
    }

    async fn builder(&self, nuxt: Arc<dyn Framework>) -> Result<Arc<dyn Builder>> {
        let builder = self
            .builder
            .as_ref()
            .ok_or_else(|| not_registered(BUILDER_MODULE, "with_builder"))?;
        let bundler = self
            .bundler
            .as_ref()
            .ok_or_else(|| not_registered(BUNDLER_MODULE, "with_bundler"))?;

        let bundle_builder = bundler(nuxt.clone())?;
        builder(nuxt, bundle_builder)
    }

    async fn generator(&self) -> Result<GeneratorFactory> {
        self.generator
            .clone()
            .ok_or_else(|| not_registered(GENERATOR_MODULE, "with_generator"))
    }
}

impl std::fmt::Debug for Imports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Imports")
            .field("builder", &self.builder.is_some())
            .field("bundler", &self.bundler.is_some())
            .field("generator", &self.generator.is_some())
            .finish()
    }
}
