//! Recording toolchain shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use nuxt_cli::cli::ParsedArgv;
use nuxt_cli::error::{BuildError, CliError, Result};
use nuxt_cli::toolchain::{GeneratorFactory, Hook, HookArgs, Hooks};
use nuxt_cli::{Builder, Framework, GenerateOptions, Generator, OptionsTree, Toolchain};
use parking_lot::Mutex;
use serde_json::Value;

/// How the mock builder behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildBehavior {
    Succeed,
    Fail,
    /// Report an `error` event and never finish.
    EmitErrorAndHang,
}

/// Framework that records hooks and never binds a socket.
pub struct MockNuxt {
    options: OptionsTree,
    hooks: Hooks,
    log: Log,
}

#[async_trait]
impl Framework for MockNuxt {
    fn options(&self) -> &OptionsTree {
        &self.options
    }

    fn hook(&self, name: &str, handler: Hook) {
        self.log.push(format!("hook:{}", name));
        self.hooks.hook(name, handler);
    }

    fn call_hook(&self, name: &str, args: &HookArgs<'_>) {
        self.hooks.call(name, args);
    }

    async fn listen(&self) -> Result<String> {
        self.log.push("listen");
        Ok("http://mock:3000".to_string())
    }

    async fn close(&self) -> Result<()> {
        self.log.push("close");
        Ok(())
    }
}

struct MockBuilder {
    nuxt: Arc<dyn Framework>,
    behavior: BuildBehavior,
    log: Log,
}

#[async_trait]
impl Builder for MockBuilder {
    async fn build(&self) -> Result<()> {
        self.log.push("build");
        match self.behavior {
            BuildBehavior::Succeed => Ok(()),
            BuildBehavior::Fail => Err(BuildError::Builder("mock build failed".into()).into()),
            BuildBehavior::EmitErrorAndHang => {
                let err = CliError::Custom("mock compiler crashed".into());
                self.nuxt.call_hook("error", &HookArgs::Error(&err));
                futures::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

struct MockGenerator {
    builder: Arc<dyn Builder>,
    log: Log,
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, options: GenerateOptions) -> Result<()> {
        self.log.push(format!("generate:build={}", options.build));
        if options.build {
            self.builder.build().await?;
        }
        Ok(())
    }
}

/// Shared event log.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.lock().iter().any(|e| e == event)
    }
}

/// Toolchain serving a fixed base config and recording every call.
pub struct RecordingToolchain {
    base: OptionsTree,
    behavior: BuildBehavior,
    pub log: Log,
    pub last_options: Arc<Mutex<Option<OptionsTree>>>,
    pub last_nuxt: Arc<Mutex<Option<Arc<dyn Framework>>>>,
}

impl RecordingToolchain {
    pub fn new(base: Value) -> Self {
        let base = match base {
            Value::Object(map) => map,
            _ => OptionsTree::new(),
        };
        Self {
            base,
            behavior: BuildBehavior::Succeed,
            log: Log::default(),
            last_options: Arc::default(),
            last_nuxt: Arc::default(),
        }
    }

    pub fn with_behavior(mut self, behavior: BuildBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn options(&self) -> OptionsTree {
        self.last_options.lock().clone().unwrap_or_default()
    }
}

#[async_trait]
impl Toolchain for RecordingToolchain {
    async fn load_config(&self, _argv: &ParsedArgv) -> Result<OptionsTree> {
        self.log.push("load_config");
        Ok(self.base.clone())
    }

    async fn core(&self, options: OptionsTree) -> Result<Arc<dyn Framework>> {
        self.log.push("core");
        *self.last_options.lock() = Some(options.clone());
        let nuxt: Arc<dyn Framework> = Arc::new(MockNuxt {
            options,
            hooks: Hooks::new(),
            log: self.log.clone(),
        });
        *self.last_nuxt.lock() = Some(nuxt.clone());
        Ok(nuxt)
    }

    async fn builder(&self, nuxt: Arc<dyn Framework>) -> Result<Arc<dyn Builder>> {
        self.log.push("builder");
        Ok(Arc::new(MockBuilder {
            nuxt,
            behavior: self.behavior,
            log: self.log.clone(),
        }))
    }

    async fn generator(&self) -> Result<GeneratorFactory> {
        self.log.push("generator");
        let log = self.log.clone();
        let factory: GeneratorFactory = Arc::new(
            move |_nuxt: Arc<dyn Framework>, builder: Arc<dyn Builder>| -> Result<Arc<dyn Generator>> {
                Ok(Arc::new(MockGenerator {
                    builder,
                    log: log.clone(),
                }))
            },
        );
        Ok(factory)
    }
}
