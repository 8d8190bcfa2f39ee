//! Stock framework instance.
//!
//! [`Nuxt`] owns the normalized options tree and the hook registry, and
//! serves the built application as static files with axum.

use std::path::PathBuf;

use async_trait::async_trait;
use axum::Router;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;

use crate::config::{ensure_object, get_str, OptionsTree};
use crate::error::{CliError, Result};
use crate::toolchain::{Framework, Hook, HookArgs, Hooks};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3000;

/// `server` section of the options tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<PathBuf>,
}

/// Framework instance built from a composed options tree.
pub struct Nuxt {
    options: OptionsTree,
    hooks: Hooks,
    server: Mutex<Option<JoinHandle<()>>>,
}

impl Nuxt {
    pub fn new(mut options: OptionsTree) -> Self {
        normalize(&mut options);
        Self {
            options,
            hooks: Hooks::new(),
            server: Mutex::new(None),
        }
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn mode(&self) -> &str {
        get_str(&self.options, "mode").unwrap_or("universal")
    }

    pub fn is_dev(&self) -> bool {
        self.options.get("dev").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(get_str(&self.options, "rootDir").unwrap_or("."))
    }

    /// Build directory, `<rootDir>/.nuxt` unless `buildDir` says otherwise.
    pub fn build_dir(&self) -> PathBuf {
        self.root_dir()
            .join(get_str(&self.options, "buildDir").unwrap_or(".nuxt"))
    }

    /// Directory served by [`Framework::listen`].
    ///
    /// Dev and universal mode serve the client bundle; a production SPA
    /// serves the generated site.
    pub fn public_dir(&self) -> PathBuf {
        if self.is_dev() || self.mode() != "spa" {
            self.build_dir().join("dist").join("client")
        } else {
            self.root_dir()
                .join(get_str(&self.options, "generate.dir").unwrap_or("dist"))
        }
    }

    pub fn server_options(&self) -> Result<ServerOptions> {
        let server = self.options.get("server").cloned().unwrap_or(Value::Null);
        if server.is_null() {
            return Ok(ServerOptions::default());
        }
        Ok(serde_json::from_value(server)?)
    }

    fn spawn(&self, serve: impl std::future::Future<Output = std::io::Result<()>> + Send + 'static) {
        let hooks = self.hooks.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = serve.await {
                let err = CliError::Server(e.to_string());
                hooks.call("error", &HookArgs::Error(&err));
            }
        });
        if let Some(previous) = self.server.lock().replace(handle) {
            previous.abort();
        }
    }

    #[cfg(unix)]
    async fn listen_unix(&self, socket: &std::path::Path, app: Router) -> Result<String> {
        use std::os::unix::fs::FileTypeExt;

        use crate::error::ResultExt;

        // Only a stale socket from an earlier run may be replaced.
        match std::fs::symlink_metadata(socket) {
            Ok(meta) if meta.file_type().is_socket() => {
                std::fs::remove_file(socket).with_path(socket)?;
            }
            Ok(_) => {
                return Err(CliError::Server(format!(
                    "{} exists and is not a socket",
                    socket.display()
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_path(socket),
        }
        let listener = tokio::net::UnixListener::bind(socket).map_err(|e| {
            CliError::Server(format!("Failed to bind to {}: {}", socket.display(), e))
        })?;
        self.spawn(async move { axum::serve(listener, app).await });

        let url = format!("unix+http://{}", socket.display());
        self.hooks.call("listen", &HookArgs::Listen { url: &url });
        Ok(url)
    }

    #[cfg(not(unix))]
    async fn listen_unix(&self, socket: &std::path::Path, _app: Router) -> Result<String> {
        Err(CliError::Server(format!(
            "Cannot listen on {}: unix sockets are not supported on this platform",
            socket.display()
        )))
    }
}

/// Fill in the keys every consumer of the tree relies on.
fn normalize(options: &mut OptionsTree) {
    if !options.get("mode").is_some_and(Value::is_string) {
        options.insert("mode".into(), json!("universal"));
    }
    if !options.get("dev").is_some_and(Value::is_boolean) {
        options.insert("dev".into(), json!(false));
    }
    if !options.get("rootDir").is_some_and(Value::is_string) {
        options.insert("rootDir".into(), json!("."));
    }
    ensure_object(options, "build");
    ensure_object(options, "server");
}

#[async_trait]
impl Framework for Nuxt {
    fn options(&self) -> &OptionsTree {
        &self.options
    }

    fn hook(&self, name: &str, handler: Hook) {
        self.hooks.hook(name, handler);
    }

    fn call_hook(&self, name: &str, args: &HookArgs<'_>) {
        self.hooks.call(name, args);
    }

    async fn listen(&self) -> Result<String> {
        let server = self.server_options()?;
        let public_dir = self.public_dir();
        tracing::debug!(dir = %public_dir.display(), "serving static files");
        let app = Router::new().fallback_service(ServeDir::new(&public_dir));

        if let Some(socket) = server.socket.as_ref() {
            return self.listen_unix(socket, app).await;
        }

        let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = server.port.unwrap_or(DEFAULT_PORT);
        let listener = tokio::net::TcpListener::bind((host.as_str(), port))
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}:{}: {}", host, port, e)))?;
        let port = listener.local_addr()?.port();
        self.spawn(async move { axum::serve(listener, app).await });

        let url = format!("http://{}:{}", host, port);
        self.hooks.call("listen", &HookArgs::Listen { url: &url });
        Ok(url)
    }

    async fn close(&self) -> Result<()> {
        if let Some(handle) = self.server.lock().take() {
            handle.abort();
        }
        self.hooks.call("close", &HookArgs::Close);
        Ok(())
    }
}

impl std::fmt::Debug for Nuxt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nuxt")
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .finish()
    }
}
