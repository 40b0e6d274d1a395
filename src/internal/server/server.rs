// src/internal/server/server.rs

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::internal::config::AppConfig;
use crate::internal::registry::SpecRegistry;
use crate::internal::server::handler::Handler;
use crate::internal::server::tool::SwaggerTools;
use crate::internal::swagger::{LoadError, SpecLoader};

/// Lifecycle of a [`Server`]. There is no way back from `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Open,
    Closed,
}

/// Server owns the spec registry and the HTTP listener serving it over MCP.
pub struct Server {
    pub config: AppConfig,
    tools: SwaggerTools,
    state: ServerState,
    shutdown: CancellationToken,
    sessions: CancellationToken,
    serve_task: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl Server {
    /// Build the registry from the configured sources. Any load failure
    /// aborts construction.
    pub async fn new(config: AppConfig, loader: &SpecLoader) -> Result<Self, LoadError> {
        let registry = SpecRegistry::build(loader, &config.sources).await?;
        Ok(Self::with_registry(config, registry))
    }

    pub fn with_registry(config: AppConfig, registry: SpecRegistry) -> Self {
        let tools = SwaggerTools::new(
            Arc::new(registry),
            &config.server.name,
            &config.server.version,
        );

        Self {
            config,
            tools,
            state: ServerState::Created,
            shutdown: CancellationToken::new(),
            sessions: CancellationToken::new(),
            serve_task: None,
            local_addr: None,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn tools(&self) -> &SwaggerTools {
        &self.tools
    }

    /// Address the listener is bound to, once open.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Bind the listener and start serving in the background.
    pub async fn open(&mut self) -> Result<SocketAddr> {
        if self.state != ServerState::Created {
            bail!("server cannot be opened from state {:?}", self.state);
        }

        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to address: {}", addr))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read bound address")?;

        let router = Handler::new(&self.config.server.path)
            .create_http_router(self.tools.clone(), self.sessions.clone());
        let shutdown = self.shutdown.clone();

        self.serve_task = Some(tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        }));
        self.local_addr = Some(local_addr);
        self.state = ServerState::Open;

        info!(
            "MCP server listening on http://{}{} with {} specs",
            local_addr,
            self.config.server.path,
            self.tools.registry().len()
        );
        Ok(local_addr)
    }

    /// Stop accepting connections, wait for in-flight tool calls to finish,
    /// then end open sessions. Calling it again is a no-op.
    pub async fn close(&mut self) {
        if self.state == ServerState::Closed {
            debug!("Server already closed");
            return;
        }

        info!("Closing MCP server");
        self.shutdown.cancel();

        let in_flight = self.tools.in_flight();
        in_flight.close();
        if !in_flight.is_empty() {
            info!("Waiting for {} in-flight tool calls", in_flight.len());
        }
        in_flight.wait().await;
        self.sessions.cancel();

        if let Some(mut task) = self.serve_task.take() {
            let timeout = Duration::from_secs(self.config.server.shutdown_timeout_secs);
            match tokio::time::timeout(timeout, &mut task).await {
                Ok(Ok(())) => debug!("HTTP server stopped"),
                Ok(Err(e)) => error!("HTTP server task error: {}", e),
                Err(_) => {
                    warn!(
                        "HTTP server did not stop within {:?}, dropping open connections",
                        timeout
                    );
                    task.abort();
                }
            }
        }

        self.state = ServerState::Closed;
        info!("MCP server closed");
    }

    /// Open, serve until SIGINT/SIGTERM, then close.
    pub async fn start_with_graceful_shutdown(&mut self) -> Result<()> {
        self.open().await?;
        shutdown_signal().await;
        info!("Received shutdown signal");
        self.close().await;
        Ok(())
    }
}

/// Resolves when the process receives SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Helper function to create a server, loading every configured source.
pub async fn create_server(config: AppConfig) -> Result<Server> {
    let loader = SpecLoader::new();
    let server = Server::new(config, &loader)
        .await
        .context("Failed to build swagger registry")?;
    Ok(server)
}
