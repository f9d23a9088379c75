//! Server startup and shutdown logic

use anyhow::{Context, Result};
use axum::Router;
use mocktool_caching::all_pattern;
use mocktool_config::MocktoolConfig;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::{app::create_app, services::ServiceContainer};

/// Server application struct
pub struct Server {
    config: MocktoolConfig,
    services: ServiceContainer,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: MocktoolConfig) -> Result<Self> {
        let services = ServiceContainer::new(&config).await?;
        Ok(Self { config, services })
    }

    /// Create a server around already wired services
    pub fn with_services(config: MocktoolConfig, services: ServiceContainer) -> Self {
        Self { config, services }
    }

    pub fn services(&self) -> &ServiceContainer {
        &self.services
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        create_app(self.services.clone(), &self.config.server)
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM
    pub async fn start(self) -> Result<()> {
        let addr = self.config.server.socket_address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an existing listener until `shutdown` completes.
    ///
    /// In-flight requests get `server.shutdown_timeout` to finish before the
    /// server task is aborted.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.config.cache.invalidate_on_startup {
            match self.services.cache.invalidate_all(&all_pattern()).await {
                Ok(removed) => tracing::info!("Invalidated {} cached mock responses", removed),
                Err(e) => tracing::warn!("Failed to invalidate mock cache on startup: {}", e),
            }
        }

        let app = self.build_app();
        let local_addr = listener.local_addr().context("Listener has no local address")?;

        self.log_config_summary();
        tracing::info!("Mocktool listening on {}", local_addr);

        let drain = Arc::new(Notify::new());
        let trigger = drain.clone();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { trigger.notified().await })
                .await
        });

        tokio::select! {
            result = &mut server => {
                result.context("Server task panicked")?.context("Server error")?;
                return Ok(());
            }
            _ = shutdown => {}
        }

        tracing::info!("Shutdown signal received, draining connections");
        drain.notify_one();

        let timeout = self.config.server.shutdown_timeout;
        match tokio::time::timeout(timeout, &mut server).await {
            Ok(result) => {
                result.context("Server task panicked")?.context("Server error")?;
                tracing::info!("Server shutdown complete");
            }
            Err(_) => {
                tracing::warn!("Shutdown timed out after {:?}, aborting", timeout);
                server.abort();
            }
        }

        Ok(())
    }

    fn log_config_summary(&self) {
        let server = &self.config.server;
        let on_off = |enabled: bool| if enabled { "Enabled" } else { "Disabled" };

        tracing::info!("=== Mocktool Server Configuration ===");
        tracing::info!("Bind Address: {}", server.socket_address());
        tracing::info!("Admin API prefix: {}", server.api_prefix);
        tracing::info!("CORS: {}", on_off(server.enable_cors));
        tracing::info!("Request ID: {}", on_off(server.enable_request_id));
        tracing::info!("Tracing: {}", on_off(server.enable_tracing));
        tracing::info!("Response cache: {}", on_off(self.config.cache.enabled));
        match &self.config.storage.fixtures_path {
            Some(path) => tracing::info!("Fixtures: {}", path),
            None => tracing::info!("Fixtures: none"),
        }
        tracing::info!("=====================================");
    }
}

/// Completes on Ctrl+C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
