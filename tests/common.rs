//! Shared harness for the cross-crate tests: a real server on an ephemeral port

use anyhow::Result;
use mocktool_config::MocktoolConfig;
use mocktool_server::{Server, ServiceContainer};
use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Keep test output to warnings and above
pub fn init_quiet_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .without_time()
        .with_test_writer()
        .try_init();
}

/// A running server, stopped when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub services: ServiceContainer,
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Result<()>>>,
    _fixtures: Option<NamedTempFile>,
}

impl TestServer {
    /// Start a server seeded from YAML fixtures
    pub async fn start(fixtures: &str) -> Result<Self> {
        Self::start_with(fixtures, |_| {}).await
    }

    /// Start a server, letting the caller adjust the configuration first
    pub async fn start_with(
        fixtures: &str,
        configure: impl FnOnce(&mut MocktoolConfig),
    ) -> Result<Self> {
        init_quiet_logging();

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(fixtures.as_bytes())?;

        let mut config = MocktoolConfig::default();
        config.server.bind_address = "127.0.0.1".to_string();
        config.server.shutdown_timeout = Duration::from_secs(2);
        config.loadtest.retry_interval = Duration::from_millis(50);
        config.storage.fixtures_path = Some(file.path().display().to_string());
        configure(&mut config);

        let server = Server::new(config).await?;
        let services = server.services().clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve(listener, async {
            let _ = stopped.await;
        }));

        Ok(Self {
            addr,
            services,
            stop: Some(stop),
            handle: Some(handle),
            _fixtures: Some(file),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop the server and wait for it to drain
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await?,
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
