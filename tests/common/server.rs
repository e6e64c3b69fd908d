//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own upload directory.

use super::constants::*;
use super::fixtures::FakeBackend;
use cover_studio_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use cover_studio_server::{AnalysisRequestor, CoverRequestor, ServiceMode, UploadStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// How a test server is wired.
pub struct TestServerOptions {
    pub mode: ServiceMode,
    pub max_upload_bytes: u64,
    pub keep_uploads: bool,
}

impl Default for TestServerOptions {
    fn default() -> Self {
        Self {
            mode: ServiceMode::Offline,
            max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
            keep_uploads: false,
        }
    }
}

/// Test server instance with an isolated upload directory
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    temp_upload_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server that never calls a backend.
    pub async fn spawn_offline() -> Self {
        Self::spawn_with(TestServerOptions::default()).await
    }

    /// Spawns a server backed by the given fake backend.
    pub async fn spawn_live(backend: Arc<FakeBackend>) -> Self {
        Self::spawn_with(TestServerOptions {
            mode: ServiceMode::Live(backend),
            ..Default::default()
        })
        .await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the upload directory cannot be created, the port cannot be
    /// bound, or the server doesn't become ready within timeout.
    pub async fn spawn_with(options: TestServerOptions) -> Self {
        let temp_upload_dir = TempDir::new().expect("Failed to create upload dir");

        let upload_store = Arc::new(UploadStore::new(
            temp_upload_dir.path(),
            options.max_upload_bytes,
            options.keep_uploads,
        ));
        upload_store
            .init()
            .await
            .expect("Failed to init upload store");

        let timeout = Duration::from_millis(TEST_BACKEND_TIMEOUT_MS);
        let analysis_requestor = Arc::new(AnalysisRequestor::new(options.mode.clone(), timeout));
        let cover_requestor = Arc::new(CoverRequestor::new(options.mode, timeout));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            max_upload_bytes: options.max_upload_bytes,
            ..Default::default()
        };

        let app = make_app(config, upload_store, analysis_requestor, cover_requestor)
            .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            temp_upload_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    pub fn upload_dir(&self) -> &Path {
        self.temp_upload_dir.path()
    }

    /// Files currently present in the upload directory, partial ones included.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.upload_dir())
            .expect("Failed to read upload dir")
            .map(|entry| entry.expect("Failed to read dir entry").path())
            .collect();
        files.sort();
        files
    }

    /// Waits for the server to become ready by polling the /health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
