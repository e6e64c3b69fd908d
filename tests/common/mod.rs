//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_health() {
//!     let server = TestServer::spawn_offline().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.health().await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{fake_mp3_bytes, fake_mp4_bytes, FakeBackend};
#[allow(unused_imports)]
pub use server::{TestServer, TestServerOptions};
