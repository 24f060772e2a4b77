//! Integration tests for DishDash.
//!
//! Tests drive a full [`AppState`] over a file-backed store in a temporary
//! directory, then reopen the directory to check what was persisted.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dishdash-integration-tests
//! ```
//!
//! No network access is needed: the geocoder points at an unroutable local
//! port, so lookups take the fallback path.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use dishdash_client::config::ClientConfig;
use dishdash_client::state::AppState;

/// A client state over its own temporary data directory.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// Create a fresh context with an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the client cannot be created.
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let state = open_state(dir.path()).await;
        Self { dir, state }
    }

    /// Open a second state over the same directory, as if the app restarted.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be created.
    pub async fn reopen(&self) -> AppState {
        open_state(self.dir.path()).await
    }

    /// Path of the JSON file backing `key`.
    #[must_use]
    pub fn key_path(&self, key: &str) -> std::path::PathBuf {
        self.dir.path().join(format!("{key}.json"))
    }
}

/// Client configuration that never reaches the network.
#[must_use]
pub fn offline_config(data_dir: &Path) -> ClientConfig {
    let mut config = ClientConfig::with_data_dir(data_dir);
    config.geocoder.url = "http://127.0.0.1:1/reverse".to_owned();
    config.geocoder.timeout = Duration::from_secs(2);
    config
}

async fn open_state(data_dir: &Path) -> AppState {
    let state = AppState::open(offline_config(data_dir)).expect("Failed to open client state");
    state.load().await;
    state
}
