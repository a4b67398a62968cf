//! Shared setup for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use credvault::app::App;
use credvault::config::Settings;
use credvault::crypto::CipherKey;
use tempfile::TempDir;

pub const TOKEN_SECRET: &str = "integration-test-secret";

/// Settings pointing at a fresh temp data directory.
pub fn settings(dir: &TempDir) -> Settings {
    Settings {
        data_dir: dir.path().join("data").to_string_lossy().into_owned(),
        token_secret: Some(TOKEN_SECRET.to_string()),
        ..Settings::default()
    }
}

/// An app with a fixed in-memory vault key.
pub fn app(dir: &TempDir) -> App {
    let settings = settings(dir);
    std::fs::create_dir_all(settings.data_dir()).unwrap();
    App::with_key(&settings, Arc::new(CipherKey::new([0x42; 32]))).unwrap()
}

/// Register `username` and return its user id.
pub fn register(app: &App, username: &str, password: &str) -> String {
    app.auth.register(username, password).unwrap().id
}
