//! Common test utilities

use portfolio_store::{parse_config, CollectionKind, Portfolio};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Open a file-backed portfolio in `data_dir` with configuration text
pub fn open_portfolio(data_dir: &Path, config_toml: &str) -> Portfolio {
    let config = parse_config(config_toml).expect("Config should parse");
    Portfolio::open(data_dir, config).expect("Failed to open portfolio")
}

/// Create an exhibit and upload `count` numbered items into it
pub async fn seed_exhibit(portfolio: &Portfolio, id: &str, count: usize) {
    portfolio
        .create_collection(id, CollectionKind::Exhibit)
        .await
        .expect("Failed to create exhibit");
    for n in 0..count {
        portfolio
            .upload_item(id, json!({ "file": format!("{id}-{n}.jpg") }), &[])
            .await
            .expect("Failed to upload item");
    }
}
