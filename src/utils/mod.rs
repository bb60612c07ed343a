mod atomic;

pub use atomic::atomic_write;

use std::path::{Path, PathBuf};

/// The name of the default portfolio folder in the user's home directory
pub const PORTFOLIO_FOLDER: &str = ".portfolio";

/// The name of the per-data-directory configuration file
pub const CONFIG_FILE: &str = "portfolio.toml";

/// Get the portfolio home directory (`~/.portfolio`).
///
/// `PORTFOLIO_HOME` overrides it, which keeps tests and CI away from real
/// user data.
#[must_use]
pub fn default_portfolio_home() -> PathBuf {
    if let Ok(home) = std::env::var("PORTFOLIO_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PORTFOLIO_FOLDER)
}

/// Get the default data directory (`~/.portfolio/data`)
#[must_use]
pub fn default_data_dir() -> PathBuf {
    default_portfolio_home().join("data")
}

/// Get the path to the configuration file inside a data directory
#[must_use]
pub fn get_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "utils_tests.rs"]
mod tests;
