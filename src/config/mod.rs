//! Portfolio configuration loaded from `portfolio.toml`.
//!
//! The file is optional; if it does not exist every field falls back to its
//! default. It names the reserved meta collections, the alias clusters, and
//! the order store's retry bound.

mod io;
mod types;

pub use io::{load_config, parse_config};
pub use types::{AliasConfig, AliasRuleConfig, MetaConfig, OrderConfig, PortfolioConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
