use super::types::PortfolioConfig;
use super::ConfigError;
use std::path::Path;
use tracing::debug;

/// Load the portfolio configuration from `path`.
///
/// Returns `Ok(PortfolioConfig::default())` if the file does not exist so
/// callers never need to handle the absent-file case specially.
pub fn load_config(path: &Path) -> Result<PortfolioConfig, ConfigError> {
    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(PortfolioConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<PortfolioConfig, ConfigError> {
    let config: PortfolioConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &PortfolioConfig) -> Result<(), ConfigError> {
    if config.meta.sections_id == config.meta.exhibitions_id {
        return Err(ConfigError::Invalid(format!(
            "meta.sections_id and meta.exhibitions_id must differ (both '{}')",
            config.meta.sections_id
        )));
    }
    for (index, rule) in config.aliases.rules.iter().enumerate() {
        match (&rule.prefix, &rule.regex) {
            (Some(prefix), None) if prefix.is_empty() => {
                return Err(ConfigError::Invalid(format!(
                    "aliases.rules[{index}]: prefix must not be empty"
                )));
            }
            (Some(_), None) => {}
            (None, Some(pattern)) => {
                regex::Regex::new(pattern).map_err(|e| {
                    ConfigError::Invalid(format!("aliases.rules[{index}]: invalid regex: {e}"))
                })?;
            }
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "aliases.rules[{index}]: exactly one of prefix or regex is required"
                )));
            }
        }
    }
    for group in &config.aliases.groups {
        if let Some(meta_id) = group.iter().find(|id| config.is_meta_id(id)) {
            return Err(ConfigError::Invalid(format!(
                "aliases.groups: meta collection '{meta_id}' cannot be aliased"
            )));
        }
    }
    Ok(())
}
