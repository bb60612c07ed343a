use crate::records::CollectionKind;
use serde::{Deserialize, Serialize};

/// Default ID of the meta collection that orders the gallery sections
pub fn default_sections_id() -> String {
    "gallery-sections".to_string()
}

/// Default ID of the meta collection that orders the exhibitions
pub fn default_exhibitions_id() -> String {
    "exhibitions".to_string()
}

/// Default number of times an order update is retried after a version conflict
pub fn default_max_retries() -> u32 {
    3
}

/// Reserved meta collection IDs (`[meta]` table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct MetaConfig {
    #[serde(default = "default_sections_id")]
    pub sections_id: String,
    #[serde(default = "default_exhibitions_id")]
    pub exhibitions_id: String,
}

impl MetaConfig {
    /// Whether `id` names one of the reserved meta collections.
    #[must_use]
    pub fn is_meta_id(&self, id: &str) -> bool {
        id == self.sections_id || id == self.exhibitions_id
    }

    /// The meta collection that lists collections of `kind`, if any.
    #[must_use]
    pub fn meta_id_for(&self, kind: CollectionKind) -> Option<&str> {
        match kind {
            CollectionKind::Section => Some(self.sections_id.as_str()),
            CollectionKind::Exhibit => Some(self.exhibitions_id.as_str()),
            CollectionKind::Unrecognized => None,
        }
    }
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            sections_id: default_sections_id(),
            exhibitions_id: default_exhibitions_id(),
        }
    }
}

/// One alias pattern (`[[aliases.rules]]`).
///
/// Exactly one of `prefix` or `regex` must be set. With a `kind`, the rule
/// only applies to collections the classifier puts in that kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct AliasRuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CollectionKind>,
}

/// Alias configuration (`[aliases]` table).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct AliasConfig {
    /// Explicit groups: every listed ID shares one order with the others.
    #[serde(default)]
    pub groups: Vec<Vec<String>>,
    #[serde(default)]
    pub rules: Vec<AliasRuleConfig>,
}

/// Order store tuning (`[order]` table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct OrderConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

/// Portfolio configuration, deserialized from `portfolio.toml`.
///
/// Every table is optional; missing values resolve to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PortfolioConfig {
    #[serde(default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub aliases: AliasConfig,
    #[serde(default)]
    pub order: OrderConfig,
}

impl PortfolioConfig {
    #[must_use]
    pub fn is_meta_id(&self, id: &str) -> bool {
        self.meta.is_meta_id(id)
    }

    #[must_use]
    pub fn meta_id_for(&self, kind: CollectionKind) -> Option<&str> {
        self.meta.meta_id_for(kind)
    }
}
