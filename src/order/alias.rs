//! Alias resolution: which collection IDs share one display order.
//!
//! Clusters come from configuration. Explicit groups list their members;
//! pattern rules derive a cluster key from each ID (strip a prefix, or keep a
//! regex capture) and treat every known collection of the same kind with the
//! same key as an alias. The two meta lists never alias.

use crate::config::{AliasRuleConfig, ConfigError, MetaConfig, PortfolioConfig};
use crate::records::{CollectionClassifier, CollectionKind};
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Pattern {
    Prefix(String),
    Regex(Regex),
}

impl Pattern {
    /// Cluster key of `id` under this pattern. IDs the pattern does not
    /// match are their own key, so a base ID joins the cluster of its
    /// prefixed duplicates.
    fn cluster_key<'a>(&self, id: &'a str) -> Cow<'a, str> {
        match self {
            Self::Prefix(prefix) => Cow::Borrowed(id.strip_prefix(prefix.as_str()).unwrap_or(id)),
            Self::Regex(regex) => match regex.captures(id) {
                Some(captures) => match captures.get(1) {
                    Some(group) => Cow::Owned(group.as_str().to_string()),
                    None => regex.replace(id, ""),
                },
                None => Cow::Borrowed(id),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct AliasRule {
    pattern: Pattern,
    kind: Option<CollectionKind>,
}

impl AliasRule {
    fn from_config(rule: &AliasRuleConfig) -> Result<Self, ConfigError> {
        let pattern = match (&rule.prefix, &rule.regex) {
            (Some(prefix), None) => Pattern::Prefix(prefix.clone()),
            (None, Some(pattern)) => Pattern::Regex(
                Regex::new(pattern)
                    .map_err(|e| ConfigError::Invalid(format!("invalid alias regex: {e}")))?,
            ),
            _ => {
                return Err(ConfigError::Invalid(
                    "alias rule needs exactly one of prefix or regex".to_string(),
                ))
            }
        };
        Ok(Self {
            pattern,
            kind: rule.kind,
        })
    }

    fn applies_to(&self, kind: CollectionKind) -> bool {
        kind != CollectionKind::Unrecognized && self.kind.is_none_or(|scope| scope == kind)
    }
}

/// Maps a collection ID to every ID that must carry the same order.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    meta: MetaConfig,
    groups: Vec<Vec<String>>,
    rules: Vec<AliasRule>,
}

impl AliasResolver {
    pub fn from_config(config: &PortfolioConfig) -> Result<Self, ConfigError> {
        let rules = config
            .aliases
            .rules
            .iter()
            .map(AliasRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            meta: config.meta.clone(),
            groups: config.aliases.groups.clone(),
            rules,
        })
    }

    /// Every ID that shares an order with `id`, sorted, `id` included.
    #[must_use]
    pub fn resolve<C: CollectionClassifier + ?Sized>(&self, id: &str, classifier: &C) -> Vec<String> {
        let mut resolved = BTreeSet::new();
        resolved.insert(id.to_string());
        if self.meta.is_meta_id(id) {
            return resolved.into_iter().collect();
        }

        for group in self.groups.iter().filter(|g| g.iter().any(|member| member == id)) {
            resolved.extend(
                group
                    .iter()
                    .filter(|member| classifier.contains(member))
                    .cloned(),
            );
        }

        let kind = classifier.classify(id);
        let candidates = classifier.ids_of_kind(kind);
        for rule in self.rules.iter().filter(|rule| rule.applies_to(kind)) {
            let key = rule.pattern.cluster_key(id);
            resolved.extend(
                candidates
                    .iter()
                    .filter(|other| rule.pattern.cluster_key(other) == key)
                    .map(|other| (*other).to_string()),
            );
        }

        resolved.retain(|member| !self.meta.is_meta_id(member));
        resolved.insert(id.to_string());
        resolved.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "alias_tests.rs"]
mod tests;
