use super::adjust::{
    normalize, on_append_at_front, on_delete, on_explicit_reorder, shift_tags_for_delete,
    shift_tags_for_insert, ReorderCheck,
};
use super::OrderError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Tag name marking a generated placeholder item
pub const PLACEHOLDER_TAG: &str = "placeholder";

/// The persisted order document (`order.json`).
///
/// `orders` maps a collection ID to its display order; a missing entry means
/// storage order. `tags` maps a collection ID to tag name to tagged storage
/// positions.
///
/// Every mutating method takes the alias set of the collection it was asked
/// to change. The new order is computed once from the shared entry (see
/// [`OrderDocument::shared_order`]) and written to every alias, so all members
/// end up identical. Tag positions follow the storage of every member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(default)]
    pub orders: BTreeMap<String, Vec<usize>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, BTreeMap<String, BTreeSet<usize>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl OrderDocument {
    #[must_use]
    pub fn order(&self, collection_id: &str) -> Option<&[usize]> {
        self.orders.get(collection_id).map(Vec::as_slice)
    }

    /// Positions of `collection_id` carrying `tag`.
    #[must_use]
    pub fn tagged(&self, collection_id: &str, tag: &str) -> BTreeSet<usize> {
        self.tags
            .get(collection_id)
            .and_then(|tags| tags.get(tag))
            .cloned()
            .unwrap_or_default()
    }

    /// Tag names set on one position.
    #[must_use]
    pub fn tags_at(&self, collection_id: &str, position: usize) -> Vec<String> {
        self.tags
            .get(collection_id)
            .map(|tags| {
                tags.iter()
                    .filter(|(_, positions)| positions.contains(&position))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The order an alias set currently shares: the entry of `collection_id`,
    /// or else the first alias that has one.
    #[must_use]
    pub fn shared_order(&self, collection_id: &str, aliases: &[String]) -> Option<&[usize]> {
        self.order(collection_id)
            .or_else(|| aliases.iter().find_map(|alias| self.order(alias)))
    }

    fn write_through(&mut self, aliases: &[String], order: &[usize]) {
        for alias in aliases {
            self.orders.insert(alias.clone(), order.to_vec());
        }
    }

    /// An item was prepended to `collection_id`, whose storage now holds
    /// `new_storage_length` items. `new_tags` are set on the new item.
    pub fn apply_insert(
        &mut self,
        collection_id: &str,
        aliases: &[String],
        new_storage_length: usize,
        new_tags: &[String],
    ) -> Vec<usize> {
        let next = on_append_at_front(self.shared_order(collection_id, aliases), new_storage_length);
        self.write_through(aliases, &next);

        for member in members(collection_id, aliases) {
            if let Some(tags) = self.tags.get_mut(member) {
                for positions in tags.values_mut() {
                    *positions = shift_tags_for_insert(positions);
                }
            }
        }
        let tags = self.tags.entry(collection_id.to_string()).or_default();
        for tag in new_tags {
            tags.entry(tag.clone()).or_default().insert(0);
        }
        self.prune_tags(collection_id);
        next
    }

    /// The item at storage `deleted_position` was removed from
    /// `collection_id`. Returns the anomaly when the position was not in the
    /// stored order; the adjustment is applied either way.
    pub fn apply_delete(
        &mut self,
        collection_id: &str,
        aliases: &[String],
        deleted_position: usize,
        new_storage_length: usize,
    ) -> Option<OrderError> {
        for member in members(collection_id, aliases) {
            if let Some(tags) = self.tags.get_mut(member) {
                for positions in tags.values_mut() {
                    *positions = shift_tags_for_delete(positions, deleted_position);
                }
            }
            self.prune_tags(member);
        }

        // No member has an order: storage order stays correct for all of them
        let current = self.shared_order(collection_id, aliases)?;
        let adjusted = on_delete(current, deleted_position, new_storage_length);
        self.write_through(aliases, &adjusted.order);

        if adjusted.found {
            None
        } else {
            warn!(
                collection_id,
                position = deleted_position,
                "Deleted position missing from stored order"
            );
            Some(OrderError::PositionNotFound {
                collection_id: collection_id.to_string(),
                position: deleted_position,
            })
        }
    }

    /// Replace the order of `collection_id` if `new_order` passes `check`.
    pub fn apply_reorder(
        &mut self,
        collection_id: &str,
        aliases: &[String],
        new_order: &[usize],
        check: ReorderCheck,
    ) -> Result<(), OrderError> {
        let mut current = self
            .shared_order(collection_id, aliases)
            .map(<[usize]>::to_vec)
            .unwrap_or_default();
        on_explicit_reorder(collection_id, &mut current, new_order, check)?;
        self.write_through(aliases, &current);
        Ok(())
    }

    /// Drop invalid and repeated entries from the order of `collection_id`.
    pub fn apply_normalize(
        &mut self,
        collection_id: &str,
        aliases: &[String],
        storage_length: usize,
    ) -> Option<Vec<usize>> {
        let normalized = normalize(self.shared_order(collection_id, aliases)?, storage_length);
        self.write_through(aliases, &normalized);
        Some(normalized)
    }

    /// Give `collection_id` the order and tags of `source`, whose items it
    /// was just filled with.
    pub fn copy_collection(&mut self, source: &str, collection_id: &str) {
        if let Some(order) = self.orders.get(source).cloned() {
            self.orders.insert(collection_id.to_string(), order);
        }
        if let Some(tags) = self.tags.get(source).cloned() {
            self.tags.insert(collection_id.to_string(), tags);
        }
    }

    /// Forget everything stored for a deleted collection.
    pub fn remove_collection(&mut self, collection_id: &str) {
        self.orders.remove(collection_id);
        self.tags.remove(collection_id);
    }

    /// Set or clear `tag` on one storage position.
    pub fn set_tag(&mut self, collection_id: &str, tag: &str, position: usize, enabled: bool) {
        let tags = self.tags.entry(collection_id.to_string()).or_default();
        let positions = tags.entry(tag.to_string()).or_default();
        if enabled {
            positions.insert(position);
        } else {
            positions.remove(&position);
        }
        self.prune_tags(collection_id);
    }

    fn prune_tags(&mut self, collection_id: &str) {
        if let Some(tags) = self.tags.get_mut(collection_id) {
            tags.retain(|_, positions| !positions.is_empty());
            if tags.is_empty() {
                self.tags.remove(collection_id);
            }
        }
    }
}

/// `collection_id` and its aliases, each once.
fn members<'a>(collection_id: &'a str, aliases: &'a [String]) -> BTreeSet<&'a str> {
    aliases
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(collection_id))
        .collect()
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
