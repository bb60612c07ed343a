use super::{Portfolio, PortfolioError};
use crate::order::display_positions;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// One item as visitors see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedItem {
    /// Storage position of the item
    pub position: usize,
    pub item: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Portfolio {
    /// Storage positions of `collection_id` in display order.
    pub async fn display_order(&self, collection_id: &str) -> Result<Vec<usize>, PortfolioError> {
        let length = self.records.length(collection_id).await?;
        let doc = self.orders.load().await?;
        Ok(display_positions(doc.value.order(collection_id), length))
    }

    /// Items of `collection_id` in display order, with their tags.
    pub async fn display_items(
        &self,
        collection_id: &str,
    ) -> Result<Vec<DisplayedItem>, PortfolioError> {
        let items = self.records.items(collection_id).await?;
        let doc = self.orders.load().await?.value;
        Ok(display_positions(doc.order(collection_id), items.len())
            .into_iter()
            .filter_map(|position| {
                items.get(position).map(|item| DisplayedItem {
                    position,
                    item: item.clone(),
                    tags: doc.tags_at(collection_id, position),
                })
            })
            .collect())
    }

    /// Drop out-of-range and repeated positions from the stored order of
    /// `collection_id` and its aliases.
    ///
    /// Returns `None` when the collection has no stored order.
    pub async fn repair_order(
        &self,
        collection_id: &str,
    ) -> Result<Option<Vec<usize>>, PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let length = self.records.length(collection_id).await?;
        let aliases = self.resolve_aliases(collection_id).await?;
        let repaired = self
            .orders
            .update(|doc| Ok(doc.apply_normalize(collection_id, &aliases, length)))
            .await?;
        info!(collection_id, ?repaired, "Repaired order");
        Ok(repaired)
    }
}
