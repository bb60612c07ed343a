use super::{isolate_order_failure, Portfolio, PortfolioError};
use crate::order::{move_to_index, ReorderCheck};
use crate::records::RecordError;
use serde_json::Value;
use tracing::{info, warn};

/// Result of [`Portfolio::upload_item`]
#[derive(Debug)]
pub struct UploadItemResult {
    pub collection_id: String,
    /// Storage length after the upload; the new item sits at position 0
    pub length: usize,
    /// The order written to every alias, `None` if bookkeeping failed
    pub order: Option<Vec<usize>>,
    /// Members that received the item and the order
    pub aliases: Vec<String>,
    pub order_warnings: Vec<PortfolioError>,
}

/// Result of [`Portfolio::delete_item`]
#[derive(Debug)]
pub struct DeleteItemResult {
    pub collection_id: String,
    pub item: Value,
    pub length: usize,
    pub order_warnings: Vec<PortfolioError>,
}

/// A storage change repeated on the aliases of the collection it was made on.
enum StorageChange {
    Insert(Value),
    Remove(usize),
}

/// Result of [`Portfolio::transfer_item`]
#[derive(Debug)]
pub struct TransferItemResult {
    pub item: Value,
    pub source_length: usize,
    pub target_length: usize,
    /// Tags carried over to the item's new position
    pub tags: Vec<String>,
    pub order_warnings: Vec<PortfolioError>,
}

impl Portfolio {
    /// Prepend `item` to a collection and to each of its aliases. It
    /// displays last until reordered.
    pub async fn upload_item(
        &self,
        collection_id: &str,
        item: Value,
        tags: &[String],
    ) -> Result<UploadItemResult, PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let length = self.records.insert_front(collection_id, item.clone()).await?;

        let mut order_warnings = Vec::new();
        let (order, aliases) = self
            .adjust_after_insert(collection_id, item, length, tags, &mut order_warnings)
            .await;

        info!(collection_id, length, "Uploaded item");
        Ok(UploadItemResult {
            collection_id: collection_id.to_string(),
            length,
            order,
            aliases,
            order_warnings,
        })
    }

    /// Remove the item at storage `position` from a collection and each of
    /// its aliases.
    pub async fn delete_item(
        &self,
        collection_id: &str,
        position: usize,
    ) -> Result<DeleteItemResult, PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let removed = self.records.remove_at(collection_id, position).await?;

        let mut order_warnings = Vec::new();
        self.adjust_after_delete(collection_id, position, removed.length, &mut order_warnings)
            .await;

        info!(collection_id, position, length = removed.length, "Deleted item");
        Ok(DeleteItemResult {
            collection_id: collection_id.to_string(),
            item: removed.item,
            length: removed.length,
            order_warnings,
        })
    }

    /// Move the item shown at display index `from` to display index `to`.
    ///
    /// Returns the new order.
    pub async fn move_item_to_index(
        &self,
        collection_id: &str,
        from: usize,
        to: usize,
    ) -> Result<Vec<usize>, PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let length = self.records.length(collection_id).await?;
        if let Some(&index) = [from, to].iter().find(|&&index| index >= length) {
            return Err(PortfolioError::IndexOutOfRange {
                collection_id: collection_id.to_string(),
                index,
                length,
            });
        }

        let aliases = self.resolve_aliases(collection_id).await?;
        let check = self.reorder_check(collection_id, length);
        let moved = self
            .orders
            .update(|doc| {
                let Some(moved) = move_to_index(doc.shared_order(collection_id, &aliases), length, from, to) else {
                    return Ok(None);
                };
                doc.apply_reorder(collection_id, &aliases, &moved, check)?;
                Ok(Some(moved))
            })
            .await?;

        let moved = moved.ok_or_else(|| PortfolioError::IndexOutOfRange {
            collection_id: collection_id.to_string(),
            index: from.max(to),
            length,
        })?;
        info!(collection_id, from, to, "Moved item");
        Ok(moved)
    }

    /// Replace the display order of a collection with a client-submitted one.
    ///
    /// Orders naming positions that no longer exist are refused with
    /// [`OrderError::StaleOrderRejected`] and the stored order is kept. The
    /// meta lists accept any order verbatim. Returns the IDs written.
    pub async fn reorder(
        &self,
        collection_id: &str,
        new_order: &[usize],
    ) -> Result<Vec<String>, PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let length = self.records.length(collection_id).await?;
        let aliases = self.resolve_aliases(collection_id).await?;
        let check = self.reorder_check(collection_id, length);

        self.orders
            .update(|doc| doc.apply_reorder(collection_id, &aliases, new_order, check))
            .await?;
        info!(collection_id, ?aliases, "Reordered collection");
        Ok(aliases)
    }

    /// Move the item at storage `position` of `source_id` to the front of
    /// `target_id`, keeping its tags. Aliases on both sides follow.
    pub async fn transfer_item(
        &self,
        source_id: &str,
        position: usize,
        target_id: &str,
    ) -> Result<TransferItemResult, PortfolioError> {
        if source_id == target_id {
            return Err(PortfolioError::SameCollection(target_id.to_string()));
        }
        let _guard = self.mutation_lock.lock().await;
        // Aliases mirror each other's storage
        if self
            .resolve_aliases(source_id)
            .await?
            .iter()
            .any(|alias| alias == target_id)
        {
            return Err(PortfolioError::SameCollection(target_id.to_string()));
        }

        let items = self.records.items(source_id).await?;
        let item = items
            .get(position)
            .cloned()
            .ok_or_else(|| RecordError::PositionOutOfRange {
                collection_id: source_id.to_string(),
                position,
                length: items.len(),
            })?;
        let mut order_warnings: Vec<PortfolioError> = Vec::new();
        let tags = match self.orders.load().await {
            Ok(doc) => doc.value.tags_at(source_id, position),
            Err(e) => {
                warn!(source_id, position, "Transferring item without its tags: {e}");
                order_warnings.push(e.into());
                Vec::new()
            }
        };

        // Insert before removing: a failure in between duplicates the item
        // instead of losing it, and is rolled back below.
        let target_length = self.records.insert_front(target_id, item.clone()).await?;
        let removed = match self.records.remove_at(source_id, position).await {
            Ok(removed) => removed,
            Err(e) => {
                if let Err(rollback) = self.records.remove_at(target_id, 0).await {
                    warn!(target_id, "Failed to roll back transferred item: {rollback}");
                }
                return Err(e.into());
            }
        };

        self.adjust_after_delete(source_id, position, removed.length, &mut order_warnings)
            .await;
        self.adjust_after_insert(target_id, item, target_length, &tags, &mut order_warnings)
            .await;

        info!(source_id, position, target_id, "Transferred item");
        Ok(TransferItemResult {
            item: removed.item,
            source_length: removed.length,
            target_length,
            tags,
            order_warnings,
        })
    }

    /// Set or clear a tag on the item at storage `position`.
    pub async fn set_tag(
        &self,
        collection_id: &str,
        position: usize,
        tag: &str,
        enabled: bool,
    ) -> Result<(), PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let length = self.records.length(collection_id).await?;
        if position >= length {
            return Err(RecordError::PositionOutOfRange {
                collection_id: collection_id.to_string(),
                position,
                length,
            }
            .into());
        }
        self.orders
            .update(|doc| {
                doc.set_tag(collection_id, tag, position, enabled);
                Ok(())
            })
            .await?;
        Ok(())
    }

    fn reorder_check(&self, collection_id: &str, storage_length: usize) -> ReorderCheck {
        if self.config.is_meta_id(collection_id) {
            ReorderCheck::Trusted
        } else {
            ReorderCheck::Validate { storage_length }
        }
    }

    /// Repeat `change`, already made on `collection_id` and leaving it with
    /// `new_length` items, on the other members of its alias set.
    ///
    /// Returns the members whose storage now matches and the largest new
    /// length among them; a member the change could not be repeated on is
    /// reported and left out.
    async fn mirror_to_aliases(
        &self,
        collection_id: &str,
        change: StorageChange,
        new_length: usize,
        order_warnings: &mut Vec<PortfolioError>,
    ) -> Result<(Vec<String>, usize), PortfolioError> {
        let mut aliases = self.resolve_aliases(collection_id).await?;
        let mut group_length = new_length;
        let mut failed = Vec::new();
        for alias in aliases.iter().filter(|alias| *alias != collection_id) {
            let mirrored = match &change {
                StorageChange::Insert(item) => {
                    self.records.insert_front(alias, item.clone()).await
                }
                StorageChange::Remove(position) => self
                    .records
                    .remove_at(alias, *position)
                    .await
                    .map(|removed| removed.length),
            };
            match mirrored {
                Ok(length) => group_length = group_length.max(length),
                Err(e) => {
                    isolate_order_failure(alias, e.into(), order_warnings);
                    failed.push(alias.clone());
                }
            }
        }
        aliases.retain(|alias| !failed.contains(alias));
        Ok((aliases, group_length))
    }

    async fn adjust_after_insert(
        &self,
        collection_id: &str,
        item: Value,
        new_length: usize,
        tags: &[String],
        order_warnings: &mut Vec<PortfolioError>,
    ) -> (Option<Vec<usize>>, Vec<String>) {
        let change = StorageChange::Insert(item);
        let adjusted = match self
            .mirror_to_aliases(collection_id, change, new_length, order_warnings)
            .await
        {
            Ok((aliases, length)) => match self
                .orders
                .update(|doc| Ok(doc.apply_insert(collection_id, &aliases, length, tags)))
                .await
            {
                Ok(order) => Ok((order, aliases)),
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e),
        };
        match adjusted {
            Ok((order, aliases)) => (Some(order), aliases),
            Err(e) => {
                isolate_order_failure(collection_id, e, order_warnings);
                (None, Vec::new())
            }
        }
    }

    async fn adjust_after_delete(
        &self,
        collection_id: &str,
        position: usize,
        new_length: usize,
        order_warnings: &mut Vec<PortfolioError>,
    ) {
        let change = StorageChange::Remove(position);
        let adjusted = match self
            .mirror_to_aliases(collection_id, change, new_length, order_warnings)
            .await
        {
            Ok((aliases, length)) => self
                .orders
                .update(|doc| Ok(doc.apply_delete(collection_id, &aliases, position, length)))
                .await
                .map_err(PortfolioError::from),
            Err(e) => Err(e),
        };
        match adjusted {
            Ok(None) => {}
            Ok(Some(anomaly)) => order_warnings.push(PortfolioError::Order(anomaly)),
            Err(e) => isolate_order_failure(collection_id, e, order_warnings),
        }
    }
}
