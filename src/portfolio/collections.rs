use super::{isolate_order_failure, Portfolio, PortfolioError};
use crate::order::OrderError;
use crate::records::{CollectionKind, CreatedCollection, DeletedCollection};
use tracing::info;

#[derive(Debug)]
pub struct CreateCollectionResult {
    pub created: CreatedCollection,
    /// Order of the meta list the collection joined
    pub meta_order: Option<Vec<usize>>,
    /// Existing alias whose items, order and tags were copied
    pub copied_from: Option<String>,
    pub order_warnings: Vec<PortfolioError>,
}

#[derive(Debug)]
pub struct DeleteCollectionResult {
    pub deleted: DeletedCollection,
    pub meta_order: Option<Vec<usize>>,
    pub order_warnings: Vec<PortfolioError>,
}

impl Portfolio {
    /// Create a collection. A section or exhibit is prepended to its meta
    /// list and so displays last among its peers. A collection that aliases
    /// existing ones starts as a copy of them.
    pub async fn create_collection(
        &self,
        collection_id: &str,
        kind: CollectionKind,
    ) -> Result<CreateCollectionResult, PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let created = self.records.create_collection(collection_id, kind).await?;

        let mut order_warnings = Vec::new();
        let meta_order = match (self.config.meta_id_for(kind), created.meta_length) {
            (Some(meta_id), Some(meta_length)) => {
                let aliases = [meta_id.to_string()];
                match self
                    .orders
                    .update(|doc| Ok(doc.apply_insert(meta_id, &aliases, meta_length, &[])))
                    .await
                {
                    Ok(order) => Some(order),
                    Err(e) => {
                        isolate_order_failure(meta_id, e.into(), &mut order_warnings);
                        None
                    }
                }
            }
            _ => None,
        };

        let copied_from = self.join_alias_group(collection_id, &mut order_warnings).await;

        info!(collection_id, kind = %kind, "Collection ready");
        Ok(CreateCollectionResult {
            created,
            meta_order,
            copied_from,
            order_warnings,
        })
    }

    async fn join_alias_group(
        &self,
        collection_id: &str,
        order_warnings: &mut Vec<PortfolioError>,
    ) -> Option<String> {
        let aliases = match self.resolve_aliases(collection_id).await {
            Ok(aliases) => aliases,
            Err(e) => {
                isolate_order_failure(collection_id, e, order_warnings);
                return None;
            }
        };
        let source = aliases.into_iter().find(|alias| alias != collection_id)?;

        let length = match self.records.copy_items(&source, collection_id).await {
            Ok(length) => length,
            Err(e) => {
                isolate_order_failure(collection_id, e.into(), order_warnings);
                return None;
            }
        };
        let copied = self
            .orders
            .update(|doc| {
                doc.copy_collection(&source, collection_id);
                Ok(())
            })
            .await;
        if let Err(e) = copied {
            isolate_order_failure(collection_id, e.into(), order_warnings);
        }

        info!(collection_id, source = %source, length, "Joined alias group");
        Some(source)
    }

    /// Delete a collection, its order and tags, and its entry in the meta
    /// list order.
    pub async fn delete_collection(
        &self,
        collection_id: &str,
    ) -> Result<DeleteCollectionResult, PortfolioError> {
        let _guard = self.mutation_lock.lock().await;
        let deleted = self.records.delete_collection(collection_id).await?;
        let meta_id = self.config.meta_id_for(deleted.kind);

        let mut order_warnings = Vec::new();
        let adjusted = self
            .orders
            .update(|doc| {
                doc.remove_collection(collection_id);
                let (Some(meta_id), Some((position, meta_length))) = (meta_id, deleted.meta_position)
                else {
                    return Ok((None, None));
                };
                let aliases = [meta_id.to_string()];
                let anomaly = doc.apply_delete(meta_id, &aliases, position, meta_length);
                Ok::<_, OrderError>((doc.order(meta_id).map(<[usize]>::to_vec), anomaly))
            })
            .await;

        let meta_order = match adjusted {
            Ok((meta_order, anomaly)) => {
                order_warnings.extend(anomaly.map(PortfolioError::Order));
                meta_order
            }
            Err(e) => {
                isolate_order_failure(collection_id, e.into(), &mut order_warnings);
                None
            }
        };

        info!(collection_id, kind = %deleted.kind, "Collection removed");
        Ok(DeleteCollectionResult {
            deleted,
            meta_order,
            order_warnings,
        })
    }
}
