//! Portfolio operations.
//!
//! Each operation mutates the record store first and then brings the order
//! document in line before returning. Order bookkeeping never undoes or
//! blocks a content change: if it fails, the failure is logged and returned
//! in the result's `order_warnings`.

mod collections;
mod items;
mod view;

pub use collections::{CreateCollectionResult, DeleteCollectionResult};
pub use items::{DeleteItemResult, TransferItemResult, UploadItemResult};
pub use view::DisplayedItem;

use crate::config::{ConfigError, PortfolioConfig};
use crate::order::{AliasResolver, OrderError, OrderStore};
use crate::records::{RecordError, RecordStore};
use crate::store::{DocumentStore, FsDocumentStore};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Display index {index} out of range for '{collection_id}' ({length} items)")]
    IndexOutOfRange {
        collection_id: String,
        index: usize,
        length: usize,
    },

    #[error("Cannot transfer an item into '{0}': it shares storage with the source")]
    SameCollection(String),
}

/// Content store with display-order bookkeeping.
pub struct Portfolio {
    records: RecordStore,
    orders: OrderStore,
    aliases: AliasResolver,
    config: PortfolioConfig,
    mutation_lock: Mutex<()>,
}

impl Portfolio {
    pub fn new(store: Arc<dyn DocumentStore>, config: PortfolioConfig) -> Result<Self, PortfolioError> {
        let aliases = AliasResolver::from_config(&config)?;
        Ok(Self {
            records: RecordStore::new(Arc::clone(&store), config.meta.clone()),
            orders: OrderStore::new(store, config.order.max_retries),
            aliases,
            config,
            mutation_lock: Mutex::new(()),
        })
    }

    /// Open a portfolio stored below `data_dir`.
    pub fn open(data_dir: &Path, config: PortfolioConfig) -> Result<Self, PortfolioError> {
        Self::new(Arc::new(FsDocumentStore::new(data_dir)), config)
    }

    #[must_use]
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    #[must_use]
    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Every ID whose order must change together with `collection_id`.
    pub async fn resolve_aliases(&self, collection_id: &str) -> Result<Vec<String>, PortfolioError> {
        if self.config.is_meta_id(collection_id) {
            return Ok(vec![collection_id.to_string()]);
        }
        let catalog = self.records.catalog().await?;
        Ok(self.aliases.resolve(collection_id, &catalog))
    }
}

/// Record an order bookkeeping failure that followed a successful content
/// mutation.
fn isolate_order_failure(
    collection_id: &str,
    error: PortfolioError,
    warnings: &mut Vec<PortfolioError>,
) {
    warn!(collection_id, "Order bookkeeping failed after content change: {error}");
    warnings.push(error);
}

#[cfg(test)]
#[path = "portfolio_tests.rs"]
mod tests;
