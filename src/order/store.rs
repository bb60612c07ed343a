use super::{OrderDocument, OrderError};
use crate::store::{DocumentStore, StoreError, Version, Versioned};
use crate::utils::now_iso;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Key of the order document
pub const ORDER_KEY: &str = "order";

/// Persisted display orders, updated as one whole document.
///
/// [`OrderStore::update`] is a read-modify-write cycle: the in-process
/// writer lock serializes local callers, and the document version is checked
/// on write so that a commit from another process forces a re-read instead
/// of being overwritten.
pub struct OrderStore {
    store: Arc<dyn DocumentStore>,
    max_retries: u32,
    write_lock: Mutex<()>,
}

impl OrderStore {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, max_retries: u32) -> Self {
        Self {
            store,
            max_retries,
            write_lock: Mutex::new(()),
        }
    }

    /// Read the current document.
    ///
    /// An unparsable document is treated as absent (every collection falls
    /// back to storage order); it keeps its version so the next update can
    /// replace it.
    pub async fn load(&self) -> Result<Versioned<OrderDocument>, OrderError> {
        let Some(doc) = self.store.read(ORDER_KEY).await? else {
            return Ok(Versioned {
                value: OrderDocument::default(),
                version: 0,
            });
        };
        match serde_json::from_str(&doc.value) {
            Ok(value) => Ok(Versioned {
                value,
                version: doc.version,
            }),
            Err(e) => {
                let corrupt = OrderError::DocumentCorrupt {
                    key: ORDER_KEY.to_string(),
                    reason: e.to_string(),
                };
                warn!("{corrupt}; falling back to storage order");
                Ok(Versioned {
                    value: OrderDocument::default(),
                    version: doc.version,
                })
            }
        }
    }

    /// Apply `mutate` to the document and persist the result.
    ///
    /// If `mutate` fails nothing is written. On a version conflict the
    /// document is re-read and `mutate` runs again, at most `max_retries`
    /// more times.
    pub async fn update<T, F>(&self, mut mutate: F) -> Result<T, OrderError>
    where
        F: FnMut(&mut OrderDocument) -> Result<T, OrderError> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            let Versioned { mut value, version } = self.load().await?;
            let result = mutate(&mut value)?;
            value.updated_at = Some(now_iso());

            match self.persist(&value, version).await {
                Ok(new_version) => {
                    debug!(version = new_version, "Order document updated");
                    return Ok(result);
                }
                Err(OrderError::Store(StoreError::VersionConflict { expected, actual, .. }))
                    if attempts <= self.max_retries =>
                {
                    warn!(expected, actual, attempt = attempts, "Order document changed concurrently, retrying");
                }
                Err(OrderError::Store(StoreError::VersionConflict { .. })) => {
                    return Err(OrderError::RetriesExhausted {
                        key: ORDER_KEY.to_string(),
                        attempts,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn persist(&self, doc: &OrderDocument, expected_version: Version) -> Result<Version, OrderError> {
        let content = serde_json::to_string_pretty(doc)?;
        Ok(self.store.write(ORDER_KEY, &content, expected_version).await?)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
