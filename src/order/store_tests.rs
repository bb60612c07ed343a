use super::*;
use crate::order::ReorderCheck;
use crate::store::{MemoryDocumentStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

fn order_store() -> (Arc<MemoryDocumentStore>, OrderStore) {
    let backing = Arc::new(MemoryDocumentStore::new());
    let store = OrderStore::new(backing.clone(), 3);
    (backing, store)
}

#[tokio::test]
async fn test_load_absent_document() {
    let (_, store) = order_store();
    let doc = store.load().await.unwrap();
    assert_eq!(doc.version, 0);
    assert_eq!(doc.value, OrderDocument::default());
}

#[tokio::test]
async fn test_update_persists() {
    let (_, store) = order_store();
    store
        .update(|doc| {
            doc.orders.insert("summer".to_string(), vec![1, 0]);
            Ok(())
        })
        .await
        .unwrap();

    let doc = store.load().await.unwrap();
    assert_eq!(doc.version, 1);
    assert_eq!(doc.value.order("summer"), Some(&[1, 0][..]));
    assert!(doc.value.updated_at.is_some());
}

#[tokio::test]
async fn test_failed_mutation_writes_nothing() {
    let (_, store) = order_store();
    store
        .update(|doc| {
            doc.orders.insert("summer".to_string(), vec![4, 3, 2, 1, 0]);
            Ok(())
        })
        .await
        .unwrap();

    let result = store
        .update(|doc| {
            doc.apply_reorder(
                "summer",
                &["summer".to_string()],
                &[7],
                ReorderCheck::Validate { storage_length: 5 },
            )
        })
        .await;

    assert!(matches!(result, Err(OrderError::StaleOrderRejected { .. })));
    let doc = store.load().await.unwrap();
    assert_eq!(doc.version, 1);
    assert_eq!(doc.value.order("summer"), Some(&[4, 3, 2, 1, 0][..]));
}

#[tokio::test]
async fn test_corrupt_document_is_treated_as_absent() {
    let (backing, store) = order_store();
    backing.write(ORDER_KEY, "{not json", 0).await.unwrap();

    let doc = store.load().await.unwrap();
    assert_eq!(doc.value, OrderDocument::default());
    assert_eq!(doc.version, 1);

    // The next update replaces the corrupt document
    store
        .update(|doc| {
            doc.orders.insert("summer".to_string(), vec![0]);
            Ok(())
        })
        .await
        .unwrap();
    let raw = backing.read(ORDER_KEY).await.unwrap().unwrap();
    assert!(raw.value.contains("summer"));
}

/// Store whose first `conflicts` writes fail as if another process won.
struct ContendedStore {
    inner: MemoryDocumentStore,
    conflicts: AtomicU32,
}

#[async_trait]
impl DocumentStore for ContendedStore {
    async fn read(&self, key: &str) -> Result<Option<Versioned<String>>, StoreError> {
        self.inner.read(key).await
    }

    async fn write(
        &self,
        key: &str,
        content: &str,
        expected_version: Version,
    ) -> Result<Version, StoreError> {
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                actual: expected_version + 1,
            });
        }
        self.inner.write(key, content, expected_version).await
    }

    async fn remove(&self, key: &str, expected_version: Version) -> Result<(), StoreError> {
        self.inner.remove(key, expected_version).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list(prefix).await
    }
}

#[tokio::test]
async fn test_update_retries_after_conflict() {
    let backing = Arc::new(ContendedStore {
        inner: MemoryDocumentStore::new(),
        conflicts: AtomicU32::new(2),
    });
    let store = OrderStore::new(backing, 3);
    let mut calls = 0;

    store
        .update(|doc| {
            calls += 1;
            doc.orders.insert("summer".to_string(), vec![0]);
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(calls, 3);
    assert_eq!(
        store.load().await.unwrap().value.order("summer"),
        Some(&[0][..])
    );
}

#[tokio::test]
async fn test_update_gives_up_after_max_retries() {
    let backing = Arc::new(ContendedStore {
        inner: MemoryDocumentStore::new(),
        conflicts: AtomicU32::new(10),
    });
    let store = OrderStore::new(backing, 2);

    let result = store.update(|_| Ok(())).await;

    assert!(matches!(
        result,
        Err(OrderError::RetriesExhausted { attempts: 3, .. })
    ));
}
