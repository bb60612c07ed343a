use super::{check_version, key_segments, DocumentStore, StoreError, Version, Versioned};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Stored content plus the last version handed out. A removed document
/// keeps its entry with no content.
#[derive(Debug, Clone, Default)]
struct Slot {
    content: Option<String>,
    counter: Version,
}

impl Slot {
    fn visible_version(&self) -> Version {
        if self.content.is_some() {
            self.counter
        } else {
            0
        }
    }
}

/// In-memory document store with the same versioning rules as
/// [`super::FsDocumentStore`].
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<BTreeMap<String, Slot>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read(&self, key: &str) -> Result<Option<Versioned<String>>, StoreError> {
        key_segments(key)?;
        let documents = self.documents.lock().await;
        Ok(documents.get(key).and_then(|slot| {
            slot.content.clone().map(|value| Versioned {
                value,
                version: slot.counter,
            })
        }))
    }

    async fn write(
        &self,
        key: &str,
        content: &str,
        expected_version: Version,
    ) -> Result<Version, StoreError> {
        key_segments(key)?;
        let mut documents = self.documents.lock().await;
        let slot = documents.entry(key.to_string()).or_default();
        check_version(key, expected_version, slot.visible_version())?;

        slot.counter = slot.counter.saturating_add(1);
        slot.content = Some(content.to_string());
        Ok(slot.counter)
    }

    async fn remove(&self, key: &str, expected_version: Version) -> Result<(), StoreError> {
        key_segments(key)?;
        let mut documents = self.documents.lock().await;
        let Some(slot) = documents.get_mut(key) else {
            return check_version(key, expected_version, 0);
        };
        check_version(key, expected_version, slot.visible_version())?;
        if slot.content.take().is_some() {
            slot.counter = slot.counter.saturating_add(1);
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        key_segments(prefix)?;
        let dir = format!("{prefix}/");
        let documents = self.documents.lock().await;
        Ok(documents
            .iter()
            .filter(|(key, slot)| {
                slot.content.is_some()
                    && key
                        .strip_prefix(&dir)
                        .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|(key, _)| key.clone())
            .collect())
    }
}
