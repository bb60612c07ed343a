use super::{
    Catalog, CollectionClassifier, CollectionDocument, CollectionKind, CreatedCollection,
    DeletedCollection, RecordError, RemovedItem,
};
use crate::config::MetaConfig;
use crate::store::{key_segments, DocumentStore, Version, Versioned};
use crate::utils::now_iso;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Key prefix of primary collection documents
pub const COLLECTIONS_PREFIX: &str = "collections";

/// Key prefix of the meta lists
pub const META_PREFIX: &str = "meta";

/// Durable storage of collections and the meta lists that enumerate them.
///
/// Items are addressed by storage position. New items and new collections
/// are always prepended (position 0).
pub struct RecordStore {
    store: Arc<dyn DocumentStore>,
    meta: MetaConfig,
    write_lock: Mutex<()>,
}

impl RecordStore {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, meta: MetaConfig) -> Self {
        Self {
            store,
            meta,
            write_lock: Mutex::new(()),
        }
    }

    fn collection_key(id: &str) -> Result<String, RecordError> {
        if id.contains('/') || key_segments(id).is_err() {
            return Err(RecordError::InvalidId(id.to_string()));
        }
        Ok(format!("{COLLECTIONS_PREFIX}/{id}"))
    }

    fn meta_key(meta_id: &str) -> String {
        format!("{META_PREFIX}/{meta_id}")
    }

    async fn read_collection(
        &self,
        id: &str,
    ) -> Result<Versioned<CollectionDocument>, RecordError> {
        let key = Self::collection_key(id)?;
        let doc = self
            .store
            .read(&key)
            .await?
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        let value = serde_json::from_str(&doc.value)
            .map_err(|source| RecordError::Json { key, source })?;
        Ok(Versioned {
            value,
            version: doc.version,
        })
    }

    async fn write_collection(
        &self,
        id: &str,
        doc: &CollectionDocument,
        expected_version: Version,
    ) -> Result<Version, RecordError> {
        let key = Self::collection_key(id)?;
        let content = serde_json::to_string_pretty(doc)
            .map_err(|source| RecordError::Json { key: key.clone(), source })?;
        Ok(self.store.write(&key, &content, expected_version).await?)
    }

    async fn read_meta(&self, meta_id: &str) -> Result<Versioned<Vec<String>>, RecordError> {
        let key = Self::meta_key(meta_id);
        match self.store.read(&key).await? {
            Some(doc) => {
                let value = serde_json::from_str(&doc.value)
                    .map_err(|source| RecordError::Json { key, source })?;
                Ok(Versioned {
                    value,
                    version: doc.version,
                })
            }
            None => Ok(Versioned {
                value: Vec::new(),
                version: 0,
            }),
        }
    }

    async fn write_meta(
        &self,
        meta_id: &str,
        ids: &[String],
        expected_version: Version,
    ) -> Result<(), RecordError> {
        let key = Self::meta_key(meta_id);
        let content = serde_json::to_string_pretty(ids)
            .map_err(|source| RecordError::Json { key: key.clone(), source })?;
        self.store.write(&key, &content, expected_version).await?;
        Ok(())
    }

    /// Register a new, empty collection. Sections and exhibits are prepended
    /// to their meta list.
    pub async fn create_collection(
        &self,
        id: &str,
        kind: CollectionKind,
    ) -> Result<CreatedCollection, RecordError> {
        if self.meta.is_meta_id(id) {
            return Err(RecordError::MetaCollection(id.to_string()));
        }
        let key = Self::collection_key(id)?;
        let _guard = self.write_lock.lock().await;

        if self.store.read(&key).await?.is_some() {
            return Err(RecordError::AlreadyExists(id.to_string()));
        }
        let doc = CollectionDocument {
            kind,
            items: Vec::new(),
            updated_at: now_iso(),
        };
        let version = self.write_collection(id, &doc, 0).await?;

        let meta_length = match self.meta.meta_id_for(kind) {
            Some(meta_id) => {
                let registered = self.prepend_to_meta(meta_id, id).await;
                match registered {
                    Ok(length) => Some(length),
                    Err(e) => {
                        // Do not leave an unregistered collection behind
                        if let Err(rollback) = self.store.remove(&key, version).await {
                            warn!(collection_id = id, "Failed to roll back collection: {rollback}");
                        }
                        return Err(e);
                    }
                }
            }
            None => None,
        };

        info!(collection_id = id, kind = %kind, "Created collection");
        Ok(CreatedCollection {
            id: id.to_string(),
            kind,
            meta_length,
        })
    }

    async fn prepend_to_meta(&self, meta_id: &str, id: &str) -> Result<usize, RecordError> {
        let mut meta = self.read_meta(meta_id).await?;
        if meta.value.iter().any(|existing| existing == id) {
            return Err(RecordError::AlreadyExists(id.to_string()));
        }
        meta.value.insert(0, id.to_string());
        self.write_meta(meta_id, &meta.value, meta.version).await?;
        Ok(meta.value.len())
    }

    /// Remove a collection and unregister it from its meta list.
    pub async fn delete_collection(&self, id: &str) -> Result<DeletedCollection, RecordError> {
        if self.meta.is_meta_id(id) {
            return Err(RecordError::MetaCollection(id.to_string()));
        }
        let key = Self::collection_key(id)?;
        let _guard = self.write_lock.lock().await;

        let doc = self.read_collection(id).await?;
        let kind = doc.value.kind;

        let meta_position = match self.meta.meta_id_for(kind) {
            Some(meta_id) => {
                let mut meta = self.read_meta(meta_id).await?;
                match meta.value.iter().position(|existing| existing == id) {
                    Some(position) => {
                        meta.value.remove(position);
                        self.write_meta(meta_id, &meta.value, meta.version).await?;
                        Some((position, meta.value.len()))
                    }
                    None => {
                        warn!(collection_id = id, meta_id, "Collection missing from its meta list");
                        None
                    }
                }
            }
            None => None,
        };

        self.store.remove(&key, doc.version).await?;
        info!(collection_id = id, kind = %kind, "Deleted collection");
        Ok(DeletedCollection {
            id: id.to_string(),
            kind,
            meta_position,
        })
    }

    /// Prepend `item` to a collection. Returns the new storage length; the
    /// item's position is always 0.
    pub async fn insert_front(&self, id: &str, item: Value) -> Result<usize, RecordError> {
        if self.meta.is_meta_id(id) {
            return Err(RecordError::MetaCollection(id.to_string()));
        }
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_collection(id).await?;
        doc.value.items.insert(0, item);
        doc.value.updated_at = now_iso();
        self.write_collection(id, &doc.value, doc.version).await?;

        let length = doc.value.items.len();
        debug!(collection_id = id, length, "Inserted item at front");
        Ok(length)
    }

    /// Remove the item at storage `position`.
    pub async fn remove_at(&self, id: &str, position: usize) -> Result<RemovedItem, RecordError> {
        if self.meta.is_meta_id(id) {
            return Err(RecordError::MetaCollection(id.to_string()));
        }
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_collection(id).await?;
        let length = doc.value.items.len();
        if position >= length {
            return Err(RecordError::PositionOutOfRange {
                collection_id: id.to_string(),
                position,
                length,
            });
        }
        let item = doc.value.items.remove(position);
        doc.value.updated_at = now_iso();
        self.write_collection(id, &doc.value, doc.version).await?;

        let length = doc.value.items.len();
        debug!(collection_id = id, position, length, "Removed item");
        Ok(RemovedItem { item, length })
    }

    /// Storage length of a collection or meta list.
    pub async fn length(&self, id: &str) -> Result<usize, RecordError> {
        if self.meta.is_meta_id(id) {
            return Ok(self.read_meta(id).await?.value.len());
        }
        Ok(self.read_collection(id).await?.value.items.len())
    }

    /// Items in storage order. A meta list yields its collection IDs.
    pub async fn items(&self, id: &str) -> Result<Vec<Value>, RecordError> {
        if self.meta.is_meta_id(id) {
            let meta = self.read_meta(id).await?;
            return Ok(meta.value.into_iter().map(Value::String).collect());
        }
        Ok(self.read_collection(id).await?.value.items)
    }

    /// Fill the empty collection `id` with the items of `source`. A
    /// collection that already holds items is left alone. Returns the
    /// storage length of `id`.
    pub async fn copy_items(&self, source: &str, id: &str) -> Result<usize, RecordError> {
        if self.meta.is_meta_id(id) {
            return Err(RecordError::MetaCollection(id.to_string()));
        }
        let items = self.items(source).await?;
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_collection(id).await?;
        if !doc.value.items.is_empty() {
            return Ok(doc.value.items.len());
        }
        doc.value.items = items;
        doc.value.updated_at = now_iso();
        self.write_collection(id, &doc.value, doc.version).await?;

        let length = doc.value.items.len();
        debug!(collection_id = id, source, length, "Copied items");
        Ok(length)
    }

    /// Collection IDs of `kind`, in storage order for sections and exhibits
    /// and sorted for unrecognized collections.
    pub async fn list_ids(&self, kind: CollectionKind) -> Result<Vec<String>, RecordError> {
        let catalog = self.catalog().await?;
        Ok(catalog
            .ids_of_kind(kind)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Snapshot of every known collection ID, grouped by kind.
    pub async fn catalog(&self) -> Result<Catalog, RecordError> {
        let sections = self.read_meta(&self.meta.sections_id).await?.value;
        let exhibits = self.read_meta(&self.meta.exhibitions_id).await?.value;
        let prefix = format!("{COLLECTIONS_PREFIX}/");
        let others = self
            .store
            .list(COLLECTIONS_PREFIX)
            .await?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .filter(|id| !sections.contains(id) && !exhibits.contains(id))
            .collect();
        Ok(Catalog::new(sections, exhibits, others))
    }
}
