//! Record store: named collections of opaque items and the meta lists of
//! collection IDs.

mod catalog;
mod store;
mod types;

pub use catalog::{Catalog, CollectionClassifier};
pub use store::{RecordStore, COLLECTIONS_PREFIX, META_PREFIX};
pub use types::{
    CollectionDocument, CollectionKind, CreatedCollection, DeletedCollection, RemovedItem,
};

use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to parse '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Collection not found: {0}")]
    NotFound(String),

    #[error("Collection already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid collection ID '{0}'")]
    InvalidId(String),

    #[error("'{0}' is a meta collection and cannot be modified directly")]
    MetaCollection(String),

    #[error("Position {position} out of range for '{collection_id}' (length {length})")]
    PositionOutOfRange {
        collection_id: String,
        position: usize,
        length: usize,
    },
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
