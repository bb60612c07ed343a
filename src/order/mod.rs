//! Display-order bookkeeping.
//!
//! Every collection is stored as an array; the order visitors see is a
//! separate list of storage positions kept in one persisted document. This
//! module holds the pure adjustment functions, the validator for submitted
//! orders, the alias resolver, and the versioned store for the document.

mod adjust;
mod alias;
mod document;
mod store;
mod validate;

pub use adjust::{
    display_positions, move_to_index, normalize, on_append_at_front, on_delete,
    on_explicit_reorder, shift_tags_for_delete, shift_tags_for_insert, DeleteAdjustment,
    ReorderCheck,
};
pub use alias::AliasResolver;
pub use document::{OrderDocument, PLACEHOLDER_TAG};
pub use store::{OrderStore, ORDER_KEY};
pub use validate::validate_reorder;

use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Stale order rejected for '{collection_id}': positions {offending:?} are outside a collection of {storage_length} items")]
    StaleOrderRejected {
        collection_id: String,
        offending: Vec<usize>,
        storage_length: usize,
    },

    #[error("Position {position} not found in the stored order of '{collection_id}'")]
    PositionNotFound {
        collection_id: String,
        position: usize,
    },

    #[error("Order document '{key}' is corrupt: {reason}")]
    DocumentCorrupt { key: String, reason: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gave up updating '{key}' after {attempts} conflicting attempts")]
    RetriesExhausted { key: String, attempts: u32 },
}
