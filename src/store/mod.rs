//! Durable key-value document storage.
//!
//! Documents are opaque strings addressed by `/`-separated keys. Every key
//! carries a monotonic version; a write names the version it was computed
//! from and is refused with [`StoreError::VersionConflict`] if another writer
//! committed first. An absent document has version 0.

mod fs;
mod memory;

pub use fs::FsDocumentStore;
pub use memory::MemoryDocumentStore;

use async_trait::async_trait;
use thiserror::Error;

/// Version counter of a stored document.
pub type Version = u64;

/// A value together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document key '{0}'")]
    InvalidKey(String),

    #[error("Version conflict on '{key}': expected {expected}, found {actual}")]
    VersionConflict {
        key: String,
        expected: Version,
        actual: Version,
    },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document, or `None` if it does not exist.
    async fn read(&self, key: &str) -> Result<Option<Versioned<String>>, StoreError>;

    /// Write a document if its current version equals `expected_version`.
    ///
    /// Returns the new version.
    async fn write(
        &self,
        key: &str,
        content: &str,
        expected_version: Version,
    ) -> Result<Version, StoreError>;

    /// Remove a document if its current version equals `expected_version`.
    /// Removing an absent document with `expected_version` 0 is a no-op.
    async fn remove(&self, key: &str, expected_version: Version) -> Result<(), StoreError>;

    /// List the keys directly below `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Split a key into its path segments, rejecting anything that could escape
/// the store root.
pub(crate) fn key_segments(key: &str) -> Result<Vec<&str>, StoreError> {
    let segments: Vec<&str> = key.split('/').collect();
    let valid = segments.iter().all(|segment| {
        !segment.is_empty()
            && *segment != "."
            && *segment != ".."
            && !segment.starts_with('.')
            && !segment.contains('\\')
    });
    if valid {
        Ok(segments)
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Refuse a write computed from a stale version.
pub(crate) fn check_version(
    key: &str,
    expected: Version,
    actual: Version,
) -> Result<(), StoreError> {
    if expected == actual {
        Ok(())
    } else {
        Err(StoreError::VersionConflict {
            key: key.to_string(),
            expected,
            actual,
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
