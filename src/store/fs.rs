use super::{check_version, key_segments, DocumentStore, StoreError, Version, Versioned};
use crate::utils::atomic_write;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Directory (inside the store root) holding the per-key version counters
const VERSIONS_DIR: &str = ".versions";

/// Document store backed by JSON files below a root directory.
///
/// Key `collections/summer` lives at `<root>/collections/summer.json`, its
/// version counter at `<root>/.versions/collections/summer.version`.
/// Writes inside one process are serialized by a lock; the version check
/// detects writers in other processes. Removing a document keeps its counter
/// file, so a recreated key continues numbering where the old one stopped.
pub struct FsDocumentStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsDocumentStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        keyed_path(&self.root, key, "json")
    }

    fn version_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        keyed_path(&self.root.join(VERSIONS_DIR), key, "version")
    }

    /// Last version handed out for `key`, including removed documents. A
    /// document written by hand (no counter yet) counts as version 1.
    async fn counter(&self, key: &str) -> Result<Version, StoreError> {
        let version_path = self.version_path(key)?;
        if version_path.exists() {
            let raw = fs::read_to_string(&version_path).await?;
            return raw.trim().parse::<Version>().map_err(|e| {
                StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Failed to parse {}: {e}", version_path.display()),
                ))
            });
        }
        if self.document_path(key)?.exists() {
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

/// Version a caller must name: the counter while the document exists, 0
/// once it is gone.
fn visible_version(path: &Path, counter: Version) -> Version {
    if path.exists() {
        counter
    } else {
        0
    }
}

/// `<base>/<seg>/.../<last>.<extension>`; IDs may themselves contain dots.
fn keyed_path(base: &Path, key: &str, extension: &str) -> Result<PathBuf, StoreError> {
    let mut path = base.to_path_buf();
    let segments = key_segments(key)?;
    if let Some((last, parents)) = segments.split_last() {
        for segment in parents {
            path.push(segment);
        }
        path.push(format!("{last}.{extension}"));
    }
    Ok(path)
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn read(&self, key: &str) -> Result<Option<Versioned<String>>, StoreError> {
        let path = self.document_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let version = self.counter(key).await?;
        let value = fs::read_to_string(&path).await?;
        Ok(Some(Versioned { value, version }))
    }

    async fn write(
        &self,
        key: &str,
        content: &str,
        expected_version: Version,
    ) -> Result<Version, StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.document_path(key)?;
        let counter = self.counter(key).await?;
        check_version(key, expected_version, visible_version(&path, counter))?;

        let next = counter.saturating_add(1);
        atomic_write(&path, content).await?;
        atomic_write(&self.version_path(key)?, &next.to_string()).await?;
        debug!(key, version = next, "Wrote document");
        Ok(next)
    }

    async fn remove(&self, key: &str, expected_version: Version) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.document_path(key)?;
        let counter = self.counter(key).await?;
        check_version(key, expected_version, visible_version(&path, counter))?;
        if !path.exists() {
            return Ok(());
        }

        // Tombstone: the counter outlives the document
        let tombstone = counter.saturating_add(1);
        atomic_write(&self.version_path(key)?, &tombstone.to_string()).await?;
        fs::remove_file(&path).await?;
        debug!(key, tombstone, "Removed document");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut dir = self.root.clone();
        for segment in key_segments(prefix)? {
            dir.push(segment);
        }
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(format!("{prefix}/{stem}"));
            }
        }
        keys.sort();
        Ok(keys)
    }
}
