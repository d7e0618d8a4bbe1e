//! Blob storage for config documents
//!
//! Each document kind lives in one fixed, non-randomized blob name. `put`
//! overwrites it and returns its public URL. Every write goes through its own
//! temporary file, so overlapping writes each replace the blob whole.

use crate::error::BlobError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Named JSON blob store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync + Debug {
    /// Read blob `name`; `None` when it does not exist
    ///
    /// # Errors
    /// Returns `BlobError` if the blob exists but cannot be read or parsed.
    async fn get(&self, name: &str) -> Result<Option<Value>, BlobError>;

    /// Overwrite blob `name`, returning its public URL
    ///
    /// # Errors
    /// Returns `BlobError` if the blob cannot be written.
    async fn put(&self, name: &str, document: &Value) -> Result<String, BlobError>;
}

fn check_name(name: &str) -> Result<(), BlobError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidName(name.to_owned()))
    }
}

fn public_url(base: &str, name: &str) -> String {
    format!("{}/{name}", base.trim_end_matches('/'))
}

/// One file per blob in a directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    /// Create store rooted at `root`; the directory is created on first write
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Directory holding the blobs
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, name: &str) -> Result<Option<Value>, BlobError> {
        check_name(name)?;
        let raw = match tokio::fs::read(self.root.join(name)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BlobError::io_error(name, e)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| BlobError::Corrupt {
                name: name.to_owned(),
                source,
            })
    }

    async fn put(&self, name: &str, document: &Value) -> Result<String, BlobError> {
        check_name(name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BlobError::io_error(name, e))?;

        let path = self.root.join(name);
        let tmp = self
            .root
            .join(format!(".{name}.{:016x}.tmp", rand::random::<u64>()));
        let raw = document.to_string();
        let written = match tokio::fs::write(&tmp, raw).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(BlobError::io_error(name, e));
        }

        tracing::debug!("wrote blob {}", path.display());
        Ok(public_url(&self.public_base_url, name))
    }
}

/// In-process blob store
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Value>,
    public_base_url: String,
}

impl MemoryBlobStore {
    /// Create empty store
    #[must_use]
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            blobs: DashMap::new(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Number of stored blobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, name: &str) -> Result<Option<Value>, BlobError> {
        check_name(name)?;
        Ok(self.blobs.get(name).map(|entry| entry.value().clone()))
    }

    async fn put(&self, name: &str, document: &Value) -> Result<String, BlobError> {
        check_name(name)?;
        self.blobs.insert(name.to_owned(), document.clone());
        Ok(public_url(&self.public_base_url, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn fs_store_missing_blob_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "https://blobs.example");
        assert!(store.get("text-config.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fs_store_overwrites_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("blobs"), "https://blobs.example/");

        let url = store.put("text-config.json", &json!({"a": 1})).await.unwrap();
        assert_eq!(url, "https://blobs.example/text-config.json");
        store.put("text-config.json", &json!({})).await.unwrap();

        assert_eq!(store.get("text-config.json").await.unwrap(), Some(json!({})));
        let files: Vec<_> = std::fs::read_dir(store.root()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn fs_store_overlapping_puts_each_replace_whole_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsBlobStore::new(dir.path(), ""));
        let documents: Vec<Value> = (0..8)
            .map(|writer| {
                let entries: serde_json::Map<String, Value> = (0..2_000)
                    .map(|i| {
                        let entry = json!({"current": format!("w{writer}-{i}"), "alternatives": []});
                        (format!("fragment_{i}"), entry)
                    })
                    .collect();
                Value::Object(entries)
            })
            .collect();

        for _ in 0..5 {
            let puts: Vec<_> = documents
                .iter()
                .cloned()
                .map(|document| {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move { store.put("text-config.json", &document).await })
                })
                .collect();
            for put in puts {
                put.await.unwrap().unwrap();
            }

            let stored = store.get("text-config.json").await.unwrap().unwrap();
            assert!(documents.contains(&stored));
        }

        let files: Vec<_> = std::fs::read_dir(store.root()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn fs_store_reports_corrupt_blob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("design-comments.json"), "[oops").unwrap();
        let store = FsBlobStore::new(dir.path(), "");
        assert!(matches!(
            store.get("design-comments.json").await,
            Err(BlobError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn names_cannot_escape_root() {
        let store = MemoryBlobStore::new("");
        for name in ["../etc/passwd", "a/b.json", "", ".hidden"] {
            assert!(matches!(
                store.put(name, &json!({})).await,
                Err(BlobError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryBlobStore::new("mem://blobs");
        assert!(store.is_empty());
        let url = store.put("design-comments.json", &json!([])).await.unwrap();
        assert_eq!(url, "mem://blobs/design-comments.json");
        assert_eq!(store.get("design-comments.json").await.unwrap(), Some(json!([])));
        assert_eq!(store.len(), 1);
    }
}
