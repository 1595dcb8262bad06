//! Fake implementations of port traits
//!
//! In-memory implementations that can be seeded and inspected by tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use crate::domain::ports::{BlobEntry, BlobStore};
use crate::error::StorageError;

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

// ============================================================================
// In-Memory Blob Store
// ============================================================================

#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    namespaces: Arc<RwLock<BTreeSet<String>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a text blob for testing
    pub fn with_blob(self, path: &str, text: &str) -> Self {
        {
            let mut blobs = self.blobs.write().unwrap();
            let mut namespaces = self.namespaces.write().unwrap();
            namespaces.insert(parent_of(path).to_string());
            blobs.insert(path.to_string(), text.as_bytes().to_vec());
        }
        self
    }

    /// Stored blob as text, if present
    pub fn blob_text(&self, path: &str) -> Option<String> {
        let blobs = self.blobs.read().unwrap();
        blobs
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        let namespaces = self.namespaces.read().unwrap();
        namespaces.contains(namespace.trim_end_matches('/'))
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().unwrap();
        let mut namespaces = self.namespaces.write().unwrap();
        namespaces.insert(parent_of(path).to_string());
        blobs.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let blobs = self.blobs.read().unwrap();
        blobs
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn list(&self, namespace: &str) -> Result<Vec<BlobEntry>, StorageError> {
        let namespace = namespace.trim_end_matches('/');
        let blobs = self.blobs.read().unwrap();
        let namespaces = self.namespaces.read().unwrap();

        if !namespaces.contains(namespace) {
            return Err(StorageError::NamespaceNotFound(namespace.to_string()));
        }

        let mut entries: Vec<BlobEntry> = namespaces
            .iter()
            .filter(|ns| parent_of(ns) == namespace && ns.as_str() != namespace)
            .map(|ns| BlobEntry::namespace(&ns[namespace.len() + 1..]))
            .collect();
        entries.extend(
            blobs
                .keys()
                .filter(|path| parent_of(path) == namespace)
                .map(|path| BlobEntry::file(&path[namespace.len() + 1..])),
        );
        Ok(entries)
    }

    async fn create_namespace(&self, namespace: &str) -> Result<(), StorageError> {
        let mut namespaces = self.namespaces.write().unwrap();
        namespaces.insert(namespace.trim_end_matches('/').to_string());
        Ok(())
    }
}

// ============================================================================
// Failing Blob Store
// ============================================================================

/// Blob store whose every call fails, for error-path tests
pub struct FailingBlobStore;

fn unavailable() -> StorageError {
    StorageError::Api {
        status: 503,
        message: "storage unavailable".to_string(),
    }
}

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn write(&self, _path: &str, _bytes: &[u8]) -> Result<(), StorageError> {
        Err(unavailable())
    }

    async fn read(&self, _path: &str) -> Result<Vec<u8>, StorageError> {
        Err(unavailable())
    }

    async fn list(&self, _namespace: &str) -> Result<Vec<BlobEntry>, StorageError> {
        Err(unavailable())
    }

    async fn create_namespace(&self, _namespace: &str) -> Result<(), StorageError> {
        Err(unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_list_scopes_to_namespace() {
        let store = InMemoryBlobStore::new()
            .with_blob("/members/RKSC0001.txt", "a")
            .with_blob("/members/archive/RKSC0000.txt", "b")
            .with_blob("/other/x.txt", "c");

        let mut entries = store.list("/members").await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![
                BlobEntry::file("RKSC0001.txt"),
                BlobEntry::namespace("archive"),
            ]
        );
    }

    #[tokio::test]
    async fn in_memory_missing_namespace() {
        let store = InMemoryBlobStore::new();
        assert!(matches!(
            store.list("/members").await,
            Err(StorageError::NamespaceNotFound(_))
        ));
    }
}
