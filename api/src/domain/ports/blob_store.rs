//! Blob storage port
//!
//! The ledger keeps each member in its own small file. Any store that can
//! overwrite, read and list paths can hold it.

use async_trait::async_trait;

use crate::error::StorageError;

/// What a listed path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    File,
    Namespace,
}

/// One entry of a namespace listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    /// Final path component, e.g. `RKSC0001.txt`
    pub name: String,
    pub kind: BlobKind,
}

impl BlobEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BlobKind::File,
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BlobKind::Namespace,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == BlobKind::File
    }
}

/// Path-keyed blob store with overwrite semantics
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` at `path`, replacing any existing blob
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read the blob at `path` (`StorageError::NotFound` if absent)
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// List a namespace (`StorageError::NamespaceNotFound` if absent)
    async fn list(&self, namespace: &str) -> Result<Vec<BlobEntry>, StorageError>;

    /// Create a namespace; succeeds if it already exists
    async fn create_namespace(&self, namespace: &str) -> Result<(), StorageError>;
}

/// Join a namespace and a name into a store path
pub fn blob_path(namespace: &str, name: &str) -> String {
    format!("{}/{}", namespace.trim_end_matches('/'), name)
}
