//! Filesystem-backed blob store

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::domain::ports::{BlobEntry, BlobStore};
use crate::error::StorageError;

/// Blob store rooted at a local directory
///
/// Store paths such as `/members/RKSC0001.txt` resolve beneath `root`.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write then rename so a failed write never leaves half a record
        let mut staging = target.clone().into_os_string();
        staging.push(".tmp");
        tokio::fs::write(&staging, bytes).await?;
        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                tracing::warn!(path = %path, "Failed to remove staging file: {}", cleanup);
            }
            return Err(e.into());
        }

        tracing::debug!(path = %path, bytes = bytes.len(), "Wrote blob");
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.resolve(path)?;
        tokio::fs::read(&target).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            _ => StorageError::Io(e),
        })
    }

    async fn list(&self, namespace: &str) -> Result<Vec<BlobEntry>, StorageError> {
        let dir = self.resolve(namespace)?;
        let mut reader = tokio::fs::read_dir(&dir).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NamespaceNotFound(namespace.to_string()),
            _ => StorageError::Io(e),
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().await?.is_dir() {
                entries.push(BlobEntry::namespace(name));
            } else {
                entries.push(BlobEntry::file(name));
            }
        }
        Ok(entries)
    }

    async fn create_namespace(&self, namespace: &str) -> Result<(), StorageError> {
        let dir = self.resolve(namespace)?;
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!(namespace = %namespace, "Created namespace");
        Ok(())
    }
}
