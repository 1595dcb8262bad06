//! Dropbox API client implementation
//!
//! Uses the v2 endpoints: `files/upload` and `files/download` on the content
//! host, `files/list_folder` (with `/continue`) and `files/create_folder_v2`
//! on the API host.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{BlobEntry, BlobStore};
use crate::error::StorageError;

pub const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";
pub const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";

const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// Blob store backed by a Dropbox app folder or account
pub struct DropboxBlobStore {
    http: Client,
    api_url: String,
    content_url: String,
    access_token: String,
}

impl DropboxBlobStore {
    pub fn new(api_url: String, content_url: String, access_token: String) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            content_url: content_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn api_endpoint(&self, route: &str) -> String {
        format!("{}/2/files/{}", self.api_url, route)
    }

    fn content_endpoint(&self, route: &str) -> String {
        format!("{}/2/files/{}", self.content_url, route)
    }

    async fn rpc<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        route: &str,
        body: &Req,
        path: &str,
    ) -> Result<Resp, StorageError> {
        let response = self
            .http
            .post(self.api_endpoint(route))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| StorageError::Serialization(e.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(classify_error(status.as_u16(), &message, path))
        }
    }
}

/// Request types for the Dropbox API
#[derive(Serialize)]
struct PathArg<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    mute: bool,
}

#[derive(Serialize)]
struct CreateFolderArg<'a> {
    path: &'a str,
    autorename: bool,
}

#[derive(Serialize)]
struct ListFolderArg<'a> {
    path: &'a str,
    recursive: bool,
}

#[derive(Serialize)]
struct ListFolderContinueArg<'a> {
    cursor: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListFolderResponse {
    entries: Vec<DropboxEntry>,
    cursor: String,
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct DropboxEntry {
    #[serde(rename = ".tag")]
    tag: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DropboxErrorBody {
    error_summary: String,
}

impl DropboxEntry {
    fn into_blob_entry(self) -> Option<BlobEntry> {
        match self.tag.as_str() {
            "file" => Some(BlobEntry::file(self.name)),
            "folder" => Some(BlobEntry::namespace(self.name)),
            _ => None,
        }
    }
}

/// Map a failed Dropbox response onto a storage error
///
/// Route errors come back as 409 with an `error_summary` such as
/// `path/not_found/..`.
fn classify_error(status: u16, body: &str, path: &str) -> StorageError {
    match status {
        401 => StorageError::Unauthorized,
        429 => StorageError::RateLimited,
        409 => {
            let summary = serde_json::from_str::<DropboxErrorBody>(body)
                .map(|b| b.error_summary)
                .unwrap_or_default();
            if summary.starts_with("path/not_found") {
                StorageError::NotFound(path.to_string())
            } else {
                StorageError::Api {
                    status,
                    message: body.to_string(),
                }
            }
        }
        _ => StorageError::Api {
            status,
            message: body.to_string(),
        },
    }
}

fn api_arg<T: Serialize>(arg: &T) -> Result<String, StorageError> {
    serde_json::to_string(arg).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[async_trait]
impl BlobStore for DropboxBlobStore {
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let arg = api_arg(&UploadArg {
            path,
            mode: "overwrite",
            mute: true,
        })?;

        let response = self
            .http
            .post(self.content_endpoint("upload"))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(path = %path, bytes = bytes.len(), "Uploaded blob to Dropbox");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(classify_error(status.as_u16(), &message, path))
        }
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .http
            .post(self.content_endpoint("download"))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, api_arg(&PathArg { path })?)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(classify_error(status.as_u16(), &message, path))
        }
    }

    async fn list(&self, namespace: &str) -> Result<Vec<BlobEntry>, StorageError> {
        let mut page: ListFolderResponse = self
            .rpc(
                "list_folder",
                &ListFolderArg {
                    path: namespace,
                    recursive: false,
                },
                namespace,
            )
            .await
            .map_err(|e| match e {
                StorageError::NotFound(p) => StorageError::NamespaceNotFound(p),
                e => e,
            })?;

        let mut entries: Vec<BlobEntry> = Vec::new();
        loop {
            entries.extend(
                page.entries
                    .into_iter()
                    .filter_map(DropboxEntry::into_blob_entry),
            );
            if !page.has_more {
                break;
            }
            let cursor = page.cursor;
            page = self
                .rpc(
                    "list_folder/continue",
                    &ListFolderContinueArg { cursor: &cursor },
                    namespace,
                )
                .await?;
        }

        Ok(entries)
    }

    async fn create_namespace(&self, namespace: &str) -> Result<(), StorageError> {
        let result: Result<serde_json::Value, StorageError> = self
            .rpc(
                "create_folder_v2",
                &CreateFolderArg {
                    path: namespace,
                    autorename: false,
                },
                namespace,
            )
            .await;

        match result {
            Ok(_) => {
                tracing::info!(namespace = %namespace, "Created Dropbox folder");
                Ok(())
            }
            // Folder already there
            Err(StorageError::Api { status: 409, message }) if message.contains("path/conflict") => {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
