use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::adapters::dropbox::client::{DEFAULT_API_URL, DEFAULT_CONTENT_URL};
use crate::app::fee_config::{DEFAULT_MEMBER_ID_PREFIX, DEFAULT_MEMBER_NAMESPACE};

/// Where member records live
#[derive(Clone)]
pub enum StorageBackend {
    /// Local directory, for a single machine or development
    Filesystem { data_dir: PathBuf },
    /// Dropbox account reached through its HTTP API
    Dropbox {
        access_token: String,
        api_url: String,
        content_url: String,
    },
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Filesystem { .. } => "fs",
            StorageBackend::Dropbox { .. } => "dropbox",
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    /// Storage namespace holding one file per member
    pub member_namespace: String,
    pub member_id_prefix: String,
    /// Club name shown in report titles
    pub club_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = get("LEDGER_BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("LEDGER_BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let storage = match get("LEDGER_STORAGE").as_deref().unwrap_or("fs") {
            "fs" => StorageBackend::Filesystem {
                data_dir: get("LEDGER_DATA_DIR")
                    .unwrap_or_else(|| "./data".to_string())
                    .into(),
            },
            "dropbox" => StorageBackend::Dropbox {
                access_token: get("DROPBOX_ACCESS_TOKEN")
                    .filter(|t| !t.is_empty())
                    .context("DROPBOX_ACCESS_TOKEN must be set when LEDGER_STORAGE=dropbox")?,
                api_url: get("DROPBOX_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                content_url: get("DROPBOX_CONTENT_URL")
                    .unwrap_or_else(|| DEFAULT_CONTENT_URL.to_string()),
            },
            other => bail!("Unknown LEDGER_STORAGE '{}', expected 'fs' or 'dropbox'", other),
        };

        let member_id_prefix =
            get("MEMBER_ID_PREFIX").unwrap_or_else(|| DEFAULT_MEMBER_ID_PREFIX.to_string());
        if member_id_prefix.is_empty()
            || !member_id_prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            bail!("MEMBER_ID_PREFIX must be non-empty and alphanumeric");
        }

        Ok(Self {
            bind_addr,
            storage,
            member_namespace: get("MEMBER_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_MEMBER_NAMESPACE.to_string()),
            member_id_prefix,
            club_name: get("CLUB_NAME").unwrap_or_else(|| "RKSC Club".to_string()),
        })
    }
}
