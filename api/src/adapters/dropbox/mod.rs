//! Dropbox adapter
//!
//! Blob store implementation over the Dropbox HTTP API.

pub mod client;

pub use client::DropboxBlobStore;
