//! Adapters layer
//!
//! Implementations of the blob storage port.

pub mod dropbox;
pub mod fs;

pub use dropbox::DropboxBlobStore;
pub use fs::FsBlobStore;
