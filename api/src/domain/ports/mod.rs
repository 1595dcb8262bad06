//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod blob_store;

pub use blob_store::{blob_path, BlobEntry, BlobStore};
