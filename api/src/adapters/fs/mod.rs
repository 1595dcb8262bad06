//! Local filesystem adapter
//!
//! Keeps member files under a data directory on disk.

pub mod store;

pub use store::FsBlobStore;
