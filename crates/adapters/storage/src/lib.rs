//! # revdash-adapter-storage
//!
//! Durable key-value storage for the settings record.
//!
//! ## Responsibilities
//! - Implement the `KeyValueStore` port defined in `revdash-app::ports`
//! - [`FileStore`]: one `<key>.json` file per key under a data directory,
//!   written atomically (temp file + rename)
//! - [`MemoryStore`]: process-local store with an optional byte quota, used
//!   for ephemeral sessions and for exercising write-failure paths
//!
//! ## Dependency rule
//! Depends on `revdash-app` (for port traits) and `revdash-domain` (for the error type).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod file_store;
pub mod memory_store;

pub use error::StorageError;
pub use file_store::{Config, FileStore};
pub use memory_store::MemoryStore;
