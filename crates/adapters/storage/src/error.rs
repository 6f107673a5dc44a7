//! Storage-specific error type.

use std::path::PathBuf;

use revdash_domain::error::RevdashError;

/// Errors originating from the key-value storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing a backing file failed.
    #[error("io error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped to a file name.
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    /// Writing would exceed the configured quota.
    #[error("storage quota of {limit} bytes exceeded")]
    QuotaExceeded { limit: usize },
}

impl From<StorageError> for RevdashError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
