//! Key-value port: the durable medium the settings record is written to.
//!
//! Shaped after browser local storage: string keys, string values,
//! synchronous access.

use std::sync::Arc;

use revdash_domain::error::RevdashError;

/// A durable string-to-string map.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Storage`] when the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, RevdashError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Storage`] when the write fails (quota, IO).
    fn set(&self, key: &str, value: &str) -> Result<(), RevdashError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Storage`] when the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), RevdashError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, RevdashError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), RevdashError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), RevdashError> {
        (**self).remove(key)
    }
}
