//! Durable client-side key-value storage.
//!
//! The storefront needs a tiny amount of state that survives a full
//! process restart and, crucially, the hard navigation of a payment
//! gateway redirect: the session token, the user profile, and the
//! pending order intent. Values are JSON-serialized, one file per key.
//!
//! [`ClientStore::take`] is a single load-and-delete under one lock, so
//! two readers of the pending order intent can never both observe it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Session credential (bare JSON string).
    pub const TOKEN: &str = "token";

    /// Session profile ([`crate::models::UserProfile`]).
    pub const USER: &str = "user";

    /// Pending order intent bridging the gateway redirect
    /// ([`regenessa_core::PendingOrderIntent`]).
    pub const PENDING_ORDER: &str = "pendingOrder";
}

/// Errors that can occur reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A durable string-keyed JSON store scoped to one client.
///
/// No cross-process coordination: two processes sharing a directory race
/// with last-write-wins semantics, same as the server-authoritative cart.
pub struct ClientStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl ClientStore {
    /// Open (creating if needed) a store backed by `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read and deserialize a value, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if the stored JSON does not
    /// match `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        read_value(&self.path_for(key))
    }

    /// Serialize and write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O or serialization failure.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let json = serde_json::to_vec_pretty(value)?;
        fs::write(self.path_for(key), json)?;
        Ok(())
    }

    /// Delete a key. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure other than the key being absent.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        remove_file(&self.path_for(key))
    }

    /// Atomically load and delete a value: the consume-once read.
    ///
    /// The read and the delete happen under one lock, so a second caller
    /// always observes `None` once the first has taken the value.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if the stored JSON does not
    /// match `T`.
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.path_for(key);
        let value = read_value(&path)?;
        if value.is_some() {
            remove_file(&path)?;
        }
        Ok(value)
    }
}

fn read_value<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn remove_file(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
