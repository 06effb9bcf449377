//! Driven port for the local key-value store that holds the session.
//!
//! The store maps string keys to string values and survives restarts. Only
//! the session guard and the login command touch it.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// The backing medium could not be read.
        Read { message: String } => "session store read failed: {message}",
        /// The backing medium could not be written.
        Write { message: String } => "session store write failed: {message}",
        /// The stored bytes are not a string map.
        Corrupt { message: String } => "session store contents corrupt: {message}",
    }
}

/// Synchronous string key-value store.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Read the value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Delete `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

/// Process-local store used by tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemorySessionStore {
    /// Seed the store with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    /// Copy of every stored entry.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.lock().remove(key);
        Ok(())
    }
}
