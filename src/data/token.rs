//! In-memory token store keyed by Discord user id.
//!
//! This module provides the `TokenStore`, the process-lifetime cache of every
//! authenticated member's OAuth2 credentials. Records are created when an
//! authorization code is exchanged, overwritten in place on refresh, and
//! removed when a refresh fails irrecoverably. There is no expiry sweep:
//! expired records stay until the next access refreshes or evicts them.
//!
//! The store snapshots itself to a flat JSON file after mutations
//! (best-effort) and reloads it on startup, so members survive a restart
//! without re-authorizing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{
    error::store::StoreError,
    model::token::{MemberIdentity, TokenRecord},
};

/// Process-lifetime store of cached member tokens.
///
/// Individual operations are atomic map mutations under an async `RwLock`; no
/// caller can ever observe a torn record. Read-modify-write sequences that
/// span a network call (refresh, evict-on-failure, callback overwrite) must
/// additionally hold the per-key guard from [`TokenStore::lock`], which
/// serializes writers of one key without blocking any other key.
pub struct TokenStore {
    records: RwLock<HashMap<String, TokenRecord>>,
    guards: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Creates an empty store with no backing file.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            guards: Mutex::new(HashMap::new()),
            path: None,
        }
    }

    /// Loads a store from a JSON snapshot, falling back to an empty store
    /// when the file is missing or malformed.
    pub async fn load(path: PathBuf) -> Self {
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring malformed token cache {}: {}",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            records: RwLock::new(records),
            guards: Mutex::new(HashMap::new()),
            path: Some(path),
        }
    }

    /// Looks up the record stored for `key`.
    pub async fn get(&self, key: &str) -> Option<TokenRecord> {
        self.records.read().await.get(key).cloned()
    }

    /// Stores `record` under `key`, replacing any previous record.
    ///
    /// # Returns
    /// - `Ok(())` - Record stored
    /// - `Err(StoreError::EmptyAccessToken)` - Record is invalid and was rejected
    pub async fn put(&self, key: &str, record: TokenRecord) -> Result<(), StoreError> {
        if record.access_token.is_empty() {
            return Err(StoreError::EmptyAccessToken);
        }

        self.records.write().await.insert(key.to_string(), record);
        Ok(())
    }

    /// Removes the record stored for `key`.
    ///
    /// # Returns
    /// - `true` - A record existed and was removed
    /// - `false` - The key was unknown
    pub async fn delete(&self, key: &str) -> bool {
        self.records.write().await.remove(key).is_some()
    }

    /// Attaches a resolved identity to the record stored for `key`.
    ///
    /// Takes the key's guard internally; callers must not already hold it.
    ///
    /// # Returns
    /// - `true` - The record existed and now carries the identity
    /// - `false` - The key was unknown
    pub async fn set_identity(&self, key: &str, identity: MemberIdentity) -> bool {
        let guard = self.lock(key).await;
        let _guard = guard.lock().await;

        match self.records.write().await.get_mut(key) {
            Some(record) => {
                record.identity = Some(identity);
                true
            }
            None => false,
        }
    }

    /// Snapshot of all stored keys.
    pub async fn keys(&self) -> Vec<String> {
        self.records.read().await.keys().cloned().collect()
    }

    /// Snapshot of all stored members and their records.
    pub async fn members(&self) -> Vec<(String, TokenRecord)> {
        self.records
            .read()
            .await
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    /// Number of stored members.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no members are stored. Used in tests to verify store state.
    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Per-key guard serializing read-modify-write sequences on one key.
    ///
    /// Writers that read a record, perform I/O, and write the key back (the
    /// refresh path, the callback overwrite) must hold this guard for the
    /// whole sequence. Guards for different keys are independent. Guard
    /// entries are retained after eviction so late holders keep serializing
    /// on the same mutex.
    pub async fn lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.guards
            .lock()
            .await
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Writes the current records to the backing file, if any (best effort).
    ///
    /// Persistence failures are logged and swallowed; the in-memory store
    /// stays authoritative.
    pub async fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let snapshot = self.records.read().await.clone();
        let json = match serde_json::to_vec_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize token cache: {}", e);
                return;
            }
        };

        if let Err(e) = tokio::fs::write(path, json).await {
            tracing::warn!(
                "Failed to persist token cache to {}: {}",
                path.display(),
                e
            );
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
