//! Write-through deduplication set of registrant identifiers.

use crate::backend::KeyValueStore;
use crate::error::{DuplicateRegistrant, StoreError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Default name of the persisted entry.
pub const DEFAULT_KEY: &str = "usedMobileNumbers";

/// Set of registrant identifiers that already completed registration.
///
/// Identifiers are compared by exact string match. Insertion order is kept so
/// the persisted list stays stable between writes. The whole list is rewritten
/// to the backend after every insertion.
///
/// The store is meant to have a single owner; callers that share it across
/// tasks wrap it in one mutex so check-and-record stays atomic.
pub struct DedupStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    order: Vec<String>,
    seen: HashSet<String>,
}

impl DedupStore {
    /// Load the set from `backend` under `key`.
    ///
    /// A missing entry yields an empty set. So does an unreadable or
    /// unparseable one: the store fails open rather than blocking registration.
    pub async fn load(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let order = match backend.get(&key).await {
            Ok(Some(bytes)) => match decode(&bytes) {
                Ok(ids) => {
                    info!("Loaded {} registrants from '{}'", ids.len(), key);
                    ids
                }
                Err(e) => {
                    warn!("Persisted registrant list '{}' is corrupt, starting empty: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => {
                info!("No persisted registrant list '{}', starting empty", key);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read registrant list '{}', starting empty: {}", key, e);
                Vec::new()
            }
        };

        let mut store = Self {
            backend,
            key,
            order: Vec::with_capacity(order.len()),
            seen: HashSet::with_capacity(order.len()),
        };
        // A hand-edited file may contain repeats; keep the first occurrence.
        for id in order {
            store.insert(id);
        }
        store
    }

    /// Whether `id` was recorded before.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Add `id` to the set and write the full list through to the backend.
    ///
    /// Idempotent: recording a known identifier changes nothing and writes
    /// nothing. Returns `true` if the identifier was new. Backend write
    /// failures are logged, never returned; the in-memory set still holds the
    /// identifier for the rest of the process lifetime.
    #[instrument(skip(self))]
    pub async fn record(&mut self, id: &str) -> bool {
        if !self.insert(id.to_string()) {
            debug!("Registrant already recorded, nothing to persist");
            return false;
        }

        if let Err(e) = self.persist().await {
            error!(phone_number = %id, "Failed to persist registrant list: {}", e);
        }
        true
    }

    /// Check-and-record in one step.
    pub async fn register(&mut self, id: &str) -> Result<(), DuplicateRegistrant> {
        if self.contains(id) {
            return Err(DuplicateRegistrant(id.to_string()));
        }
        self.record(id).await;
        Ok(())
    }

    /// Number of recorded identifiers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Recorded identifiers in insertion order.
    pub fn identifiers(&self) -> &[String] {
        &self.order
    }

    /// Name of the persisted entry.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn insert(&mut self, id: String) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.order.push(id);
        true
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let data = serde_json::to_vec(&self.order)?;
        self.backend.set(&self.key, &data).await
    }
}

fn decode(bytes: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
