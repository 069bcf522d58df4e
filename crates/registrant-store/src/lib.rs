//! Persisted deduplication set of registrant identifiers.
//!
//! Remembers which phone numbers already registered so each one can only
//! pass the registration gate once per client. Best-effort anti-abuse, not a
//! security boundary: corrupt persisted data is treated as absent.

mod backend;
mod error;
mod store;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::{DuplicateRegistrant, StoreError};
pub use store::{DedupStore, DEFAULT_KEY};
