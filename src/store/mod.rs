//! Record store
//!
//! JSON payloads keyed by `user_id` in two independent namespaces. The store
//! holds no state itself; a [`RecordBackend`] is injected so the in-memory map
//! can be swapped for SQLite without touching callers.

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::db::DbError;
use crate::models::{extract_user_id, is_empty_payload, Namespace, StoredRecord};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// No usable key; `empty_payload` is set when there was no data at all
    #[error("{}", missing_user_id_message(.empty_payload))]
    MissingUserId { empty_payload: bool },

    #[error("{} not found", .namespace.display_name())]
    NotFound { namespace: Namespace, user_id: String },

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record store lock poisoned")]
    Poisoned,
}

fn missing_user_id_message(empty_payload: &bool) -> &'static str {
    if *empty_payload {
        "No data provided"
    } else {
        "user_id is required"
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(DbError::Sqlite(e))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence behind the record store. Writes overwrite unconditionally.
pub trait RecordBackend: Send + Sync {
    /// Short backend name for status output
    fn kind(&self) -> &'static str;

    fn put(&self, namespace: Namespace, record: StoredRecord) -> StoreResult<()>;

    fn get(&self, namespace: Namespace, user_id: &str) -> StoreResult<Option<StoredRecord>>;

    fn count(&self, namespace: Namespace) -> StoreResult<usize>;
}

/// Record store over an injected backend
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn RecordBackend>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self { backend }
    }

    /// Store with a fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Save a payload under its own `user_id`, replacing any previous record.
    ///
    /// Returns the key it was saved under.
    pub fn put(&self, namespace: Namespace, payload: Option<Value>) -> StoreResult<String> {
        let payload = match payload {
            Some(p) if !is_empty_payload(&p) => p,
            _ => return Err(StoreError::MissingUserId { empty_payload: true }),
        };
        let user_id = extract_user_id(&payload)
            .ok_or(StoreError::MissingUserId { empty_payload: false })?;

        self.backend
            .put(namespace, StoredRecord::new(user_id.clone(), payload))?;
        debug!(namespace = namespace.as_str(), %user_id, "record saved");
        Ok(user_id)
    }

    /// Record stored under `user_id`
    pub fn get(&self, namespace: Namespace, user_id: &str) -> StoreResult<StoredRecord> {
        self.backend
            .get(namespace, user_id)?
            .ok_or_else(|| StoreError::NotFound {
                namespace,
                user_id: user_id.to_string(),
            })
    }

    pub fn count(&self, namespace: Namespace) -> StoreResult<usize> {
        self.backend.count(namespace)
    }
}

impl StoreError {
    /// `true` for errors caused by the caller's input rather than the backend
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::MissingUserId { .. })
    }
}
