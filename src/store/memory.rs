//! In-memory record backend
//!
//! Nothing survives a restart. Concurrent writes to one key are last-write-wins.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{RecordBackend, StoreError, StoreResult};
use crate::models::{Namespace, StoredRecord};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    health_details: RwLock<HashMap<String, StoredRecord>>,
    dietary_data: RwLock<HashMap<String, StoredRecord>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, namespace: Namespace) -> &RwLock<HashMap<String, StoredRecord>> {
        match namespace {
            Namespace::HealthDetails => &self.health_details,
            Namespace::DietaryData => &self.dietary_data,
        }
    }
}

impl RecordBackend for MemoryBackend {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn put(&self, namespace: Namespace, record: StoredRecord) -> StoreResult<()> {
        let mut map = self.map(namespace).write().map_err(|_| StoreError::Poisoned)?;
        map.insert(record.user_id.clone(), record);
        Ok(())
    }

    fn get(&self, namespace: Namespace, user_id: &str) -> StoreResult<Option<StoredRecord>> {
        let map = self.map(namespace).read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(user_id).cloned())
    }

    fn count(&self, namespace: Namespace) -> StoreResult<usize> {
        let map = self.map(namespace).read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.len())
    }
}
