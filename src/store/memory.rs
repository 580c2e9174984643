//! In-memory suggestion store.
//!
//! Implements the same contract as the real backends so the failover layer
//! can be exercised without touching disk, and carries an availability switch
//! for simulating outages.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, StoreStats, SuggestionStore};
use crate::models::{Suggestion, UpdateSuggestionRequest};

/// A map-backed store with a toggle to simulate the medium going away.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Suggestion>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip availability; while unavailable every operation fails with
    /// `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(
                "memory store marked unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn init(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn get_all(&self) -> Result<Vec<Suggestion>, StoreError> {
        self.check()?;
        let records = self.records.read().await;
        let mut all: Vec<Suggestion> = records.values().cloned().collect();
        all.sort_by(|a, b| (&a.created_at, &a.id).cmp(&(&b.created_at, &b.id)));
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Option<Suggestion>, StoreError> {
        self.check()?;
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn save(&self, record: &Suggestion) -> Result<(), StoreError> {
        self.check()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict(format!(
                "Suggestion {} already exists",
                record.id
            )));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        request: &UpdateSuggestionRequest,
    ) -> Result<Suggestion, StoreError> {
        self.check()?;
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("Suggestion {} not found", id)))?;
        record.apply_update(request, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.records.write().await.remove(id);
        Ok(())
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        self.check()?;
        Ok(StoreStats {
            total: self.records.read().await.len() as i64,
        })
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
