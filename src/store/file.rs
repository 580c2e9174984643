//! Fallback store provider backed by a JSON document on disk.
//!
//! `init` loads the whole document into memory and every mutation rewrites it
//! atomically. Scoped to a single process; no cross-process locking.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, StoreStats, SuggestionStore};
use crate::models::{Suggestion, UpdateSuggestionRequest};

/// JSON-file-backed suggestion store.
pub struct FileStore {
    path: PathBuf,
    records: RwLock<Option<HashMap<String, Suggestion>>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: RwLock::new(None),
        }
    }

    /// Persist the current map as a JSON array, write-then-rename so a crash
    /// mid-write never corrupts the document.
    async fn persist(&self, records: &HashMap<String, Suggestion>) -> Result<(), StoreError> {
        let mut all: Vec<&Suggestion> = records.values().collect();
        all.sort_by(|a, b| (&a.created_at, &a.id).cmp(&(&b.created_at, &b.id)));

        let json = serde_json::to_vec_pretty(&all)
            .map_err(|e| StoreError::Unavailable(format!("serialize error: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| StoreError::Unavailable(format!("write error: {}", e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("rename error: {}", e)))?;
        Ok(())
    }
}

fn not_initialized() -> StoreError {
    StoreError::Unavailable("fallback store not initialized".to_string())
}

#[async_trait]
impl SuggestionStore for FileStore {
    async fn init(&self) -> Result<(), StoreError> {
        let mut guard = self.records.write().await;
        if guard.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }

        let records = match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let all: Vec<Suggestion> = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::Unavailable(format!("corrupt fallback document: {}", e))
                })?;
                all.into_iter().map(|s| (s.id.clone(), s)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(StoreError::Unavailable(format!("read error: {}", e)));
            }
        };

        *guard = Some(records);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Suggestion>, StoreError> {
        let guard = self.records.read().await;
        let records = guard.as_ref().ok_or_else(not_initialized)?;
        let mut all: Vec<Suggestion> = records.values().cloned().collect();
        all.sort_by(|a, b| (&a.created_at, &a.id).cmp(&(&b.created_at, &b.id)));
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Option<Suggestion>, StoreError> {
        let guard = self.records.read().await;
        let records = guard.as_ref().ok_or_else(not_initialized)?;
        Ok(records.get(id).cloned())
    }

    async fn save(&self, record: &Suggestion) -> Result<(), StoreError> {
        let mut guard = self.records.write().await;
        let records = guard.as_mut().ok_or_else(not_initialized)?;
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict(format!(
                "Suggestion {} already exists",
                record.id
            )));
        }
        records.insert(record.id.clone(), record.clone());
        // The map must match the document; roll back if the write fails.
        if let Err(e) = self.persist(records).await {
            records.remove(&record.id);
            return Err(e);
        }
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        request: &UpdateSuggestionRequest,
    ) -> Result<Suggestion, StoreError> {
        let mut guard = self.records.write().await;
        let records = guard.as_mut().ok_or_else(not_initialized)?;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("Suggestion {} not found", id)))?;
        let previous = record.clone();
        record.apply_update(request, Utc::now());
        let updated = record.clone();
        if let Err(e) = self.persist(records).await {
            records.insert(id.to_string(), previous);
            return Err(e);
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut guard = self.records.write().await;
        let records = guard.as_mut().ok_or_else(not_initialized)?;
        // Idempotent: removing an absent id is a success.
        if let Some(previous) = records.remove(id) {
            if let Err(e) = self.persist(records).await {
                records.insert(id.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        let guard = self.records.read().await;
        let records = guard.as_ref().ok_or_else(not_initialized)?;
        Ok(StoreStats {
            total: records.len() as i64,
        })
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.records.write().await.take();
        Ok(())
    }
}
