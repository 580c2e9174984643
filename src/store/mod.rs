//! Storage backend abstraction for suggestions.
//!
//! Provides a common interface for the SQLite primary store and the JSON-file
//! fallback store, plus an in-memory implementation for tests. The API layer
//! depends only on this trait, so backends are substitutable.

mod failover;
mod file;
#[cfg(test)]
pub mod memory;
mod sqlite;

pub use failover::*;
pub use file::*;
pub use sqlite::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Suggestion, UpdateSuggestionRequest};

/// Storage-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The medium is unreachable, uninitialized, or corrupt. The only variant
    /// that triggers failover.
    Unavailable(String),
    /// A record with this id already exists.
    Conflict(String),
    /// No record with this id.
    NotFound(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Conflict(msg) => write!(f, "conflict: {}", msg),
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Aggregate store counts for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total: i64,
}

/// Which provider served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSource {
    Primary,
    Fallback,
}

impl StoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreSource::Primary => "primary",
            StoreSource::Fallback => "fallback",
        }
    }
}

/// Common contract for suggestion persistence backends.
///
/// Transport failures surface as `StoreError::Unavailable`; an absent id on
/// `get` is `Ok(None)`, never an error.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Open the connection or session. Safe to call repeatedly.
    async fn init(&self) -> Result<(), StoreError>;

    /// All suggestions, ordered by (createdAt, id).
    async fn get_all(&self) -> Result<Vec<Suggestion>, StoreError>;

    /// Fetch one suggestion by id.
    async fn get(&self, id: &str) -> Result<Option<Suggestion>, StoreError>;

    /// Insert a new suggestion. A duplicate id is rejected with `Conflict`.
    async fn save(&self, record: &Suggestion) -> Result<(), StoreError>;

    /// Merge partial fields into the stored record and bump lastModified.
    /// An absent id is `NotFound`.
    async fn update(
        &self,
        id: &str,
        request: &UpdateSuggestionRequest,
    ) -> Result<Suggestion, StoreError>;

    /// Remove a suggestion. Deleting an absent id succeeds (idempotent).
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Aggregate counts for diagnostics.
    async fn get_stats(&self) -> Result<StoreStats, StoreError>;

    /// Release the connection or session. Safe even if `init` never succeeded.
    async fn close(&self) -> Result<(), StoreError>;
}
