//! Primary-to-fallback failover orchestration.
//!
//! Each logical operation is attempted once against the primary store (init
//! first, then the operation, both under one timeout budget) and, only when
//! the primary is unavailable, retried once against the fallback. Logical
//! outcomes such as NotFound or Conflict never trigger failover. There is no
//! backoff and no circuit breaker; a single fallback attempt per request.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::{StoreError, StoreSource, StoreStats, SuggestionStore};
use crate::errors::AppError;
use crate::models::{Suggestion, UpdateSuggestionRequest};

type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Failover-aware facade over the two store providers.
pub struct FailoverStore {
    primary: Arc<dyn SuggestionStore>,
    fallback: Arc<dyn SuggestionStore>,
    op_timeout: Duration,
}

impl FailoverStore {
    pub fn new(
        primary: Arc<dyn SuggestionStore>,
        fallback: Arc<dyn SuggestionStore>,
        op_timeout: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            op_timeout,
        }
    }

    /// Bound a single provider attempt; a hung store counts as unavailable.
    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "operation timed out after {:?}",
                self.op_timeout
            ))),
        }
    }

    /// Run one logical operation through the failover ladder.
    ///
    /// `init` is re-run before every primary attempt (idempotent by contract)
    /// so a primary that was down at process start can recover.
    async fn execute<'a, T>(
        &'a self,
        operation: &'static str,
        run: impl Fn(&'a dyn SuggestionStore) -> StoreFuture<'a, T>,
    ) -> Result<(T, StoreSource), AppError> {
        let primary = self.primary.as_ref();
        let primary_attempt = async {
            primary.init().await?;
            run(primary).await
        };

        let primary_msg = match self.with_timeout(primary_attempt).await {
            Ok(value) => return Ok((value, StoreSource::Primary)),
            Err(StoreError::NotFound(msg)) => return Err(AppError::NotFound(msg)),
            Err(StoreError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
            Err(StoreError::Unavailable(msg)) => msg,
        };

        tracing::warn!(
            operation,
            error = %primary_msg,
            "primary store unavailable, falling back"
        );

        let fallback = self.fallback.as_ref();
        let fallback_attempt = async {
            fallback.init().await?;
            run(fallback).await
        };

        match self.with_timeout(fallback_attempt).await {
            Ok(value) => Ok((value, StoreSource::Fallback)),
            Err(StoreError::NotFound(msg)) => Err(AppError::NotFound(msg)),
            Err(StoreError::Conflict(msg)) => Err(AppError::Conflict(msg)),
            Err(StoreError::Unavailable(fallback_msg)) => {
                tracing::error!(
                    operation,
                    primary = %primary_msg,
                    fallback = %fallback_msg,
                    "both stores unavailable"
                );
                Err(AppError::DualStoreFailure {
                    primary: primary_msg,
                    fallback: fallback_msg,
                })
            }
        }
    }

    pub async fn get_all(&self) -> Result<(Vec<Suggestion>, StoreSource), AppError> {
        self.execute("get_all", |s| s.get_all()).await
    }

    pub async fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> Result<(Option<Suggestion>, StoreSource), AppError> {
        self.execute("get", move |s| s.get(id)).await
    }

    pub async fn save<'a>(
        &'a self,
        record: &'a Suggestion,
    ) -> Result<((), StoreSource), AppError> {
        self.execute("save", move |s| s.save(record)).await
    }

    pub async fn update<'a>(
        &'a self,
        id: &'a str,
        request: &'a UpdateSuggestionRequest,
    ) -> Result<(Suggestion, StoreSource), AppError> {
        self.execute("update", move |s| s.update(id, request)).await
    }

    pub async fn delete<'a>(&'a self, id: &'a str) -> Result<((), StoreSource), AppError> {
        self.execute("delete", move |s| s.delete(id)).await
    }

    pub async fn get_stats(&self) -> Result<(StoreStats, StoreSource), AppError> {
        self.execute("get_stats", |s| s.get_stats()).await
    }
}
