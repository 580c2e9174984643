//! Suggestion API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use chrono::Utc;

use super::{with_source, SuccessBody};
use crate::errors::AppError;
use crate::models::{CreateSuggestionRequest, UpdateSuggestionRequest};
use crate::AppState;

/// GET /suggestions - List all suggestions.
pub async fn list_suggestions(State(state): State<AppState>) -> Result<Response, AppError> {
    let (suggestions, source) = state.store.get_all().await?;
    Ok(with_source(suggestions, source))
}

/// POST /suggestions - Create a new suggestion.
///
/// The body is parsed exactly once; the parsed payload feeds both the primary
/// and the fallback attempt.
pub async fn create_suggestion(
    State(state): State<AppState>,
    payload: Result<Json<CreateSuggestionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Description is required".to_string(),
        ));
    }
    if request.author.trim().is_empty() {
        return Err(AppError::InvalidInput("Author is required".to_string()));
    }

    let record = request.into_record(Utc::now());
    let (_, source) = state.store.save(&record).await?;
    Ok(with_source(record, source))
}

/// GET /suggestions/:id - Get a single suggestion.
pub async fn get_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (suggestion, source) = state.store.get(&id).await?;
    match suggestion {
        Some(suggestion) => Ok(with_source(suggestion, source)),
        None => Err(AppError::NotFound("Suggestion not found".to_string())),
    }
}

/// PUT /suggestions/:id - Partially update a suggestion.
pub async fn update_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSuggestionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    if let Some(field) = request.negative_counter() {
        return Err(AppError::InvalidInput(format!(
            "{} must not be negative",
            field
        )));
    }

    let (_, source) = state.store.update(&id, &request).await?;
    Ok(with_source(SuccessBody::ok(), source))
}

/// DELETE /suggestions/:id - Delete a suggestion (idempotent).
pub async fn delete_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (_, source) = state.store.delete(&id).await?;
    Ok(with_source(SuccessBody::ok(), source))
}

/// GET /suggestions/stats - Aggregate store counts for diagnostics.
pub async fn get_stats(State(state): State<AppState>) -> Result<Response, AppError> {
    let (stats, source) = state.store.get_stats().await?;
    Ok(with_source(stats, source))
}
