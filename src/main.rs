//! Suggestions Backend
//!
//! REST backend for the visualization studio suggestion box: SQLite primary
//! store with single-shot failover to a JSON-file fallback.

mod api;
mod config;
mod errors;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use store::{FailoverStore, FileStore, SqliteStore, SuggestionStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FailoverStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Suggestions Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Fallback path: {:?}", config.fallback_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Construct both providers once and inject them; a primary that is down
    // at startup is non-fatal because every request re-attempts init.
    let primary: Arc<dyn SuggestionStore> = Arc::new(SqliteStore::new(&config.db_path));
    let fallback: Arc<dyn SuggestionStore> = Arc::new(FileStore::new(&config.fallback_path));

    if let Err(e) = primary.init().await {
        tracing::warn!("Primary store init failed, requests will fall back: {}", e);
    }
    if let Err(e) = fallback.init().await {
        tracing::warn!("Fallback store init failed: {}", e);
    }

    let failover = FailoverStore::new(primary, fallback, config.store_timeout);

    // Create application state
    let state = AppState {
        store: Arc::new(failover),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Suggestions
        .route("/suggestions", get(api::list_suggestions))
        .route("/suggestions", post(api::create_suggestion))
        .route("/suggestions/stats", get(api::get_stats))
        .route("/suggestions/{id}", get(api::get_suggestion))
        .route("/suggestions/{id}", put(api::update_suggestion))
        .route("/suggestions/{id}", delete(api::delete_suggestion))
        // Health check
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
