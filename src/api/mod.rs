//! HTTP surface: health check, `/ask`, `/history`, `/clear-history`, `/stats`.

pub mod error;
pub mod handlers;
pub mod requests;
pub mod responses;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::ChatStore;
use crate::llm::LlmClient;

pub use error::ApiError;

/// Process-wide handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChatStore>,
    pub llm: Arc<dyn LlmClient>,
    pub system_prompt: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ChatStore>,
        llm: Arc<dyn LlmClient>,
        system_prompt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            llm,
            system_prompt: system_prompt.into(),
        }
    }
}

/// Build the CORS layer from a comma-separated origin list.
///
/// `None`, an empty list, or a `*` entry allows any origin. Entries that are not
/// valid header values are dropped with a warning; if none survive, no origin is
/// allowed rather than every origin.
pub fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);

    let entries: Vec<&str> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if entries.is_empty() || entries.contains(&"*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = entries
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        tracing::warn!("no valid CORS origin configured, cross-origin requests will be refused");
    }
    cors.allow_origin(origins)
}

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/ask", post(handlers::ask))
        .route("/history", get(handlers::history))
        .route("/clear-history", delete(handlers::clear_history))
        .route("/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
