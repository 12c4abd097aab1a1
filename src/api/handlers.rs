use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;

use super::error::ApiError;
use super::requests::{limit_error, validate_limit, validate_question, AskRequest, HistoryQuery};
use super::responses::{
    AskResponse, ClearHistoryResponse, HealthResponse, HistoryResponse, StatsResponse,
};
use super::AppState;
use crate::chat::{ChatStore, NewChatRecord, StorageError};
use crate::llm::build_messages;

/// Run a store operation on the blocking pool.
async fn with_store<T, F>(store: &Arc<dyn ChatStore>, op: F) -> anyhow::Result<T>
where
    F: FnOnce(&dyn ChatStore) -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .context("store task failed")??;
    Ok(result)
}

/// Liveness only. Touches neither the store nor the LLM provider.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Study Bot is running!",
        status: "healthy",
        timestamp: Utc::now(),
    })
}

pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(error = %e, "rejected ask body");
        ApiError::BadRequest(format!("Invalid request body: {}", e.body_text()))
    })?;
    let question = validate_question(&body.question)?.to_owned();

    tracing::info!(question_len = question.chars().count(), "ask called");

    let messages = build_messages(&state.system_prompt, &question);
    let answer = state.llm.complete(&messages).await.map_err(|e| {
        tracing::error!(error = %e, "LLM completion failed");
        ApiError::Internal("Error processing your question".into())
    })?;

    let record = NewChatRecord::now(question, answer.clone(), state.llm.model());
    let saved = with_store(&state.store, move |store| store.insert(record))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to store chat record");
            ApiError::Internal("Error processing your question".into())
        })?;

    tracing::info!(id = %saved.id, response_len = answer.len(), "exchange stored");

    Ok(Json(AskResponse {
        response: answer,
        success: true,
        timestamp: Utc::now(),
    }))
}

pub async fn history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!(error = %e, "rejected history query string");
        limit_error()
    })?;
    let limit = validate_limit(query.limit)?;

    let history = with_store(&state.store, move |store| Ok(store.find_recent(limit)))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to read chat history");
            ApiError::Internal("Error retrieving chat history".into())
        })?;

    Ok(Json(HistoryResponse {
        success: true,
        count: history.len(),
        history,
    }))
}

pub async fn clear_history(
    State(state): State<AppState>,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    let deleted = with_store(&state.store, |store| store.delete_all())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to clear chat history");
            ApiError::Internal("Error clearing chat history".into())
        })?;

    Ok(Json(ClearHistoryResponse {
        success: true,
        message: format!("Cleared {deleted} chat records"),
        timestamp: Utc::now(),
    }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let total = with_store(&state.store, |store| store.count())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to count chat records");
            ApiError::Internal("Error retrieving statistics".into())
        })?;

    Ok(Json(StatsResponse {
        success: true,
        total_conversations: total,
        timestamp: Utc::now(),
    }))
}
