#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use studybot::api::{build_router, cors_layer, AppState};
use studybot::chat::{ChatRecord, ChatStore, NewChatRecord, SqliteChatStore, StorageError};
use studybot::llm::{ChatMessage, LlmClient, LlmError};
use tower::ServiceExt;

pub const TEST_PROMPT: &str = "You are a test tutor.";

/// Fresh in-memory store with the schema applied.
pub fn test_store() -> Arc<SqliteChatStore> {
    let conn = studybot::db::open_database("sqlite::memory:", Duration::from_millis(5000)).unwrap();
    Arc::new(SqliteChatStore::new(conn))
}

/// LLM stand-in that either answers with a fixed reply or fails every call.
pub struct MockLlm {
    reply: Option<String>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl MockLlm {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(LlmError::Status {
                status: 503,
                body: "service unavailable".into(),
            }),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Store whose every operation fails, for exercising error paths.
pub struct FailingStore;

impl ChatStore for FailingStore {
    fn insert(&self, _record: NewChatRecord) -> Result<ChatRecord, StorageError> {
        Err(StorageError::LockPoisoned)
    }

    fn find_recent(&self, _limit: usize) -> Vec<ChatRecord> {
        Vec::new()
    }

    fn count(&self) -> Result<u64, StorageError> {
        Err(StorageError::LockPoisoned)
    }

    fn delete_all(&self) -> Result<u64, StorageError> {
        Err(StorageError::LockPoisoned)
    }
}

pub fn test_app(store: Arc<dyn ChatStore>, llm: Arc<dyn LlmClient>) -> Router {
    build_router(AppState::new(store, llm, TEST_PROMPT), cors_layer(None))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

pub fn ask_request(question: &str) -> Request<Body> {
    Request::post("/ask")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "question": question }).to_string(),
        ))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

/// Parse an RFC 3339 timestamp field, panicking with context if it is not one.
pub fn parse_timestamp(value: &serde_json::Value) -> chrono::DateTime<chrono::FixedOffset> {
    let raw = value.as_str().expect("timestamp should be a string");
    chrono::DateTime::parse_from_rfc3339(raw).expect("timestamp should be RFC 3339")
}
