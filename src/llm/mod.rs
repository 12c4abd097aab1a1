//! Chat-completion client.
//!
//! [`LlmClient`] hides the provider behind a message-list-in, text-out call.
//! [`groq::GroqClient`] talks to Groq's OpenAI-compatible endpoint.

pub mod groq;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request to LLM provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("LLM provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("LLM provider response could not be decoded: {0}")]
    Decode(String),
    #[error("LLM provider returned an empty completion")]
    EmptyResponse,
}

/// Sends a conversation to a model and returns the assistant's reply.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Model identifier recorded alongside every answer.
    fn model(&self) -> &str;
}

/// The two-message context sent for a single question.
pub fn build_messages(system_prompt: &str, question: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system_prompt), ChatMessage::user(question)]
}
