use serde::Deserialize;

use super::error::ApiError;
use crate::chat::MAX_QUESTION_CHARS;

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Trim a question and check it is non-empty and within [`MAX_QUESTION_CHARS`].
pub fn validate_question(raw: &str) -> Result<&str, ApiError> {
    let question = raw.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("Question cannot be empty".into()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Question too long (max {MAX_QUESTION_CHARS} characters)"
        )));
    }
    Ok(question)
}

pub fn limit_error() -> ApiError {
    ApiError::BadRequest(format!("Limit must be between 1 and {MAX_HISTORY_LIMIT}"))
}

/// Resolve the history limit, defaulting when absent.
pub fn validate_limit(limit: Option<i64>) -> Result<usize, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(limit_error());
    }
    Ok(limit as usize)
}
