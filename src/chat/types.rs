//! Chat record definitions.
//!
//! [`ChatRecord`] is a stored question/answer exchange; [`NewChatRecord`] is
//! the same exchange before the store has assigned it an id.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A stored exchange, matching the `chat_history` table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// UUID v7 primary key, assigned on insert.
    pub id: String,
    /// The trimmed question as the user asked it.
    pub question: String,
    /// Model output, stored verbatim.
    pub response: String,
    /// Identifier of the model that produced `response`.
    pub model: String,
    /// When the exchange was recorded. Serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
}

/// An exchange waiting to be inserted.
#[derive(Debug, Clone)]
pub struct NewChatRecord {
    pub question: String,
    pub response: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

impl NewChatRecord {
    /// Stamp an exchange with the current time, truncated to the microsecond
    /// precision the store keeps.
    pub fn now(
        question: impl Into<String>,
        response: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
            model: model.into(),
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }

    pub(crate) fn into_record(self, id: String) -> ChatRecord {
        ChatRecord {
            id,
            question: self.question,
            response: self.response,
            model: self.model,
            timestamp: self.timestamp,
        }
    }
}

/// Fixed-width RFC 3339 (UTC, microseconds) so that string order in SQLite
/// matches chronological order.
pub fn timestamp_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
