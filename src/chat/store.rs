//! Persistence gateway for chat records.
//!
//! [`ChatStore`] is the seam the HTTP layer talks to. [`SqliteChatStore`] is
//! the production implementation: one connection behind a mutex, shared by
//! every request.

use rusqlite::{params, Connection};
use std::sync::{Mutex, MutexGuard};

use crate::chat::types::{timestamp_to_sql, ChatRecord, NewChatRecord};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("database lock poisoned")]
    LockPoisoned,
}

/// Storage and retrieval of chat records.
///
/// All methods are synchronous. Callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait ChatStore: Send + Sync {
    /// Append a record under a freshly assigned id and return it.
    fn insert(&self, record: NewChatRecord) -> Result<ChatRecord, StorageError>;

    /// Up to `limit` records, most recent first.
    ///
    /// Read failures degrade to an empty list.
    fn find_recent(&self, limit: usize) -> Vec<ChatRecord>;

    fn count(&self) -> Result<u64, StorageError>;

    /// Remove every record, returning how many were removed.
    fn delete_all(&self) -> Result<u64, StorageError>;
}

pub struct SqliteChatStore {
    conn: Mutex<Connection>,
}

impl SqliteChatStore {
    /// Wrap a connection whose schema is already initialized (see [`crate::db::open_database`]).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Like [`ChatStore::find_recent`] but reports read failures.
    pub fn try_find_recent(&self, limit: usize) -> Result<Vec<ChatRecord>, StorageError> {
        let conn = self.lock()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(
            "SELECT id, question, response, model, timestamp FROM chat_history \
             ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
        )?;
        let records = stmt
            .query_map(params![limit], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl ChatStore for SqliteChatStore {
    fn insert(&self, record: NewChatRecord) -> Result<ChatRecord, StorageError> {
        let id = uuid::Uuid::now_v7().to_string();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO chat_history (id, question, response, model, timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                record.question,
                record.response,
                record.model,
                timestamp_to_sql(&record.timestamp),
            ],
        )?;
        tracing::debug!(id = %id, "chat record inserted");
        Ok(record.into_record(id))
    }

    fn find_recent(&self, limit: usize) -> Vec<ChatRecord> {
        match self.try_find_recent(limit) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, limit, "failed to read chat history, returning empty list");
                Vec::new()
            }
        }
    }

    fn count(&self) -> Result<u64, StorageError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chat_history", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn delete_all(&self) -> Result<u64, StorageError> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM chat_history", [])?;
        tracing::info!(deleted, "chat history cleared");
        Ok(deleted as u64)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatRecord> {
    let raw_ts: String = row.get(4)?;
    let timestamp = chrono::DateTime::parse_from_rfc3339(&raw_ts)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&chrono::Utc);

    Ok(ChatRecord {
        id: row.get(0)?,
        question: row.get(1)?,
        response: row.get(2)?,
        model: row.get(3)?,
        timestamp,
    })
}
