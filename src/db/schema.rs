//! SQL DDL for the chat history store.
//!
//! One flat `chat_history` table plus an index on `timestamp`. The table DDL
//! must succeed; the index only speeds up `ORDER BY timestamp` and its
//! failure is logged and ignored.

use rusqlite::Connection;

const TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS chat_history (
    id TEXT PRIMARY KEY,
    question TEXT NOT NULL,
    response TEXT NOT NULL,
    model TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
"#;

const INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_chat_history_timestamp ON chat_history(timestamp);";

/// Initialize the schema. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(TABLE_SQL)?;

    match conn.execute_batch(INDEX_SQL) {
        Ok(()) => tracing::debug!("chat_history timestamp index ready"),
        Err(e) => tracing::warn!(error = %e, "could not create timestamp index, continuing without it"),
    }

    Ok(())
}
