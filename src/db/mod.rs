pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parse a connection string.
    ///
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>`, `sqlite:<path>`
    /// and bare filesystem paths. A leading `~/` is expanded.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        anyhow::ensure!(!url.is_empty(), "database connection string is empty");

        if url == ":memory:" || url == "sqlite::memory:" {
            return Ok(Self::Memory);
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        anyhow::ensure!(!path.is_empty(), "database connection string has no path: {url}");

        Ok(Self::File(expand_tilde(path)))
    }
}

/// Open (or create) the chat history database, verify it answers, and
/// initialize the schema.
///
/// `connect_timeout` becomes the SQLite busy timeout, so a locked database
/// fails startup instead of hanging.
pub fn open_database(url: &str, connect_timeout: Duration) -> Result<Connection> {
    let location = DatabaseLocation::parse(url)?;

    let conn = match &location {
        DatabaseLocation::Memory => {
            Connection::open_in_memory().context("failed to open in-memory database")?
        }
        DatabaseLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            let conn = Connection::open(path)
                .with_context(|| format!("failed to open database at {}", path.display()))?;
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn
        }
    };

    conn.busy_timeout(connect_timeout)?;
    ping(&conn).context("database did not answer ping")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;

    match &location {
        DatabaseLocation::Memory => tracing::info!("in-memory database initialized"),
        DatabaseLocation::File(path) => {
            tracing::info!(path = %path.display(), "database initialized")
        }
    }
    Ok(conn)
}

/// Round-trip a trivial query.
pub fn ping(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

/// Open an in-memory database for testing.
#[cfg(test)]
pub fn open_memory_database() -> Result<Connection> {
    open_database("sqlite::memory:", Duration::from_millis(5000))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/").zip(dirs::home_dir()) {
        Some((rest, home)) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_memory_urls() {
        assert_eq!(DatabaseLocation::parse(":memory:").unwrap(), DatabaseLocation::Memory);
        assert_eq!(
            DatabaseLocation::parse("sqlite::memory:").unwrap(),
            DatabaseLocation::Memory
        );
    }

    #[test]
    fn parse_file_urls() {
        assert_eq!(
            DatabaseLocation::parse("sqlite:///var/lib/studybot.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("/var/lib/studybot.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:chats.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("chats.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("/tmp/chats.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("/tmp/chats.db"))
        );
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(DatabaseLocation::parse("").is_err());
        assert!(DatabaseLocation::parse("   ").is_err());
        assert!(DatabaseLocation::parse("sqlite://").is_err());
    }

    #[test]
    fn memory_database_is_usable() {
        let conn = open_memory_database().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM chat_history", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
