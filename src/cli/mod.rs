pub mod history;
pub mod reset;
pub mod stats;

use anyhow::Result;
use std::time::Duration;

use crate::chat::SqliteChatStore;
use crate::config::StudyBotConfig;

/// Open the configured database for a one-shot command.
fn open_store(config: &StudyBotConfig) -> Result<SqliteChatStore> {
    config.validate()?;
    let conn = crate::db::open_database(
        &config.storage.database_url,
        Duration::from_millis(config.storage.connect_timeout_ms),
    )?;
    Ok(SqliteChatStore::new(conn))
}

/// Shorten `text` to at most `max_chars` characters, marking the cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
