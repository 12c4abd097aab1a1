//! CLI `history` command: print the most recent exchanges.

use anyhow::Result;

use crate::config::StudyBotConfig;

/// Print up to `limit` recent exchanges, newest first.
pub fn history(config: &StudyBotConfig, limit: usize) -> Result<()> {
    let store = super::open_store(config)?;
    let records = store.try_find_recent(limit)?;

    if records.is_empty() {
        println!("No conversations recorded.");
        return Ok(());
    }

    for (i, record) in records.iter().enumerate() {
        println!(
            "  {}. {} [{}] {}",
            i + 1,
            record.timestamp.to_rfc3339(),
            record.model,
            record.id
        );
        println!("     Q: {}", super::preview(&record.question, 120));
        println!("     A: {}", super::preview(&record.response, 120));
        println!();
    }

    Ok(())
}
