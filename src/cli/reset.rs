//! CLI `reset` command: delete all chat history after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use crate::chat::ChatStore;
use crate::config::StudyBotConfig;

/// Delete every stored exchange after user confirmation.
pub fn reset(config: &StudyBotConfig) -> Result<()> {
    println!("WARNING: This will permanently delete ALL chat history.");
    println!("Database: {}", config.storage.database_url);
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let store = super::open_store(config)?;
    let deleted = store.delete_all()?;

    println!("Cleared {deleted} chat records.");
    Ok(())
}
