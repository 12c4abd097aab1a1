use anyhow::Result;

use crate::chat::ChatStore;
use crate::config::StudyBotConfig;

/// Display chat history statistics in the terminal.
pub fn stats(config: &StudyBotConfig) -> Result<()> {
    let store = super::open_store(config)?;
    let total = store.count()?;
    let newest = store.try_find_recent(1)?.pop();

    println!("Study Bot Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total conversations: {total}");
    if let Some(record) = newest {
        println!("  Most recent:         {}", record.timestamp.to_rfc3339());
        println!("  Model:               {}", record.model);
    }

    Ok(())
}
