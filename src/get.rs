//! Index entry retrieval by ID.
//!
//! Used by `shipmate get <id>` to show everything the index holds for a
//! single entry, including derived keywords and priority.

use anyhow::{bail, Result};
use shipmate_core::models::IndexEntry;

use crate::config::Config;
use crate::session::open_session;

/// Build the index and look up one entry.
pub async fn get_entry(config: &Config, id: &str) -> Result<IndexEntry> {
    let engine = open_session(config).await?;
    match engine.get(id) {
        Some(entry) => Ok(entry),
        None => bail!("entry not found: {}", id),
    }
}

pub async fn run_get(config: &Config, id: &str, json: bool) -> Result<()> {
    let entry = get_entry(config, id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    println!("--- Entry ---");
    println!("id:        {}", entry.id);
    println!("type:      {}", entry.kind);
    println!("title:     {}", entry.title);
    println!("priority:  {}", entry.priority);
    println!("critical:  {}", entry.critical);
    println!(
        "indexed:   {}",
        entry
            .timestamp
            .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .unwrap_or_else(|| "curated".to_string())
    );
    println!(
        "keywords:  {}",
        entry.keywords.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    println!();
    println!("{}", entry.content);
    Ok(())
}
