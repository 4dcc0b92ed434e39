//! Index statistics and entry listing.
//!
//! Gives a quick summary of what one build produced: entry counts by type,
//! how many entries are critical, and where the content came from. Used by
//! `shipmate index` to confirm that pages are being picked up.

use anyhow::Result;
use serde::Serialize;
use shipmate_core::engine::IndexStats;
use shipmate_core::models::IndexEntry;

use crate::config::Config;
use crate::session::open_session;

#[derive(Serialize)]
struct IndexReport<'a> {
    stats: IndexStats,
    entries: &'a [IndexEntry],
}

/// Run the index command: build once and print a summary.
pub async fn run_stats(config: &Config, list: bool, json: bool) -> Result<()> {
    let engine = open_session(config).await?;
    let stats = engine.stats();
    let entries = engine.entries();

    if json {
        let report = IndexReport {
            stats,
            entries: entries.as_slice(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Shipmate — Index Stats");
    println!("======================");
    println!();
    println!("  Content:     {}", config.content.root.display());
    println!(
        "  Built:       {}",
        stats
            .last_built
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string())
    );
    println!();
    println!("  Entries:     {}", stats.total);
    println!("  Critical:    {}", stats.critical);

    if !stats.by_kind.is_empty() {
        println!();
        println!("  By type:");
        println!("  {:<12} {:>6}", "TYPE", "COUNT");
        println!("  {}", "-".repeat(19));
        for (kind, count) in &stats.by_kind {
            println!("  {:<12} {:>6}", kind.as_str(), count);
        }
    }

    if list {
        println!();
        println!("  {:<36} {:<10} {:>3}  TITLE", "ID", "TYPE", "PRI");
        println!("  {}", "-".repeat(76));
        for e in entries.iter() {
            println!(
                "  {:<36} {:<10} {:>3}{} {}",
                truncate(&e.id, 36),
                e.kind.as_str(),
                e.priority,
                if e.critical { "!" } else { " " },
                e.title
            );
        }
    }

    println!();
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
