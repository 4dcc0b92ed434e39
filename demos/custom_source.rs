//! Example: embedding Shipmate with a custom content source.
//!
//! Demonstrates building a small binary on top of `shipmate-core` with:
//! - An **`ItinerarySource`** that reads day-by-day itinerary entries from a
//!   JSON file instead of markdown pages
//! - A **listener** that reports every index rebuild
//! - An in-memory history store, so nothing is written to disk
//!
//! # Running
//!
//! ```bash
//! cat > /tmp/itinerary.json << 'EOF'
//! [
//!   { "day": 1, "title": "Embarkation in Galveston", "notes": "Boarding opens at 11am. Bring your passport." },
//!   { "day": 3, "title": "Cozumel", "notes": "Docked 8am to 5pm. All aboard at 4:30pm." },
//!   { "day": 4, "title": "Sea Day", "notes": "Spa specials and trivia in the atrium." }
//! ]
//! EOF
//!
//! cargo run --example custom_source -- /tmp/itinerary.json cozumel "all aboard"
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use shipmate_core::catalog::Catalog;
use shipmate_core::events::{FnListener, IndexEvent};
use shipmate_core::index::ContentSource;
use shipmate_core::models::{ContentBlock, EntryType};
use shipmate_core::store::memory::InMemoryKvStore;
use shipmate_core::{Engine, EngineParams};

/// Reads itinerary days from a JSON array.
struct ItinerarySource {
    file_path: PathBuf,
}

#[derive(Deserialize)]
struct ItineraryDay {
    day: u32,
    title: String,
    notes: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[async_trait]
impl ContentSource for ItinerarySource {
    fn name(&self) -> &str {
        "itinerary"
    }

    async fn extract(&self) -> Result<Vec<ContentBlock>> {
        let content = std::fs::read_to_string(&self.file_path).with_context(|| {
            format!("Failed to read itinerary: {}", self.file_path.display())
        })?;
        let days: Vec<ItineraryDay> = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse itinerary: {}", self.file_path.display())
        })?;

        Ok(days
            .into_iter()
            .map(|d| ContentBlock {
                id: format!("itinerary-day-{}", d.day),
                title: format!("Day {}: {}", d.day, d.title),
                raw_text: d.notes,
                section_id: "itinerary".to_string(),
                keyword_hints: d.keywords,
                critical: false,
                kind: Some(EntryType::Section),
            })
            .collect())
    }
}

#[derive(Parser)]
#[command(name = "custom-source", about = "Search an itinerary file with Shipmate")]
struct Cli {
    /// Path to the itinerary JSON file.
    itinerary: PathBuf,

    /// Queries to run, in order.
    queries: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let engine = Engine::new(
        Catalog::builtin()?,
        Arc::new(InMemoryKvStore::new()),
        EngineParams::default(),
    );
    engine.subscribe(Box::new(FnListener::new("report", |event| {
        let IndexEvent::Rebuilt {
            entries,
            content_entries,
            curated_entries,
        } = event;
        println!(
            "Index rebuilt: {} entries ({} itinerary, {} curated)",
            entries, content_entries, curated_entries
        );
        Ok(())
    })));

    let source = ItinerarySource {
        file_path: cli.itinerary,
    };
    engine.build_index(&source).await?;

    for query in &cli.queries {
        let response = engine.search(query);
        println!();
        println!("> {} ({} results)", query, response.count);
        for r in response.results.iter().take(5) {
            println!("  [{:>2}] {}", r.score, r.entry.title);
        }
        if !response.suggestions.is_empty() {
            println!("  try: {}", response.suggestions.join(", "));
        }
    }

    println!();
    println!("History: {}", engine.history().join(" | "));
    Ok(())
}
