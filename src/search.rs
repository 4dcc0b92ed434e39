//! `shipmate search`, `shipmate suggest`, and `shipmate highlight`.

use anyhow::Result;

use shipmate_core::models::{EntryType, SearchResponse};
use shipmate_core::{Engine, SearchOptions};

use crate::config::Config;
use crate::session::{open_engine, open_session};

pub async fn run_search(
    config: &Config,
    query: &str,
    kind: Option<EntryType>,
    limit: Option<usize>,
    explain: bool,
    json: bool,
) -> Result<()> {
    let engine = open_session(config).await?;
    let options = SearchOptions {
        limit,
        kind,
        explain,
        record_history: true,
    };
    let response = engine.search_with(query, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_response(&engine, &response);
    Ok(())
}

fn print_response(engine: &Engine, response: &SearchResponse) {
    if response.results.is_empty() {
        println!("No results.");
    }

    let query = response.query.trim();
    for (i, result) in response.results.iter().enumerate() {
        let entry = &result.entry;
        println!(
            "{}. [{}] {} / {}{}",
            i + 1,
            result.score,
            entry.kind,
            entry.title,
            if entry.critical { "  (critical)" } else { "" }
        );
        if !result.snippet.is_empty() {
            println!(
                "    excerpt: \"{}\"",
                engine.highlight(&result.snippet, query)
            );
        }
        if let Some(x) = &result.explain {
            println!(
                "    score: title {} + exact {} + content {} + keyword {} + priority {} + critical {} + recent {}",
                x.title, x.exact_title, x.content, x.keyword, x.priority, x.critical, x.recency
            );
        }
        println!("    id: {}", entry.id);
        println!();
    }

    if !response.suggestions.is_empty() {
        println!("Suggestions: {}", response.suggestions.join(" · "));
    }
}

/// Print suggestions without recording the query.
pub async fn run_suggest(config: &Config, query: &str) -> Result<()> {
    let engine = open_session(config).await?;
    for suggestion in engine.suggestions(query) {
        println!("{}", suggestion);
    }
    Ok(())
}

pub fn run_highlight(config: &Config, text: &str, query: &str) -> Result<()> {
    let engine = open_engine(config)?;
    println!("{}", engine.highlight(text, query));
    Ok(())
}
