//! # Shipmate CLI (`shipmate`)
//!
//! Command-line front end for the Shipmate search engine. Each invocation
//! is one session: the index is built once from the configured markdown
//! content plus the curated catalog, then the command runs against it.
//!
//! ## Usage
//!
//! ```bash
//! shipmate --config ./config/shipmate.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shipmate search "<query>"` | Ranked results and suggestions |
//! | `shipmate suggest "<query>"` | Autocomplete suggestions only |
//! | `shipmate history` | Recent searches, most recent first |
//! | `shipmate history clear` | Forget recent searches |
//! | `shipmate highlight "<text>" "<query>"` | Escaped, highlighted text |
//! | `shipmate index` | Build the index and print statistics |
//! | `shipmate get <id>` | Show one index entry |
//! | `shipmate sources` | Content root status and curated records |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shipmate::{config, get, history_cmd, logging, search, sources, stats};
use shipmate_core::models::EntryType;

/// Shipmate: offline search for your cruise companion.
///
/// Configuration is read from `--config`, or from `./config/shipmate.toml`
/// when present. Without either, built-in defaults apply.
#[derive(Parser)]
#[command(
    name = "shipmate",
    about = "Shipmate — offline search for voyage content and curated cruise records",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by `SHIPMATE_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search indexed content and curated records.
    ///
    /// The query is recorded in the search history.
    Search {
        /// The search query string.
        query: String,

        /// Only return entries of this type (section, feature, port,
        /// excursion, activity, safety, tool, service).
        #[arg(long)]
        kind: Option<EntryType>,

        /// Maximum number of results to return (at least 1).
        #[arg(long, value_parser = parse_limit)]
        limit: Option<usize>,

        /// Show the per-bonus score breakdown.
        #[arg(long)]
        explain: bool,

        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print autocomplete suggestions without recording the query.
    Suggest {
        /// Partial query.
        query: String,
    },

    /// Show or clear recent searches.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,

        /// Print the history as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// HTML-escape text and highlight every occurrence of a query.
    Highlight {
        text: String,
        query: String,
    },

    /// Build the index and print statistics.
    Index {
        /// Also list every entry.
        #[arg(long)]
        list: bool,

        /// Print statistics and entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a single index entry by id.
    Get {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Show the content root status and the curated catalog.
    #[command(alias = "catalog")]
    Sources,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Remove all recent searches.
    Clear,
}

/// Parse a result limit, rejecting zero like `search.max_results` does.
fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid limit '{}': {}", s, e)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let cfg = config::resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            query,
            kind,
            limit,
            explain,
            json,
        } => {
            search::run_search(&cfg, &query, kind, limit, explain, json).await?;
        }
        Commands::Suggest { query } => {
            search::run_suggest(&cfg, &query).await?;
        }
        Commands::History { action, json } => match action {
            Some(HistoryAction::Clear) => history_cmd::run_clear(&cfg)?,
            None => history_cmd::run_history(&cfg, json)?,
        },
        Commands::Highlight { text, query } => {
            search::run_highlight(&cfg, &text, &query)?;
        }
        Commands::Index { list, json } => {
            stats::run_stats(&cfg, list, json).await?;
        }
        Commands::Get { id, json } => {
            get::run_get(&cfg, &id, json).await?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
    }

    Ok(())
}
