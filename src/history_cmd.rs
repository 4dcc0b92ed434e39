//! `shipmate history` and `shipmate history clear`.

use anyhow::Result;

use crate::config::Config;
use crate::session::open_engine;

pub fn run_history(config: &Config, json: bool) -> Result<()> {
    let engine = open_engine(config)?;
    let history = engine.history();

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }
    for (i, query) in history.iter().enumerate() {
        println!("{:>2}. {}", i + 1, query);
    }
    Ok(())
}

pub fn run_clear(config: &Config) -> Result<()> {
    let engine = open_engine(config)?;
    engine.clear_history();
    println!("Search history cleared.");
    Ok(())
}
