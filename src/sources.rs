use anyhow::Result;
use shipmate_core::catalog::Catalog;

use crate::config::Config;

/// List the content root status and the curated records compiled into
/// the binary.
pub fn list_sources(config: &Config) -> Result<()> {
    let catalog = Catalog::builtin()?;

    let content_status = if config.content.root.exists() {
        "OK"
    } else {
        "MISSING"
    };
    println!("{:<16} {:<10} {}", "SOURCE", "STATUS", "LOCATION");
    println!(
        "{:<16} {:<10} {}",
        "markdown",
        content_status,
        config.content.root.display()
    );
    println!(
        "{:<16} {:<10} {} records",
        "catalog",
        "OK",
        catalog.records.len()
    );
    println!();

    println!("{:<32} {:<10} {:>3}  TITLE", "ID", "TYPE", "PRI");
    for r in &catalog.records {
        println!(
            "{:<32} {:<10} {:>3}{} {}",
            r.id,
            r.kind.as_str(),
            r.priority,
            if r.critical { "!" } else { " " },
            r.title
        );
    }
    Ok(())
}
