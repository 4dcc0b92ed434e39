//! Curated domain data: records, keyword vocabulary, popular searches,
//! and example phrases.
//!
//! The built-in catalog is a declarative JSON table compiled into the
//! binary and parsed once when the engine is constructed. Keeping it out
//! of the ranking code means the scorer never sees a domain literal.
//!
//! # Example
//!
//! ```rust
//! use shipmate_core::catalog::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! assert_eq!(catalog.popular_searches.len(), 8);
//! ```

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::IndexEntry;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Constant data consumed by the index builder and the suggestion engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    /// Terms matched against content to derive keywords.
    #[serde(default)]
    pub vocabulary: Vec<String>,
    /// Fixed suggestion list shown for blank or very short queries.
    #[serde(default)]
    pub popular_searches: Vec<String>,
    /// Natural-language phrases offered as suggestions when they match.
    #[serde(default)]
    pub example_phrases: Vec<String>,
    /// Records appended verbatim to every index build.
    #[serde(default)]
    pub records: Vec<IndexEntry>,
}

impl Catalog {
    /// Parse the catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG).context("Failed to load built-in catalog")
    }

    /// Parse and validate a catalog from JSON text.
    ///
    /// Vocabulary terms and record keywords are lowercased and trimmed.
    /// Fails on duplicate record ids or a priority outside `1..=5`.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalog: Catalog = serde_json::from_str(json).context("Invalid catalog JSON")?;
        catalog.normalize();
        catalog.validate()?;
        Ok(catalog)
    }

    fn normalize(&mut self) {
        self.vocabulary = self
            .vocabulary
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        for record in &mut self.records {
            record.keywords = record
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for record in &self.records {
            if record.id.trim().is_empty() {
                bail!("catalog record with title '{}' has an empty id", record.title);
            }
            if !seen.insert(record.id.as_str()) {
                bail!("duplicate catalog record id: '{}'", record.id);
            }
            if !(1..=5).contains(&record.priority) {
                bail!(
                    "catalog record '{}' has priority {} (must be 1..=5)",
                    record.id,
                    record.priority
                );
            }
        }
        Ok(())
    }
}
