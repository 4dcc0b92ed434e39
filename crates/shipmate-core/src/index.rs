//! Index builder: turns extracted content blocks plus curated records into
//! normalized [`IndexEntry`] values.
//!
//! # Algorithm
//!
//! For each [`ContentBlock`], in extractor order:
//!
//! 1. Id from the owning block, falling back to the section id and then a
//!    positional id. Collisions get a numeric suffix.
//! 2. Title from the nearest heading, falling back to the section id.
//! 3. Content whitespace-collapsed and truncated to `content_max_chars`.
//! 4. Keywords: declared hints ∪ vocabulary terms found in title or content.
//! 5. Priority from [`derive_priority`]; `critical` from the same terms or
//!    the block's explicit flag.
//!
//! Curated records are appended afterwards, unchanged.

use std::collections::{BTreeSet, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::models::{ContentBlock, EntryType, IndexEntry};

/// Default bound on indexed content length, in characters.
pub const DEFAULT_CONTENT_MAX_CHARS: usize = 1000;

const CRITICAL_TERMS: [&str; 3] = ["critical", "emergency", "safety"];
const OPERATIONS_TERMS: [&str; 2] = ["operations", "checklist"];
const SCHEDULE_TERMS: [&str; 2] = ["itinerary", "schedule"];

/// Supplies indexable content for each rebuild.
///
/// Implementations snapshot whatever the host currently renders (files,
/// DOM, fixtures) and return blocks in display order. Called exactly once
/// per [`Engine::build_index`](crate::engine::Engine::build_index).
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short label used in log output.
    fn name(&self) -> &str;

    async fn extract(&self) -> Result<Vec<ContentBlock>>;
}

/// Fixed list of blocks, mostly for tests and embedding hosts that
/// already hold their content in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    blocks: Vec<ContentBlock>,
}

impl StaticSource {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn extract(&self) -> Result<Vec<ContentBlock>> {
        Ok(self.blocks.clone())
    }
}

/// Priority heuristic over identifiers and content.
///
/// Returns 5 for critical/emergency/safety, 4 for operations/checklist,
/// 3 for itinerary/schedule, otherwise 2. Matching is by substring, so ids
/// that don't follow the naming convention fall through to the default.
pub fn derive_priority(haystacks: &[&str]) -> u8 {
    let lowered: Vec<String> = haystacks.iter().map(|h| h.to_lowercase()).collect();
    let any = |terms: &[&str]| {
        lowered
            .iter()
            .any(|h| terms.iter().any(|t| h.contains(t)))
    };
    if any(&CRITICAL_TERMS) {
        5
    } else if any(&OPERATIONS_TERMS) {
        4
    } else if any(&SCHEDULE_TERMS) {
        3
    } else {
        2
    }
}

/// Declared hints unioned with every vocabulary term found in `text`.
pub fn derive_keywords(hints: &[String], text: &str, vocabulary: &[String]) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let mut keywords: BTreeSet<String> = hints
        .iter()
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect();
    for term in vocabulary {
        if !term.is_empty() && lowered.contains(term.as_str()) {
            keywords.insert(term.clone());
        }
    }
    keywords
}

/// Collapse whitespace runs and cut to at most `max_chars` characters.
pub fn normalize_content(raw: &str, max_chars: usize) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

/// Build a complete entry list from a content snapshot and the catalog.
///
/// Content entries are stamped with `now`; ids are unique across the
/// whole list, curated ids included.
pub fn build_entries(
    blocks: &[ContentBlock],
    catalog: &Catalog,
    content_max_chars: usize,
    now: DateTime<Utc>,
) -> Vec<IndexEntry> {
    let mut seen: HashSet<String> = catalog.records.iter().map(|r| r.id.clone()).collect();
    let mut entries = Vec::with_capacity(blocks.len() + catalog.records.len());

    for (position, block) in blocks.iter().enumerate() {
        let base_id = [block.id.trim(), block.section_id.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("section-{}", position + 1));
        let id = unique_id(&base_id, &mut seen);

        let title = if block.title.trim().is_empty() {
            block.section_id.trim().to_string()
        } else {
            block.title.trim().to_string()
        };
        let content = normalize_content(&block.raw_text, content_max_chars);
        let keywords = derive_keywords(
            &block.keyword_hints,
            &format!("{} {}", title, content),
            &catalog.vocabulary,
        );
        let priority = derive_priority(&[&id, &block.section_id, &content]);
        let critical = block.critical || priority == 5;

        entries.push(IndexEntry {
            id,
            kind: block.kind.unwrap_or(EntryType::Section),
            title,
            content,
            keywords,
            priority,
            critical,
            timestamp: Some(now),
        });
    }

    entries.extend(catalog.records.iter().cloned());
    entries
}

fn unique_id(base: &str, seen: &mut HashSet<String>) -> String {
    if seen.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
