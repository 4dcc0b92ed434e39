//! Core data models used throughout Shipmate.
//!
//! These types represent the content blocks, index entries, and search
//! responses that flow through the indexing and query pipeline.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Section,
    Feature,
    Port,
    Excursion,
    Activity,
    Safety,
    Tool,
    Service,
}

impl EntryType {
    pub const ALL: [EntryType; 8] = [
        EntryType::Section,
        EntryType::Feature,
        EntryType::Port,
        EntryType::Excursion,
        EntryType::Activity,
        EntryType::Safety,
        EntryType::Tool,
        EntryType::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Section => "section",
            EntryType::Feature => "feature",
            EntryType::Port => "port",
            EntryType::Excursion => "excursion",
            EntryType::Activity => "activity",
            EntryType::Safety => "safety",
            EntryType::Tool => "tool",
            EntryType::Service => "service",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim().to_lowercase();
        EntryType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown entry type: '{}'. Use one of: section, feature, port, excursion, activity, safety, tool, service.",
                    s
                )
            })
    }
}

/// Raw block produced by a content extractor before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Identifier of the owning block. May be empty, in which case the
    /// section id (or a positional id) is used.
    pub id: String,
    /// Text of the nearest heading.
    pub title: String,
    pub raw_text: String,
    pub section_id: String,
    #[serde(default)]
    pub keyword_hints: Vec<String>,
    /// Explicit critical flag declared by the content.
    #[serde(default)]
    pub critical: bool,
    /// Declared entry type; content defaults to [`EntryType::Section`].
    #[serde(default)]
    pub kind: Option<EntryType>,
}

/// One indexed unit of content or curated knowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    pub priority: u8,
    #[serde(default)]
    pub critical: bool,
    /// Creation instant; curated records carry none.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Per-bonus breakdown of a result's score. Components sum to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreExplanation {
    pub title: u32,
    pub exact_title: u32,
    pub content: u32,
    pub keyword: u32,
    pub priority: u32,
    pub critical: u32,
    pub recency: u32,
}

impl ScoreExplanation {
    pub fn total(&self) -> u32 {
        self.title
            + self.exact_title
            + self.content
            + self.keyword
            + self.priority
            + self.critical
            + self.recency
    }
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub entry: IndexEntry,
    pub score: u32,
    /// Plain-text excerpt around the first match.
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ScoreExplanation>,
}

/// Response returned by [`Engine::search`](crate::engine::Engine::search).
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    pub count: usize,
    pub suggestions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
