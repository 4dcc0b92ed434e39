//! Ranking and suggestion algorithms.
//!
//! Everything here is a pure function over an entry slice; the
//! [`Engine`](crate::engine::Engine) supplies the current index snapshot,
//! the history, and the clock.
//!
//! # Scoring
//!
//! For a normalized (trimmed, lowercased) query `q`:
//!
//! | Condition | Bonus |
//! |-----------|-------|
//! | title contains `q` | +10 |
//! | title equals `q` | +5 more |
//! | content contains `q` | +5 |
//! | any keyword contains `q` | +3 |
//! | entry priority | +1..=5 |
//! | entry is critical | +2 |
//! | timestamp within the recency window | +1 |
//!
//! The priority, critical, and recency bonuses only apply to entries that
//! matched on title, content, or keywords; an entry with no textual match
//! scores 0 and is dropped.
//!
//! # Ordering
//!
//! Score desc, then priority desc, then critical before non-critical, then
//! index order (the sort is stable). The list is truncated afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::catalog::Catalog;
use crate::highlight::make_snippet;
use crate::models::{EntryType, IndexEntry, ScoreExplanation, SearchResultItem};

/// Default result cap.
pub const DEFAULT_MAX_RESULTS: usize = 20;
/// Maximum number of suggestions returned.
pub const SUGGESTION_LIMIT: usize = 8;
/// Queries shorter than this (in characters) get the popular list.
pub const MIN_SUGGEST_CHARS: usize = 2;
/// Default snippet length in characters.
pub const DEFAULT_SNIPPET_CHARS: usize = 240;
/// Default width of the recency bonus window.
pub const DEFAULT_RECENCY_DAYS: i64 = 7;

const TITLE_BONUS: u32 = 10;
const EXACT_TITLE_BONUS: u32 = 5;
const CONTENT_BONUS: u32 = 5;
const KEYWORD_BONUS: u32 = 3;
const CRITICAL_BONUS: u32 = 2;
const RECENCY_BONUS: u32 = 1;

/// Tunables for a single ranking pass.
#[derive(Debug, Clone)]
pub struct RankParams {
    pub max_results: usize,
    pub recency_window: Duration,
    pub snippet_chars: usize,
    /// Only rank entries of this type.
    pub kind: Option<EntryType>,
    /// Attach a [`ScoreExplanation`] to each result.
    pub explain: bool,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            recency_window: Duration::days(DEFAULT_RECENCY_DAYS),
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            kind: None,
            explain: false,
        }
    }
}

/// Trim and lowercase a raw query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Score one entry against an already-normalized query.
pub fn score_entry(
    entry: &IndexEntry,
    query: &str,
    now: DateTime<Utc>,
    recency_window: Duration,
) -> ScoreExplanation {
    let mut s = ScoreExplanation::default();
    if query.is_empty() {
        return s;
    }

    let title = entry.title.trim().to_lowercase();
    if title.contains(query) {
        s.title = TITLE_BONUS;
        if title == query {
            s.exact_title = EXACT_TITLE_BONUS;
        }
    }
    if entry.content.to_lowercase().contains(query) {
        s.content = CONTENT_BONUS;
    }
    if entry.keywords.iter().any(|k| k.contains(query)) {
        s.keyword = KEYWORD_BONUS;
    }

    if s.total() == 0 {
        return s;
    }

    s.priority = u32::from(entry.priority);
    if entry.critical {
        s.critical = CRITICAL_BONUS;
    }
    if let Some(ts) = entry.timestamp {
        let age = now.signed_duration_since(ts);
        if age >= Duration::zero() && age <= recency_window {
            s.recency = RECENCY_BONUS;
        }
    }
    s
}

/// Score, filter, order, and cap `entries` for `query`.
pub fn rank(
    entries: &[IndexEntry],
    query: &str,
    params: &RankParams,
    now: DateTime<Utc>,
) -> Vec<SearchResultItem> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResultItem> = entries
        .iter()
        .filter(|e| params.kind.map_or(true, |k| e.kind == k))
        .filter_map(|entry| {
            let explanation = score_entry(entry, &normalized, now, params.recency_window);
            let score = explanation.total();
            if score == 0 {
                return None;
            }
            Some(SearchResultItem {
                snippet: make_snippet(&entry.content, &normalized, params.snippet_chars),
                entry: entry.clone(),
                score,
                explain: params.explain.then_some(explanation),
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.entry.priority.cmp(&a.entry.priority))
            .then(b.entry.critical.cmp(&a.entry.critical))
    });
    results.truncate(params.max_results);
    results
}

/// Autocomplete candidates for `query`.
///
/// Queries shorter than [`MIN_SUGGEST_CHARS`] get the catalog's popular
/// searches. Otherwise matches are gathered in a fixed order (entry
/// titles, entry keywords, history, example phrases), deduplicated, and
/// cut at [`SUGGESTION_LIMIT`].
pub fn suggest(
    query: &str,
    entries: &[IndexEntry],
    history: &[String],
    catalog: &Catalog,
) -> Vec<String> {
    let q = normalize_query(query);
    if q.chars().count() < MIN_SUGGEST_CHARS {
        return catalog
            .popular_searches
            .iter()
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect();
    }

    let titles = entries
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&q))
        .map(|e| e.title.as_str());
    let keywords = entries
        .iter()
        .flat_map(|e| e.keywords.iter())
        .filter(|k| k.contains(&q))
        .map(String::as_str);
    let past = history
        .iter()
        .filter(|h| h.to_lowercase().contains(&q))
        .map(String::as_str);
    let phrases = catalog
        .example_phrases
        .iter()
        .filter(|p| p.to_lowercase().contains(&q))
        .map(String::as_str);

    let mut seen = HashSet::new();
    titles
        .chain(keywords)
        .chain(past)
        .chain(phrases)
        .filter(|s| seen.insert(*s))
        .take(SUGGESTION_LIMIT)
        .map(str::to_string)
        .collect()
}
