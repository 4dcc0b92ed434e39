//! The search engine object: owns the index snapshot, query history,
//! catalog, and listeners.
//!
//! One [`Engine`] is constructed at startup and shared by reference with
//! the UI layer. Its index is rebuilt wholesale by
//! [`build_index`](Engine::build_index) and replaced by swapping an `Arc`,
//! so readers always see either the old or the new index, never a partial
//! one.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use shipmate_core::catalog::Catalog;
//! use shipmate_core::engine::{Engine, EngineParams};
//! use shipmate_core::index::StaticSource;
//! use shipmate_core::store::memory::InMemoryKvStore;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let engine = Engine::new(
//!     Catalog::builtin()?,
//!     Arc::new(InMemoryKvStore::new()),
//!     EngineParams::default(),
//! );
//! engine.build_index(&StaticSource::default()).await?;
//! let response = engine.search("muster");
//! assert!(response.count > 0);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::Catalog;
use crate::events::{IndexEvent, IndexListener, ListenerRegistry};
use crate::highlight::{highlight_with, HighlightMarker};
use crate::history::{QueryHistory, DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_KEY};
use crate::index::{build_entries, ContentSource, DEFAULT_CONTENT_MAX_CHARS};
use crate::models::{EntryType, IndexEntry, SearchResponse};
use crate::search::{
    rank, suggest, RankParams, DEFAULT_MAX_RESULTS, DEFAULT_RECENCY_DAYS, DEFAULT_SNIPPET_CHARS,
};
use crate::store::KvStore;

/// Engine tuning, decoupled from any host configuration format.
#[derive(Debug, Clone)]
pub struct EngineParams {
    pub max_results: usize,
    pub content_max_chars: usize,
    pub recency_window: Duration,
    pub snippet_chars: usize,
    pub history_key: String,
    pub history_capacity: usize,
    pub marker: HighlightMarker,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            content_max_chars: DEFAULT_CONTENT_MAX_CHARS,
            recency_window: Duration::days(DEFAULT_RECENCY_DAYS),
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            marker: HighlightMarker::default(),
        }
    }
}

/// Per-call overrides for [`Engine::search_with`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Result cap; `None` uses [`EngineParams::max_results`].
    pub limit: Option<usize>,
    pub kind: Option<EntryType>,
    pub explain: bool,
    /// Add the query to history.
    pub record_history: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: None,
            kind: None,
            explain: false,
            record_history: true,
        }
    }
}

/// Result of a [`build_index`](Engine::build_index) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The new index is live.
    Built { entries: usize },
    /// Another build was in flight; nothing changed.
    Rejected,
}

/// Summary of the live index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub total: usize,
    pub by_kind: BTreeMap<EntryType, usize>,
    pub critical: usize,
    pub last_built: Option<DateTime<Utc>>,
}

pub struct Engine {
    catalog: Catalog,
    params: EngineParams,
    index: RwLock<Arc<Vec<IndexEntry>>>,
    last_built: RwLock<Option<DateTime<Utc>>>,
    building: AtomicBool,
    history: Mutex<QueryHistory>,
    listeners: RwLock<ListenerRegistry>,
}

/// Clears the in-progress flag however the build exits.
struct BuildGuard<'a>(&'a AtomicBool);

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Engine {
    /// Create an engine with an empty index. History is loaded from `store`
    /// immediately.
    pub fn new(catalog: Catalog, store: Arc<dyn KvStore>, params: EngineParams) -> Self {
        let history = QueryHistory::load(store, params.history_key.clone(), params.history_capacity);
        Self {
            catalog,
            params,
            index: RwLock::new(Arc::new(Vec::new())),
            last_built: RwLock::new(None),
            building: AtomicBool::new(false),
            history: Mutex::new(history),
            listeners: RwLock::new(ListenerRegistry::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Register a listener for index events.
    pub fn subscribe(&self, listener: Box<dyn IndexListener>) {
        self.listeners.write().register(listener);
    }

    pub fn is_building(&self) -> bool {
        self.building.load(Ordering::Acquire)
    }

    /// Rebuild the index from `source` plus the catalog.
    ///
    /// A call made while another build is in flight returns
    /// [`BuildOutcome::Rejected`] without touching anything. An extraction
    /// error is returned to the caller and the previous index stays live.
    pub async fn build_index(&self, source: &dyn ContentSource) -> Result<BuildOutcome> {
        if self
            .building
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(source = source.name(), "index build already in progress; request ignored");
            return Ok(BuildOutcome::Rejected);
        }
        let _guard = BuildGuard(&self.building);
        let started = Instant::now();

        let blocks = match source.extract().await {
            Ok(blocks) => blocks,
            Err(e) => {
                error!(source = source.name(), error = %e, "content extraction failed; keeping previous index");
                return Err(e.context(format!("Failed to extract content from '{}'", source.name())));
            }
        };

        let now = Utc::now();
        let entries = build_entries(&blocks, &self.catalog, self.params.content_max_chars, now);
        let total = entries.len();
        let curated = self.catalog.records.len();

        *self.index.write() = Arc::new(entries);
        *self.last_built.write() = Some(now);

        info!(
            source = source.name(),
            entries = total,
            content = total - curated,
            curated,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search index rebuilt"
        );

        // Listeners may subscribe others; notify outside the lock.
        let listeners = self.listeners.read().clone();
        listeners.notify(&IndexEvent::Rebuilt {
            entries: total,
            content_entries: total - curated,
            curated_entries: curated,
        });

        Ok(BuildOutcome::Built { entries: total })
    }

    /// Current index snapshot.
    pub fn entries(&self) -> Arc<Vec<IndexEntry>> {
        Arc::clone(&self.index.read())
    }

    pub fn get(&self, id: &str) -> Option<IndexEntry> {
        self.entries().iter().find(|e| e.id == id).cloned()
    }

    pub fn stats(&self) -> IndexStats {
        let entries = self.entries();
        let mut by_kind = BTreeMap::new();
        for e in entries.iter() {
            *by_kind.entry(e.kind).or_insert(0) += 1;
        }
        IndexStats {
            total: entries.len(),
            by_kind,
            critical: entries.iter().filter(|e| e.critical).count(),
            last_built: *self.last_built.read(),
        }
    }

    /// Search with default options, recording the query in history.
    pub fn search(&self, query: &str) -> SearchResponse {
        self.search_at(query, &SearchOptions::default(), Utc::now())
    }

    pub fn search_with(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        self.search_at(query, options, Utc::now())
    }

    /// Search against an explicit clock.
    ///
    /// Suggestions are computed from the history as it was before this
    /// query is recorded.
    pub fn search_at(
        &self,
        query: &str,
        options: &SearchOptions,
        now: DateTime<Utc>,
    ) -> SearchResponse {
        let started = Instant::now();
        let entries = self.entries();
        let trimmed = query.trim();

        if trimmed.is_empty() {
            return SearchResponse {
                query: query.to_string(),
                results: Vec::new(),
                count: 0,
                suggestions: suggest("", &entries, &[], &self.catalog),
                timestamp: now,
            };
        }

        let suggestions = {
            let history = self.history.lock();
            suggest(trimmed, &entries, history.entries(), &self.catalog)
        };

        if options.record_history {
            self.history.lock().add(trimmed);
        }

        let params = RankParams {
            max_results: options.limit.unwrap_or(self.params.max_results),
            recency_window: self.params.recency_window,
            snippet_chars: self.params.snippet_chars,
            kind: options.kind,
            explain: options.explain,
        };
        let results = rank(&entries, trimmed, &params, now);

        debug!(
            query = trimmed,
            results = results.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "search completed"
        );

        SearchResponse {
            query: query.to_string(),
            count: results.len(),
            results,
            suggestions,
            timestamp: now,
        }
    }

    /// Suggestions only; history is not touched.
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        let entries = self.entries();
        let history = self.history.lock();
        suggest(query, &entries, history.entries(), &self.catalog)
    }

    /// Most-recent-first copy of the query history.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().entries().to_vec()
    }

    pub fn add_to_history(&self, query: &str) {
        self.history.lock().add(query);
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// Escape `text` and highlight `query` with the configured marker.
    pub fn highlight(&self, text: &str, query: &str) -> String {
        highlight_with(text, query, &self.params.marker)
    }
}
