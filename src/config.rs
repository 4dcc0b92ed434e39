use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use shipmate_core::engine::EngineParams;
use shipmate_core::highlight::HighlightMarker;
use shipmate_core::history::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_KEY};
use shipmate_core::index::DEFAULT_CONTENT_MAX_CHARS;
use shipmate_core::search::{DEFAULT_MAX_RESULTS, DEFAULT_RECENCY_DAYS, DEFAULT_SNIPPET_CHARS};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./config/shipmate.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    #[serde(default = "default_content_root")]
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from("./content")
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_content_max_chars")]
    pub content_max_chars: usize,
    #[serde(default = "default_recency_days")]
    pub recency_days: i64,
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            content_max_chars: DEFAULT_CONTENT_MAX_CHARS,
            recency_days: DEFAULT_RECENCY_DAYS,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_content_max_chars() -> usize {
    DEFAULT_CONTENT_MAX_CHARS
}
fn default_recency_days() -> i64 {
    DEFAULT_RECENCY_DAYS
}
fn default_snippet_chars() -> usize {
    DEFAULT_SNIPPET_CHARS
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
    #[serde(default = "default_history_key")]
    pub key: String,
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            key: default_history_key(),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn default_history_path() -> PathBuf {
    PathBuf::from("./data/shipmate-store.json")
}
fn default_history_key() -> String {
    DEFAULT_HISTORY_KEY.to_string()
}
fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

#[derive(Debug, Deserialize, Clone)]
pub struct HighlightConfig {
    #[serde(default = "default_open_tag")]
    pub open_tag: String,
    #[serde(default = "default_close_tag")]
    pub close_tag: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            open_tag: default_open_tag(),
            close_tag: default_close_tag(),
        }
    }
}

fn default_open_tag() -> String {
    "<mark>".to_string()
}
fn default_close_tag() -> String {
    "</mark>".to_string()
}

impl Config {
    /// All defaults; used when no configuration file is present.
    pub fn minimal() -> Self {
        Self::default()
    }

    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            max_results: self.search.max_results,
            content_max_chars: self.search.content_max_chars,
            recency_window: Duration::days(self.search.recency_days),
            snippet_chars: self.search.snippet_chars,
            history_key: self.history.key.clone(),
            history_capacity: self.history.capacity,
            marker: HighlightMarker {
                open: self.highlight.open_tag.clone(),
                close: self.highlight.close_tag.clone(),
            },
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Load `explicit` if given (it must exist); otherwise the default path if
/// present; otherwise [`Config::minimal`].
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_config(default)
            } else {
                tracing::debug!("no config file at {}; using defaults", DEFAULT_CONFIG_PATH);
                Ok(Config::minimal())
            }
        }
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.search.max_results == 0 {
        anyhow::bail!("search.max_results must be >= 1");
    }

    if config.search.content_max_chars == 0 {
        anyhow::bail!("search.content_max_chars must be > 0");
    }

    if config.search.recency_days < 0 {
        anyhow::bail!("search.recency_days must be >= 0");
    }

    if config.history.capacity == 0 {
        anyhow::bail!("history.capacity must be >= 1");
    }

    if config.history.key.trim().is_empty() {
        anyhow::bail!("history.key must not be empty");
    }

    Ok(())
}
