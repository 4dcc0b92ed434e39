//! Engine construction for one CLI session.
//!
//! Every command that needs the index goes through [`open_session`]: it
//! creates the [`Engine`] against the configured history store and runs a
//! single index build over the markdown content. When the content root is
//! unusable the session still starts with the curated catalog alone.

use std::sync::Arc;

use anyhow::Result;
use shipmate_core::catalog::Catalog;
use shipmate_core::index::StaticSource;
use shipmate_core::{BuildOutcome, Engine};

use crate::config::Config;
use crate::content_fs::MarkdownSource;
use crate::kv_file::JsonFileStore;

/// Create the engine without building the index.
pub fn open_engine(config: &Config) -> Result<Engine> {
    let catalog = Catalog::builtin()?;
    let store = Arc::new(JsonFileStore::new(&config.history.path));
    Ok(Engine::new(catalog, store, config.engine_params()))
}

/// Create the engine and build the index once.
pub async fn open_session(config: &Config) -> Result<Engine> {
    let engine = open_engine(config)?;
    let source = MarkdownSource::new(&config.content);

    if let Err(e) = engine.build_index(&source).await {
        eprintln!(
            "Warning: could not index {}: {:#}. Searching curated records only.",
            source.root().display(),
            e
        );
        if let BuildOutcome::Rejected = engine.build_index(&StaticSource::default()).await? {
            tracing::warn!("fallback index build was rejected");
        }
    }

    Ok(engine)
}
