//! # Shipmate Core
//!
//! WASM-safe search logic for the Shipmate trip companion: index builder,
//! ranking engine, query history, and HTML-safe highlighter.
//!
//! This crate contains no tokio, filesystem I/O, or other native-only
//! dependencies. Hosts supply content through [`index::ContentSource`]
//! and persistence through [`store::KvStore`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Index entries, content blocks, search responses |
//! | [`catalog`] | Curated records, vocabulary, popular searches |
//! | [`index`] | Content extraction trait and entry building |
//! | [`search`] | Scoring, ranking, and suggestions |
//! | [`history`] | Bounded recent-query list |
//! | [`highlight`] | Escaping, highlighting, snippets |
//! | [`events`] | Index rebuild listeners |
//! | [`store`] | Key-value persistence boundary |
//! | [`engine`] | The engine object tying it together |

pub mod catalog;
pub mod engine;
pub mod events;
pub mod highlight;
pub mod history;
pub mod index;
pub mod models;
pub mod search;
pub mod store;

pub use engine::{BuildOutcome, Engine, EngineParams, SearchOptions};
