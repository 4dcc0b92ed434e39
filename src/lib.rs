//! # Shipmate
//!
//! An offline trip companion's search: indexes voyage pages and curated
//! cruise records, ranks free-text queries, suggests completions, and
//! remembers recent searches.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌───────────────┐
//! │ content/*.md │──▶│  Index Builder   │◀──│ Curated       │
//! │ (sections)   │   │  (shipmate-core) │   │ catalog.json  │
//! └──────────────┘   └────────┬─────────┘   └───────────────┘
//!                             ▼
//!                    ┌──────────────────┐   ┌───────────────┐
//!                    │  Query Engine    │──▶│ History       │
//!                    │  rank + suggest  │   │ (JSON store)  │
//!                    └────────┬─────────┘   └───────────────┘
//!                             ▼
//!                      ┌─────────────┐
//!                      │  CLI        │
//!                      │ (shipmate)  │
//!                      └─────────────┘
//! ```
//!
//! The ranking logic lives in the `shipmate-core` crate, which has no
//! filesystem or runtime dependencies. This crate is the native host: it
//! reads configuration, extracts markdown content, persists history to a
//! JSON file, and drives everything from the command line.
//!
//! ## Quick Start
//!
//! ```bash
//! shipmate search "muster"           # ranked results + suggestions
//! shipmate suggest "exc"             # autocomplete only
//! shipmate history                   # recent searches
//! shipmate index --list              # what got indexed
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`content_fs`] | Markdown content extraction |
//! | [`kv_file`] | JSON-file key-value store |
//! | [`session`] | Engine construction and index build |
//! | [`search`] | Search, suggest, and highlight commands |
//! | [`get`] | Single entry lookup |
//! | [`stats`] | Index statistics |
//! | [`history_cmd`] | History listing and clearing |
//! | [`sources`] | Content and catalog overview |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod content_fs;
pub mod get;
pub mod history_cmd;
pub mod kv_file;
pub mod logging;
pub mod search;
pub mod session;
pub mod sources;
pub mod stats;
