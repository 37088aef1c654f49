//! # Chatscrub
//!
//! A Rust library for anonymizing exported chat-workspace message logs and
//! attaching a dictionary-based linguistic profile to every message.
//!
//! ## Overview
//!
//! Research on team communication needs conversation data without raw
//! identifying text. Chatscrub takes a workspace export (one directory per
//! channel, one JSON file per day) and, per message:
//!
//! - strips configured metadata fields,
//! - flattens the nested rich-content block structure into plain text,
//! - normalizes that text (contraction expansion, number/punctuation
//!   sentinels, repeat collapsing),
//! - replaces every linguistic token with a deterministic seeded digest,
//! - counts word-category matches against a LIWC-style dictionary.
//!
//! The token → digest registry is the only place raw tokens survive; the
//! anonymized corpus never contains them.
//!
//! ## Quick Start
//!
//! Process a whole export with the [`workspace`] driver:
//!
//! ```rust,no_run
//! use chatscrub::config::ScrubConfig;
//! use chatscrub::workspace::{process_workspace, WorkspaceOptions};
//!
//! fn main() -> chatscrub::Result<()> {
//!     let options = WorkspaceOptions::new(
//!         "slack_export/",
//!         "liwc2007dictionary.csv",
//!         ScrubConfig::new("seed-2021"),
//!     )
//!     .with_parallel(true);
//!
//!     let summary = process_workspace(&options)?;
//!     println!("{} messages anonymized", summary.transformed());
//!     Ok(())
//! }
//! ```
//!
//! ## Per-Message Pipeline
//!
//! The stages are public and independently usable:
//!
//! ```rust
//! use std::sync::Arc;
//! use chatscrub::config::ScrubConfig;
//! use chatscrub::dictionary::CategoryDictionary;
//! use chatscrub::pipeline::Pipeline;
//! use chatscrub::pseudonym::HashRegistry;
//!
//! # fn main() -> chatscrub::Result<()> {
//! let dictionary = Arc::new(CategoryDictionary::from_reader("posemo\nhappy\n".as_bytes())?);
//! let pipeline = Pipeline::new(ScrubConfig::new("s1").with_channel("general"), dictionary);
//!
//! let mut registry = HashRegistry::new();
//! let records = serde_json::from_str(
//!     r#"[{"client_msg_id": "a", "ts": "1609459200"}]"#,
//! )?;
//! let outcome = pipeline.process_day(records, &mut registry);
//! assert_eq!(outcome.transformed.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`workspace`] — **Workspace driver** (recommended entry point)
//!   - [`process_workspace`](workspace::process_workspace), [`WorkspaceOptions`](workspace::WorkspaceOptions)
//! - [`pipeline`] — Per-message transformation
//!   - [`Pipeline`](pipeline::Pipeline), [`DayOutcome`](pipeline::DayOutcome)
//! - [`record`] — [`MessageRecord`] over the export's loose JSON shape
//! - [`blocks`] — Rich-content block tree flattening and rendering
//! - [`text`] — [`Normalizer`](text::Normalizer) multi-stage text rewriting
//! - [`pseudonym`] — Seeded token hashing and the [`HashRegistry`](pseudonym::HashRegistry)
//! - [`profile`] — Dictionary category counting
//! - [`dictionary`] — [`CategoryDictionary`](dictionary::CategoryDictionary) loading and lookup
//! - [`config`] — [`ScrubConfig`](config::ScrubConfig) prune lists, seed, diagnostics
//! - [`cli`] — CLI types (feature `cli`)
//! - [`error`] — Unified error types ([`ScrubError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

pub mod blocks;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod pipeline;
pub mod profile;
pub mod pseudonym;
pub mod record;
pub mod text;
pub mod workspace;

// Re-export the main types at the crate root for convenience
pub use error::{Result, ScrubError};
pub use record::MessageRecord;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatscrub::prelude::*;
/// ```
pub mod prelude {
    // Core record type
    pub use crate::MessageRecord;

    // Error types
    pub use crate::error::{Result, ScrubError};

    // Configuration
    pub use crate::config::ScrubConfig;

    // Pipeline
    pub use crate::pipeline::{DayOutcome, Pipeline};

    // Dictionary and profiling
    pub use crate::dictionary::CategoryDictionary;
    pub use crate::profile::{profile, CategoryProfile};

    // Pseudonymization
    pub use crate::pseudonym::{pseudonymize, HashRegistry};

    // Text normalization
    pub use crate::text::Normalizer;

    // Workspace driver
    pub use crate::workspace::{process_workspace, RunSummary, WorkspaceOptions};
}
