//! Configuration types for the scrubbing pipeline.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use chatscrub::config::ScrubConfig;
//!
//! let config = ScrubConfig::new("s1")
//!     .with_channel("general")
//!     .with_verbose(true);
//! ```

use serde::{Deserialize, Serialize};

/// Metadata fields removed from every eligible record.
///
/// These mirror the fields a Slack-style export attaches to plain messages:
/// raw text, reactions, uploads, edit markers and the like.
pub const DEFAULT_GENERAL_PRUNE: &[&str] = &[
    "text",
    "reactions",
    "type",
    "user_team",
    "source_team",
    "user_profile",
    "attachments",
    "files",
    "upload",
    "display_as_bot",
    "edited",
    "thread_ts",
];

/// Additional fields removed from records that carry thread/reply metadata.
pub const DEFAULT_THREAD_PRUNE: &[&str] = &[
    "reply_count",
    "reply_users_count",
    "latest_reply",
    "is_locked",
    "subscribed",
    "last_read",
    "thread_ts",
    "reply_users",
];

/// Sub-fields removed from the rich-content block before flattening.
pub const DEFAULT_BLOCK_PRUNE: &[&str] = &["type", "block_id"];

/// Configuration for the per-message scrubbing pipeline.
///
/// Carries the field prune lists, the hashing seed, the channel tag and the
/// diagnostic flag. One `ScrubConfig` is shared (immutably) by every message
/// in a channel; the mutable state of a run lives in
/// [`HashRegistry`](crate::pseudonym::HashRegistry) instead.
///
/// # Example
///
/// ```rust
/// use chatscrub::config::ScrubConfig;
///
/// let config = ScrubConfig::new("seed-2021")
///     .with_channel("general")
///     .with_general_prune(vec!["text".into(), "reactions".into()]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Seed combined with every token before hashing.
    pub seed: String,

    /// Channel name stamped onto every transformed record.
    pub channel: String,

    /// General field names removed from every eligible record.
    pub general_prune: Vec<String>,

    /// Field names removed only from records with thread/reply metadata.
    pub thread_prune: Vec<String>,

    /// Sub-field names removed from the rich-content block.
    pub block_prune: Vec<String>,

    /// Emit field-absent diagnostics (default: false).
    pub verbose: bool,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            channel: String::new(),
            general_prune: DEFAULT_GENERAL_PRUNE.iter().map(ToString::to_string).collect(),
            thread_prune: DEFAULT_THREAD_PRUNE.iter().map(ToString::to_string).collect(),
            block_prune: DEFAULT_BLOCK_PRUNE.iter().map(ToString::to_string).collect(),
            verbose: false,
        }
    }
}

impl ScrubConfig {
    /// Creates a configuration with the given seed and default prune lists.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Self::default()
        }
    }

    /// Sets the channel tag.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Replaces the general prune list.
    #[must_use]
    pub fn with_general_prune(mut self, fields: Vec<String>) -> Self {
        self.general_prune = fields;
        self
    }

    /// Replaces the thread prune list.
    #[must_use]
    pub fn with_thread_prune(mut self, fields: Vec<String>) -> Self {
        self.thread_prune = fields;
        self
    }

    /// Replaces the block prune list.
    #[must_use]
    pub fn with_block_prune(mut self, fields: Vec<String>) -> Self {
        self.block_prune = fields;
        self
    }

    /// Enables or disables field-absent diagnostics.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns a copy of this configuration tagged for another channel.
    ///
    /// The workspace driver uses this to fan one run-level configuration out
    /// to per-channel workers.
    #[must_use]
    pub fn for_channel(&self, channel: impl Into<String>) -> Self {
        let mut config = self.clone();
        config.channel = channel.into();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_prune_lists() {
        let config = ScrubConfig::default();
        assert!(config.general_prune.iter().any(|f| f == "reactions"));
        assert!(config.thread_prune.iter().any(|f| f == "reply_count"));
        assert_eq!(config.block_prune, vec!["type", "block_id"]);
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_builder() {
        let config = ScrubConfig::new("s1")
            .with_channel("general")
            .with_verbose(true);

        assert_eq!(config.seed, "s1");
        assert_eq!(config.channel, "general");
        assert!(config.verbose);
    }

    #[test]
    fn test_config_custom_prune() {
        let config = ScrubConfig::new("s1").with_general_prune(vec!["text".into()]);
        assert_eq!(config.general_prune, vec!["text"]);
    }

    #[test]
    fn test_config_for_channel() {
        let config = ScrubConfig::new("s1").with_channel("general");
        let other = config.for_channel("random");
        assert_eq!(other.channel, "random");
        assert_eq!(other.seed, "s1");
        // the original is untouched
        assert_eq!(config.channel, "general");
    }
}
