//! Per-message transformation pipeline.
//!
//! [`Pipeline`] orchestrates the stages every eligible record moves through:
//!
//! ```text
//! Raw -> FieldsPruned -> ContentExtracted -> ContentPseudonymized -> Profiled -> Final
//! ```
//!
//! A record short-circuits from `FieldsPruned` to `Final` when it carries no
//! rich-content field after pruning. Ineligible records (no client message
//! id) and records whose content structure turns out to be malformed are
//! routed to a side collection untouched — one bad record never aborts a
//! channel.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::blocks::{combine, flatten};
use crate::config::ScrubConfig;
use crate::dictionary::CategoryDictionary;
use crate::error::{Result, ScrubError};
use crate::profile::profile;
use crate::pseudonym::{pseudonymize, HashRegistry};
use crate::record::MessageRecord;
use crate::text::Normalizer;

/// Output field carrying the anonymized content.
pub const HASHED_CONTENT_FIELD: &str = "hashed_content";

/// Output field carrying the category profile.
pub const CATEGORIES_FIELD: &str = "categories";

/// Output field carrying the channel tag.
pub const CHANNEL_FIELD: &str = "channel";

/// The per-message transformer for one channel.
///
/// Holds the immutable pieces every message shares — configuration,
/// dictionary, compiled normalizer. The mutable run state (the token→digest
/// registry) is passed into each call so the caller controls its scope and
/// merging.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use chatscrub::config::ScrubConfig;
/// use chatscrub::dictionary::CategoryDictionary;
/// use chatscrub::pipeline::Pipeline;
/// use chatscrub::pseudonym::HashRegistry;
///
/// let dictionary = Arc::new(CategoryDictionary::from_reader(
///     "posemo\nhappy\n".as_bytes(),
/// )?);
/// let pipeline = Pipeline::new(ScrubConfig::new("s1").with_channel("general"), dictionary);
///
/// let mut registry = HashRegistry::new();
/// let records = serde_json::from_str(r#"[{"client_msg_id": "a", "ts": "1609459200"}]"#)?;
/// let outcome = pipeline.process_day(records, &mut registry);
/// assert_eq!(outcome.transformed.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Pipeline {
    config: ScrubConfig,
    dictionary: Arc<CategoryDictionary>,
    normalizer: Normalizer,
}

/// What one per-day file produced.
#[derive(Debug, Default)]
pub struct DayOutcome {
    /// Records fully transformed to their final anonymized shape.
    pub transformed: Vec<MessageRecord>,
    /// Records passed through untouched: no client message id, or a
    /// malformed content structure caught at the message boundary.
    pub not_processed: Vec<MessageRecord>,
}

impl Pipeline {
    /// Creates a pipeline over a loaded dictionary.
    pub fn new(config: ScrubConfig, dictionary: Arc<CategoryDictionary>) -> Self {
        Self {
            config,
            dictionary,
            normalizer: Normalizer::new(),
        }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }

    /// Processes one day's records, splitting them into transformed and
    /// not-processed collections.
    ///
    /// Transformation failures are isolated per message: the original record
    /// is kept untouched in the not-processed collection and processing
    /// continues.
    pub fn process_day(
        &self,
        records: Vec<MessageRecord>,
        registry: &mut HashRegistry,
    ) -> DayOutcome {
        let mut outcome = DayOutcome::default();
        for record in records {
            if !record.is_eligible() {
                outcome.not_processed.push(record);
                continue;
            }
            // Work on a copy so a mid-pipeline failure leaves the original
            // intact for the not-processed collection.
            let mut working = record.clone();
            match self.transform_record(&mut working, registry) {
                Ok(()) => outcome.transformed.push(working),
                Err(err) => {
                    warn!(%err, "record routed to not-processed");
                    outcome.not_processed.push(record);
                }
            }
        }
        outcome
    }

    /// Runs one eligible record through all pipeline stages, in place.
    pub fn transform_record(
        &self,
        record: &mut MessageRecord,
        registry: &mut HashRegistry,
    ) -> Result<()> {
        record.insert(CHANNEL_FIELD, self.config.channel.clone().into());
        self.prune_fields(record);

        // Raw -> FieldsPruned done; without rich content the record is Final.
        let Some(content) = self.extract_content(record)? else {
            return Ok(());
        };

        let pseudonymized = pseudonymize(&content, registry, &self.config.seed);
        record.insert(HASHED_CONTENT_FIELD, pseudonymized.hashed.into());

        let categories = profile(pseudonymized.scrubbed.split_whitespace(), &self.dictionary);
        record.insert(CATEGORIES_FIELD, serde_json::to_value(categories)?);

        Ok(())
    }

    /// `Raw -> FieldsPruned`: removes configured general fields, thread-only
    /// fields when the record has reply metadata, and converts embedded
    /// epoch timestamps.
    fn prune_fields(&self, record: &mut MessageRecord) {
        let id = record.display_id();
        for field in &self.config.general_prune {
            if !record.remove_field(field) && self.config.verbose {
                debug!(%field, %id, "field not present");
            }
        }

        if record.has_thread_metadata() {
            if self.config.verbose {
                debug!(%id, "record contains responses (thread)");
            }
            for field in &self.config.thread_prune {
                if !record.remove_field(field) && self.config.verbose {
                    debug!(%field, %id, "field not present");
                }
            }
        }

        record.convert_timestamps();
    }

    /// `FieldsPruned -> ContentExtracted`: prunes block sub-fields, flattens
    /// the block tree and renders it to the message's full content.
    ///
    /// Returns `None` when the record has no rich-content field. Returns an
    /// error when the field exists but its shape cannot be interpreted.
    fn extract_content(&self, record: &mut MessageRecord) -> Result<Option<String>> {
        if !record.has_blocks() {
            return Ok(None);
        }
        let id = record.display_id();

        let blocks = record
            .get_mut("blocks")
            .and_then(serde_json::Value::as_array_mut)
            .ok_or_else(|| ScrubError::malformed_record(&id, "blocks is not an array"))?;
        let first = blocks
            .first_mut()
            .ok_or_else(|| ScrubError::malformed_record(&id, "blocks array is empty"))?
            .as_object_mut()
            .ok_or_else(|| ScrubError::malformed_record(&id, "block is not an object"))?;

        for field in &self.config.block_prune {
            if first.shift_remove(field).is_none() && self.config.verbose {
                debug!(%field, %id, "field not present under blocks");
            }
        }

        let elements = first
            .get("elements")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| ScrubError::malformed_record(&id, "block has no elements array"))?;

        let leaves = flatten(elements);
        let content = combine(&leaves, &self.normalizer);

        record.remove_field("blocks");
        Ok(Some(content))
    }
}
