//! Workspace driver: directory discovery, per-day I/O and channel scheduling.
//!
//! An exported workspace is a directory with one sub-directory per channel
//! and one JSON file per day inside each channel, each file holding an array
//! of message records. This module walks that layout, runs the
//! [`Pipeline`](crate::pipeline::Pipeline) over every day file, and writes an
//! anonymized mirror of the input:
//!
//! ```text
//! output_dir/
//!   <channel>/<day>.json              transformed records, one file per input day
//!   <channel>/messages_not_processed.json
//!   hash_registry.json                merged token -> digest registry, written once
//! ```
//!
//! Channels are fully independent of each other, so scheduling is either a
//! simple sequential loop or a fixed-size worker pool over a shared channel
//! queue. Workers own their registries; the driver unions them at the end —
//! digests are deterministic per token and seed, so merge order is
//! immaterial.
//!
//! The output directory is cleared before a run starts, which makes re-runs
//! idempotent: a partially written previous output is never mixed into a new
//! one.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;
use tracing::info;

use crate::config::ScrubConfig;
use crate::dictionary::CategoryDictionary;
use crate::error::{Result, ScrubError};
use crate::pipeline::Pipeline;
use crate::pseudonym::HashRegistry;
use crate::record::MessageRecord;

/// File name for the per-channel collection of untouched records.
const NOT_PROCESSED_FILE: &str = "messages_not_processed.json";

/// File name for the persisted token registry.
const REGISTRY_FILE: &str = "hash_registry.json";

/// Options for one workspace run.
///
/// # Example
///
/// ```rust,no_run
/// use chatscrub::config::ScrubConfig;
/// use chatscrub::workspace::WorkspaceOptions;
///
/// let options = WorkspaceOptions::new("export/", "liwc.csv", ScrubConfig::new("s1"))
///     .with_parallel(true);
/// let summary = chatscrub::workspace::process_workspace(&options)?;
/// println!("{} tokens registered", summary.registry.len());
/// # Ok::<(), chatscrub::ScrubError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WorkspaceOptions {
    /// Directory holding one sub-directory per channel.
    pub channels_dir: PathBuf,

    /// Path to the category dictionary CSV.
    pub dictionary_path: PathBuf,

    /// Where the anonymized mirror is written. Defaults to a `scrub_output`
    /// directory next to `channels_dir`.
    pub output_dir: Option<PathBuf>,

    /// Process channels on a worker pool instead of sequentially.
    pub parallel: bool,

    /// Pipeline configuration; its channel tag is filled in per channel.
    pub config: ScrubConfig,
}

impl WorkspaceOptions {
    /// Creates options with the default output location and sequential
    /// scheduling.
    pub fn new(
        channels_dir: impl Into<PathBuf>,
        dictionary_path: impl Into<PathBuf>,
        config: ScrubConfig,
    ) -> Self {
        Self {
            channels_dir: channels_dir.into(),
            dictionary_path: dictionary_path.into(),
            output_dir: None,
            parallel: false,
            config,
        }
    }

    /// Sets an explicit output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Enables or disables the worker pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The effective output directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            self.channels_dir
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("scrub_output")
        })
    }
}

/// What processing one channel produced.
#[derive(Debug)]
pub struct ChannelOutcome {
    /// Channel name.
    pub channel: String,
    /// Token registry accumulated across the channel's days. Drained into
    /// the run-level union by [`process_workspace`].
    pub registry: HashRegistry,
    /// Number of day files processed.
    pub days: usize,
    /// Records transformed to their final shape.
    pub transformed: usize,
    /// Records passed through untouched.
    pub not_processed: usize,
}

/// Aggregated result of a whole run.
#[derive(Debug)]
pub struct RunSummary {
    /// Per-channel outcomes, ordered by channel name.
    pub channels: Vec<ChannelOutcome>,
    /// Union of all per-channel registries, as persisted.
    pub registry: HashRegistry,
    /// Where the anonymized mirror was written.
    pub output_dir: PathBuf,
}

impl RunSummary {
    /// Total records transformed across all channels.
    pub fn transformed(&self) -> usize {
        self.channels.iter().map(|c| c.transformed).sum()
    }

    /// Total records passed through untouched.
    pub fn not_processed(&self) -> usize {
        self.channels.iter().map(|c| c.not_processed).sum()
    }

    /// Total day files processed.
    pub fn days(&self) -> usize {
        self.channels.iter().map(|c| c.days).sum()
    }
}

/// Processes every channel of a workspace export.
///
/// Loads the dictionary once (fatal on failure, before any channel work),
/// prepares a fresh output directory, schedules channels sequentially or on
/// a worker pool, merges the per-channel registries and persists the union
/// as `hash_registry.json`.
pub fn process_workspace(options: &WorkspaceOptions) -> Result<RunSummary> {
    let channels = discover_channels(&options.channels_dir)?;
    let dictionary = Arc::new(CategoryDictionary::load(&options.dictionary_path)?);

    let output_dir = options.resolved_output_dir();
    prepare_output_dir(&output_dir)?;

    let mut outcomes = if options.parallel && channels.len() > 1 {
        process_channels_pooled(options, &dictionary, &channels, &output_dir)?
    } else {
        let mut outcomes = Vec::with_capacity(channels.len());
        for channel in &channels {
            outcomes.push(process_channel(options, &dictionary, channel, &output_dir)?);
        }
        outcomes
    };
    outcomes.sort_by(|a, b| a.channel.cmp(&b.channel));

    let mut registry = HashRegistry::new();
    for outcome in &mut outcomes {
        registry.merge(std::mem::take(&mut outcome.registry));
    }
    registry.save(output_dir.join(REGISTRY_FILE))?;

    Ok(RunSummary {
        channels: outcomes,
        registry,
        output_dir,
    })
}

/// Processes a single channel: every day file in order, plus the channel's
/// not-processed collection.
pub fn process_channel(
    options: &WorkspaceOptions,
    dictionary: &Arc<CategoryDictionary>,
    channel: &str,
    output_dir: &Path,
) -> Result<ChannelOutcome> {
    info!(channel, "processing channel");
    let pipeline = Pipeline::new(
        options.config.for_channel(channel),
        Arc::clone(dictionary),
    );

    let channel_dir = options.channels_dir.join(channel);
    let out_channel_dir = output_dir.join(channel);
    fs::create_dir_all(&out_channel_dir)?;

    let mut registry = HashRegistry::new();
    let mut all_not_processed: Vec<MessageRecord> = Vec::new();
    let mut transformed_count = 0;
    let mut days = 0;

    for day in day_files(&channel_dir)? {
        let records = read_day_file(&channel_dir.join(&day))?;
        let outcome = pipeline.process_day(records, &mut registry);

        transformed_count += outcome.transformed.len();
        all_not_processed.extend(outcome.not_processed);
        days += 1;

        write_pretty_json(&out_channel_dir.join(&day), &outcome.transformed)?;
    }

    let not_processed_count = all_not_processed.len();
    write_pretty_json(
        &out_channel_dir.join(NOT_PROCESSED_FILE),
        &all_not_processed,
    )?;

    Ok(ChannelOutcome {
        channel: channel.to_string(),
        registry,
        days,
        transformed: transformed_count,
        not_processed: not_processed_count,
    })
}

/// Runs channels on a fixed-size worker pool over a shared queue.
///
/// Pool size is the smaller of the channel count and the machine's available
/// parallelism. Results come back over an mpsc channel; a missing result
/// means a worker died and is reported as such.
fn process_channels_pooled(
    options: &WorkspaceOptions,
    dictionary: &Arc<CategoryDictionary>,
    channels: &[String],
    output_dir: &Path,
) -> Result<Vec<ChannelOutcome>> {
    let workers = thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
        .min(channels.len());

    let queue: Mutex<VecDeque<String>> = Mutex::new(channels.iter().cloned().collect());
    let (sender, receiver) = mpsc::channel::<Result<ChannelOutcome>>();

    let outcomes: Result<Vec<ChannelOutcome>> = thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let queue = &queue;
            let dictionary = Arc::clone(dictionary);
            scope.spawn(move || {
                loop {
                    let next = queue.lock().ok().and_then(|mut q| q.pop_front());
                    let Some(channel) = next else { break };
                    let result = process_channel(options, &dictionary, &channel, output_dir);
                    if sender.send(result).is_err() {
                        break;
                    }
                }
            });
        }
        drop(sender);

        let mut collected = Vec::with_capacity(channels.len());
        for result in receiver {
            collected.push(result?);
        }
        Ok(collected)
    });

    let outcomes = outcomes?;
    if outcomes.len() != channels.len() {
        let missing = channels
            .iter()
            .find(|c| !outcomes.iter().any(|o| &o.channel == *c))
            .cloned()
            .unwrap_or_default();
        return Err(ScrubError::worker_failed(missing));
    }
    Ok(outcomes)
}

/// Lists channel sub-directories, sorted by name.
pub fn discover_channels(channels_dir: &Path) -> Result<Vec<String>> {
    let mut channels = Vec::new();
    for entry in fs::read_dir(channels_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            channels.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    channels.sort();
    Ok(channels)
}

/// Lists a channel's day files (`*.json`), sorted by name.
fn day_files(channel_dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(channel_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && name.ends_with(".json") {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads one per-day file into records.
fn read_day_file(path: &Path) -> Result<Vec<MessageRecord>> {
    let file = File::open(path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    if !value.is_array() {
        return Err(ScrubError::not_a_message_array(path));
    }
    Ok(serde_json::from_value(value)?)
}

/// Clears and recreates the output directory.
fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

/// Writes a value as pretty-printed JSON.
fn write_pretty_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
    Ok(())
}
