//! Command-line interface definition using clap.
//!
//! This module defines [`Args`], the CLI argument structure for the
//! `chatscrub` binary. The library itself never parses arguments; the
//! binary converts [`Args`] into a
//! [`WorkspaceOptions`](crate::workspace::WorkspaceOptions) and hands off.

use clap::Parser;

use crate::config::ScrubConfig;
use crate::workspace::WorkspaceOptions;

/// Anonymize an exported chat workspace and profile its language.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatscrub")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatscrub ./export liwc2007dictionary.csv --seed s1
    chatscrub ./export liwc.csv -s s1 --parallel
    chatscrub ./export liwc.csv -s s1 -o anonymized/ --verbose")]
pub struct Args {
    /// Path to the exported workspace (one sub-directory per channel)
    pub channels_dir: String,

    /// Path to the category dictionary CSV
    pub dictionary: String,

    /// Seed combined with every token before hashing
    #[arg(short, long, value_name = "SEED")]
    pub seed: String,

    /// Output directory (default: scrub_output next to the workspace)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<String>,

    /// Process channels on a worker pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Print per-field diagnostics while processing
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the workspace options this invocation describes.
    pub fn to_options(&self) -> WorkspaceOptions {
        let config = ScrubConfig::new(&self.seed).with_verbose(self.verbose);
        let mut options =
            WorkspaceOptions::new(&self.channels_dir, &self.dictionary, config)
                .with_parallel(self.parallel);
        if let Some(ref output) = self.output {
            options = options.with_output_dir(output);
        }
        options
    }
}
