//! # chatscrub CLI
//!
//! Command-line interface for the chatscrub library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatscrub::cli::Args;
use chatscrub::ScrubError;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ScrubError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    init_tracing(args.verbose);

    let options = args.to_options();

    // Print header
    println!("🧹 chatscrub v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Workspace:   {}", args.channels_dir);
    println!("📖 Dictionary:  {}", args.dictionary);
    println!("💾 Output:      {}", options.resolved_output_dir().display());
    if args.parallel {
        println!("⚙️  Mode:        Parallel");
    }
    println!();

    println!("⏳ Processing channels...");
    let summary = chatscrub::workspace::process_workspace(&options)?;

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! Output saved to {}", summary.output_dir.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Channels:       {}", summary.channels.len());
    println!("   Day files:      {}", summary.days());
    println!("   Anonymized:     {} messages", summary.transformed());
    println!("   Not processed:  {} messages", summary.not_processed());
    println!("   Registry:       {} tokens", summary.registry.len());

    // Performance stats
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let msgs_per_sec = summary.transformed() as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} messages/sec", msgs_per_sec);

    Ok(())
}

/// Routes library diagnostics to stderr.
///
/// `--verbose` raises the filter to debug; `RUST_LOG` still wins when set.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "chatscrub=debug"
    } else {
        "chatscrub=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
