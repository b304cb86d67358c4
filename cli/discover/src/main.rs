//! pv-discover CLI
//!
//! Partition discovery over local and object-store directory trees.

use clap::Parser;
use pv_cli_common::{format_duration_ms, format_number, init_logging};

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr so stdout carries only partitions
    init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    eprintln!();
    eprintln!("Discovery completed:");
    eprintln!("  Partitions:       {}", format_number(stats.partitions_emitted));
    eprintln!("  Listing calls:    {}", format_number(stats.listing_calls));
    eprintln!("  Generated levels: {}", format_number(stats.generated_levels));
    eprintln!("  Pruned:           {}", format_number(stats.directories_pruned));
    eprintln!("  Rejected files:   {}", format_number(stats.files_rejected));

    if let Some(ms) = stats.duration_ms {
        eprintln!("  Duration:         {}", format_duration_ms(ms));
    }

    Ok(())
}
