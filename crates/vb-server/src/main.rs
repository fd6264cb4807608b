//! vectorbridge server binary
//!
//! Hybrid AI-provider routing and vector-ingestion engine: embeds
//! business records through a cost-aware provider pool, keeps the vector
//! index and the bridge ledger consistent, and serves low-latency
//! semantic queries.

// Force-link vb-providers so linkme registrations are included
extern crate vb_providers;

use clap::Parser;

/// Command line interface for the vectorbridge server
#[derive(Parser, Debug)]
#[command(name = "vectorbridge")]
#[command(about = "AI-provider routing and vector-ingestion engine")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    vb_server::run(cli.config.as_deref()).await?;
    Ok(())
}
