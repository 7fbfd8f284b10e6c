//! fetch-hashes CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fetch_hashes::registry;
use fetch_hashes::resolve::SourceType;
use fetch_hashes::run::{self, RunOptions};

/// Compute encoded artifact hashes for pinning a tool release.
#[derive(Parser, Debug)]
#[command(name = "fetch-hashes")]
#[command(author, about = "Compute encoded artifact hashes for pinning a tool release")]
struct Cli {
    /// Tool identifier
    #[arg(long)]
    tool: String,

    /// Release version
    #[arg(long)]
    version: String,

    /// Source type: "github" for release downloads / git prefetch,
    /// anything else for the maven-style registry
    #[arg(long = "type")]
    source_type: Option<String>,

    /// Registry branch (maven-style path only)
    #[arg(long)]
    branch: Option<String>,

    /// Base URL of the registry storage API
    #[arg(
        long,
        env = "FETCH_HASHES_REGISTRY_URL",
        default_value = registry::DEFAULT_BASE_URL
    )]
    registry_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let opts = RunOptions {
        tool: cli.tool,
        branch: cli.branch,
        version: cli.version,
        source_type: SourceType::parse(cli.source_type.as_deref()),
        registry_url: cli.registry_url,
    };

    let block = run::fetch_hashes(&opts).await?;
    println!("{block}");

    Ok(())
}
