use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::info;

use terradoc::Settings;
use terradoc::application::orchestrator;
use terradoc::infrastructure::telemetry::{self, NoiseFilter};

#[derive(Parser, Debug)]
#[command(
    name = "terradoc",
    version,
    about = "Generates Terraform module documentation through MCP tool servers"
)]
struct Cli {
    /// Settings file path (defaults to ./settings.json)
    #[arg(long)]
    settings: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.settings.as_deref().map(Path::new))?;

    let noise = NoiseFilter::new();
    telemetry::init(settings.verbose_logging, noise.clone());
    info!(servers = settings.servers.len(), "Starting terradoc");

    orchestrator::run(settings, noise).await?;
    info!("Run finished");
    Ok(())
}
