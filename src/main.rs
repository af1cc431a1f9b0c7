use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use safarai::{SafarAiConfig, TravelPipeline, logging, web};

/// AI-assisted flight, hotel and itinerary planning service
#[derive(Parser, Debug)]
#[command(name = "safarai", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match SafarAiConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::from(1);
        }
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Err(e) = logging::init(&config.logging, cli.verbose) {
        eprintln!("{e}");
        return ExitCode::from(1);
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn serve(config: SafarAiConfig) -> anyhow::Result<()> {
    let pipeline =
        TravelPipeline::from_config(&config).context("Failed to initialize travel pipeline")?;
    info!("SafarAI {} starting", safarai::VERSION);
    web::run(&config.server, Arc::new(pipeline)).await
}
