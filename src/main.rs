mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use rp_log_client::Service;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
        .context("Failed to initialize logger")?;

    // Parse command-line arguments
    let cli = config::Cli::parse();

    // Load configuration
    let config = config::load_config(&cli)?;
    info!("Configuration loaded successfully");

    let service = Service::with_config(config.service_config())
        .context("Failed to set up reporting service client")?;

    commands::execute_command(cli.command, &service.log_item()).await
}
