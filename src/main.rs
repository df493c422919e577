//! panos-exporter - Prometheus exporter for PAN-OS devices
//!
//! This binary serves a Prometheus-compatible metrics endpoint that
//! queries the XML management API of the PAN-OS device named by the
//! `target` query parameter.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use panos_exporter::{config::Config, server};

/// panos-exporter CLI arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml", env = "PANOS_CONFIG")]
    config: String,

    /// Server port (overrides config file)
    #[arg(short, long, env = "PANOS_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "PANOS_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    panos_exporter::init_logging(&args.log_level)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting panos-exporter"
    );

    // Load configuration; the device inventory is mandatory
    let config = Config::load(&args.config)?;
    let port = args.port.unwrap_or(config.server.port);

    // Start server
    server::run(config, port).await?;

    Ok(())
}
