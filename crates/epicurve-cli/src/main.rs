//! epicurve binary entry point

use anyhow::{anyhow, Result};
use clap::Parser;
use epicurve_cli::{logging_config, resolve_config, run, Cli};
use epicurve_common::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(logging_config(&config))
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
    info!("Starting epicurve v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli, config).await {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}
