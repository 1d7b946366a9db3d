use anyhow::Result;
use colored::Colorize;
use saas_pricing_calculator::{config, init_server_tracing, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// Loads configuration, initializes tracing from it and serves until a
/// shutdown signal arrives.
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting pricing calculator...".green());

    let cfg = config::load_config(config_path)?;
    init_server_tracing(&cfg.server.log_level, &cfg.server.log_format);

    info!(config = %config_path.display(), "Configuration loaded");

    // Blocks until shutdown
    server::start_server(cfg, config_path.to_path_buf()).await?;

    Ok(())
}
