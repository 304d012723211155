use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use stellarview_site::{config, server};

/// Execute the start command
///
/// Loads configuration from `config_path` and runs the server until a
/// shutdown signal arrives. The same path is re-read on SIGHUP.
pub async fn execute(config_path: PathBuf) -> Result<()> {
    println!("{}", "Starting Stellar View site...".green());

    let cfg = config::load_config_from(&config_path)?;
    server::start_server(cfg, config_path).await?;

    Ok(())
}
