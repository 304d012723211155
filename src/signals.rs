use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::config::Config;
use crate::logging::mask_phone;

/// Setup signal handlers for the server
///
/// The returned sender fires once when the server should drain and stop.
///
/// Handles:
/// - SIGTERM/SIGINT: Graceful shutdown
/// - SIGHUP: Configuration reload from `config_path`
#[cfg(unix)]
pub fn setup_signal_handlers(
    config: Arc<ArcSwap<Config>>,
    config_path: PathBuf,
) -> (
    broadcast::Sender<()>,
    tokio::task::JoinHandle<()>,
) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        let streams = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        );
        let (mut sigterm, mut sigint, mut sighup) = match streams {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C only");
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = tx_clone.send(());
                }
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(());
                    break;
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(());
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading configuration");
                    if let Err(e) = reload_config(&config, &config_path) {
                        error!("Failed to reload configuration: {:#}", e);
                    } else {
                        info!("Configuration reloaded successfully");
                    }
                }
            }
        }
    });

    (shutdown_tx, handle)
}

/// Windows placeholder - signals not fully supported
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _config: Arc<ArcSwap<Config>>,
    _config_path: PathBuf,
) -> (
    broadcast::Sender<()>,
    tokio::task::JoinHandle<()>,
) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        // On Windows, only Ctrl+C is supported
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(());
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    (shutdown_tx, handle)
}

/// Load, validate and swap in a new configuration
///
/// The phone number and price list take effect immediately. Listener address
/// and rate-limit settings are bound at startup and only change on restart.
/// If loading fails, the old configuration remains in place.
pub fn reload_config(config: &ArcSwap<Config>, path: &Path) -> Result<()> {
    let new_config = crate::config::load_config_from(path)?;
    let old_config = config.load();

    if new_config.server.host != old_config.server.host
        || new_config.server.port != old_config.server.port
    {
        warn!("Listener address changed; restart required for it to take effect");
    }
    if new_config.rate_limit.max_requests != old_config.rate_limit.max_requests
        || new_config.rate_limit.window_seconds != old_config.rate_limit.window_seconds
        || new_config.rate_limit.backend != old_config.rate_limit.backend
    {
        warn!("Rate limit settings changed; restart required for them to take effect");
    }

    info!(
        phone = %mask_phone(new_config.contact.phone()),
        minimum_charge = new_config.pricing_table.minimum_charge,
        add_ons = new_config.pricing_table.add_ons.len(),
        "New configuration loaded"
    );

    config.store(Arc::new(new_config));
    Ok(())
}

/// Ask a running server to reload its configuration (SIGHUP)
#[cfg(unix)]
pub fn send_reload_signal(pid: u32) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let raw_pid = i32::try_from(pid)
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid PID {}", pid))?;
    info!("Sending SIGHUP to PID {}", pid);

    kill(Pid::from_raw(raw_pid), Signal::SIGHUP)
        .map_err(|e| anyhow::anyhow!("Failed to send signal to PID {}: {}", pid, e))?;

    Ok(())
}

#[cfg(not(unix))]
pub fn send_reload_signal(_pid: u32) -> Result<()> {
    anyhow::bail!("Signal sending not supported on this platform");
}
