use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::config::Config;

/// Shutdown signal types
#[derive(Debug, Clone, Copy)]
pub enum ShutdownSignal {
    /// Graceful shutdown (drain connections)
    Graceful,
}

/// Setup signal handlers for the server
///
/// Returns a broadcast sender for shutdown signals and a join handle for the signal task
///
/// Handles:
/// - SIGTERM/SIGINT: Graceful shutdown
/// - SIGHUP: Configuration reload from `config_path`
#[cfg(unix)]
pub fn setup_signal_handlers(
    config: Arc<ArcSwap<Config>>,
    config_path: PathBuf,
) -> Result<(broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>)> {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading configuration");
                    if let Err(e) = reload_config(&config, &config_path) {
                        error!("Failed to reload configuration: {}", e);
                    } else {
                        info!("Configuration reloaded successfully");
                    }
                }
            }
        }
    });

    Ok((shutdown_tx, handle))
}

/// Non-unix platforms only support Ctrl+C
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _config: Arc<ArcSwap<Config>>,
    _config_path: PathBuf,
) -> Result<(broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>)> {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(ShutdownSignal::Graceful);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    Ok((shutdown_tx, handle))
}

/// Load, validate and atomically swap in a new configuration.
/// If loading fails, the old configuration remains in place.
///
/// Server address and activity log capacity are read at startup only.
pub fn reload_config(config: &ArcSwap<Config>, path: &Path) -> Result<()> {
    let new_config = crate::config::load_config(path)?;

    info!(
        "New configuration loaded. API Keys: {}, Catalog plans: {}",
        new_config.api_keys.len(),
        new_config.catalog.plans.len()
    );

    config.store(Arc::new(new_config));
    Ok(())
}
