pub mod activity;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod pricing;
pub mod server;
pub mod signals;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for CLI commands
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

/// Initialize tracing for the server from `server.log_level` and `server.log_format`
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// Note: This function can only be called once.
pub fn init_server_tracing(log_level: &str, log_format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
