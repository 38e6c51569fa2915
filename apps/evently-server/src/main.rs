//! Evently server
//!
//! Serves the events API behind the authorization gate.
//!
//! # Signals
//!
//! - `SIGINT` / `SIGTERM`: stop accepting connections, drain in-flight requests, exit
//! - `SIGHUP`: reload the static grant table from the config file

mod app;
mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use authz_resolver::Service;
use clap::Parser;
use static_authz_plugin::StaticGrantStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{AppConfig, LogFormat};

/// Evently events backend
#[derive(Parser, Debug)]
#[command(name = "evently-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// YAML configuration file (also overridable via `EVENTLY__SECTION__KEY`)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Override `logging.format`
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = AppConfig::load(cli.config.as_deref())?;
    logging::init(&cfg.logging, cli.log_format, cli.verbose)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "Starting evently-server"
    );

    let app = app::build(&cfg)?;
    let cancel = CancellationToken::new();

    tokio::spawn(shutdown_on_signal(cancel.clone()));
    tokio::spawn(reload_on_sighup(
        cli.config.clone(),
        app.grant_store.clone(),
        app.authz.clone(),
        cancel.clone(),
    ));

    app.gateway.serve(app.router, cancel).await?;
    info!("evently-server stopped");
    Ok(())
}

async fn shutdown_on_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler; only Ctrl-C will stop the server");
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
        }
    }

    cancel.cancel();
}

#[cfg(unix)]
async fn reload_on_sighup(
    config_path: Option<PathBuf>,
    store: Arc<StaticGrantStore>,
    authz: Arc<Service>,
    cancel: CancellationToken,
) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "Failed to install SIGHUP handler; grant reload disabled");
            return;
        }
    };

    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            received = sighup.recv() => {
                if received.is_none() {
                    return;
                }
                info!("Received SIGHUP; reloading grants");
                if let Err(e) = app::reload_grants(config_path.as_deref(), &store, &authz) {
                    warn!(error = %format!("{e:#}"), "Grant reload failed; keeping previous grants");
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn reload_on_sighup(
    _config_path: Option<PathBuf>,
    _store: Arc<StaticGrantStore>,
    _authz: Arc<Service>,
    cancel: CancellationToken,
) {
    cancel.cancelled().await;
}
