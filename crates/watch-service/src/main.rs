use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use watch_core::{cancellation, CancelHandle};
use watch_monitoring::{init_tracing, TracingConfig};

mod cli;
mod commands;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = commands::resolve_config(&args).context("Failed to load configuration")?;
	init_tracing(TracingConfig::from_monitoring(&config.monitoring))
		.context("Failed to initialize tracing")?;

	info!(node = %config.node.url, "symbol-watch starting");

	let (handle, signal) = cancellation();
	tokio::spawn(cancel_on_shutdown(handle));

	commands::run(args, config, signal).await
}

/// Fires `handle` on Ctrl-C or SIGTERM.
async fn cancel_on_shutdown(handle: CancelHandle) {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			warn!(error = %e, "Failed to install Ctrl+C handler");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!(error = %e, "Failed to install signal handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received, cancelling watch");
	handle.cancel();
}
