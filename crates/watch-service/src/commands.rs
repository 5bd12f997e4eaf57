//! Subcommand implementations.

use crate::cli::{Args, Command, WatchArgs};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use watch_config::{load_config, ConfigLoader, WatchConfig};
use watch_core::{announce_and_watch, CancelSignal, StatusWatcher, WatchMode};
use watch_node::{AnnounceKind, NodeClient, PollingSource, WebSocketListener};
use watch_types::{RetryPolicy, StatusRecord, TransactionHash, WatchError, WatchRequest};

/// Lifetime the SDK scripts give a freshly signed transaction.
const DEADLINE_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);

/// Loads the configuration and applies command-line overrides.
pub fn resolve_config(args: &Args) -> Result<WatchConfig> {
	let mut config = match &args.config {
		Some(path) => ConfigLoader::from_env_and_file(Some(path.as_path()))?,
		None => load_config()?,
	};

	if let Some(url) = &args.node_url {
		config.node.url = url.clone();
	}
	if let Some(level) = &args.log_level {
		config.monitoring.log_level = level.clone();
	}
	if args.json_logs {
		config.monitoring.json = true;
	}

	ConfigLoader::validate_config(&config)?;
	Ok(config)
}

/// Builds the watch request from configured defaults and flags.
pub fn watch_request(config: &WatchConfig, hash: TransactionHash, flags: &WatchArgs) -> WatchRequest {
	let mut policy: RetryPolicy = config.watch.retry_policy();
	if let Some(attempts) = flags.attempts {
		policy.max_attempts = attempts;
	}
	if let Some(ms) = flags.interval_ms {
		policy.interval = Duration::from_millis(ms);
	}

	WatchRequest::new(hash, flags.target.unwrap_or(config.watch.target)).with_policy(policy)
}

pub async fn run(args: Args, config: WatchConfig, cancel: CancelSignal) -> Result<()> {
	let client = NodeClient::new(&config.node).context("Failed to create node client")?;

	match args.command {
		Command::Status { hash } => {
			let record = client
				.transaction_status(&hash)
				.await
				.with_context(|| format!("Failed to query status of {}", hash))?;
			println!("{}", render_record(&record));
			println!("explorer: {}", client.explorer_url(&hash));
			Ok(())
		}
		Command::Wait { hash, watch } => {
			let request = watch_request(&config, hash, &watch);
			let source = PollingSource::new(client.clone());
			let outcome = StatusWatcher::poll(&source, &request, cancel).await;
			report(&client, &request, outcome)
		}
		Command::Listen {
			hash,
			address,
			watch,
		} => {
			let request = watch_request(&config, hash, &watch);
			let subscriber = WebSocketListener::from_client(&client);
			let outcome = StatusWatcher::watch_push(&subscriber, &address, &request, cancel).await;
			report(&client, &request, outcome)
		}
		Command::Announce {
			payload_file,
			hash,
			kind,
			address,
			no_wait,
			watch,
		} => {
			let payload = read_payload(&payload_file)?;
			if no_wait {
				let response = client
					.announce(&payload, kind)
					.await
					.context("Failed to announce transaction")?;
				println!("{}", response.message);
				println!("explorer: {}", client.explorer_url(&hash));
				return Ok(());
			}

			let request = watch_request(&config, hash, &watch);
			let outcome = announce(&client, &payload, kind, address.as_deref(), &request, cancel).await;
			report(&client, &request, outcome)
		}
		Command::Time => {
			let (now, deadline) = network_deadline(&client).await?;
			println!("network time: {}", now);
			println!("deadline (+2h): {}", deadline);
			Ok(())
		}
		Command::Validate => {
			println!("Configuration is valid");
			println!("node: {}", client.base_url());
			println!("websocket: {}", client.ws_url());
			println!(
				"watch: target={} max_attempts={} interval={}ms",
				config.watch.target, config.watch.max_attempts, config.watch.poll_interval_ms
			);
			Ok(())
		}
	}
}

async fn announce(
	client: &NodeClient,
	payload: &str,
	kind: AnnounceKind,
	address: Option<&str>,
	request: &WatchRequest,
	cancel: CancelSignal,
) -> Result<StatusRecord, WatchError> {
	match address {
		Some(address) => {
			let subscriber = WebSocketListener::from_client(client);
			let mode = WatchMode::Push {
				subscriber: &subscriber,
				address,
			};
			announce_and_watch(client, payload, kind, mode, request, cancel).await
		}
		None => {
			let source = PollingSource::new(client.clone());
			announce_and_watch(client, payload, kind, WatchMode::Poll(&source), request, cancel)
				.await
		}
	}
}

/// Network time and the deadline a transaction signed now should carry.
async fn network_deadline(client: &NodeClient) -> Result<(u64, u64)> {
	let time = client
		.network_time()
		.await
		.context("Failed to query network time")?;
	let deadline = client
		.deadline_after(DEADLINE_LIFETIME)
		.await
		.context("Failed to compute transaction deadline")?;
	Ok((time.receive_timestamp, deadline))
}

fn read_payload(path: &Path) -> Result<String> {
	let payload = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read payload file {}", path.display()))?;
	Ok(payload.trim().to_string())
}

fn report(
	client: &NodeClient,
	request: &WatchRequest,
	outcome: Result<StatusRecord, WatchError>,
) -> Result<()> {
	let explorer = client.explorer_url(&request.hash);
	match outcome {
		Ok(record) => {
			info!(tx_hash = %record.hash.short(), "Watch finished");
			println!("{}", render_record(&record));
			println!("explorer: {}", explorer);
			Ok(())
		}
		Err(e) => Err(anyhow::anyhow!(failure_message(&e, &explorer))),
	}
}

pub fn render_record(record: &StatusRecord) -> String {
	let mut line = format!("{} {} ({})", record.hash, record.group, record.code);
	if let Some(height) = record.height {
		line.push_str(&format!(" at height {}", height));
	}
	line
}

/// User-facing text for a watch that did not succeed.
pub fn failure_message(error: &WatchError, explorer: &str) -> String {
	match error {
		WatchError::Timeout {
			hash,
			attempts,
			elapsed,
		} => format!(
			"Timed out: {} not settled after {} attempts in {:.1}s; it may still confirm, check {}",
			hash,
			attempts,
			elapsed.as_secs_f64(),
			explorer
		),
		WatchError::Rejected { hash, code } => {
			format!("Rejected: the node refused {} with {}", hash, code)
		}
		WatchError::Cancelled => "Cancelled before the transaction settled".to_string(),
		other => format!("Watch failed: {}", other),
	}
}
