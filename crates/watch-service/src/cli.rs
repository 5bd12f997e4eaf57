//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use watch_node::AnnounceKind;
use watch_types::{TargetGroup, TransactionHash};

#[derive(Parser, Debug)]
#[command(name = "symbol-watch")]
#[command(about = "Watch Symbol transactions until the network settles them", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file
	#[arg(short, long, global = true, env = "CONFIG_FILE")]
	pub config: Option<PathBuf>,

	/// Node REST endpoint, overriding the configuration
	#[arg(long, global = true, env = "NODE_URL")]
	pub node_url: Option<String>,

	/// Log filter override (trace, debug, info, warn, error)
	#[arg(short, long, global = true, env = "WATCH_LOG_LEVEL")]
	pub log_level: Option<String>,

	/// Emit JSON log lines
	#[arg(long, global = true)]
	pub json_logs: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Overrides for the configured retry policy.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct WatchArgs {
	/// Group that counts as success
	#[arg(short, long)]
	pub target: Option<TargetGroup>,

	/// Maximum number of status queries
	#[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
	pub attempts: Option<u32>,

	/// Delay between status queries in milliseconds
	#[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
	pub interval_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Query a transaction's status once
	Status {
		/// Transaction hash (64 hex characters)
		hash: TransactionHash,
	},

	/// Poll until the transaction reaches its target group
	Wait {
		hash: TransactionHash,
		#[command(flatten)]
		watch: WatchArgs,
	},

	/// Wait for WebSocket notifications on an account's channels
	Listen {
		hash: TransactionHash,
		/// Account address whose channels carry the transaction
		#[arg(short, long)]
		address: String,
		#[command(flatten)]
		watch: WatchArgs,
	},

	/// Announce a signed transaction and watch it
	Announce {
		/// File holding the JSON announce body
		#[arg(short, long)]
		payload_file: PathBuf,
		/// Hash of the signed transaction
		#[arg(long)]
		hash: TransactionHash,
		#[arg(short, long, default_value_t = AnnounceKind::Standard)]
		kind: AnnounceKind,
		/// Listen on this account's channels instead of polling
		#[arg(short, long)]
		address: Option<String>,
		/// Return once the node accepts the payload
		#[arg(long)]
		no_wait: bool,
		#[command(flatten)]
		watch: WatchArgs,
	},

	/// Print the node's network time and a two-hour deadline
	Time,

	/// Load and validate the configuration
	Validate,
}
