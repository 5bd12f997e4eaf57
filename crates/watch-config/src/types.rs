//! Configuration types for symbol-watch.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use watch_types::{RetryPolicy, TargetGroup, TransportErrorPolicy};

/// Complete configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchConfig {
	/// Node endpoints
	pub node: NodeConfig,
	/// Status watch settings
	#[serde(default)]
	pub watch: WatchSettings,
	/// Logging
	#[serde(default)]
	pub monitoring: MonitoringConfig,
}

/// Node endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
	/// REST endpoint, e.g. `https://sym-test-03.opening-line.jp:3001`
	pub url: String,
	/// WebSocket endpoint (derived from `url` when absent)
	#[serde(default)]
	pub ws_url: Option<String>,
	/// Block explorer used in reports
	#[serde(default = "default_explorer_url")]
	pub explorer_url: String,
	/// Per-request HTTP timeout
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
}

impl Default for NodeConfig {
	fn default() -> Self {
		Self {
			url: "https://sym-test-03.opening-line.jp:3001".to_string(),
			ws_url: None,
			explorer_url: default_explorer_url(),
			request_timeout_ms: default_request_timeout_ms(),
		}
	}
}

impl NodeConfig {
	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}

/// Status watch settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchSettings {
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Wall-clock ceiling in seconds, on top of the attempt budget
	#[serde(default)]
	pub deadline_secs: Option<u64>,
	#[serde(default)]
	pub transport_errors: TransportErrorPolicy,
	#[serde(default)]
	pub target: TargetGroup,
}

impl Default for WatchSettings {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			poll_interval_ms: default_poll_interval_ms(),
			deadline_secs: None,
			transport_errors: TransportErrorPolicy::Retry,
			target: TargetGroup::Confirmed,
		}
	}
}

impl WatchSettings {
	pub fn retry_policy(&self) -> RetryPolicy {
		let policy = RetryPolicy::new(
			self.max_attempts,
			Duration::from_millis(self.poll_interval_ms),
		)
		.with_transport_errors(self.transport_errors);

		match self.deadline_secs {
			Some(secs) => policy.with_deadline(Duration::from_secs(secs)),
			None => policy,
		}
	}
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Emit JSON log lines instead of human-readable ones
	#[serde(default)]
	pub json: bool,
}

impl Default for MonitoringConfig {
	fn default() -> Self {
		Self {
			log_level: default_log_level(),
			json: false,
		}
	}
}

fn default_explorer_url() -> String {
	"https://testnet.symbol.fyi".to_string()
}

fn default_request_timeout_ms() -> u64 {
	10_000
}

fn default_max_attempts() -> u32 {
	watch_types::DEFAULT_MAX_ATTEMPTS
}

fn default_poll_interval_ms() -> u64 {
	watch_types::DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_log_level() -> String {
	"info".to_string()
}
