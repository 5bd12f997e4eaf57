use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
	fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use watch_config::MonitoringConfig;

#[derive(Debug, Error)]
pub enum TracingError {
	#[error("Invalid log filter '{filter}': {reason}")]
	InvalidFilter { filter: String, reason: String },
	#[error("Failed to initialize tracing: {0}")]
	Init(String),
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
	/// `EnvFilter` directives, e.g. `info` or `watch_core=debug,info`.
	pub filter: String,
	pub json_format: bool,
	pub with_target: bool,
	pub with_file_and_line: bool,
	pub with_thread_ids: bool,
	pub with_span_events: FmtSpan,
}

impl Default for TracingConfig {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			json_format: false,
			with_target: true,
			with_file_and_line: false,
			with_thread_ids: false,
			with_span_events: FmtSpan::NONE,
		}
	}
}

impl TracingConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();
		self
	}

	pub fn with_json_format(mut self, json: bool) -> Self {
		self.json_format = json;
		self
	}

	pub fn production() -> Self {
		Self {
			filter: "info".to_string(),
			json_format: true,
			with_target: false,
			with_file_and_line: false,
			with_thread_ids: false,
			with_span_events: FmtSpan::NONE,
		}
	}

	/// Builds the configuration from the `[monitoring]` section.
	///
	/// JSON output uses the [`production`](Self::production) layout.
	pub fn from_monitoring(config: &MonitoringConfig) -> Self {
		let base = if config.json {
			Self::production()
		} else {
			Self::default()
		};
		base.with_filter(config.log_level.clone())
	}

	/// Parses the filter directives.
	///
	/// `RUST_LOG`, when set, takes precedence.
	pub fn env_filter(&self) -> Result<EnvFilter, TracingError> {
		if let Ok(filter) = EnvFilter::try_from_default_env() {
			return Ok(filter);
		}
		EnvFilter::try_new(&self.filter).map_err(|e| TracingError::InvalidFilter {
			filter: self.filter.clone(),
			reason: e.to_string(),
		})
	}
}

/// Initialize tracing with the given configuration
///
/// Output goes to stderr so command output on stdout stays clean.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
	let filter = config.env_filter()?;
	let subscriber = tracing_subscriber::registry().with(filter);

	if config.json_format {
		let json_layer = tracing_subscriber::fmt::layer()
			.json()
			.with_writer(std::io::stderr)
			.with_span_events(config.with_span_events.clone())
			.with_thread_ids(config.with_thread_ids)
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line)
			.with_target(config.with_target);

		subscriber
			.with(json_layer)
			.try_init()
			.map_err(|e| TracingError::Init(e.to_string()))?;
	} else {
		let fmt_layer = tracing_subscriber::fmt::layer()
			.pretty()
			.with_writer(std::io::stderr)
			.with_span_events(config.with_span_events.clone())
			.with_thread_ids(config.with_thread_ids)
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line)
			.with_target(config.with_target);

		subscriber
			.with(fmt_layer)
			.try_init()
			.map_err(|e| TracingError::Init(e.to_string()))?;
	}

	info!(filter = %config.filter, json = config.json_format, "Tracing initialized");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_monitoring_json_uses_production_layout() {
		let config = TracingConfig::from_monitoring(&MonitoringConfig {
			log_level: "watch_core=debug,warn".to_string(),
			json: true,
		});
		assert_eq!(config.filter, "watch_core=debug,warn");
		assert!(config.json_format);
		assert!(!config.with_target);
	}

	#[test]
	fn test_from_monitoring_human_readable() {
		let config = TracingConfig::from_monitoring(&MonitoringConfig {
			log_level: "debug".to_string(),
			json: false,
		});
		assert_eq!(config.filter, "debug");
		assert!(!config.json_format);
		assert!(config.with_target);
	}

	#[test]
	fn test_invalid_filter_is_rejected() {
		if std::env::var_os("RUST_LOG").is_some() {
			return;
		}
		let result = TracingConfig::new().with_filter("watch_core=loud").env_filter();
		assert!(matches!(result, Err(TracingError::InvalidFilter { .. })));
	}

	#[test]
	fn test_init_only_once() {
		let config = TracingConfig::new().with_filter("warn");
		if init_tracing(config.clone()).is_ok() {
			assert!(matches!(init_tracing(config), Err(TracingError::Init(_))));
		}
	}
}
