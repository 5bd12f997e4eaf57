//! Configuration loading from files and environment.

use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Load configuration from file
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<WatchConfig> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		let config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents)?,
			Some("json") => Self::from_json(&contents)?,
			Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		};

		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<WatchConfig> {
		toml::from_str(contents).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<WatchConfig> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	/// Load from YAML string
	pub fn from_yaml(contents: &str) -> Result<WatchConfig> {
		serde_yaml::from_str(contents).context("Failed to parse YAML")
	}

	/// Load from environment variables with optional file override
	pub fn from_env_and_file(file_path: Option<&Path>) -> Result<WatchConfig> {
		let mut config = if let Some(path) = file_path {
			Self::from_file(path)?
		} else {
			WatchConfig::default()
		};

		Self::apply_env_overrides(&mut config, std::env::vars())?;

		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Apply environment variable overrides
	pub fn apply_env_overrides<I>(config: &mut WatchConfig, vars: I) -> Result<()>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (key, value) in vars {
			match key.as_str() {
				"NODE_URL" => {
					debug!("Overriding node URL from environment");
					config.node.url = value;
				}
				"NODE_WS_URL" => {
					debug!("Overriding WebSocket URL from environment");
					config.node.ws_url = Some(value);
				}
				"WATCH_MAX_ATTEMPTS" => {
					config.watch.max_attempts = value
						.parse()
						.with_context(|| format!("Invalid WATCH_MAX_ATTEMPTS: {}", value))?;
				}
				"WATCH_POLL_INTERVAL_MS" => {
					config.watch.poll_interval_ms = value
						.parse()
						.with_context(|| format!("Invalid WATCH_POLL_INTERVAL_MS: {}", value))?;
				}
				_ => {}
			}
		}

		Ok(())
	}

	/// Validate configuration
	pub fn validate_config(config: &WatchConfig) -> Result<()> {
		let url = config.node.url.trim();
		if url.is_empty() {
			anyhow::bail!("node.url must be set");
		}
		if !(url.starts_with("http://") || url.starts_with("https://")) {
			anyhow::bail!("node.url must start with http:// or https://: {}", url);
		}

		if let Some(ws) = &config.node.ws_url {
			if !(ws.starts_with("ws://") || ws.starts_with("wss://")) {
				anyhow::bail!("node.ws_url must start with ws:// or wss://: {}", ws);
			}
		}

		if config.watch.max_attempts == 0 {
			anyhow::bail!("watch.max_attempts must be at least 1");
		}
		if config.watch.poll_interval_ms == 0 {
			anyhow::bail!("watch.poll_interval_ms must be positive");
		}
		if config.node.request_timeout_ms == 0 {
			anyhow::bail!("node.request_timeout_ms must be positive");
		}

		Ok(())
	}
}

/// Load configuration from standard locations
pub fn load_config() -> Result<WatchConfig> {
	// Check for config file in order:
	// 1. Environment variable CONFIG_FILE
	// 2. ./config.toml
	// 3. ./config/watch.toml
	// 4. Default config with env overrides

	if let Ok(path) = std::env::var("CONFIG_FILE") {
		return ConfigLoader::from_env_and_file(Some(Path::new(&path)));
	}

	let paths = ["./config.toml", "./config/watch.toml"];

	for path in &paths {
		if Path::new(path).exists() {
			return ConfigLoader::from_env_and_file(Some(Path::new(path)));
		}
	}

	ConfigLoader::from_env_and_file(None)
}
