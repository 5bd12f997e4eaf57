//! HTTP client for a Symbol node's REST API.

use crate::types::{AnnounceKind, AnnounceResponse, NetworkTime, NodeTimeResponse, StatusResponse};
use reqwest::{header, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info};
use watch_config::NodeConfig;
use watch_types::{SourceError, StatusRecord, TransactionHash};

/// REST client bound to one node.
#[derive(Debug, Clone)]
pub struct NodeClient {
	http: reqwest::Client,
	base_url: String,
	ws_url: String,
	explorer_url: String,
}

impl NodeClient {
	pub fn new(config: &NodeConfig) -> Result<Self, SourceError> {
		let base = Url::parse(config.url.trim())
			.map_err(|e| SourceError::InvalidEndpoint(format!("{}: {}", config.url, e)))?;
		if !matches!(base.scheme(), "http" | "https") {
			return Err(SourceError::InvalidEndpoint(format!(
				"node URL must be http or https: {}",
				config.url
			)));
		}
		let base_url = base.as_str().trim_end_matches('/').to_string();

		let ws_url = match &config.ws_url {
			Some(url) => url.clone(),
			None => websocket_url(&base_url)?,
		};

		let http = reqwest::Client::builder()
			.timeout(config.request_timeout())
			.build()
			.map_err(|e| SourceError::Network(format!("failed to build HTTP client: {}", e)))?;

		Ok(Self {
			http,
			base_url,
			ws_url,
			explorer_url: config.explorer_url.trim_end_matches('/').to_string(),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn ws_url(&self) -> &str {
		&self.ws_url
	}

	/// Explorer page for a transaction.
	pub fn explorer_url(&self, hash: &TransactionHash) -> String {
		format!("{}/transactions/{}", self.explorer_url, hash)
	}

	/// Queries `GET /transactionStatus/{hash}`.
	pub async fn transaction_status(
		&self,
		hash: &TransactionHash,
	) -> Result<StatusRecord, SourceError> {
		let url = format!("{}/transactionStatus/{}", self.base_url, hash);
		debug!(tx_hash = %hash.short(), "Querying transaction status");

		let response = self
			.http
			.get(&url)
			.header(header::CONTENT_TYPE, "application/json")
			.send()
			.await
			.map_err(network_error)?;

		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return Ok(StatusRecord::not_found(*hash));
		}
		if !status.is_success() {
			return Err(http_status_error(response).await);
		}

		let body: StatusResponse = response.json().await.map_err(decode_error)?;
		body.into_record(*hash)
	}

	/// Submits a signed payload as produced by the SDK.
	///
	/// The payload is forwarded verbatim; it must already be the JSON document
	/// the node expects for `kind`.
	pub async fn announce(
		&self,
		payload: &str,
		kind: AnnounceKind,
	) -> Result<AnnounceResponse, SourceError> {
		serde_json::from_str::<serde_json::Value>(payload)
			.map_err(|e| SourceError::InvalidPayload(format!("payload is not JSON: {}", e)))?;

		let url = format!("{}{}", self.base_url, kind.path());
		info!(kind = %kind, "Announcing transaction");

		let response = self
			.http
			.put(&url)
			.header(header::CONTENT_TYPE, "application/json")
			.body(payload.to_string())
			.send()
			.await
			.map_err(network_error)?;

		if !response.status().is_success() {
			return Err(http_status_error(response).await);
		}

		let body: AnnounceResponse = response.json().await.map_err(decode_error)?;
		info!(message = %body.message, "Announce accepted");
		Ok(body)
	}

	/// Queries `GET /node/time`.
	pub async fn network_time(&self) -> Result<NetworkTime, SourceError> {
		let url = format!("{}/node/time", self.base_url);

		let response = self.http.get(&url).send().await.map_err(network_error)?;
		if !response.status().is_success() {
			return Err(http_status_error(response).await);
		}

		let body: NodeTimeResponse = response.json().await.map_err(decode_error)?;
		Ok(body.communication_timestamps)
	}

	/// Network timestamp `lifetime` from now, for transaction deadlines.
	pub async fn deadline_after(&self, lifetime: Duration) -> Result<u64, SourceError> {
		let time = self.network_time().await?;
		Ok(time.receive_timestamp + lifetime.as_millis() as u64)
	}
}

/// Derives the WebSocket endpoint from a REST endpoint.
pub fn websocket_url(base_url: &str) -> Result<String, SourceError> {
	let rest = base_url
		.strip_prefix("http")
		.ok_or_else(|| SourceError::InvalidEndpoint(format!("not an http URL: {}", base_url)))?;
	Ok(format!("ws{}/ws", rest.trim_end_matches('/')))
}

fn network_error(e: reqwest::Error) -> SourceError {
	SourceError::Network(e.to_string())
}

fn decode_error(e: reqwest::Error) -> SourceError {
	SourceError::Decode(e.to_string())
}

async fn http_status_error(response: reqwest::Response) -> SourceError {
	let status = response.status().as_u16();
	let body = response.text().await.unwrap_or_default();
	SourceError::HttpStatus { status, body }
}

#[cfg(test)]
mod tests {
	use super::*;
	use watch_types::TransactionGroup;
	use wiremock::matchers::{body_string, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	const HASH: &str = "4A1B8F1C2E3D4F5061728394A5B6C7D8E9F00112233445566778899AABBCCDDE";

	fn client(server: &MockServer) -> NodeClient {
		NodeClient::new(&NodeConfig {
			url: server.uri(),
			..NodeConfig::default()
		})
		.unwrap()
	}

	#[test]
	fn test_websocket_url_derivation() {
		assert_eq!(
			websocket_url("https://sym-test-03.opening-line.jp:3001").unwrap(),
			"wss://sym-test-03.opening-line.jp:3001/ws"
		);
		assert_eq!(
			websocket_url("http://localhost:3000/").unwrap(),
			"ws://localhost:3000/ws"
		);
	}

	#[test]
	fn test_rejects_non_http_node() {
		let result = NodeClient::new(&NodeConfig {
			url: "ftp://node".to_string(),
			..NodeConfig::default()
		});
		assert!(matches!(result, Err(SourceError::InvalidEndpoint(_))));
	}

	#[test]
	fn test_explorer_url() {
		let client = NodeClient::new(&NodeConfig::default()).unwrap();
		let hash: TransactionHash = HASH.parse().unwrap();
		assert_eq!(
			client.explorer_url(&hash),
			format!("https://testnet.symbol.fyi/transactions/{}", HASH)
		);
	}

	#[tokio::test]
	async fn test_status_confirmed() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path(format!("/transactionStatus/{}", HASH)))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"group": "confirmed",
				"code": "Success",
				"hash": HASH,
				"height": "1024"
			})))
			.mount(&server)
			.await;

		let record = client(&server)
			.transaction_status(&HASH.parse().unwrap())
			.await
			.unwrap();
		assert_eq!(record.group, TransactionGroup::Confirmed);
		assert_eq!(record.height, Some(1024));
	}

	#[tokio::test]
	async fn test_status_404_is_not_found() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
				"code": "ResourceNotFound",
				"message": "no resource exists"
			})))
			.mount(&server)
			.await;

		let record = client(&server)
			.transaction_status(&HASH.parse().unwrap())
			.await
			.unwrap();
		assert_eq!(record.group, TransactionGroup::NotFound);
	}

	#[tokio::test]
	async fn test_status_server_error_and_garbage() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path(format!("/transactionStatus/{}", HASH)))
			.respond_with(ResponseTemplate::new(503).set_body_string("busy"))
			.mount(&server)
			.await;

		let result = client(&server)
			.transaction_status(&HASH.parse().unwrap())
			.await;
		assert_eq!(
			result,
			Err(SourceError::HttpStatus {
				status: 503,
				body: "busy".to_string()
			})
		);

		let other: TransactionHash = TransactionHash::new([0u8; 32]);
		Mock::given(method("GET"))
			.and(path(format!("/transactionStatus/{}", other)))
			.respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
			.mount(&server)
			.await;
		let result = client(&server).transaction_status(&other).await;
		assert!(matches!(result, Err(SourceError::Decode(_))));
	}

	#[tokio::test]
	async fn test_announce_partial() {
		let server = MockServer::start().await;
		let payload = r#"{"payload":"C0010000"}"#;
		Mock::given(method("PUT"))
			.and(path("/transactions/partial"))
			.and(body_string(payload))
			.respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
				"message": "packet 256 was pushed to the network via /transactions/partial"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let response = client(&server)
			.announce(payload, AnnounceKind::Partial)
			.await
			.unwrap();
		assert!(response.message.contains("/transactions/partial"));
	}

	#[tokio::test]
	async fn test_announce_rejects_non_json_payload() {
		let server = MockServer::start().await;
		let result = client(&server)
			.announce("C0010000", AnnounceKind::Standard)
			.await;
		assert!(matches!(result, Err(SourceError::InvalidPayload(_))));
	}

	#[tokio::test]
	async fn test_deadline_after() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/node/time"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"communicationTimestamps": {
					"sendTimestamp": "1000",
					"receiveTimestamp": "900"
				}
			})))
			.mount(&server)
			.await;

		let deadline = client(&server)
			.deadline_after(Duration::from_secs(2 * 60 * 60))
			.await
			.unwrap();
		assert_eq!(deadline, 900 + 7_200_000);
	}
}
