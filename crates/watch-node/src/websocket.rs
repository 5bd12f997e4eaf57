//! Push status source backed by the node's WebSocket endpoint.
//!
//! On connect the node sends `{"uid": ...}`. Every subscribe message must
//! echo that uid. Notifications then arrive as `{"topic", "data"}` frames
//! where the topic is `<category>/<address>`.

use crate::types::{WsFrame, WsHello, WsSubscribe};
use crate::NodeClient;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use watch_types::{
	ChannelCategory, SourceError, StatusEvent, StatusEventStream, StatusSubscriber, TransactionHash,
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Subscribes to an account's lifecycle channels over WebSocket.
#[derive(Debug, Clone)]
pub struct WebSocketListener {
	ws_url: String,
	handshake_timeout: Duration,
}

impl WebSocketListener {
	pub fn new(ws_url: impl Into<String>) -> Self {
		Self {
			ws_url: ws_url.into(),
			handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
		}
	}

	pub fn from_client(client: &NodeClient) -> Self {
		Self::new(client.ws_url())
	}

	pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
		self.handshake_timeout = timeout;
		self
	}

	async fn connect(&self) -> Result<(Socket, String), SourceError> {
		let (mut socket, _) =
			tokio::time::timeout(self.handshake_timeout, connect_async(self.ws_url.as_str()))
				.await
				.map_err(|_| SourceError::Network(format!("timed out connecting to {}", self.ws_url)))?
				.map_err(ws_error)?;

		let uid = tokio::time::timeout(self.handshake_timeout, read_uid(&mut socket))
			.await
			.map_err(|_| SourceError::Protocol("node did not send a uid".to_string()))??;

		Ok((socket, uid))
	}
}

#[async_trait]
impl StatusSubscriber for WebSocketListener {
	fn name(&self) -> &str {
		"websocket"
	}

	async fn subscribe(
		&self,
		address: &str,
		categories: &[ChannelCategory],
	) -> Result<StatusEventStream, SourceError> {
		let (mut socket, uid) = self.connect().await?;
		info!(uid = %uid, url = %self.ws_url, "WebSocket connected");

		for category in categories {
			let request = WsSubscribe {
				uid: &uid,
				subscribe: category.channel(address),
			};
			let text = serde_json::to_string(&request)
				.map_err(|e| SourceError::Protocol(e.to_string()))?;
			socket.send(Message::Text(text)).await.map_err(ws_error)?;
			debug!(channel = %request.subscribe, "Subscribed");
		}

		let stream = async_stream::stream! {
			while let Some(message) = socket.next().await {
				match message {
					Ok(Message::Text(text)) => match parse_frame(&text) {
						Ok(Some(event)) => yield Ok(event),
						Ok(None) => {}
						Err(e) => {
							warn!(error = %e, "Skipping malformed notification");
							yield Err(e);
						}
					},
					Ok(Message::Close(frame)) => {
						debug!(?frame, "WebSocket closed by node");
						break;
					}
					Ok(_) => {}
					Err(e) => {
						yield Err(ws_error(e));
						break;
					}
				}
			}
		};

		Ok(Box::pin(stream))
	}
}

async fn read_uid(socket: &mut Socket) -> Result<String, SourceError> {
	while let Some(message) = socket.next().await {
		match message.map_err(ws_error)? {
			Message::Text(text) => {
				if let Ok(hello) = serde_json::from_str::<WsHello>(&text) {
					return Ok(hello.uid);
				}
			}
			Message::Close(_) => break,
			_ => {}
		}
	}
	Err(SourceError::Protocol(
		"connection closed before uid was received".to_string(),
	))
}

/// Decodes one notification frame.
///
/// Frames on channels that carry no lifecycle information yield `None`.
pub fn parse_frame(text: &str) -> Result<Option<StatusEvent>, SourceError> {
	let value: Value =
		serde_json::from_str(text).map_err(|e| SourceError::Decode(e.to_string()))?;
	if value.get("topic").is_none() {
		return Ok(None);
	}

	let frame: WsFrame =
		serde_json::from_value(value).map_err(|e| SourceError::Decode(e.to_string()))?;
	let Some(category) = ChannelCategory::from_topic(&frame.topic) else {
		return Ok(None);
	};

	let (hash, height, code) = match category {
		ChannelCategory::Status => {
			let hash = frame.data.get("hash");
			let code = frame
				.data
				.get("code")
				.and_then(Value::as_str)
				.map(str::to_string);
			(hash, None, code)
		}
		_ => {
			let meta = frame.data.get("meta");
			let hash = meta.and_then(|m| m.get("hash"));
			let height = meta.and_then(|m| m.get("height")).and_then(json_u64);
			(hash, height, None)
		}
	};

	let hash: TransactionHash = hash
		.and_then(Value::as_str)
		.ok_or_else(|| SourceError::Decode(format!("{} notification without hash", category)))?
		.parse()
		.map_err(|e| SourceError::Decode(format!("{} notification: {}", category, e)))?;

	Ok(Some(StatusEvent {
		category,
		hash,
		height,
		code,
		data: frame.data,
	}))
}

fn json_u64(value: &Value) -> Option<u64> {
	match value {
		Value::String(s) => s.parse().ok(),
		other => other.as_u64(),
	}
}

fn ws_error(e: tokio_tungstenite::tungstenite::Error) -> SourceError {
	SourceError::Network(e.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::net::TcpListener;
	use watch_types::TransactionGroup;

	const HASH: &str = "4A1B8F1C2E3D4F5061728394A5B6C7D8E9F00112233445566778899AABBCCDDE";
	const ADDRESS: &str = "TBXUTAX6O6EUVPB6X7OBNX6UUXBMPPAFX7KE5TQ";

	#[test]
	fn test_parse_confirmed_frame() {
		let text = serde_json::json!({
			"topic": format!("confirmedAdded/{}", ADDRESS),
			"data": { "transaction": {}, "meta": { "hash": HASH, "height": "3210" } }
		})
		.to_string();

		let event = parse_frame(&text).unwrap().unwrap();
		assert_eq!(event.category, ChannelCategory::ConfirmedAdded);
		assert_eq!(event.hash.to_string(), HASH);
		assert_eq!(event.height, Some(3210));
		assert_eq!(event.group(), TransactionGroup::Confirmed);
	}

	#[test]
	fn test_parse_status_frame() {
		let text = serde_json::json!({
			"topic": format!("status/{}", ADDRESS),
			"data": { "hash": HASH, "code": "Failure_Core_Insufficient_Balance", "deadline": "1" }
		})
		.to_string();

		let event = parse_frame(&text).unwrap().unwrap();
		assert_eq!(event.group(), TransactionGroup::Failed);
		assert_eq!(
			event.code.as_deref(),
			Some("Failure_Core_Insufficient_Balance")
		);
	}

	#[test]
	fn test_parse_status_frame_without_code() {
		let text = serde_json::json!({
			"topic": format!("status/{}", ADDRESS),
			"data": { "hash": HASH }
		})
		.to_string();

		let record = parse_frame(&text).unwrap().unwrap().to_record();
		assert_eq!(record.group, TransactionGroup::Failed);
		assert_eq!(record.code, watch_types::UNKNOWN_FAILURE_CODE);
	}

	#[test]
	fn test_parse_ignores_other_frames() {
		assert_eq!(parse_frame(r#"{"uid":"abc"}"#).unwrap(), None);
		assert_eq!(
			parse_frame(r#"{"topic":"block","data":{}}"#).unwrap(),
			None
		);
		assert!(parse_frame("not json").is_err());
		assert!(parse_frame(r#"{"topic":"confirmedAdded/X","data":{"meta":{}}}"#).is_err());
	}

	#[tokio::test]
	async fn test_subscribe_handshake_and_events() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();

		let server = tokio::spawn(async move {
			let (stream, _) = listener.accept().await.unwrap();
			let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
			ws.send(Message::Text(r#"{"uid":"session-1"}"#.to_string()))
				.await
				.unwrap();

			let mut subscriptions = Vec::new();
			for _ in 0..2 {
				if let Some(Ok(Message::Text(text))) = ws.next().await {
					subscriptions.push(serde_json::from_str::<Value>(&text).unwrap());
				}
			}

			let frame = serde_json::json!({
				"topic": format!("unconfirmedAdded/{}", ADDRESS),
				"data": { "meta": { "hash": HASH } }
			});
			ws.send(Message::Text(frame.to_string())).await.unwrap();
			ws.close(None).await.unwrap();
			subscriptions
		});

		let subscriber = WebSocketListener::new(format!("ws://{}", addr));
		let mut stream = subscriber
			.subscribe(
				ADDRESS,
				&[
					ChannelCategory::ConfirmedAdded,
					ChannelCategory::UnconfirmedAdded,
				],
			)
			.await
			.unwrap();

		let event = stream.next().await.unwrap().unwrap();
		assert_eq!(event.category, ChannelCategory::UnconfirmedAdded);
		assert!(stream.next().await.is_none());

		let subscriptions = server.await.unwrap();
		assert_eq!(subscriptions[0]["uid"], "session-1");
		assert_eq!(
			subscriptions[0]["subscribe"],
			format!("confirmedAdded/{}", ADDRESS)
		);
		assert_eq!(
			subscriptions[1]["subscribe"],
			format!("unconfirmedAdded/{}", ADDRESS)
		);
	}

	#[tokio::test]
	async fn test_subscribe_fails_without_uid() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();

		tokio::spawn(async move {
			let (stream, _) = listener.accept().await.unwrap();
			let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
			ws.close(None).await.unwrap();
		});

		let subscriber = WebSocketListener::new(format!("ws://{}", addr))
			.with_handshake_timeout(Duration::from_secs(2));
		let result = subscriber
			.subscribe(ADDRESS, &[ChannelCategory::ConfirmedAdded])
			.await;
		assert!(result.is_err());
	}
}
