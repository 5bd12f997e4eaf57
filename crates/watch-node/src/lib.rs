//! Access to a Symbol node.
//!
//! - [`NodeClient`] - REST calls: transaction status, announce, network time
//! - [`PollingSource`] - [`StatusSource`](watch_types::StatusSource) over REST
//! - [`WebSocketListener`] - [`StatusSubscriber`](watch_types::StatusSubscriber) over `/ws`

pub mod client;
pub mod polling;
pub mod types;
pub mod websocket;

pub use client::{websocket_url, NodeClient};
pub use polling::PollingSource;
pub use types::{AnnounceKind, AnnounceResponse, NetworkTime};
pub use websocket::{parse_frame, WebSocketListener};
