//! Wire types for the node's REST and WebSocket APIs.

use serde::{Deserialize, Serialize};
use std::fmt;
use watch_types::{
	deserialize_opt_u64, deserialize_u64, SourceError, StatusRecord, TransactionGroup,
	TransactionHash, RESOURCE_NOT_FOUND,
};

/// Body of `GET /transactionStatus/{hash}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
	#[serde(default)]
	pub group: Option<String>,
	pub code: String,
	#[serde(default, deserialize_with = "deserialize_opt_u64")]
	pub height: Option<u64>,
}

impl StatusResponse {
	pub fn into_record(self, hash: TransactionHash) -> Result<StatusRecord, SourceError> {
		if self.code == RESOURCE_NOT_FOUND {
			return Ok(StatusRecord::not_found(hash));
		}

		let group = match self.group.as_deref() {
			Some("unconfirmed") => TransactionGroup::Unconfirmed,
			Some("partial") => TransactionGroup::Partial,
			Some("confirmed") => TransactionGroup::Confirmed,
			Some("failed") => TransactionGroup::Failed,
			Some(other) => {
				return Err(SourceError::Decode(format!("unknown group '{}'", other)));
			}
			None => {
				return Err(SourceError::Decode(format!(
					"status without group (code {})",
					self.code
				)));
			}
		};

		Ok(StatusRecord {
			hash,
			group,
			code: self.code,
			height: self.height,
		})
	}
}

/// Body of a successful announce.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnnounceResponse {
	pub message: String,
}

/// Announce endpoint, chosen by what kind of payload is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnounceKind {
	/// Regular and aggregate complete transactions.
	#[default]
	Standard,
	/// Aggregate bonded transactions waiting for cosignatures.
	Partial,
	/// A cosignature for a pending aggregate bonded transaction.
	Cosignature,
}

impl AnnounceKind {
	pub fn path(&self) -> &'static str {
		match self {
			Self::Standard => "/transactions",
			Self::Partial => "/transactions/partial",
			Self::Cosignature => "/transactions/cosignature",
		}
	}
}

impl fmt::Display for AnnounceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Standard => "standard",
			Self::Partial => "partial",
			Self::Cosignature => "cosignature",
		})
	}
}

impl std::str::FromStr for AnnounceKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"standard" => Ok(Self::Standard),
			"partial" => Ok(Self::Partial),
			"cosignature" => Ok(Self::Cosignature),
			other => Err(format!("unknown announce kind '{}'", other)),
		}
	}
}

/// Body of `GET /node/time`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTimeResponse {
	pub communication_timestamps: NetworkTime,
}

/// Network timestamps in milliseconds since the network epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTime {
	#[serde(deserialize_with = "deserialize_u64")]
	pub send_timestamp: u64,
	#[serde(deserialize_with = "deserialize_u64")]
	pub receive_timestamp: u64,
}

/// First frame the node sends on a new WebSocket connection.
#[derive(Debug, Clone, Deserialize)]
pub struct WsHello {
	pub uid: String,
}

/// Subscribe request sent over the WebSocket.
#[derive(Debug, Clone, Serialize)]
pub struct WsSubscribe<'a> {
	pub uid: &'a str,
	pub subscribe: String,
}

/// Notification frame.
#[derive(Debug, Clone, Deserialize)]
pub struct WsFrame {
	pub topic: String,
	#[serde(default)]
	pub data: serde_json::Value,
}
