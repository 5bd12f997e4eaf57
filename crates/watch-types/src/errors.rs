//! Error types for watching transactions.

use crate::TransactionHash;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

/// Failure talking to a status source.
///
/// These never carry a verdict about the transaction itself, only about the
/// channel used to ask.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
	#[error("Network error: {0}")]
	Network(String),

	#[error("Unexpected HTTP status {status}: {body}")]
	HttpStatus { status: u16, body: String },

	#[error("Malformed response: {0}")]
	Decode(String),

	#[error("Protocol error: {0}")]
	Protocol(String),

	#[error("Invalid endpoint: {0}")]
	InvalidEndpoint(String),

	#[error("Invalid payload: {0}")]
	InvalidPayload(String),
}

impl SourceError {
	/// Whether another attempt against the same source could succeed.
	pub fn is_retryable(&self) -> bool {
		!matches!(self, Self::InvalidEndpoint(_) | Self::InvalidPayload(_))
	}
}

/// Terminal outcome of a watch that did not reach its target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
	/// Budget exhausted without a terminal observation.
	#[error("Transaction {hash} not resolved after {attempts} attempts ({elapsed:?})")]
	Timeout {
		hash: TransactionHash,
		attempts: u32,
		elapsed: Duration,
	},

	/// The node reported the transaction as failed.
	#[error("Transaction {hash} rejected: {code}")]
	Rejected { hash: TransactionHash, code: String },

	#[error("Transport error: {0}")]
	Transport(#[from] SourceError),

	#[error("Watch cancelled")]
	Cancelled,

	#[error("Status stream closed before transaction {hash} resolved")]
	StreamClosed { hash: TransactionHash },
}

impl WatchError {
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}

	pub fn is_rejection(&self) -> bool {
		matches!(self, Self::Rejected { .. })
	}

	/// The node's reason code, when the node said no.
	pub fn rejection_code(&self) -> Option<&str> {
		match self {
			Self::Rejected { code, .. } => Some(code),
			_ => None,
		}
	}
}
