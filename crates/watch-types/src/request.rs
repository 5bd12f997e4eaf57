//! Watch requests and retry policy.

use crate::{TargetGroup, TransactionHash};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of status queries before a watch times out.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default spacing between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What to do when a query fails below the protocol level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorPolicy {
	/// Count the failure as a spent attempt and keep watching.
	#[default]
	Retry,
	/// Surface the failure immediately.
	Abort,
}

/// Bounded retry budget for a single watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub interval: Duration,
	/// Optional wall-clock ceiling, checked alongside the attempt budget.
	pub deadline: Option<Duration>,
	pub transport_errors: TransportErrorPolicy,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			interval: DEFAULT_POLL_INTERVAL,
			deadline: None,
			transport_errors: TransportErrorPolicy::Retry,
		}
	}
}

impl RetryPolicy {
	pub fn new(max_attempts: u32, interval: Duration) -> Self {
		Self {
			max_attempts,
			interval,
			..Self::default()
		}
	}

	pub fn with_deadline(mut self, deadline: Duration) -> Self {
		self.deadline = Some(deadline);
		self
	}

	pub fn with_transport_errors(mut self, policy: TransportErrorPolicy) -> Self {
		self.transport_errors = policy;
		self
	}

	/// Ceiling for watches that are not attempt-driven.
	///
	/// Falls back to the time the attempt budget would take to run out.
	pub fn push_deadline(&self) -> Duration {
		self.deadline
			.unwrap_or_else(|| self.interval.saturating_mul(self.max_attempts))
	}
}

/// One caller's request to follow a transaction to a target group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRequest {
	pub hash: TransactionHash,
	pub target: TargetGroup,
	pub policy: RetryPolicy,
}

impl WatchRequest {
	pub fn new(hash: TransactionHash, target: TargetGroup) -> Self {
		Self {
			hash,
			target,
			policy: RetryPolicy::default(),
		}
	}

	pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;
		self
	}
}
