//! Push notification types.
//!
//! A node's WebSocket endpoint delivers per-account notifications on named
//! channels. Only the channels that say something about a transaction's
//! lifecycle are modelled here.

use crate::{StatusRecord, TargetGroup, TransactionGroup, TransactionHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Code attached to records built from `*Added` notifications.
pub const SUCCESS_CODE: &str = "Success";

/// Code attached to `status` notifications that arrive without one.
pub const UNKNOWN_FAILURE_CODE: &str = "Unknown";

/// Notification channel category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelCategory {
	ConfirmedAdded,
	UnconfirmedAdded,
	PartialAdded,
	/// Error channel; the node publishes rejections here.
	Status,
}

impl ChannelCategory {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::ConfirmedAdded => "confirmedAdded",
			Self::UnconfirmedAdded => "unconfirmedAdded",
			Self::PartialAdded => "partialAdded",
			Self::Status => "status",
		}
	}

	/// Group implied by a notification on this channel.
	pub fn group(&self) -> TransactionGroup {
		match self {
			Self::ConfirmedAdded => TransactionGroup::Confirmed,
			Self::UnconfirmedAdded => TransactionGroup::Unconfirmed,
			Self::PartialAdded => TransactionGroup::Partial,
			Self::Status => TransactionGroup::Failed,
		}
	}

	/// Subscription channel name for an account.
	pub fn channel(&self, address: &str) -> String {
		format!("{}/{}", self.as_str(), address)
	}

	/// Category of a pushed topic such as `confirmedAdded/TAXXX...`.
	pub fn from_topic(topic: &str) -> Option<Self> {
		let name = topic.split('/').next().unwrap_or(topic);
		match name {
			"confirmedAdded" => Some(Self::ConfirmedAdded),
			"unconfirmedAdded" => Some(Self::UnconfirmedAdded),
			"partialAdded" => Some(Self::PartialAdded),
			"status" => Some(Self::Status),
			_ => None,
		}
	}

	/// Channels a push watch needs for a target group.
	pub fn for_target(target: TargetGroup) -> Vec<Self> {
		let mut categories = vec![Self::ConfirmedAdded, Self::UnconfirmedAdded];
		if target == TargetGroup::Partial {
			categories.push(Self::PartialAdded);
		}
		categories.push(Self::Status);
		categories
	}
}

impl fmt::Display for ChannelCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A lifecycle notification for one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
	pub category: ChannelCategory,
	pub hash: TransactionHash,
	pub height: Option<u64>,
	/// Error code carried by `status` notifications.
	pub code: Option<String>,
	/// Raw notification payload.
	pub data: serde_json::Value,
}

impl StatusEvent {
	pub fn group(&self) -> TransactionGroup {
		self.category.group()
	}

	pub fn to_record(&self) -> StatusRecord {
		let code = match (&self.code, self.category) {
			(Some(code), _) => code.clone(),
			(None, ChannelCategory::Status) => UNKNOWN_FAILURE_CODE.to_string(),
			(None, _) => SUCCESS_CODE.to_string(),
		};
		StatusRecord {
			hash: self.hash,
			group: self.group(),
			code,
			height: self.height,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_topic() {
		assert_eq!(
			ChannelCategory::from_topic("confirmedAdded/TBXUTAX6O6EUVPB6X7OBNX6UUXBMPPAFX7KE5TQ"),
			Some(ChannelCategory::ConfirmedAdded)
		);
		assert_eq!(
			ChannelCategory::from_topic("status/TBXUTAX6O6EUVPB6X7OBNX6UUXBMPPAFX7KE5TQ"),
			Some(ChannelCategory::Status)
		);
		assert_eq!(ChannelCategory::from_topic("block"), None);
	}

	#[test]
	fn test_partial_channel_only_for_partial_target() {
		assert!(!ChannelCategory::for_target(TargetGroup::Confirmed)
			.contains(&ChannelCategory::PartialAdded));
		assert!(ChannelCategory::for_target(TargetGroup::Partial)
			.contains(&ChannelCategory::PartialAdded));
		assert!(ChannelCategory::for_target(TargetGroup::Unconfirmed)
			.contains(&ChannelCategory::Status));
	}

	#[test]
	fn test_status_event_without_code_is_not_success() {
		let event = StatusEvent {
			category: ChannelCategory::Status,
			hash: TransactionHash::new([9u8; 32]),
			height: None,
			code: None,
			data: serde_json::Value::Null,
		};

		let record = event.to_record();
		assert_eq!(record.group, TransactionGroup::Failed);
		assert_eq!(record.code, UNKNOWN_FAILURE_CODE);
	}

	#[test]
	fn test_status_event_to_record() {
		let event = StatusEvent {
			category: ChannelCategory::Status,
			hash: TransactionHash::new([1u8; 32]),
			height: None,
			code: Some("Failure_Core_Past_Deadline".to_string()),
			data: serde_json::Value::Null,
		};
		let record = event.to_record();
		assert_eq!(record.group, TransactionGroup::Failed);
		assert_eq!(record.code, "Failure_Core_Past_Deadline");
	}
}
