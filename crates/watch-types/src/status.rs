//! Transaction status types.
//!
//! The node sorts every transaction it knows about into a lifecycle group.
//! These types model that report as observed by a watcher.

use crate::TransactionHash;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result code the node uses when it has no record of a hash.
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFound";

/// Node-reported lifecycle bucket of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionGroup {
	/// Not yet propagated to or indexed by the queried node.
	NotFound,
	/// Accepted into the node's unconfirmed pool.
	Unconfirmed,
	/// Aggregate bonded transaction waiting for cosignatures.
	Partial,
	/// Included in a block.
	Confirmed,
	/// Rejected by the node.
	Failed,
}

impl TransactionGroup {
	/// Whether the node will never report another group for this hash.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Confirmed | Self::Failed)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::NotFound => "not_found",
			Self::Unconfirmed => "unconfirmed",
			Self::Partial => "partial",
			Self::Confirmed => "confirmed",
			Self::Failed => "failed",
		}
	}
}

impl fmt::Display for TransactionGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Group a caller can wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGroup {
	Unconfirmed,
	Partial,
	#[default]
	Confirmed,
}

impl TargetGroup {
	pub fn group(&self) -> TransactionGroup {
		match self {
			Self::Unconfirmed => TransactionGroup::Unconfirmed,
			Self::Partial => TransactionGroup::Partial,
			Self::Confirmed => TransactionGroup::Confirmed,
		}
	}

	/// Whether an observed group satisfies this target.
	///
	/// Confirmation is final, so it satisfies any earlier target as well.
	pub fn is_reached_by(&self, observed: TransactionGroup) -> bool {
		observed == self.group() || observed == TransactionGroup::Confirmed
	}
}

impl fmt::Display for TargetGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.group().fmt(f)
	}
}

impl FromStr for TargetGroup {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"unconfirmed" => Ok(Self::Unconfirmed),
			"partial" => Ok(Self::Partial),
			"confirmed" => Ok(Self::Confirmed),
			other => Err(format!(
				"unknown target group '{}', expected unconfirmed, partial or confirmed",
				other
			)),
		}
	}
}

/// One status observation for a transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
	pub hash: TransactionHash,
	pub group: TransactionGroup,
	/// Result or error label reported by the node.
	pub code: String,
	/// Block height, present once the transaction is included.
	pub height: Option<u64>,
}

impl StatusRecord {
	pub fn not_found(hash: TransactionHash) -> Self {
		Self {
			hash,
			group: TransactionGroup::NotFound,
			code: RESOURCE_NOT_FOUND.to_string(),
			height: None,
		}
	}

	pub fn new(hash: TransactionHash, group: TransactionGroup, code: impl Into<String>) -> Self {
		Self {
			hash,
			group,
			code: code.into(),
			height: None,
		}
	}

	pub fn with_height(mut self, height: u64) -> Self {
		self.height = Some(height);
		self
	}
}

/// Deserializes an optional u64 that the node may encode as a string.
///
/// Symbol REST renders 64-bit integers as decimal strings, but some gateways
/// and test fixtures use plain numbers.
pub fn deserialize_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum StringOrNumber {
		String(String),
		Number(u64),
	}

	match Option::<StringOrNumber>::deserialize(deserializer)? {
		None => Ok(None),
		Some(StringOrNumber::Number(n)) => Ok(Some(n)),
		Some(StringOrNumber::String(s)) => s
			.parse::<u64>()
			.map(Some)
			.map_err(|_| serde::de::Error::custom(format!("invalid integer: {}", s))),
	}
}

/// Same as [`deserialize_opt_u64`] for required fields.
pub fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	deserialize_opt_u64(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing integer"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_terminal_groups() {
		assert!(TransactionGroup::Confirmed.is_terminal());
		assert!(TransactionGroup::Failed.is_terminal());
		assert!(!TransactionGroup::Unconfirmed.is_terminal());
		assert!(!TransactionGroup::Partial.is_terminal());
		assert!(!TransactionGroup::NotFound.is_terminal());
	}

	#[test]
	fn test_target_reached() {
		assert!(TargetGroup::Partial.is_reached_by(TransactionGroup::Partial));
		assert!(!TargetGroup::Partial.is_reached_by(TransactionGroup::Unconfirmed));
		assert!(TargetGroup::Unconfirmed.is_reached_by(TransactionGroup::Confirmed));
		assert!(!TargetGroup::Confirmed.is_reached_by(TransactionGroup::Unconfirmed));
		assert!(!TargetGroup::Confirmed.is_reached_by(TransactionGroup::Failed));
	}

	#[test]
	fn test_target_from_str() {
		assert_eq!("Partial".parse::<TargetGroup>(), Ok(TargetGroup::Partial));
		assert!("failed".parse::<TargetGroup>().is_err());
	}

	#[test]
	fn test_height_accepts_string_or_number() {
		#[derive(Deserialize)]
		struct HeightHolder {
			#[serde(default, deserialize_with = "deserialize_opt_u64")]
			height: Option<u64>,
		}

		let a: HeightHolder = serde_json::from_str(r#"{"height":"1234"}"#).unwrap();
		let b: HeightHolder = serde_json::from_str(r#"{"height":1234}"#).unwrap();
		let c: HeightHolder = serde_json::from_str(r#"{}"#).unwrap();
		assert_eq!(a.height, Some(1234));
		assert_eq!(b.height, Some(1234));
		assert_eq!(c.height, None);
		assert!(serde_json::from_str::<HeightHolder>(r#"{"height":"12x"}"#).is_err());
	}
}
