//! Transaction hash representation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a Symbol transaction hash.
pub const HASH_LENGTH: usize = 32;

/// Content-derived identifier of a transaction.
///
/// Correlates an announced payload with the status the node reports for it.
/// Rendered as upper-case hex, which is how the node echoes hashes back.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHash([u8; HASH_LENGTH]);

/// Error returned when a string is not a valid transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashParseError {
	#[error("expected {expected} hex characters, got {actual}")]
	InvalidLength { expected: usize, actual: usize },
	#[error("invalid hex: {0}")]
	InvalidHex(String),
}

impl TransactionHash {
	pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
		&self.0
	}

	/// Short form for log lines.
	pub fn short(&self) -> String {
		format!("{}..", &self.to_string()[..8])
	}
}

impl FromStr for TransactionHash {
	type Err = HashParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let s = s
			.strip_prefix("0x")
			.or_else(|| s.strip_prefix("0X"))
			.unwrap_or(s);

		if s.len() != HASH_LENGTH * 2 {
			return Err(HashParseError::InvalidLength {
				expected: HASH_LENGTH * 2,
				actual: s.len(),
			});
		}

		let mut bytes = [0u8; HASH_LENGTH];
		hex::decode_to_slice(s, &mut bytes)
			.map_err(|e| HashParseError::InvalidHex(e.to_string()))?;
		Ok(Self(bytes))
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&hex::encode_upper(self.0))
	}
}

impl fmt::Debug for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TransactionHash({})", self)
	}
}

impl From<[u8; HASH_LENGTH]> for TransactionHash {
	fn from(bytes: [u8; HASH_LENGTH]) -> Self {
		Self(bytes)
	}
}

impl Serialize for TransactionHash {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for TransactionHash {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}
