//! Readable rendering of node payloads.
//!
//! The node returns transaction messages and metadata values as hex. For
//! display they are decoded back to text wherever that is possible.

use serde_json::Value;

/// Fields whose values are hex-encoded bytes.
const HEX_TEXT_FIELDS: [&str; 2] = ["message", "value"];

/// Recursively decodes hex-encoded text fields in a JSON document.
///
/// A leading zero byte on a message is its plain-text type marker and is
/// dropped. Values that are not valid hex or not valid UTF-8 are kept as is.
pub fn decode_hex_fields(value: Value) -> Value {
	match value {
		Value::Object(map) => Value::Object(
			map.into_iter()
				.map(|(key, value)| {
					let value = match value {
						Value::String(s) if HEX_TEXT_FIELDS.contains(&key.as_str()) => {
							Value::String(decode_hex_text(&s).unwrap_or(s))
						}
						other => decode_hex_fields(other),
					};
					(key, value)
				})
				.collect(),
		),
		Value::Array(items) => Value::Array(items.into_iter().map(decode_hex_fields).collect()),
		other => other,
	}
}

fn decode_hex_text(s: &str) -> Option<String> {
	let bytes = hex::decode(s).ok()?;
	let text = match bytes.split_first() {
		Some((0, rest)) => rest,
		_ => &bytes[..],
	};
	String::from_utf8(text.to_vec()).ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_decodes_nested_message() {
		let input = json!({
			"meta": { "height": "10" },
			"transaction": {
				"message": "0048656C6C6F2C2053796D626F6C21",
				"mosaics": [{ "id": "72C0212E67A08BCE", "amount": "1000000" }]
			}
		});

		let out = decode_hex_fields(input);
		assert_eq!(out["transaction"]["message"], "Hello, Symbol!");
		assert_eq!(out["transaction"]["mosaics"][0]["id"], "72C0212E67A08BCE");
		assert_eq!(out["meta"]["height"], "10");
	}

	#[test]
	fn test_keeps_undecodable_values() {
		let out = decode_hex_fields(json!([{ "value": "not hex" }, { "value": "FF" }]));
		assert_eq!(out[0]["value"], "not hex");
		assert_eq!(out[1]["value"], "FF");
	}

	#[test]
	fn test_metadata_value_without_marker() {
		let out = decode_hex_fields(json!({ "value": "74657374" }));
		assert_eq!(out["value"], "test");
	}
}
