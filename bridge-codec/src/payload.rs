//! JSON payloads exchanged with tool callbacks.

use serde_json::{Map, Value};

/// Parses callback input as a JSON object with string keys.
///
/// # Errors
///
/// Returns the deserializer error when the input is not valid JSON or not an
/// object.
pub fn parse_arguments(input: &str) -> serde_json::Result<Map<String, Value>> {
    serde_json::from_str(input)
}

/// Encodes an error payload for the native runtime.
///
/// The wire form is `{"error": "<message>"}` with a space after the colon,
/// matching what the native runtime already parses; the message itself is
/// JSON-escaped.
#[must_use]
pub fn error_payload(message: &str) -> String {
    let quoted = Value::String(message.to_owned());
    format!("{{\"error\": {quoted}}}")
}

/// Serializes a handler result verbatim.
#[must_use]
pub fn encode_result(value: &Value) -> String {
    value.to_string()
}
