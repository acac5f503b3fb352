//! Reply status conventions used by boundary calls.

/// Tag that marks a reply from `create_agent` or `send_prompt` as an error.
pub const ERROR_TAG: &str = "ERROR:";

/// The only reply `register_tool` treats as success.
pub const ACK: &str = "OK";

/// Decodes a prefix-tagged reply (agent creation and prompting).
///
/// A reply longer than the tag whose first six bytes equal `ERROR:` is an
/// error; the message starts one character after the colon, because the
/// native runtime always emits `ERROR: <message>` with a separator space.
/// A message whose first character is not a separator loses that character;
/// the protocol is fixed, so the skip is reproduced as-is. Any other reply
/// is the success payload verbatim.
///
/// # Errors
///
/// Returns the extracted error message when the reply carries the tag.
pub fn decode_tagged(reply: &str) -> Result<&str, &str> {
    if reply.len() > ERROR_TAG.len() && reply.as_bytes().starts_with(ERROR_TAG.as_bytes()) {
        let mut tail = reply[ERROR_TAG.len()..].chars();
        tail.next();
        return Err(tail.as_str());
    }
    Ok(reply)
}

/// Encodes an error message in the prefix-tagged form the native runtime
/// emits. Kept for protocol symmetry and test fixtures.
#[must_use]
pub fn encode_tagged_error(message: &str) -> String {
    format!("{ERROR_TAG} {message}")
}

/// Decodes an ack reply (tool registration).
///
/// Success is exact equality with `OK`; any other reply is the entire error
/// message verbatim, with no tag parsing.
///
/// # Errors
///
/// Returns the reply itself when it is not the ack literal.
pub fn decode_ack(reply: &str) -> Result<(), &str> {
    if reply == ACK { Ok(()) } else { Err(reply) }
}
