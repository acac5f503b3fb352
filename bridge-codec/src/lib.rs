//! Marshaling and status conventions for the bridge wire protocol.
//!
//! The native runtime answers every boundary call with a plain string and
//! expects plain strings back from tool callbacks. This crate is the single
//! place that knows how those strings are shaped: the two reply conventions
//! (a prefix-tagged form for agent creation and prompting, an ack form for
//! tool registration) and the JSON payloads exchanged with tool callbacks.
//!
//! The two reply conventions are deliberately asymmetric. The native
//! protocol is fixed, so both are reproduced byte-exactly, including the
//! one-character skip after the `ERROR:` tag.

#![warn(missing_docs, clippy::pedantic)]

mod payload;
mod status;

/// Callback argument parsing and payload encoding.
pub use payload::{encode_result, error_payload, parse_arguments};
/// Reply status conventions used by boundary calls.
pub use status::{ACK, ERROR_TAG, decode_ack, decode_tagged, encode_tagged_error};
