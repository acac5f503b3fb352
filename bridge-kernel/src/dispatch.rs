//! Callback entry point the native runtime drives during a prompt.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use bridge_codec::{encode_result, error_payload, parse_arguments};
use bridge_primitives::ToolId;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::ToolRegistry;

/// Outcomes that terminate a dispatch without a handler result.
///
/// These never surface to the host application as errors; every variant is
/// folded into the JSON error payload returned to the native runtime, which
/// may or may not forward it to the model.
#[derive(Debug, Error)]
enum DispatchFailure {
    #[error("tool not found")]
    ToolNotFound,
    #[error("{0}")]
    ArgumentParse(String),
    #[error("{0}")]
    Execution(String),
    #[error("tool handler panicked")]
    HandlerPanicked,
}

/// Dispatches native callbacks to registered tool handlers.
///
/// The native runtime invokes this from its own threads, any number of
/// times, while the host thread is blocked inside a prompt. Whatever
/// happens — unknown identifier, malformed input, handler fault, even a
/// handler panic — the dispatcher answers with a payload string and never
/// lets a fault escape back across the boundary.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}

impl ToolDispatcher {
    /// Creates a dispatcher over the supplied registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this dispatcher resolves identifiers against.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Executes the tool identified by `tool_id` with the supplied JSON
    /// input and returns the output payload.
    ///
    /// On success the payload is the handler's result serialized verbatim;
    /// on any failure it is `{"error": "<message>"}`.
    #[must_use]
    pub fn dispatch(&self, tool_id: ToolId, input: &str) -> String {
        debug!(tool_id = %tool_id, "tool callback received");
        match self.run(tool_id, input) {
            Ok(value) => encode_result(&value),
            Err(failure) => {
                warn!(tool_id = %tool_id, %failure, "tool callback failed");
                error_payload(&failure.to_string())
            }
        }
    }

    fn run(&self, tool_id: ToolId, input: &str) -> Result<Value, DispatchFailure> {
        let handler = self
            .registry
            .lookup(tool_id)
            .ok_or(DispatchFailure::ToolNotFound)?;

        let args = parse_arguments(input)
            .map_err(|err| DispatchFailure::ArgumentParse(err.to_string()))?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.call(&args)))
            .map_err(|_| DispatchFailure::HandlerPanicked)?;

        outcome.map_err(|fault| DispatchFailure::Execution(fault.message().to_owned()))
    }
}
