//! Tool descriptors and the host-side handler contract.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::ParameterSchema;

/// Result alias for handler invocations.
pub type HandlerResult = Result<Value, ToolFault>;

/// Failure reported by a tool handler.
///
/// Only the message crosses back to the native runtime, so this carries
/// nothing else.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ToolFault {
    message: String,
}

impl ToolFault {
    /// Creates a fault from the supplied message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the fault message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Trait implemented by host-defined tool handlers.
///
/// Handlers are synchronous: the native runtime blocks inside the callback
/// until a result is produced, so there is nothing to await. They must be
/// `Send + Sync` because the native runtime invokes them from its own
/// threads.
pub trait ToolHandler: Send + Sync {
    /// Invokes the tool with the parsed argument object, returning a
    /// JSON-serializable result or a fault.
    ///
    /// # Errors
    ///
    /// Returns [`ToolFault`] when the tool cannot produce a result.
    fn call(&self, args: &Map<String, Value>) -> HandlerResult;
}

impl<F> ToolHandler for F
where
    F: Send + Sync + Fn(&Map<String, Value>) -> HandlerResult,
{
    fn call(&self, args: &Map<String, Value>) -> HandlerResult {
        (self)(args)
    }
}

/// Errors produced while constructing a tool descriptor.
#[derive(Debug, Error)]
pub enum ToolSpecError {
    /// Descriptor fields failed validation.
    #[error("invalid tool spec: {reason}")]
    Invalid {
        /// Human-readable reason for rejection.
        reason: String,
    },
}

/// Descriptor for a tool the host exposes to the native runtime.
///
/// Bundles the advertised metadata (name, description, parameter schema)
/// with the handler the dispatcher executes when the native runtime calls
/// back.
#[derive(Clone)]
pub struct ToolSpec {
    name: String,
    description: String,
    parameters: ParameterSchema,
    handler: Arc<dyn ToolHandler>,
}

impl ToolSpec {
    /// Creates a tool descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ToolSpecError::Invalid`] when the name is empty.
    pub fn new<H>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
        handler: H,
    ) -> Result<Self, ToolSpecError>
    where
        H: ToolHandler + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ToolSpecError::Invalid {
                reason: "tool name cannot be empty".into(),
            });
        }

        Ok(Self {
            name,
            description: description.into(),
            parameters,
            handler: Arc::new(handler),
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the advertised parameter schema.
    #[must_use]
    pub fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    /// Returns a shared reference to the handler.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
