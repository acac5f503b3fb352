//! Agent configuration and handle management.

use std::fmt;
use std::sync::Arc;

use bridge_codec::{decode_ack, decode_tagged};
use bridge_primitives::{AgentHandle, ToolSpec};
use thiserror::Error;
use tracing::{info, warn};

use crate::{NativeBoundary, ToolRegistry};

/// Result alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced to the host application by the bridge.
///
/// Boundary-reported failures carry only the message string extracted from
/// the reply; no structured error kind crosses the boundary.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Agent configuration failed validation before any boundary crossing.
    #[error("invalid agent configuration: {0}")]
    InvalidConfig(&'static str),

    /// The native runtime rejected agent creation.
    #[error("native runtime rejected agent creation: {message}")]
    ConfigurationRejected {
        /// Message extracted from the tagged reply.
        message: String,
    },

    /// A prompt was issued before a successful initialization.
    #[error("agent is not initialized")]
    NotInitialized,

    /// Initialization was attempted twice.
    #[error("agent is already initialized")]
    AlreadyInitialized,

    /// The native runtime rejected a tool registration; registrations that
    /// preceded the failing one remain in place.
    #[error("native runtime rejected tool `{tool}`: {message}")]
    ToolRegistrationFailed {
        /// Name of the tool whose registration failed.
        tool: String,
        /// Reply message, verbatim.
        message: String,
    },

    /// The native runtime rejected a prompt.
    #[error("native runtime rejected prompt: {message}")]
    PromptRejected {
        /// Message extracted from the tagged reply.
        message: String,
    },
}

/// API credentials forwarded to the native runtime.
///
/// Always supplied by the caller; the bridge never reads the process
/// environment.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Credentials {
    api_key: String,
    base_url: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Immutable agent configuration, assembled in one step.
///
/// Tool order is significant: registration during initialization happens in
/// exactly this order, and the configuration is consumed only then —
/// there is no way to add tools after the agent exists natively.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    name: String,
    model: String,
    credentials: Credentials,
    preamble: String,
    tools: Vec<ToolSpec>,
}

impl AgentConfig {
    /// Starts building a configuration for the named agent and model.
    #[must_use]
    pub fn builder(name: impl Into<String>, model: impl Into<String>) -> AgentConfigBuilder {
        AgentConfigBuilder {
            name: name.into(),
            model: model.into(),
            credentials: Credentials::default(),
            preamble: String::new(),
            tools: Vec::new(),
        }
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the configured credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the system preamble.
    #[must_use]
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Returns the configured tools in registration order.
    #[must_use]
    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug)]
pub struct AgentConfigBuilder {
    name: String,
    model: String,
    credentials: Credentials,
    preamble: String,
    tools: Vec<ToolSpec>,
}

impl AgentConfigBuilder {
    /// Sets the API credentials.
    #[must_use]
    pub fn credentials(mut self, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.credentials = Credentials::new(api_key, base_url);
        self
    }

    /// Sets the system preamble.
    #[must_use]
    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Appends a tool; insertion order is preserved through registration.
    #[must_use]
    pub fn tool(mut self, spec: ToolSpec) -> Self {
        self.tools.push(spec);
        self
    }

    /// Finalises the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] when the name or model is
    /// empty.
    pub fn build(self) -> BridgeResult<AgentConfig> {
        if self.name.trim().is_empty() {
            return Err(BridgeError::InvalidConfig("agent name cannot be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(BridgeError::InvalidConfig("model cannot be empty"));
        }

        Ok(AgentConfig {
            name: self.name,
            model: self.model,
            credentials: self.credentials,
            preamble: self.preamble,
            tools: self.tools,
        })
    }
}

/// Handle manager for one native agent.
///
/// Construction never crosses the boundary. [`Agent::initialize`] creates
/// the native agent and registers every configured tool; it is single-shot
/// and the handle stays unset until the whole sequence succeeds.
pub struct Agent {
    config: AgentConfig,
    registry: Arc<ToolRegistry>,
    boundary: Arc<dyn NativeBoundary>,
    handle: Option<AgentHandle>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.config.name())
            .field("model", &self.config.model())
            .field("tools", &self.config.tools().len())
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Creates an uninitialized agent from its configuration. Pure
    /// construction; no boundary crossing happens here.
    #[must_use]
    pub fn new(
        config: AgentConfig,
        registry: Arc<ToolRegistry>,
        boundary: Arc<dyn NativeBoundary>,
    ) -> Self {
        Self {
            config,
            registry,
            boundary,
            handle: None,
        }
    }

    /// Returns the configuration this agent was built from.
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Returns the native handle once initialization has succeeded.
    #[must_use]
    pub fn handle(&self) -> Option<&AgentHandle> {
        self.handle.as_ref()
    }

    /// Returns `true` once initialization has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Creates the native agent and registers every configured tool, in
    /// configuration order.
    ///
    /// Once this returns `Ok`, every configured tool has a native-side
    /// registration keyed by its registry identifier.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::AlreadyInitialized`] on a second call; nothing
    ///   crosses the boundary.
    /// - [`BridgeError::ConfigurationRejected`] when the native runtime
    ///   refuses to create the agent; the handle stays unset.
    /// - [`BridgeError::ToolRegistrationFailed`] when a tool registration is
    ///   refused. The loop aborts there: earlier tools stay registered both
    ///   in the registry and natively (the boundary has no deregistration
    ///   call), and the handle stays unset.
    pub fn initialize(&mut self) -> BridgeResult<()> {
        if self.handle.is_some() {
            return Err(BridgeError::AlreadyInitialized);
        }

        let credentials = self.config.credentials();
        let reply = self.boundary.create_agent(
            self.config.name(),
            self.config.model(),
            credentials.api_key(),
            credentials.base_url(),
            self.config.preamble(),
        );

        let handle = match decode_tagged(&reply) {
            Ok(raw) => AgentHandle::from(raw),
            Err(message) => {
                warn!(agent = self.config.name(), reason = message, "agent creation rejected");
                return Err(BridgeError::ConfigurationRejected {
                    message: message.to_owned(),
                });
            }
        };

        info!(agent = self.config.name(), handle = %handle, "native agent created");

        for spec in self.config.tools() {
            register_tool(&self.registry, self.boundary.as_ref(), &handle, spec)?;
        }

        self.handle = Some(handle);
        Ok(())
    }

    /// Sends a prompt to the initialized agent and returns the response
    /// text.
    ///
    /// While this call blocks, the native runtime may invoke the tool
    /// dispatcher any number of times from its own threads.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::NotInitialized`] before a successful
    ///   [`Agent::initialize`]; nothing crosses the boundary.
    /// - [`BridgeError::PromptRejected`] when the native runtime answers
    ///   with a tagged error.
    pub fn prompt(&self, text: &str) -> BridgeResult<String> {
        let Some(handle) = self.handle.as_ref() else {
            return Err(BridgeError::NotInitialized);
        };

        let reply = self.boundary.send_prompt(handle, text);
        match decode_tagged(&reply) {
            Ok(response) => Ok(response.to_owned()),
            Err(message) => {
                warn!(handle = %handle, reason = message, "prompt rejected");
                Err(BridgeError::PromptRejected {
                    message: message.to_owned(),
                })
            }
        }
    }
}

fn register_tool(
    registry: &ToolRegistry,
    boundary: &dyn NativeBoundary,
    handle: &AgentHandle,
    spec: &ToolSpec,
) -> BridgeResult<()> {
    let tool_id = registry.register(spec.handler());

    let schema_json = serde_json::to_string(spec.parameters()).map_err(|err| {
        BridgeError::ToolRegistrationFailed {
            tool: spec.name().to_owned(),
            message: err.to_string(),
        }
    })?;

    let reply = boundary.register_tool(
        handle,
        spec.name(),
        spec.description(),
        &schema_json,
        tool_id,
    );

    decode_ack(&reply).map_err(|message| {
        warn!(tool = spec.name(), tool_id = %tool_id, reason = message, "tool registration rejected");
        BridgeError::ToolRegistrationFailed {
            tool: spec.name().to_owned(),
            message: message.to_owned(),
        }
    })?;

    info!(tool = spec.name(), tool_id = %tool_id, handle = %handle, "tool registered");
    Ok(())
}
