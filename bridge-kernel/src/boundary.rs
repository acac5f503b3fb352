//! Call surface exposed by the native agent runtime.

use bridge_primitives::{AgentHandle, ToolId};

/// The three host-to-native calls the bridge performs.
///
/// Every call is synchronous and blocking: the calling thread is suspended
/// until the native side answers, and there is no cancellation or timeout at
/// this layer. Implementations return the raw reply string; interpreting the
/// success/error conventions is the caller's job via [`bridge_codec`].
///
/// `Send + Sync` is required because the native runtime may call back into
/// the dispatcher from its own threads while a host thread is blocked inside
/// one of these calls.
pub trait NativeBoundary: Send + Sync {
    /// Creates a native agent and answers with its opaque handle, or a
    /// prefix-tagged error.
    fn create_agent(
        &self,
        name: &str,
        model: &str,
        api_key: &str,
        base_url: &str,
        preamble: &str,
    ) -> String;

    /// Registers a tool with an already created agent and answers with the
    /// ack literal, or the error message verbatim.
    fn register_tool(
        &self,
        handle: &AgentHandle,
        name: &str,
        description: &str,
        schema_json: &str,
        tool_id: ToolId,
    ) -> String;

    /// Sends a prompt to an agent and answers with the response text, or a
    /// prefix-tagged error.
    fn send_prompt(&self, handle: &AgentHandle, prompt: &str) -> String;
}
