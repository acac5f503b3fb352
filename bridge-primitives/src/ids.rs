//! Identifier types exchanged with the native runtime.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Numeric identifier the native runtime presents when it wants a
/// host-registered tool executed.
///
/// Tool identifiers stand in for function references, which must never cross
/// the ownership boundary directly. They are assigned by the registry in
/// strictly increasing order starting at 1 and are never reused, so the
/// native side can hold one for as long as it likes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(u64);

impl ToolId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ToolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for ToolId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ToolId> for u64 {
    fn from(value: ToolId) -> Self {
        value.0
    }
}

/// Opaque identifier the native runtime assigns to a created agent.
///
/// The host never synthesizes or inspects handle contents; it only echoes
/// them back on subsequent boundary calls.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentHandle(String);

impl AgentHandle {
    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the handle and returns the underlying string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for AgentHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<String> for AgentHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AgentHandle {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
