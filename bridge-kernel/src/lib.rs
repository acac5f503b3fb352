//! Host-side runtime of the Lattice bridge.
//!
//! This crate owns everything between a host application and the native
//! agent engine: the concurrency-safe tool registry with its numeric
//! identifier indirection, the callback dispatcher the native runtime calls
//! into while a prompt is in flight, and the agent handle manager that
//! drives agent creation, tool registration, and prompting across the
//! boundary.
//!
//! The boundary itself is abstracted behind [`NativeBoundary`] so tests can
//! instrument every crossing; the C-ABI implementation lives in the `ffi`
//! module behind the `native-runtime` feature.

#![warn(missing_docs, clippy::pedantic)]

mod agent;
mod boundary;
mod dispatch;
mod registry;

#[cfg(feature = "native-runtime")]
pub mod ffi;

pub use agent::{Agent, AgentConfig, AgentConfigBuilder, BridgeError, BridgeResult, Credentials};
pub use boundary::NativeBoundary;
pub use dispatch::ToolDispatcher;
pub use registry::ToolRegistry;
