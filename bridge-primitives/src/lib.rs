//! Core shared types for the Lattice bridge.
//!
//! These primitives describe everything that crosses the boundary between the
//! host application and the native agent runtime: numeric tool identifiers,
//! opaque agent handles, parameter schemas, and the handler contract that
//! host-defined tools implement.

#![warn(missing_docs, clippy::pedantic)]

mod ids;
mod schema;
mod tool;

/// Identifier types exchanged with the native runtime.
pub use ids::{AgentHandle, ToolId};
/// Parameter schema data model and its validating builder.
pub use schema::{ParameterSchema, ParameterSchemaBuilder, PropertySpec, SchemaError, SchemaResult};
/// Tool descriptors and the host-side handler contract.
pub use tool::{HandlerResult, ToolFault, ToolHandler, ToolSpec, ToolSpecError};
