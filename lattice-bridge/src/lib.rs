//! Host-side SDK facade for the Lattice native agent runtime.
//!
//! Depend on this crate via `cargo add lattice-bridge`. It bundles the
//! bridge crates behind feature flags so embedders can pull in only what
//! they need; the `native-runtime` feature additionally links the native
//! library and exports the tool callback entry point.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use bridge_primitives as primitives;

/// Wire-protocol marshaling and status conventions (enabled by `codec`).
#[cfg(feature = "codec")]
pub use bridge_codec as codec;

/// Registry, dispatcher, and agent handle manager (enabled by `kernel`).
#[cfg(feature = "kernel")]
pub use bridge_kernel as kernel;
