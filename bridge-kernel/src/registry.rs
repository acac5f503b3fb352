//! Process-wide table mapping tool identifiers to host handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use bridge_primitives::{ToolHandler, ToolId};
use tracing::debug;

const FIRST_TOOL_ID: u64 = 1;

struct RegistryInner {
    next_id: u64,
    entries: HashMap<u64, Arc<dyn ToolHandler>>,
}

/// Registry that hands out numeric tool identifiers and resolves them back
/// to handlers when the native runtime calls in.
///
/// Identifiers are assigned in strictly increasing order starting at 1 and
/// are never reused, even after the owning agent is discarded, so a native
/// runtime can hold one indefinitely. Registration takes the write lock;
/// lookups share the read lock and are safe concurrently with registration
/// from other threads.
///
/// The registry is an explicit value, not a process singleton: construct one
/// and hand it to whatever owns the bridge's lifecycle, so tests can build
/// independent registries.
pub struct ToolRegistry {
    inner: RwLock<RegistryInner>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().expect("tool registry poisoned");
        let mut ids: Vec<u64> = inner.entries.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("ToolRegistry")
            .field("next_id", &inner.next_id)
            .field("registered", &ids)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                next_id: FIRST_TOOL_ID,
                entries: HashMap::new(),
            }),
        }
    }

    /// Reserves the next identifier and inserts the handler atomically.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register(&self, handler: Arc<dyn ToolHandler>) -> ToolId {
        let mut inner = self.inner.write().expect("tool registry poisoned");
        let id = ToolId::new(inner.next_id);
        inner.next_id += 1;
        inner.entries.insert(id.get(), handler);
        debug!(tool_id = %id, "tool handler registered");
        id
    }

    /// Resolves an identifier to its handler.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn lookup(&self, id: ToolId) -> Option<Arc<dyn ToolHandler>> {
        let inner = self.inner.read().expect("tool registry poisoned");
        inner.entries.get(&id.get()).cloned()
    }

    /// Returns the number of registered handlers.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("tool registry poisoned").entries.len()
    }

    /// Returns `true` when no handler has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
