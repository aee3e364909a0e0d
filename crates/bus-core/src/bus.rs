//! # EventBus - Process-Wide Bus Context
//!
//! The bus is a plain context object: a unique identity plus the channel
//! registry built on it. Components that need the bus take it as an
//! explicit dependency; for compatibility with single-bus deployments a
//! process-wide instance is available through [`EventBus::global`].

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;
use uuid::Uuid;

use crate::manager::ChannelManager;

/// The process-wide bus instance.
///
/// Initialized exactly once on first access; lives until process exit.
static GLOBAL_BUS: Lazy<Arc<EventBus>> = Lazy::new(|| {
    let bus = Arc::new(EventBus::new());
    debug!(bus = %bus.id(), "Global bus initialized");
    bus
});

/// A bus instance: identity plus its channel registry.
///
/// Prefer constructing a bus explicitly and passing it to the components
/// that need it; [`EventBus::global`] exists for code paths that expect a
/// single shared bus per process.
pub struct EventBus {
    /// Unique identity of this bus instance.
    id: Uuid,

    /// The channel registry owned by this bus.
    manager: ChannelManager,
}

impl EventBus {
    /// Creates a new bus with an empty channel registry.
    #[must_use]
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            manager: ChannelManager::with_bus_id(id),
        }
    }

    /// Returns the process-wide bus instance.
    ///
    /// Idempotent: the first call initializes shared state, later calls
    /// return the same instance.
    #[must_use]
    pub fn global() -> &'static Arc<EventBus> {
        &GLOBAL_BUS
    }

    /// Returns this bus instance's identity.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the channel registry owned by this bus.
    #[must_use]
    pub fn manager(&self) -> &ChannelManager {
        &self.manager
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
