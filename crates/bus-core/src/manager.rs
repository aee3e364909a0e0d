//! # Channel Manager - Concurrency-Safe Channel Registry
//!
//! Keeps the name → [`Channel`] mapping for one bus instance. Creation is
//! atomic under the registry write lock, so concurrent callers asking for
//! the same name always end up sharing exactly one channel instance.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::bus::EventBus;
use crate::channel::Channel;
use crate::error::BusError;

/// Registry of channels for a single bus instance.
///
/// Channels are independent of each other; the registry lock is only held
/// for map lookups and insertions, never during dispatch.
pub struct ChannelManager {
    /// Identity of the bus this registry belongs to.
    bus_id: Uuid,

    /// Name → channel mapping.
    channels: RwLock<HashMap<String, Arc<Channel>>>,
}

impl ChannelManager {
    /// Creates a registry bound to `bus`.
    #[must_use]
    pub fn new(bus: &EventBus) -> Self {
        Self::with_bus_id(bus.id())
    }

    /// Creates a registry for the bus with identity `bus_id`.
    ///
    /// Used by [`EventBus`] while constructing its own registry.
    pub(crate) fn with_bus_id(bus_id: Uuid) -> Self {
        Self {
            bus_id,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the channel registered under `name`, creating it first if
    /// necessary.
    ///
    /// When `name` is already registered, the existing channel is returned
    /// unchanged: channel identity per name is unique bus-wide, and
    /// replacing the instance would orphan its registered handlers.
    pub fn create_channel(&self, name: &str) -> Arc<Channel> {
        let mut channels = self.channels.write();
        if let Some(existing) = channels.get(name) {
            return Arc::clone(existing);
        }

        let channel = Arc::new(Channel::new(name));
        channels.insert(name.to_string(), Arc::clone(&channel));
        debug!(bus = %self.bus_id, channel = name, "Channel created");
        channel
    }

    /// Looks up the channel registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ChannelNotFound`] when no channel carries the
    /// name — distinct from an existing channel with no handlers.
    pub fn get_channel(&self, name: &str) -> Result<Arc<Channel>, BusError> {
        self.channels
            .read()
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| BusError::ChannelNotFound {
                name: name.to_string(),
            })
    }

    /// Returns `true` if a channel is registered under `name`.
    #[must_use]
    pub fn check_channel_exists(&self, name: &str) -> bool {
        self.channels.read().contains_key(name)
    }

    /// Removes the channel registered under `name`; no-op if absent.
    ///
    /// Callers still holding an `Arc<Channel>` keep a working channel;
    /// it is simply no longer reachable through the registry.
    pub fn destroy_channel(&self, name: &str) {
        if self.channels.write().remove(name).is_some() {
            debug!(bus = %self.bus_id, channel = name, "Channel destroyed");
        }
    }

    /// Returns the number of registered channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Returns the identity of the bus this registry belongs to.
    #[must_use]
    pub fn bus_id(&self) -> Uuid {
        self.bus_id
    }
}
