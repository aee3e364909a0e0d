//! # Bus Bridge - Broker Collaborator Handles
//!
//! Handles representing live state on an external message broker. A
//! [`Connection`] stands for an open link to a broker; a [`Subscription`]
//! stands for one broker-side subscription reached over such a link.
//!
//! The channel dispatch core only records which subscriptions currently
//! back a channel. Wire protocol, authentication, and reconnection all
//! belong to the bridge layer that creates these handles.
//!
//! Identity comparisons are by `id` alone; two handles with the same id
//! refer to the same broker-side entity regardless of their other fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle for an open connection to an external broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identity of this connection instance.
    pub id: Uuid,

    /// Broker endpoint this connection is attached to.
    pub broker_url: String,
}

impl Connection {
    /// Creates a handle for a connection to `broker_url`.
    #[must_use]
    pub fn new(broker_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            broker_url: broker_url.into(),
        }
    }
}

/// Handle for a live broker-side subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identity of this subscription instance.
    pub id: Uuid,

    /// Broker destination the subscription is bound to.
    pub destination: String,
}

impl Subscription {
    /// Creates a handle for a subscription to `destination`.
    #[must_use]
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            destination: destination.into(),
        }
    }
}
