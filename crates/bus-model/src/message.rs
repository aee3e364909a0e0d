//! # Message Envelope
//!
//! The universal envelope for traffic on a channel. Local handlers and the
//! broker bridge both consume the same shape; galactic traffic carries an
//! optional broker-side destination.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Direction of a message relative to the request/response flow it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Outbound request traffic.
    Request,
    /// Inbound response traffic.
    Response,
    /// Error traffic; `Message::error` carries the description.
    Error,
}

/// The envelope passed to every channel handler.
///
/// The dispatch core reads `channel` for routing and hands the whole value
/// to handlers untouched. Payloads are opaque JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identity of this message instance.
    pub id: Uuid,

    /// Name of the channel this message is addressed to.
    pub channel: String,

    /// Broker-side destination for federated traffic.
    ///
    /// `None` for purely local messages; the bridge fills this in when a
    /// galactic channel mirrors traffic outward.
    pub destination: Option<String>,

    /// Request/response/error direction marker.
    pub direction: Direction,

    /// Opaque payload. The core never inspects this.
    pub payload: Value,

    /// Error description, populated when `direction == Direction::Error`.
    pub error: Option<String>,
}

impl Message {
    /// Creates a request message for `channel`.
    #[must_use]
    pub fn request(channel: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            destination: None,
            direction: Direction::Request,
            payload,
            error: None,
        }
    }

    /// Creates a response message for `channel`.
    #[must_use]
    pub fn response(channel: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            destination: None,
            direction: Direction::Response,
            payload,
            error: None,
        }
    }

    /// Creates an error message for `channel`.
    #[must_use]
    pub fn error(channel: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            destination: None,
            direction: Direction::Error,
            payload: Value::Null,
            error: Some(description.into()),
        }
    }

    /// Sets the broker-side destination for federated delivery.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Returns `true` when this is error traffic.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.direction, Direction::Error)
    }
}
