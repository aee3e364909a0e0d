//! # Bus Errors
//!
//! The dispatch core favors silent no-ops for caller misuse (out-of-range
//! handler removal, removing an absent broker subscription). The only
//! signaled failure is a registry lookup miss, which callers must be able
//! to distinguish from an existing-but-empty channel.

use thiserror::Error;

/// Errors from channel registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// No channel is registered under the given name.
    #[error("No channel named '{name}' is registered on the bus")]
    ChannelNotFound {
        /// The name that was looked up.
        name: String,
    },
}
