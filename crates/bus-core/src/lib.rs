//! # Bus Core - Channel Dispatch Engine
//!
//! The heart of the bus: named channels fan messages out to local handlers
//! concurrently, track which external broker subscriptions currently back
//! them, and live in a concurrency-safe registry.
//!
//! ## Dispatch Model
//!
//! ```text
//! ┌──────────────┐   send(msg)    ┌─────────────────────────────┐
//! │  Publisher   │ ─────────────► │  Channel                    │
//! └──────────────┘                │  ├─ spawn handler task ───► │──► handler A
//!                                 │  ├─ spawn handler task ───► │──► handler B
//!                                 │  └─ spawn handler task ───► │──► handler C
//!                                 └─────────────────────────────┘
//!                                        │
//!                                        ▼  join().await
//!                                 all spawned tasks complete
//! ```
//!
//! `send` schedules one task per registered handler and returns
//! immediately; `join` lets a caller block until every task spawned by
//! in-flight sends has finished. Run-once handlers fire at most once and
//! are compacted out of the handler list on the next dispatch pass.
//!
//! ## Federation
//!
//! Channels can be marked `private` (never bridged) or `galactic`
//! (mirrored to a broker destination). The bridge layer reads these flags
//! and records its live broker subscriptions on the channel; the core
//! itself never talks to a broker.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bus;
pub mod channel;
pub mod error;
pub mod manager;

// Re-export main types
pub use bus::EventBus;
pub use channel::{Channel, ChannelEventHandler, HandlerFn};
pub use error::BusError;
pub use manager::ChannelManager;
