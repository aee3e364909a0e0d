//! # Bus Model - Message Envelope Types
//!
//! Defines the envelope that travels through every channel. The dispatch
//! core treats the payload as opaque JSON; only the channel name is read
//! while routing.
//!
//! ## Design Principles
//!
//! - **Immutable in transit**: handlers receive the envelope behind an
//!   `Arc` and never mutate it.
//! - **Opaque payload**: the core never inspects `payload`; serialization
//!   concerns live with the transport collaborator.

pub mod message;

pub use message::{Direction, Message};
