//! Error handling for the op bridge.
//!
//! Two layers meet here:
//! - [`Status`] is the backend's status channel: a TensorFlow-style [`Code`] and a
//!   human-readable message, returned by every fallible backend call.
//! - [`BridgeError`] is the taxonomy surfaced to the host runtime. Backend statuses
//!   are translated into it at the bridge boundary.

/// Errors surfaced to the host runtime.
pub mod bridge;
/// Backend status channel.
pub mod status;

pub use bridge::{BridgeError, ErrorKind, Result};
pub use status::{Code, Status, StatusResult};
