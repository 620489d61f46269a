//! JNI glue around the process-wide [`OpBridge`](crate::OpBridge).
//!
//! Every export runs inside [`exceptions::guard`], which catches panics, raises the
//! mapped Java exception on failure and returns the export's sentinel value.

pub mod exceptions;
pub mod exports;
pub mod global;
pub mod lifecycle;
pub mod marshal;

pub use global::bridge;
