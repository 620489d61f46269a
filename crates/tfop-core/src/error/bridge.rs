//! Errors surfaced to the host runtime.
//!
//! Every entry point reports failures through [`BridgeError`]. The host glue maps
//! each [`ErrorKind`] onto a host exception class; the first five kinds map to
//! distinct classes, backend and resource failures share a generic runtime error.

use thiserror::Error as ThisError;

use crate::error::status::{Code, Status};
use crate::types::HandleKind;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Coarse classification of a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidHandle,
    OutOfRange,
    InvalidArgument,
    FailedPrecondition,
    NotFound,
    Backend,
    ResourceExhausted,
}

/// Bridge error variants
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// Zero handle, unknown handle, or a handle of another kind
    #[error("Invalid {kind} handle: {handle}")]
    InvalidHandle {
        /// Kind the caller expected.
        kind: HandleKind,
        /// Raw handle value received.
        handle: u64,
    },

    /// Index outside `[0, count)`
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Malformed argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not valid in the current state
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// Named entity not present
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other status reported by the backend
    #[error("Backend error ({code}): {message}")]
    Backend {
        /// Backend status code.
        code: Code,
        /// Backend message, carried through verbatim.
        message: String,
    },

    /// Allocation failure while marshaling
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),
}

impl BridgeError {
    pub fn invalid_handle(kind: HandleKind, handle: u64) -> Self {
        Self::InvalidHandle { kind, handle }
    }

    pub fn out_of_range(what: &str, index: i64, bound: i64) -> Self {
        Self::OutOfRange(format!("{what} index {index} is not in [0, {bound})"))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::FailedPrecondition(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::ResourceExhausted(message.into())
    }

    pub fn backend(code: Code, message: impl Into<String>) -> Self {
        Self::Backend {
            code,
            message: message.into(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHandle { .. } => ErrorKind::InvalidHandle,
            Self::OutOfRange(_) => ErrorKind::OutOfRange,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Backend { .. } => ErrorKind::Backend,
            Self::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidHandle => "invalid_handle",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::FailedPrecondition => "failed_precondition",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Backend => "backend",
            ErrorKind::ResourceExhausted => "resource_exhausted",
        }
    }

    /// Check if the caller can fix the error by changing its arguments
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Backend | ErrorKind::ResourceExhausted)
    }
}

impl From<Status> for BridgeError {
    fn from(status: Status) -> Self {
        let Status { code, message } = status;
        match code {
            Code::InvalidArgument => Self::InvalidArgument(message),
            Code::FailedPrecondition => Self::FailedPrecondition(message),
            Code::NotFound => Self::NotFound(message),
            Code::ResourceExhausted => Self::ResourceExhausted(message),
            Code::OutOfRange => Self::OutOfRange(message),
            other => Self::Backend {
                code: other,
                message,
            },
        }
    }
}
