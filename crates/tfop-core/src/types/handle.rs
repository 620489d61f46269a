//! Opaque handles issued by the graph backend.
//!
//! Handles are plain 64-bit tokens. Zero is the "absent/failure" sentinel; any other
//! value is meaningful only to the backend that issued it.

use std::fmt;

use crate::constants::NULL_HANDLE;

/// Kind of object a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Graph,
    Op,
    Builder,
    Tensor,
}

impl HandleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HandleKind::Graph => "graph",
            HandleKind::Op => "op",
            HandleKind::Builder => "builder",
            HandleKind::Tensor => "tensor",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub const KIND: HandleKind = $kind;

            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u64 {
                self.0
            }

            pub const fn is_null(self) -> bool {
                self.0 == NULL_HANDLE
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $kind, self.0)
            }
        }
    };
}

define_handle!(
    /// Graph owned by the backend.
    GraphHandle => HandleKind::Graph
);
define_handle!(
    /// Finished operation; valid for the lifetime of its graph.
    OpHandle => HandleKind::Op
);
define_handle!(
    /// Pending operation; created by `allocate`, consumed by `finish`.
    BuilderHandle => HandleKind::Builder
);
define_handle!(
    /// Tensor created outside this surface.
    TensorHandle => HandleKind::Tensor
);

/// A specific tensor edge: the producing op and one of its output indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpOutput {
    pub op: OpHandle,
    pub index: i32,
}

impl OpOutput {
    pub fn new(op: OpHandle, index: i32) -> Self {
        Self { op, index }
    }
}

/// A consuming edge end: the consumer op and the input slot the edge feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpInput {
    pub op: OpHandle,
    pub index: i32,
}

impl OpInput {
    pub fn new(op: OpHandle, index: i32) -> Self {
        Self { op, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_is_zero() {
        assert!(OpHandle::from_raw(0).is_null());
        assert!(!GraphHandle::from_raw(12).is_null());
        assert_eq!(BuilderHandle::KIND, HandleKind::Builder);
    }

    #[test]
    fn handle_display_names_kind() {
        assert_eq!(TensorHandle::from_raw(4).to_string(), "tensor#4");
        assert_eq!(HandleKind::Op.to_string(), "op");
    }
}
