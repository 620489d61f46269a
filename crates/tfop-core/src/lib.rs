//! tfop Core - Types shared by every layer of the op bridge.
//!
//! This crate provides the handle newtypes, data types, shapes, attribute values
//! and the error taxonomy that the graph backend and the host entry points agree on.

pub mod constants;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{BridgeError, Code, ErrorKind, Result, Status, StatusResult};

pub use types::{
    AttrKind, AttrValue, BuilderHandle, DataType, GraphHandle, HandleKind, OpHandle, OpInput,
    OpOutput, Shape, TensorHandle, TensorValue,
};
