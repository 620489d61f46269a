//! Value types that cross the bridge.

pub mod attr;
pub mod dtype;
pub mod handle;
pub mod shape;
pub mod tensor;

pub use attr::{AttrKind, AttrValue};
pub use dtype::DataType;
pub use handle::{BuilderHandle, GraphHandle, HandleKind, OpHandle, OpInput, OpOutput, TensorHandle};
pub use shape::{Shape, ShapeConflict};
pub use tensor::TensorValue;
