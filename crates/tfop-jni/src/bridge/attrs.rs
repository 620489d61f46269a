//! Attribute read-back for finished ops.
//!
//! Only string, string-list, type and shape attributes can be read back; the host
//! class has no int, float or bool getters.

use tfop_core::{AttrKind, AttrValue, BridgeError, Result};
use tfop_graph::GraphBackend;

use super::OpBridge;

impl<B: GraphBackend> OpBridge<B> {
    fn attr(&self, op: u64, name: &str) -> Result<AttrValue> {
        Ok(self.backend.attr_value(self.resolve_op(op)?, name)?)
    }

    pub fn get_attr_string(&self, op: u64, name: &str) -> Result<Vec<u8>> {
        match self.attr(op, name)? {
            AttrValue::String(value) => Ok(value),
            other => Err(mismatch(name, AttrKind::String, &other)),
        }
    }

    pub fn get_attr_string_list(&self, op: u64, name: &str) -> Result<Vec<Vec<u8>>> {
        match self.attr(op, name)? {
            AttrValue::StringList(values) => Ok(values),
            other => Err(mismatch(name, AttrKind::StringList, &other)),
        }
    }

    /// Data type code of a `type` attribute.
    pub fn get_attr_type(&self, op: u64, name: &str) -> Result<i32> {
        match self.attr(op, name)? {
            AttrValue::Type(dtype) => Ok(dtype.code()),
            other => Err(mismatch(name, AttrKind::Type, &other)),
        }
    }

    /// Dims of a `shape` attribute, `None` for unknown rank.
    pub fn get_attr_shape(&self, op: u64, name: &str) -> Result<Option<Vec<i64>>> {
        match self.attr(op, name)? {
            AttrValue::Shape(shape) => Ok(shape.to_wire()),
            other => Err(mismatch(name, AttrKind::Shape, &other)),
        }
    }
}

fn mismatch(name: &str, expected: AttrKind, actual: &AttrValue) -> BridgeError {
    BridgeError::invalid_argument(format!(
        "attribute '{name}' is a {}, not a {expected}",
        actual.kind()
    ))
}
