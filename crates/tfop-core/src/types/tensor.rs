//! Dense tensor content held by tensor attributes.

use std::sync::Arc;

use crate::error::{BridgeError, Result};
use crate::types::{DataType, Shape};

/// Concrete tensor: element type, fully known dimensions and raw little-endian bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue {
    dtype: DataType,
    dims: Vec<i64>,
    data: Arc<[u8]>,
}

impl TensorValue {
    /// Validates dimensions and, for fixed-width element types, the byte length.
    pub fn new(dtype: DataType, dims: Vec<i64>, data: impl Into<Arc<[u8]>>) -> Result<Self> {
        if let Some(bad) = dims.iter().find(|dim| **dim < 0) {
            return Err(BridgeError::invalid_argument(format!(
                "tensor dimension {bad} must be non-negative"
            )));
        }
        let data = data.into();
        if let Some(width) = dtype.byte_size() {
            let elements = dims
                .iter()
                .try_fold(1usize, |acc, dim| acc.checked_mul(*dim as usize))
                .ok_or_else(|| {
                    BridgeError::invalid_argument("tensor element count overflows")
                })?;
            let expected = elements.checked_mul(width).ok_or_else(|| {
                BridgeError::invalid_argument("tensor byte length overflows")
            })?;
            if expected != data.len() {
                return Err(BridgeError::invalid_argument(format!(
                    "{dtype} tensor of shape {:?} needs {expected} bytes, got {}",
                    dims,
                    data.len()
                )));
            }
        }
        Ok(Self { dtype, dims, data })
    }

    pub fn scalar_f32(value: f32) -> Self {
        Self {
            dtype: DataType::Float,
            dims: Vec::new(),
            data: Arc::from(value.to_le_bytes().as_slice()),
        }
    }

    pub fn scalar_i32(value: i32) -> Self {
        Self {
            dtype: DataType::Int32,
            dims: Vec::new(),
            data: Arc::from(value.to_le_bytes().as_slice()),
        }
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn dims(&self) -> &[i64] {
        &self.dims
    }

    pub fn shape(&self) -> Shape {
        Shape::known(self.dims.clone())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
