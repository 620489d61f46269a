//! Tensor element types.
//!
//! Codes follow the backend's `DataType` enumeration so they can cross the bridge as
//! plain integers.

use std::fmt;

use crate::error::{BridgeError, Result};

/// Enumerates tensor element types known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum DataType {
    Float = 1,
    Double = 2,
    Int32 = 3,
    UInt8 = 4,
    Int16 = 5,
    Int8 = 6,
    String = 7,
    Complex64 = 8,
    Int64 = 9,
    Bool = 10,
    QInt8 = 11,
    QUInt8 = 12,
    QInt32 = 13,
    BFloat16 = 14,
    QInt16 = 15,
    QUInt16 = 16,
    UInt16 = 17,
    Complex128 = 18,
    Half = 19,
    Resource = 20,
    Variant = 21,
    UInt32 = 22,
    UInt64 = 23,
}

impl DataType {
    pub const ALL: [DataType; 23] = [
        DataType::Float,
        DataType::Double,
        DataType::Int32,
        DataType::UInt8,
        DataType::Int16,
        DataType::Int8,
        DataType::String,
        DataType::Complex64,
        DataType::Int64,
        DataType::Bool,
        DataType::QInt8,
        DataType::QUInt8,
        DataType::QInt32,
        DataType::BFloat16,
        DataType::QInt16,
        DataType::QUInt16,
        DataType::UInt16,
        DataType::Complex128,
        DataType::Half,
        DataType::Resource,
        DataType::Variant,
        DataType::UInt32,
        DataType::UInt64,
    ];

    /// Numeric code used on the wire.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|dtype| dtype.code() == code)
    }

    /// Like [`DataType::from_code`], reporting unknown codes as invalid arguments.
    pub fn try_from_code(code: i32) -> Result<Self> {
        Self::from_code(code)
            .ok_or_else(|| BridgeError::invalid_argument(format!("unknown data type code {code}")))
    }

    /// Storage width of one element, when fixed.
    pub fn byte_size(self) -> Option<usize> {
        match self {
            DataType::Bool
            | DataType::Int8
            | DataType::UInt8
            | DataType::QInt8
            | DataType::QUInt8 => Some(1),
            DataType::Int16
            | DataType::UInt16
            | DataType::QInt16
            | DataType::QUInt16
            | DataType::BFloat16
            | DataType::Half => Some(2),
            DataType::Float | DataType::Int32 | DataType::UInt32 | DataType::QInt32 => Some(4),
            DataType::Double | DataType::Int64 | DataType::UInt64 | DataType::Complex64 => Some(8),
            DataType::Complex128 => Some(16),
            DataType::String | DataType::Resource | DataType::Variant => None,
        }
    }

    /// Name used by op definitions (`float`, `int32`, ...).
    pub fn name(self) -> &'static str {
        match self {
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Int32 => "int32",
            DataType::UInt8 => "uint8",
            DataType::Int16 => "int16",
            DataType::Int8 => "int8",
            DataType::String => "string",
            DataType::Complex64 => "complex64",
            DataType::Int64 => "int64",
            DataType::Bool => "bool",
            DataType::QInt8 => "qint8",
            DataType::QUInt8 => "quint8",
            DataType::QInt32 => "qint32",
            DataType::BFloat16 => "bfloat16",
            DataType::QInt16 => "qint16",
            DataType::QUInt16 => "quint16",
            DataType::UInt16 => "uint16",
            DataType::Complex128 => "complex128",
            DataType::Half => "half",
            DataType::Resource => "resource",
            DataType::Variant => "variant",
            DataType::UInt32 => "uint32",
            DataType::UInt64 => "uint64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_lookup() {
        for dtype in DataType::ALL {
            assert_eq!(DataType::from_code(dtype.code()), Some(dtype));
        }
        assert_eq!(DataType::Int32.code(), 3);
        assert_eq!(DataType::Float.code(), 1);
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert!(DataType::from_code(0).is_none());
        let err = DataType::try_from_code(101).expect_err("code 101 is not a dtype");
        assert!(err.to_string().contains("101"));
    }

    #[test]
    fn variable_width_types_have_no_size() {
        assert_eq!(DataType::String.byte_size(), None);
        assert_eq!(DataType::Half.byte_size(), Some(2));
        assert_eq!(DataType::Complex128.byte_size(), Some(16));
    }
}
