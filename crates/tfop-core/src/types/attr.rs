//! Attribute values stored on operations.

use std::fmt;

use crate::types::{DataType, Shape, TensorValue};

/// Attribute kinds, named as op definitions spell them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    String,
    StringList,
    Int,
    IntList,
    Float,
    FloatList,
    Bool,
    BoolList,
    Type,
    TypeList,
    Shape,
    ShapeList,
    Tensor,
    TensorList,
}

impl AttrKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttrKind::String => "string",
            AttrKind::StringList => "list(string)",
            AttrKind::Int => "int",
            AttrKind::IntList => "list(int)",
            AttrKind::Float => "float",
            AttrKind::FloatList => "list(float)",
            AttrKind::Bool => "bool",
            AttrKind::BoolList => "list(bool)",
            AttrKind::Type => "type",
            AttrKind::TypeList => "list(type)",
            AttrKind::Shape => "shape",
            AttrKind::ShapeList => "list(shape)",
            AttrKind::Tensor => "tensor",
            AttrKind::TensorList => "list(tensor)",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            AttrKind::StringList
                | AttrKind::IntList
                | AttrKind::FloatList
                | AttrKind::BoolList
                | AttrKind::TypeList
                | AttrKind::ShapeList
                | AttrKind::TensorList
        )
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged union over every attribute kind. Strings are raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(Vec<u8>),
    StringList(Vec<Vec<u8>>),
    Int(i64),
    IntList(Vec<i64>),
    Float(f32),
    FloatList(Vec<f32>),
    Bool(bool),
    BoolList(Vec<bool>),
    Type(DataType),
    TypeList(Vec<DataType>),
    Shape(Shape),
    ShapeList(Vec<Shape>),
    Tensor(TensorValue),
    TensorList(Vec<TensorValue>),
}

impl AttrValue {
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::String(_) => AttrKind::String,
            AttrValue::StringList(_) => AttrKind::StringList,
            AttrValue::Int(_) => AttrKind::Int,
            AttrValue::IntList(_) => AttrKind::IntList,
            AttrValue::Float(_) => AttrKind::Float,
            AttrValue::FloatList(_) => AttrKind::FloatList,
            AttrValue::Bool(_) => AttrKind::Bool,
            AttrValue::BoolList(_) => AttrKind::BoolList,
            AttrValue::Type(_) => AttrKind::Type,
            AttrValue::TypeList(_) => AttrKind::TypeList,
            AttrValue::Shape(_) => AttrKind::Shape,
            AttrValue::ShapeList(_) => AttrKind::ShapeList,
            AttrValue::Tensor(_) => AttrKind::Tensor,
            AttrValue::TensorList(_) => AttrKind::TensorList,
        }
    }

    /// Number of elements for list kinds.
    pub fn list_len(&self) -> Option<usize> {
        let len = match self {
            AttrValue::StringList(v) => v.len(),
            AttrValue::IntList(v) => v.len(),
            AttrValue::FloatList(v) => v.len(),
            AttrValue::BoolList(v) => v.len(),
            AttrValue::TypeList(v) => v.len(),
            AttrValue::ShapeList(v) => v.len(),
            AttrValue::TensorList(v) => v.len(),
            _ => return None,
        };
        Some(len)
    }

    pub fn string(value: impl Into<Vec<u8>>) -> Self {
        AttrValue::String(value.into())
    }
}
