//! Catalog wire messages.
//!
//! Field numbers follow TensorFlow's `op_def.proto`, `attr_value.proto`,
//! `tensor_shape.proto` and `tensor.proto`, so the encoded [`OpList`] decodes with any
//! TensorFlow-compatible reader. Enum fields (`DataType`) travel as plain varints.

use tfop_core::{AttrValue as Value, Shape, TensorValue};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpList {
    #[prost(message, repeated, tag = "1")]
    pub op: Vec<OpDef>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpDef {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub input_arg: Vec<ArgDef>,
    #[prost(message, repeated, tag = "3")]
    pub output_arg: Vec<ArgDef>,
    #[prost(message, repeated, tag = "4")]
    pub attr: Vec<AttrDef>,
    #[prost(string, tag = "5")]
    pub summary: String,
    #[prost(string, tag = "6")]
    pub description: String,
    #[prost(bool, tag = "16")]
    pub is_aggregate: bool,
    #[prost(bool, tag = "17")]
    pub is_stateful: bool,
    #[prost(bool, tag = "18")]
    pub is_commutative: bool,
    #[prost(bool, tag = "19")]
    pub allows_uninitialized_input: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArgDef {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(int32, tag = "3")]
    pub r#type: i32,
    #[prost(string, tag = "4")]
    pub type_attr: String,
    #[prost(string, tag = "5")]
    pub number_attr: String,
    #[prost(string, tag = "6")]
    pub type_list_attr: String,
    #[prost(bool, tag = "16")]
    pub is_ref: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AttrDef {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub r#type: String,
    #[prost(message, optional, tag = "3")]
    pub default_value: Option<AttrValue>,
    #[prost(string, tag = "4")]
    pub description: String,
    #[prost(bool, tag = "5")]
    pub has_minimum: bool,
    #[prost(int64, tag = "6")]
    pub minimum: i64,
    #[prost(message, optional, tag = "7")]
    pub allowed_values: Option<AttrValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AttrValue {
    #[prost(oneof = "attr_value::Value", tags = "1, 2, 3, 4, 5, 6, 7, 8")]
    pub value: Option<attr_value::Value>,
}

pub mod attr_value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        #[prost(message, tag = "1")]
        List(super::ListValue),
        #[prost(bytes = "vec", tag = "2")]
        S(Vec<u8>),
        #[prost(int64, tag = "3")]
        I(i64),
        #[prost(float, tag = "4")]
        F(f32),
        #[prost(bool, tag = "5")]
        B(bool),
        #[prost(int32, tag = "6")]
        Type(i32),
        #[prost(message, tag = "7")]
        Shape(super::TensorShapeProto),
        #[prost(message, tag = "8")]
        Tensor(super::TensorProto),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListValue {
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub s: Vec<Vec<u8>>,
    #[prost(int64, repeated, tag = "3")]
    pub i: Vec<i64>,
    #[prost(float, repeated, tag = "4")]
    pub f: Vec<f32>,
    #[prost(bool, repeated, tag = "5")]
    pub b: Vec<bool>,
    #[prost(int32, repeated, tag = "6")]
    pub r#type: Vec<i32>,
    #[prost(message, repeated, tag = "7")]
    pub shape: Vec<TensorShapeProto>,
    #[prost(message, repeated, tag = "8")]
    pub tensor: Vec<TensorProto>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TensorShapeProto {
    #[prost(message, repeated, tag = "2")]
    pub dim: Vec<tensor_shape_proto::Dim>,
    #[prost(bool, tag = "3")]
    pub unknown_rank: bool,
}

pub mod tensor_shape_proto {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Dim {
        #[prost(int64, tag = "1")]
        pub size: i64,
        #[prost(string, tag = "2")]
        pub name: String,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TensorProto {
    #[prost(int32, tag = "1")]
    pub dtype: i32,
    #[prost(message, optional, tag = "2")]
    pub tensor_shape: Option<TensorShapeProto>,
    #[prost(bytes = "vec", tag = "4")]
    pub tensor_content: Vec<u8>,
}

impl From<&Shape> for TensorShapeProto {
    fn from(shape: &Shape) -> Self {
        match shape.dims() {
            None => Self {
                dim: Vec::new(),
                unknown_rank: true,
            },
            Some(dims) => Self {
                dim: dims
                    .iter()
                    .map(|size| tensor_shape_proto::Dim {
                        size: *size,
                        name: String::new(),
                    })
                    .collect(),
                unknown_rank: false,
            },
        }
    }
}

impl From<&TensorValue> for TensorProto {
    fn from(tensor: &TensorValue) -> Self {
        Self {
            dtype: tensor.dtype().code(),
            tensor_shape: Some(TensorShapeProto::from(&tensor.shape())),
            tensor_content: tensor.data().to_vec(),
        }
    }
}

impl From<&Value> for AttrValue {
    fn from(value: &Value) -> Self {
        use attr_value::Value as V;

        let encoded = match value {
            Value::String(s) => V::S(s.clone()),
            Value::Int(i) => V::I(*i),
            Value::Float(f) => V::F(*f),
            Value::Bool(b) => V::B(*b),
            Value::Type(t) => V::Type(t.code()),
            Value::Shape(shape) => V::Shape(shape.into()),
            Value::Tensor(tensor) => V::Tensor(tensor.into()),
            Value::StringList(list) => V::List(ListValue {
                s: list.clone(),
                ..Default::default()
            }),
            Value::IntList(list) => V::List(ListValue {
                i: list.clone(),
                ..Default::default()
            }),
            Value::FloatList(list) => V::List(ListValue {
                f: list.clone(),
                ..Default::default()
            }),
            Value::BoolList(list) => V::List(ListValue {
                b: list.clone(),
                ..Default::default()
            }),
            Value::TypeList(list) => V::List(ListValue {
                r#type: list.iter().map(|t| t.code()).collect(),
                ..Default::default()
            }),
            Value::ShapeList(list) => V::List(ListValue {
                shape: list.iter().map(TensorShapeProto::from).collect(),
                ..Default::default()
            }),
            Value::TensorList(list) => V::List(ListValue {
                tensor: list.iter().map(TensorProto::from).collect(),
                ..Default::default()
            }),
        };
        Self {
            value: Some(encoded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use tfop_core::DataType;

    #[test]
    fn unknown_rank_shape_sets_flag() {
        let proto = TensorShapeProto::from(&Shape::unknown());
        assert!(proto.unknown_rank);
        assert!(proto.dim.is_empty());

        let proto = TensorShapeProto::from(&Shape::known([-1, 3]));
        assert!(!proto.unknown_rank);
        assert_eq!(proto.dim.iter().map(|d| d.size).collect::<Vec<_>>(), vec![-1, 3]);
    }

    #[test]
    fn type_list_encodes_codes() {
        let proto = AttrValue::from(&Value::TypeList(vec![DataType::Float, DataType::Int64]));
        match proto.value {
            Some(attr_value::Value::List(list)) => assert_eq!(list.r#type, vec![1, 9]),
            other => panic!("unexpected encoding: {other:?}"),
        }
    }

    #[test]
    fn op_list_decodes_after_encoding() {
        let list = OpList {
            op: vec![OpDef {
                name: "NoOp".to_string(),
                summary: "Does nothing.".to_string(),
                ..Default::default()
            }],
        };
        let bytes = list.encode_to_vec();
        let decoded = OpList::decode(bytes.as_slice()).expect("decode");
        assert_eq!(decoded.op[0].name, "NoOp");
    }
}
