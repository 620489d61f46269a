//! Op definitions: argument and attribute signatures plus the shape function.

use std::collections::BTreeMap;

use tfop_core::{AttrKind, AttrValue, DataType, Shape, Status, StatusResult, TensorValue};

use crate::proto;

/// Computes output shapes, one per flattened output.
pub type ShapeFn = fn(&ShapeContext<'_>) -> StatusResult<Vec<Shape>>;

/// Element type of an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    /// Fixed element type.
    Fixed(DataType),
    /// Element type taken from a `type` attribute.
    Attr(String),
    /// Per-element types taken from a `list(type)` attribute.
    List(String),
}

/// Input or output argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDef {
    pub name: String,
    pub ty: ArgType,
    /// `int` attribute holding the element count of a homogeneous list.
    pub number_attr: Option<String>,
}

impl ArgDef {
    /// Whether the argument occupies a variadic slot.
    pub fn is_list(&self) -> bool {
        self.number_attr.is_some() || matches!(self.ty, ArgType::List(_))
    }

    fn to_proto(&self) -> proto::ArgDef {
        let mut arg = proto::ArgDef {
            name: self.name.clone(),
            number_attr: self.number_attr.clone().unwrap_or_default(),
            ..Default::default()
        };
        match &self.ty {
            ArgType::Fixed(dtype) => arg.r#type = dtype.code(),
            ArgType::Attr(attr) => arg.type_attr = attr.clone(),
            ArgType::List(attr) => arg.type_list_attr = attr.clone(),
        }
        arg
    }
}

/// Declared attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDef {
    pub name: String,
    pub kind: AttrKind,
    pub default: Option<AttrValue>,
    /// Lower bound on an `int` value or a list length.
    pub minimum: Option<i64>,
    /// Permitted values as a list of the element kind.
    pub allowed: Option<AttrValue>,
    pub description: String,
}

impl AttrDef {
    pub fn new(name: &str, kind: AttrKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: None,
            minimum: None,
            allowed: None,
            description: String::new(),
        }
    }

    pub fn with_default(mut self, value: AttrValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_allowed_types(mut self, types: &[DataType]) -> Self {
        self.allowed = Some(AttrValue::TypeList(types.to_vec()));
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn to_proto(&self) -> proto::AttrDef {
        proto::AttrDef {
            name: self.name.clone(),
            r#type: self.kind.as_str().to_string(),
            default_value: self.default.as_ref().map(proto::AttrValue::from),
            description: self.description.clone(),
            has_minimum: self.minimum.is_some(),
            minimum: self.minimum.unwrap_or_default(),
            allowed_values: self.allowed.as_ref().map(proto::AttrValue::from),
        }
    }
}

/// Registered op signature.
#[derive(Debug, Clone)]
pub struct OpDef {
    pub name: String,
    pub inputs: Vec<ArgDef>,
    pub outputs: Vec<ArgDef>,
    pub attrs: Vec<AttrDef>,
    pub summary: String,
    pub is_stateful: bool,
    pub is_commutative: bool,
    pub is_aggregate: bool,
    pub shape_fn: ShapeFn,
}

impl OpDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            attrs: Vec::new(),
            summary: String::new(),
            is_stateful: false,
            is_commutative: false,
            is_aggregate: false,
            shape_fn: no_outputs,
        }
    }

    pub fn input(mut self, name: &str, ty: ArgType) -> Self {
        self.inputs.push(ArgDef {
            name: name.to_string(),
            ty,
            number_attr: None,
        });
        self
    }

    /// Homogeneous list input whose length is held by `number_attr`.
    pub fn input_n(mut self, name: &str, ty: ArgType, number_attr: &str) -> Self {
        self.inputs.push(ArgDef {
            name: name.to_string(),
            ty,
            number_attr: Some(number_attr.to_string()),
        });
        self
    }

    pub fn output(mut self, name: &str, ty: ArgType) -> Self {
        self.outputs.push(ArgDef {
            name: name.to_string(),
            ty,
            number_attr: None,
        });
        self
    }

    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn stateful(mut self) -> Self {
        self.is_stateful = true;
        self
    }

    pub fn commutative(mut self) -> Self {
        self.is_commutative = true;
        self
    }

    pub fn aggregate(mut self) -> Self {
        self.is_aggregate = true;
        self
    }

    pub fn shape_fn(mut self, shape_fn: ShapeFn) -> Self {
        self.shape_fn = shape_fn;
        self
    }

    pub fn find_attr(&self, name: &str) -> Option<&AttrDef> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    /// Whether the op can be finished with no inputs and no attributes set.
    pub fn needs_nothing(&self) -> bool {
        self.inputs.is_empty() && self.attrs.iter().all(|attr| attr.default.is_some())
    }

    pub fn to_proto(&self) -> proto::OpDef {
        proto::OpDef {
            name: self.name.clone(),
            input_arg: self.inputs.iter().map(ArgDef::to_proto).collect(),
            output_arg: self.outputs.iter().map(ArgDef::to_proto).collect(),
            attr: self.attrs.iter().map(AttrDef::to_proto).collect(),
            summary: self.summary.clone(),
            description: String::new(),
            is_aggregate: self.is_aggregate,
            is_stateful: self.is_stateful,
            is_commutative: self.is_commutative,
            allows_uninitialized_input: false,
        }
    }
}

/// Inputs to a shape function.
pub struct ShapeContext<'a> {
    pub op_type: &'a str,
    /// Producer shapes per input slot; single slots hold one entry.
    pub inputs: &'a [Vec<Shape>],
    pub attrs: &'a BTreeMap<String, AttrValue>,
}

impl ShapeContext<'_> {
    /// Shape of the first element in slot `index`.
    pub fn input(&self, index: usize) -> StatusResult<&Shape> {
        self.inputs
            .get(index)
            .and_then(|slot| slot.first())
            .ok_or_else(|| {
                Status::internal(format!("{}: shape of input {index} requested", self.op_type))
            })
    }

    pub fn input_list(&self, index: usize) -> &[Shape] {
        self.inputs.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn attr(&self, name: &str) -> StatusResult<&AttrValue> {
        self.attrs.get(name).ok_or_else(|| {
            Status::internal(format!("{}: attr '{name}' missing after resolution", self.op_type))
        })
    }

    pub fn attr_shape(&self, name: &str) -> StatusResult<&Shape> {
        match self.attr(name)? {
            AttrValue::Shape(shape) => Ok(shape),
            other => Err(self.kind_error(name, other)),
        }
    }

    pub fn attr_type(&self, name: &str) -> StatusResult<DataType> {
        match self.attr(name)? {
            AttrValue::Type(dtype) => Ok(*dtype),
            other => Err(self.kind_error(name, other)),
        }
    }

    pub fn attr_int_list(&self, name: &str) -> StatusResult<&[i64]> {
        match self.attr(name)? {
            AttrValue::IntList(list) => Ok(list),
            other => Err(self.kind_error(name, other)),
        }
    }

    pub fn attr_tensor(&self, name: &str) -> StatusResult<&TensorValue> {
        match self.attr(name)? {
            AttrValue::Tensor(tensor) => Ok(tensor),
            other => Err(self.kind_error(name, other)),
        }
    }

    fn kind_error(&self, name: &str, value: &AttrValue) -> Status {
        Status::internal(format!(
            "{}: attr '{name}' resolved as {}",
            self.op_type,
            value.kind()
        ))
    }
}

/// Shape function of ops without outputs.
pub fn no_outputs(_ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proto_carries_type_sources() {
        let def = OpDef::new("AddN")
            .input_n("inputs", ArgType::Attr("T".to_string()), "N")
            .output("sum", ArgType::Attr("T".to_string()))
            .attr(AttrDef::new("N", AttrKind::Int).with_minimum(1))
            .attr(AttrDef::new("T", AttrKind::Type));
        let proto = def.to_proto();

        assert_eq!(proto.input_arg[0].type_attr, "T");
        assert_eq!(proto.input_arg[0].number_attr, "N");
        assert_eq!(proto.attr[0].r#type, "int");
        assert!(proto.attr[0].has_minimum);
        assert_eq!(proto.attr[0].minimum, 1);
        assert!(!proto.attr[1].has_minimum);
        assert!(def.inputs[0].is_list());
        assert!(!def.needs_nothing());
    }

    #[test]
    fn fixed_type_is_encoded_as_code() {
        let def = OpDef::new("Assert").input("condition", ArgType::Fixed(DataType::Bool));
        assert_eq!(def.to_proto().input_arg[0].r#type, DataType::Bool.code());
        assert!(OpDef::new("NoOp").needs_nothing());
    }
}
