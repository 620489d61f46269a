//! Op library of the reference backend.

use tfop_core::{AttrKind, AttrValue, DataType, Shape, Status, StatusResult};

use crate::op_def::{ArgType, AttrDef, OpDef, ShapeContext};

const NUMBER_TYPES: &[DataType] = &[
    DataType::Float,
    DataType::Double,
    DataType::Int32,
    DataType::UInt8,
    DataType::Int16,
    DataType::Int8,
    DataType::Complex64,
    DataType::Int64,
    DataType::QInt8,
    DataType::QUInt8,
    DataType::QInt32,
    DataType::BFloat16,
    DataType::UInt16,
    DataType::Complex128,
    DataType::Half,
    DataType::UInt32,
    DataType::UInt64,
];

const ARITHMETIC_TYPES: &[DataType] = &[
    DataType::BFloat16,
    DataType::Half,
    DataType::Float,
    DataType::Double,
    DataType::UInt8,
    DataType::Int8,
    DataType::UInt16,
    DataType::Int16,
    DataType::Int32,
    DataType::Int64,
    DataType::Complex64,
    DataType::Complex128,
];

const FLOAT_TYPES: &[DataType] = &[
    DataType::Half,
    DataType::BFloat16,
    DataType::Float,
    DataType::Double,
];

fn t() -> ArgType {
    ArgType::Attr("T".to_string())
}

fn type_attr(name: &str) -> AttrDef {
    AttrDef::new(name, AttrKind::Type)
}

/// Every op the reference backend registers.
pub fn standard_ops() -> Vec<OpDef> {
    let mut add_types = ARITHMETIC_TYPES.to_vec();
    add_types.push(DataType::String);

    vec![
        OpDef::new("Const")
            .output("output", ArgType::Attr("dtype".to_string()))
            .attr(AttrDef::new("value", AttrKind::Tensor))
            .attr(type_attr("dtype"))
            .summary("Returns a constant tensor.")
            .shape_fn(const_shape),
        OpDef::new("Placeholder")
            .output("output", ArgType::Attr("dtype".to_string()))
            .attr(type_attr("dtype"))
            .attr(
                AttrDef::new("shape", AttrKind::Shape)
                    .with_default(AttrValue::Shape(Shape::unknown())),
            )
            .summary("A placeholder op for a value that will be fed into the computation.")
            .shape_fn(shape_from_attr),
        OpDef::new("Identity")
            .input("input", t())
            .output("output", t())
            .attr(type_attr("T"))
            .summary("Return a tensor with the same shape and contents as the input tensor.")
            .shape_fn(unchanged),
        OpDef::new("NoOp").summary("Does nothing. Only useful as a placeholder for control edges."),
        OpDef::new("Add")
            .input("x", t())
            .input("y", t())
            .output("z", t())
            .attr(type_attr("T").with_allowed_types(&add_types))
            .summary("Returns x + y element-wise.")
            .shape_fn(broadcast_binary),
        OpDef::new("Sub")
            .input("x", t())
            .input("y", t())
            .output("z", t())
            .attr(type_attr("T").with_allowed_types(ARITHMETIC_TYPES))
            .summary("Returns x - y element-wise.")
            .shape_fn(broadcast_binary),
        OpDef::new("Mul")
            .input("x", t())
            .input("y", t())
            .output("z", t())
            .attr(type_attr("T").with_allowed_types(ARITHMETIC_TYPES))
            .summary("Returns x * y element-wise.")
            .commutative()
            .shape_fn(broadcast_binary),
        OpDef::new("AddN")
            .input_n("inputs", t(), "N")
            .output("sum", t())
            .attr(AttrDef::new("N", AttrKind::Int).with_minimum(1))
            .attr(type_attr("T").with_allowed_types(NUMBER_TYPES))
            .summary("Add all input tensors element wise.")
            .commutative()
            .aggregate()
            .shape_fn(merge_all),
        OpDef::new("Cast")
            .input("x", ArgType::Attr("SrcT".to_string()))
            .output("y", ArgType::Attr("DstT".to_string()))
            .attr(type_attr("SrcT"))
            .attr(type_attr("DstT"))
            .attr(AttrDef::new("Truncate", AttrKind::Bool).with_default(AttrValue::Bool(false)))
            .summary("Cast x of type SrcT to y of DstT.")
            .shape_fn(unchanged),
        OpDef::new("LeakyRelu")
            .input("features", t())
            .output("activations", t())
            .attr(AttrDef::new("alpha", AttrKind::Float).with_default(AttrValue::Float(0.2)))
            .attr(
                type_attr("T")
                    .with_default(AttrValue::Type(DataType::Float))
                    .with_allowed_types(FLOAT_TYPES),
            )
            .summary("Computes rectified linear: max(features, features * alpha).")
            .shape_fn(unchanged),
        OpDef::new("Squeeze")
            .input("input", t())
            .output("output", t())
            .attr(type_attr("T"))
            .attr(
                AttrDef::new("squeeze_dims", AttrKind::IntList)
                    .with_default(AttrValue::IntList(Vec::new()))
                    .with_minimum(0),
            )
            .summary("Removes dimensions of size 1 from the shape of a tensor.")
            .shape_fn(squeeze),
        OpDef::new("Bucketize")
            .input("input", t())
            .output("output", ArgType::Fixed(DataType::Int32))
            .attr(type_attr("T").with_allowed_types(&[
                DataType::Int32,
                DataType::Int64,
                DataType::Float,
                DataType::Double,
            ]))
            .attr(AttrDef::new("boundaries", AttrKind::FloatList))
            .summary("Bucketizes 'input' based on 'boundaries'.")
            .shape_fn(unchanged),
        OpDef::new("Assert")
            .input("condition", ArgType::Fixed(DataType::Bool))
            .input("data", ArgType::List("T".to_string()))
            .attr(AttrDef::new("T", AttrKind::TypeList).with_minimum(1))
            .attr(AttrDef::new("summarize", AttrKind::Int).with_default(AttrValue::Int(3)))
            .summary("Asserts that the given condition is true.")
            .stateful(),
        OpDef::new("VariableV2")
            .output("ref", ArgType::Attr("dtype".to_string()))
            .attr(AttrDef::new("shape", AttrKind::Shape))
            .attr(type_attr("dtype"))
            .attr(AttrDef::new("container", AttrKind::String).with_default(AttrValue::string("")))
            .attr(AttrDef::new("shared_name", AttrKind::String).with_default(AttrValue::string("")))
            .summary("Holds state in the form of a tensor that persists across steps.")
            .stateful()
            .shape_fn(shape_from_attr),
        OpDef::new("_Arg")
            .output("output", t())
            .attr(type_attr("T"))
            .attr(AttrDef::new("index", AttrKind::Int).with_minimum(0))
            .summary("A graph node which represents an argument to a function.")
            .stateful()
            .shape_fn(unknown_output),
        OpDef::new("_Retval")
            .input("input", t())
            .attr(type_attr("T"))
            .attr(AttrDef::new("index", AttrKind::Int).with_minimum(0))
            .summary("A graph node which represents a return value of a function.")
            .stateful(),
    ]
}

fn const_shape(ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    let tensor = ctx.attr_tensor("value")?;
    let dtype = ctx.attr_type("dtype")?;
    if tensor.dtype() != dtype {
        return Err(Status::invalid_argument(format!(
            "Const: value is a {} tensor but dtype is {dtype}",
            tensor.dtype()
        )));
    }
    Ok(vec![tensor.shape()])
}

fn shape_from_attr(ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    Ok(vec![ctx.attr_shape("shape")?.clone()])
}

fn unchanged(ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    Ok(vec![ctx.input(0)?.clone()])
}

fn unknown_output(_ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    Ok(vec![Shape::unknown()])
}

fn broadcast_binary(ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    let shape = ctx
        .input(0)?
        .broadcast(ctx.input(1)?)
        .map_err(|conflict| Status::invalid_argument(format!("{}: {conflict}", ctx.op_type)))?;
    Ok(vec![shape])
}

fn merge_all(ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    let mut merged = Shape::unknown();
    for shape in ctx.input_list(0) {
        merged = merged
            .merge(shape)
            .map_err(|conflict| Status::invalid_argument(format!("{}: {conflict}", ctx.op_type)))?;
    }
    Ok(vec![merged])
}

fn squeeze(ctx: &ShapeContext<'_>) -> StatusResult<Vec<Shape>> {
    let input = ctx.input(0)?;
    let Some(dims) = input.dims() else {
        return Ok(vec![Shape::unknown()]);
    };
    let rank = dims.len() as i64;
    let requested = ctx.attr_int_list("squeeze_dims")?;

    let mut wanted = Vec::with_capacity(requested.len());
    for &axis in requested {
        if axis < -rank || axis >= rank {
            return Err(Status::invalid_argument(format!(
                "Squeeze: dimension {axis} is not in [{}, {rank})",
                -rank
            )));
        }
        let axis = if axis < 0 { axis + rank } else { axis };
        wanted.push(axis as usize);
    }

    let mut out = Vec::with_capacity(dims.len());
    for (axis, &dim) in dims.iter().enumerate() {
        if wanted.is_empty() {
            // without explicit axes an unknown dim could be 1, so the rank is unknown
            if dim < 0 {
                return Ok(vec![Shape::unknown()]);
            }
            if dim != 1 {
                out.push(dim);
            }
        } else if wanted.contains(&axis) {
            if dim > 1 || dim == 0 {
                return Err(Status::invalid_argument(format!(
                    "Squeeze: cannot squeeze dimension {axis} of size {dim}"
                )));
            }
        } else {
            out.push(dim);
        }
    }
    Ok(vec![Shape::known(out)])
}
