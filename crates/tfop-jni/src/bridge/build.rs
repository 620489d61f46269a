//! Builder entry points: allocate, configure, finish.

use tfop_core::{
    AttrValue, BridgeError, BuilderHandle, DataType, HandleKind, OpHandle, OpOutput, Result,
    Shape, TensorHandle, TensorValue,
};
use tfop_graph::GraphBackend;

use super::OpBridge;

impl<B: GraphBackend> OpBridge<B> {
    fn resolve_builder(&self, raw: u64) -> Result<BuilderHandle> {
        self.resolve(raw, HandleKind::Builder)
            .map(BuilderHandle::from_raw)
    }

    fn tensor(&self, raw: u64) -> Result<TensorValue> {
        let tensor = self
            .resolve(raw, HandleKind::Tensor)
            .map(TensorHandle::from_raw)?;
        Ok(self.backend.tensor_value(tensor)?)
    }

    fn set_attr(&self, builder: u64, name: &str, value: AttrValue) -> Result<()> {
        let builder = self.resolve_builder(builder)?;
        Ok(self.backend.set_attr(builder, name, value)?)
    }

    /// Starts a pending op of `op_type` named `name` in `graph`.
    pub fn allocate(&self, graph: u64, op_type: &str, name: &str) -> Result<BuilderHandle> {
        let graph = self.resolve_graph(graph)?;
        Ok(self.backend.new_operation(graph, op_type, name)?)
    }

    /// Validates and inserts the pending op. The builder is consumed either way.
    pub fn finish(&self, builder: u64) -> Result<OpHandle> {
        let builder = self.resolve_builder(builder)?;
        Ok(self.backend.finish_operation(builder)?)
    }

    pub fn add_input(&self, builder: u64, op: u64, output_index: i32) -> Result<()> {
        let builder = self.resolve_builder(builder)?;
        let input = OpOutput::new(self.resolve_op(op)?, output_index);
        Ok(self.backend.add_input(builder, input)?)
    }

    /// Adds one variadic input slot from parallel producer and index arrays.
    pub fn add_input_list(&self, builder: u64, ops: &[u64], output_indices: &[i32]) -> Result<()> {
        let builder = self.resolve_builder(builder)?;
        if ops.len() != output_indices.len() {
            return Err(BridgeError::invalid_argument(format!(
                "input list has {} ops but {} output indices",
                ops.len(),
                output_indices.len()
            )));
        }
        let inputs = ops
            .iter()
            .zip(output_indices)
            .map(|(op, index)| Ok(OpOutput::new(self.resolve_op(*op)?, *index)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.backend.add_input_list(builder, &inputs)?)
    }

    pub fn add_control_input(&self, builder: u64, op: u64) -> Result<()> {
        let builder = self.resolve_builder(builder)?;
        let op = self.resolve_op(op)?;
        Ok(self.backend.add_control_input(builder, op)?)
    }

    pub fn set_device(&self, builder: u64, device: &str) -> Result<()> {
        let builder = self.resolve_builder(builder)?;
        Ok(self.backend.set_device(builder, device)?)
    }

    pub fn colocate_with(&self, builder: u64, op: u64) -> Result<()> {
        let builder = self.resolve_builder(builder)?;
        let op = self.resolve_op(op)?;
        Ok(self.backend.colocate_with(builder, op)?)
    }

    pub fn set_attr_string(&self, builder: u64, name: &str, value: &[u8]) -> Result<()> {
        self.set_attr(builder, name, AttrValue::String(value.to_vec()))
    }

    pub fn set_attr_string_list(&self, builder: u64, name: &str, values: Vec<Vec<u8>>) -> Result<()> {
        self.set_attr(builder, name, AttrValue::StringList(values))
    }

    pub fn set_attr_int(&self, builder: u64, name: &str, value: i64) -> Result<()> {
        self.set_attr(builder, name, AttrValue::Int(value))
    }

    pub fn set_attr_int_list(&self, builder: u64, name: &str, values: &[i64]) -> Result<()> {
        self.set_attr(builder, name, AttrValue::IntList(values.to_vec()))
    }

    pub fn set_attr_float(&self, builder: u64, name: &str, value: f32) -> Result<()> {
        self.set_attr(builder, name, AttrValue::Float(value))
    }

    pub fn set_attr_float_list(&self, builder: u64, name: &str, values: &[f32]) -> Result<()> {
        self.set_attr(builder, name, AttrValue::FloatList(values.to_vec()))
    }

    pub fn set_attr_bool(&self, builder: u64, name: &str, value: bool) -> Result<()> {
        self.set_attr(builder, name, AttrValue::Bool(value))
    }

    pub fn set_attr_bool_list(&self, builder: u64, name: &str, values: &[bool]) -> Result<()> {
        self.set_attr(builder, name, AttrValue::BoolList(values.to_vec()))
    }

    pub fn set_attr_type(&self, builder: u64, name: &str, code: i32) -> Result<()> {
        self.resolve_builder(builder)?;
        let dtype = DataType::try_from_code(code)?;
        self.set_attr(builder, name, AttrValue::Type(dtype))
    }

    pub fn set_attr_type_list(&self, builder: u64, name: &str, codes: &[i32]) -> Result<()> {
        self.resolve_builder(builder)?;
        let types = codes
            .iter()
            .map(|code| DataType::try_from_code(*code))
            .collect::<Result<Vec<_>>>()?;
        self.set_attr(builder, name, AttrValue::TypeList(types))
    }

    /// Stores a copy of the tensor's content.
    pub fn set_attr_tensor(&self, builder: u64, name: &str, tensor: u64) -> Result<()> {
        self.resolve_builder(builder)?;
        let value = self.tensor(tensor)?;
        self.set_attr(builder, name, AttrValue::Tensor(value))
    }

    pub fn set_attr_tensor_list(&self, builder: u64, name: &str, tensors: &[u64]) -> Result<()> {
        self.resolve_builder(builder)?;
        let values = tensors
            .iter()
            .map(|tensor| self.tensor(*tensor))
            .collect::<Result<Vec<_>>>()?;
        self.set_attr(builder, name, AttrValue::TensorList(values))
    }

    /// `rank == -1` with empty `dims` is unknown rank; `rank == 0` is scalar.
    pub fn set_attr_shape(&self, builder: u64, name: &str, dims: &[i64], rank: i32) -> Result<()> {
        self.resolve_builder(builder)?;
        let shape = Shape::from_wire(dims, rank)?;
        self.set_attr(builder, name, AttrValue::Shape(shape))
    }

    /// One `dims` array per shape with its rank in `ranks`.
    pub fn set_attr_shape_list(
        &self,
        builder: u64,
        name: &str,
        dims: &[Vec<i64>],
        ranks: &[i32],
    ) -> Result<()> {
        self.resolve_builder(builder)?;
        if dims.len() != ranks.len() {
            return Err(BridgeError::invalid_argument(format!(
                "shape list has {} dims arrays but {} ranks",
                dims.len(),
                ranks.len()
            )));
        }
        let shapes = dims
            .iter()
            .zip(ranks)
            .map(|(dims, rank)| Shape::from_wire(dims, *rank))
            .collect::<Result<Vec<_>>>()?;
        self.set_attr(builder, name, AttrValue::ShapeList(shapes))
    }
}
