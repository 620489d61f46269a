//! Capabilities the bridge needs from a graph-construction backend.

use tfop_core::{
    AttrValue, BuilderHandle, DataType, GraphHandle, HandleKind, OpHandle, OpInput, OpOutput,
    Shape, StatusResult, TensorHandle, TensorValue,
};

/// Graph-construction backend.
///
/// Every fallible call reports a TensorFlow-style [`tfop_core::Status`]. Handles are
/// opaque to callers; [`GraphBackend::handle_kind`] is the only way to classify one.
pub trait GraphBackend: Send + Sync {
    /// Kind of a live handle, `None` for zero or unknown values.
    fn handle_kind(&self, handle: u64) -> Option<HandleKind>;

    // Op construction

    fn new_operation(
        &self,
        graph: GraphHandle,
        op_type: &str,
        name: &str,
    ) -> StatusResult<BuilderHandle>;

    fn add_input(&self, builder: BuilderHandle, input: OpOutput) -> StatusResult<()>;

    fn add_input_list(&self, builder: BuilderHandle, inputs: &[OpOutput]) -> StatusResult<()>;

    fn add_control_input(&self, builder: BuilderHandle, op: OpHandle) -> StatusResult<()>;

    fn set_device(&self, builder: BuilderHandle, device: &str) -> StatusResult<()>;

    fn colocate_with(&self, builder: BuilderHandle, op: OpHandle) -> StatusResult<()>;

    fn set_attr(&self, builder: BuilderHandle, name: &str, value: AttrValue) -> StatusResult<()>;

    /// Validates and inserts the op. The builder is consumed whatever the outcome.
    fn finish_operation(&self, builder: BuilderHandle) -> StatusResult<OpHandle>;

    /// Copy of a tensor's content.
    fn tensor_value(&self, tensor: TensorHandle) -> StatusResult<TensorValue>;

    // Inspection

    fn op_name(&self, op: OpHandle) -> StatusResult<String>;

    fn op_type(&self, op: OpHandle) -> StatusResult<String>;

    fn op_device(&self, op: OpHandle) -> StatusResult<String>;

    fn num_inputs(&self, op: OpHandle) -> StatusResult<usize>;

    fn num_control_inputs(&self, op: OpHandle) -> StatusResult<usize>;

    fn num_outputs(&self, op: OpHandle) -> StatusResult<usize>;

    fn num_control_outputs(&self, op: OpHandle) -> StatusResult<usize>;

    fn output_num_consumers(&self, output: OpOutput) -> StatusResult<usize>;

    /// First producer of input slot `index`.
    fn op_input(&self, op: OpHandle, index: i32) -> StatusResult<OpOutput>;

    /// Every producer of input slot `index`.
    fn op_input_list(&self, op: OpHandle, index: i32) -> StatusResult<Vec<OpOutput>>;

    fn output_consumers(&self, output: OpOutput) -> StatusResult<Vec<OpInput>>;

    fn control_inputs(&self, op: OpHandle) -> StatusResult<Vec<OpHandle>>;

    fn control_outputs(&self, op: OpHandle) -> StatusResult<Vec<OpHandle>>;

    // Typed queries

    fn input_type(&self, graph: GraphHandle, op: OpHandle, index: i32) -> StatusResult<DataType>;

    fn output_type(&self, graph: GraphHandle, output: OpOutput) -> StatusResult<DataType>;

    fn tensor_shape(&self, graph: GraphHandle, output: OpOutput) -> StatusResult<Shape>;

    /// Merges `shape` into the known shape of `output`.
    fn set_tensor_shape(
        &self,
        graph: GraphHandle,
        output: OpOutput,
        shape: &Shape,
    ) -> StatusResult<()>;

    fn attr_value(&self, op: OpHandle, name: &str) -> StatusResult<AttrValue>;

    /// Serialized `OpList` of registered ops.
    fn op_list(&self) -> StatusResult<Vec<u8>>;
}
