//! Host-neutral entry surface.
//!
//! [`OpBridge`] exposes every entry point as a Rust method over raw handle values
//! and plain Rust data, so the host glue only marshals. Each call resolves its
//! handles through the backend (no caching), invokes the backend and translates the
//! backend status into a [`BridgeError`].

mod attrs;
mod build;
mod lifecycle;

#[cfg(test)]
mod tests;

use tfop_core::{
    BridgeError, GraphHandle, HandleKind, OpHandle, OpInput, OpOutput, Result, Shape,
};
use tfop_graph::GraphBackend;

/// Entry surface over a graph backend.
pub struct OpBridge<B> {
    backend: B,
}

impl<B: GraphBackend> OpBridge<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns `raw` if it names a live object of `kind`.
    fn resolve(&self, raw: u64, kind: HandleKind) -> Result<u64> {
        match self.backend.handle_kind(raw) {
            Some(actual) if actual == kind => Ok(raw),
            _ => Err(BridgeError::invalid_handle(kind, raw)),
        }
    }

    fn resolve_op(&self, raw: u64) -> Result<OpHandle> {
        self.resolve(raw, HandleKind::Op).map(OpHandle::from_raw)
    }

    fn resolve_graph(&self, raw: u64) -> Result<GraphHandle> {
        self.resolve(raw, HandleKind::Graph).map(GraphHandle::from_raw)
    }

    // Inspection

    pub fn name(&self, op: u64) -> Result<String> {
        Ok(self.backend.op_name(self.resolve_op(op)?)?)
    }

    pub fn op_type(&self, op: u64) -> Result<String> {
        Ok(self.backend.op_type(self.resolve_op(op)?)?)
    }

    /// Requested device; empty when unset.
    pub fn device(&self, op: u64) -> Result<String> {
        Ok(self.backend.op_device(self.resolve_op(op)?)?)
    }

    pub fn num_inputs(&self, op: u64) -> Result<i32> {
        to_count(self.backend.num_inputs(self.resolve_op(op)?)?)
    }

    pub fn num_control_inputs(&self, op: u64) -> Result<i32> {
        to_count(self.backend.num_control_inputs(self.resolve_op(op)?)?)
    }

    pub fn num_outputs(&self, op: u64) -> Result<i32> {
        to_count(self.backend.num_outputs(self.resolve_op(op)?)?)
    }

    pub fn num_control_outputs(&self, op: u64) -> Result<i32> {
        to_count(self.backend.num_control_outputs(self.resolve_op(op)?)?)
    }

    pub fn num_consumers(&self, op: u64, output_index: i32) -> Result<i32> {
        let output = OpOutput::new(self.resolve_op(op)?, output_index);
        to_count(self.backend.output_num_consumers(output)?)
    }

    /// Producer of input slot `input_index`; the first element for a variadic slot.
    pub fn input(&self, op: u64, input_index: i32) -> Result<OpOutput> {
        Ok(self.backend.op_input(self.resolve_op(op)?, input_index)?)
    }

    /// Every producer of input slot `input_index`.
    pub fn input_list(&self, op: u64, input_index: i32) -> Result<Vec<OpOutput>> {
        Ok(self
            .backend
            .op_input_list(self.resolve_op(op)?, input_index)?)
    }

    pub fn control_inputs(&self, op: u64) -> Result<Vec<OpHandle>> {
        Ok(self.backend.control_inputs(self.resolve_op(op)?)?)
    }

    pub fn control_outputs(&self, op: u64) -> Result<Vec<OpHandle>> {
        Ok(self.backend.control_outputs(self.resolve_op(op)?)?)
    }

    /// Consuming `(op, input slot)` pairs of output `output_index`.
    pub fn consumers(&self, op: u64, output_index: i32) -> Result<Vec<OpInput>> {
        let output = OpOutput::new(self.resolve_op(op)?, output_index);
        Ok(self.backend.output_consumers(output)?)
    }

    pub fn input_data_type(&self, graph: u64, op: u64, input_index: i32) -> Result<i32> {
        let graph = self.resolve_graph(graph)?;
        let op = self.resolve_op(op)?;
        Ok(self.backend.input_type(graph, op, input_index)?.code())
    }

    pub fn output_data_type(&self, graph: u64, op: u64, output_index: i32) -> Result<i32> {
        let graph = self.resolve_graph(graph)?;
        let output = OpOutput::new(self.resolve_op(op)?, output_index);
        Ok(self.backend.output_type(graph, output)?.code())
    }

    /// Known dims of an output, `None` for unknown rank.
    pub fn shape(&self, graph: u64, op: u64, output_index: i32) -> Result<Option<Vec<i64>>> {
        let graph = self.resolve_graph(graph)?;
        let output = OpOutput::new(self.resolve_op(op)?, output_index);
        Ok(self.backend.tensor_shape(graph, output)?.to_wire())
    }

    /// Refines the shape of an output with `dims` + `rank`.
    pub fn set_shape(
        &self,
        graph: u64,
        op: u64,
        output_index: i32,
        dims: &[i64],
        rank: i32,
    ) -> Result<()> {
        let graph = self.resolve_graph(graph)?;
        let output = OpOutput::new(self.resolve_op(op)?, output_index);
        let shape = Shape::from_wire(dims, rank)?;
        self.backend.set_tensor_shape(graph, output, &shape)?;
        Ok(())
    }

    /// Serialized `OpList` of every registered op.
    pub fn all_ops(&self) -> Result<Vec<u8>> {
        Ok(self.backend.op_list()?)
    }
}

fn to_count(count: usize) -> Result<i32> {
    i32::try_from(count)
        .map_err(|_| BridgeError::resource_exhausted(format!("count {count} exceeds jint range")))
}
