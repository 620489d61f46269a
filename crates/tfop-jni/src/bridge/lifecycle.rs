//! Graph and tensor lifetimes on the reference backend.
//!
//! The host owns these objects through the handles issued here; every other entry
//! point only borrows them.

use tfop_core::constants::modules;
use tfop_core::{
    DataType, GraphHandle, HandleKind, Result, TensorHandle, TensorValue, log_debug,
};
use tfop_graph::ReferenceBackend;

use super::OpBridge;

impl OpBridge<ReferenceBackend> {
    pub fn new_graph(&self) -> GraphHandle {
        let graph = self.backend.new_graph();
        log_debug!(modules::BRIDGE, graph = graph.raw(), "Graph created");
        graph
    }

    /// Drops the graph with its ops. Builders allocated in it fail at finish.
    pub fn delete_graph(&self, graph: u64) -> Result<()> {
        let graph = self.resolve_graph(graph)?;
        self.backend.delete_graph(graph)?;
        log_debug!(modules::BRIDGE, graph = graph.raw(), "Graph deleted");
        Ok(())
    }

    /// Copies `data` into a new tensor. Fixed-width types must match `dims` exactly.
    pub fn new_tensor(&self, code: i32, dims: Vec<i64>, data: Vec<u8>) -> Result<TensorHandle> {
        let dtype = DataType::try_from_code(code)?;
        let tensor = self.backend.new_tensor(TensorValue::new(dtype, dims, data)?);
        log_debug!(modules::BRIDGE, tensor = tensor.raw(), dtype = %dtype, "Tensor created");
        Ok(tensor)
    }

    pub fn delete_tensor(&self, tensor: u64) -> Result<()> {
        let tensor = self
            .resolve(tensor, HandleKind::Tensor)
            .map(TensorHandle::from_raw)?;
        Ok(self.backend.delete_tensor(tensor)?)
    }
}
