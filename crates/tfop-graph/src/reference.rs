//! In-process reference backend.
//!
//! Implements every [`GraphBackend`] capability over plain Rust data so the bridge
//! contract can run without a native graph library. Handle tables are `DashMap`s and
//! each graph sits behind its own `RwLock`: inspection runs concurrently, while
//! `finish` and shape refinement take the graph's write lock. A `DashMap` entry is
//! never held while a graph lock is being acquired.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tfop_core::constants::modules;
use tfop_core::{
    AttrValue, BuilderHandle, DataType, GraphHandle, HandleKind, OpHandle, OpInput, OpOutput,
    Shape, Status, StatusResult, TensorHandle, TensorValue, log_debug, log_info, log_trace,
};

use crate::backend::GraphBackend;
use crate::builder::PendingOp;
use crate::finish;
use crate::op_registry::OpRegistry;
use crate::registry::HandleRegistry;
use crate::store::{self, Graph, Node, OutputTensor};

/// Construction options for [`ReferenceBackend`].
#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// List `_`-prefixed ops in the catalog.
    pub include_internal: bool,
}

/// Reference graph backend.
pub struct ReferenceBackend {
    handles: HandleRegistry,
    registry: Arc<OpRegistry>,
    graphs: DashMap<GraphHandle, Arc<RwLock<Graph>>>,
    ops: DashMap<OpHandle, GraphHandle>,
    builders: DashMap<BuilderHandle, PendingOp>,
    tensors: DashMap<TensorHandle, TensorValue>,
    options: BackendOptions,
}

impl ReferenceBackend {
    /// Backend over the standard op library.
    pub fn new() -> Self {
        Self::with_options(BackendOptions::default())
    }

    pub fn with_options(options: BackendOptions) -> Self {
        Self::with_registry(OpRegistry::standard(), options)
    }

    pub fn with_registry(registry: Arc<OpRegistry>, options: BackendOptions) -> Self {
        log_info!(
            modules::BACKEND,
            ops = registry.len(),
            include_internal = options.include_internal,
            "Reference backend created"
        );
        Self {
            handles: HandleRegistry::new(),
            registry,
            graphs: DashMap::new(),
            ops: DashMap::new(),
            builders: DashMap::new(),
            tensors: DashMap::new(),
            options,
        }
    }

    // Lifecycle

    pub fn new_graph(&self) -> GraphHandle {
        let handle = GraphHandle::from_raw(self.handles.issue(HandleKind::Graph));
        self.graphs
            .insert(handle, Arc::new(RwLock::new(Graph::new(handle))));
        log_trace!(modules::BACKEND, graph = handle.raw(), "Graph created");
        handle
    }

    /// Destroys a graph and invalidates its ops. Pending builders bound to it fail at
    /// `finish`.
    pub fn delete_graph(&self, graph: GraphHandle) -> StatusResult<()> {
        let (_, store) = self
            .graphs
            .remove(&graph)
            .ok_or_else(|| not_live(graph))?;
        self.handles.retire(graph.raw());
        let store = store.read();
        for op in store.op_handles() {
            self.ops.remove(&op);
            self.handles.retire(op.raw());
        }
        log_trace!(
            modules::BACKEND,
            graph = graph.raw(),
            ops = store.len(),
            "Graph deleted"
        );
        Ok(())
    }

    pub fn new_tensor(&self, value: TensorValue) -> TensorHandle {
        let handle = TensorHandle::from_raw(self.handles.issue(HandleKind::Tensor));
        self.tensors.insert(handle, value);
        handle
    }

    pub fn delete_tensor(&self, tensor: TensorHandle) -> StatusResult<()> {
        self.tensors
            .remove(&tensor)
            .ok_or_else(|| not_live(tensor))?;
        self.handles.retire(tensor.raw());
        Ok(())
    }

    /// Number of finished ops in a graph.
    pub fn num_ops(&self, graph: GraphHandle) -> StatusResult<usize> {
        Ok(self.graph(graph)?.read().len())
    }

    pub fn registry(&self) -> &OpRegistry {
        &self.registry
    }

    // Lookups

    fn graph(&self, graph: GraphHandle) -> StatusResult<Arc<RwLock<Graph>>> {
        self.graphs
            .get(&graph)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| not_live(graph))
    }

    fn owner(&self, op: OpHandle) -> StatusResult<GraphHandle> {
        self.ops
            .get(&op)
            .map(|entry| *entry.value())
            .ok_or_else(|| not_live(op))
    }

    fn with_node<T>(
        &self,
        op: OpHandle,
        f: impl FnOnce(&Graph, &Node) -> StatusResult<T>,
    ) -> StatusResult<T> {
        let store = self.graph(self.owner(op)?)?;
        let store = store.read();
        let node = store.node(op)?;
        f(&store, node)
    }

    fn with_graph<T>(
        &self,
        graph: GraphHandle,
        f: impl FnOnce(&Graph) -> StatusResult<T>,
    ) -> StatusResult<T> {
        let store = self.graph(graph)?;
        let store = store.read();
        f(&store)
    }

    fn with_builder<T>(
        &self,
        builder: BuilderHandle,
        f: impl FnOnce(&mut PendingOp) -> T,
    ) -> StatusResult<T> {
        let mut pending = self
            .builders
            .get_mut(&builder)
            .ok_or_else(|| not_live(builder))?;
        Ok(f(pending.value_mut()))
    }

    fn builder_graph(&self, builder: BuilderHandle) -> StatusResult<GraphHandle> {
        self.builders
            .get(&builder)
            .map(|entry| entry.value().graph)
            .ok_or_else(|| not_live(builder))
    }

    /// Checks `op` is live and belongs to `graph`.
    fn check_member(&self, graph: GraphHandle, op: OpHandle) -> StatusResult<()> {
        let owner = self.owner(op)?;
        if owner != graph {
            return Err(Status::invalid_argument(format!(
                "{op} belongs to {owner}, not {graph}"
            )));
        }
        Ok(())
    }

    fn check_producer(&self, graph: GraphHandle, output: OpOutput) -> StatusResult<()> {
        self.check_member(graph, output.op)?;
        self.with_graph(graph, |store| store.output(output).map(|_| ()))
    }
}

impl Default for ReferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn not_live(handle: impl std::fmt::Display) -> Status {
    Status::invalid_argument(format!("{handle} is not live"))
}

impl GraphBackend for ReferenceBackend {
    fn handle_kind(&self, handle: u64) -> Option<HandleKind> {
        self.handles.kind_of(handle)
    }

    fn new_operation(
        &self,
        graph: GraphHandle,
        op_type: &str,
        name: &str,
    ) -> StatusResult<BuilderHandle> {
        self.graph(graph)?;
        let def = self.registry.lookup(op_type)?;
        let handle = BuilderHandle::from_raw(self.handles.issue(HandleKind::Builder));
        self.builders
            .insert(handle, PendingOp::new(graph, def, name));
        log_trace!(
            modules::BUILDER,
            builder = handle.raw(),
            op_type,
            name,
            "Operation allocated"
        );
        Ok(handle)
    }

    fn add_input(&self, builder: BuilderHandle, input: OpOutput) -> StatusResult<()> {
        self.check_producer(self.builder_graph(builder)?, input)?;
        self.with_builder(builder, |pending| pending.add_input(input))
    }

    fn add_input_list(&self, builder: BuilderHandle, inputs: &[OpOutput]) -> StatusResult<()> {
        let graph = self.builder_graph(builder)?;
        for input in inputs {
            self.check_producer(graph, *input)?;
        }
        self.with_builder(builder, |pending| pending.add_input_list(inputs.to_vec()))
    }

    fn add_control_input(&self, builder: BuilderHandle, op: OpHandle) -> StatusResult<()> {
        self.check_member(self.builder_graph(builder)?, op)?;
        self.with_builder(builder, |pending| {
            pending.add_control_input(op);
        })
    }

    fn set_device(&self, builder: BuilderHandle, device: &str) -> StatusResult<()> {
        self.with_builder(builder, |pending| pending.set_device(device))
    }

    fn colocate_with(&self, builder: BuilderHandle, op: OpHandle) -> StatusResult<()> {
        self.check_member(self.builder_graph(builder)?, op)?;
        let name = self.op_name(op)?;
        self.with_builder(builder, |pending| pending.colocate_with(&name))
    }

    fn set_attr(&self, builder: BuilderHandle, name: &str, value: AttrValue) -> StatusResult<()> {
        self.with_builder(builder, |pending| pending.set_attr(name, value))
    }

    fn finish_operation(&self, builder: BuilderHandle) -> StatusResult<OpHandle> {
        let (_, pending) = self
            .builders
            .remove(&builder)
            .ok_or_else(|| not_live(builder))?;
        self.handles.retire(builder.raw());

        let store = self.graph(pending.graph).map_err(|_| {
            Status::failed_precondition(format!(
                "Operation '{}' was allocated in {}, which has been deleted",
                pending.name, pending.graph
            ))
        })?;
        let mut store = store.write();
        if !self.graphs.contains_key(&pending.graph) {
            return Err(Status::failed_precondition(format!(
                "{} was deleted while '{}' was being finished",
                pending.graph, pending.name
            )));
        }
        let resolved = finish::resolve(&pending, &store)?;

        let handle = OpHandle::from_raw(self.handles.issue(HandleKind::Op));
        let node = Node {
            handle,
            name: pending.name.clone(),
            op_type: pending.op_type().to_string(),
            device: pending.device.clone(),
            inputs: pending.inputs.clone(),
            control_inputs: pending.control_inputs.clone(),
            control_outputs: Vec::new(),
            attrs: resolved.attrs,
            outputs: resolved
                .outputs
                .into_iter()
                .map(|(dtype, shape)| OutputTensor {
                    dtype,
                    shape,
                    consumers: Vec::new(),
                })
                .collect(),
        };
        if let Err(status) = store.insert(node) {
            self.handles.retire(handle.raw());
            return Err(status);
        }
        self.ops.insert(handle, pending.graph);
        log_debug!(
            modules::BUILDER,
            op = handle.raw(),
            name = pending.name.as_str(),
            op_type = pending.op_type(),
            "Operation finished"
        );
        Ok(handle)
    }

    fn tensor_value(&self, tensor: TensorHandle) -> StatusResult<TensorValue> {
        self.tensors
            .get(&tensor)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| not_live(tensor))
    }

    fn op_name(&self, op: OpHandle) -> StatusResult<String> {
        self.with_node(op, |_, node| Ok(node.name.clone()))
    }

    fn op_type(&self, op: OpHandle) -> StatusResult<String> {
        self.with_node(op, |_, node| Ok(node.op_type.clone()))
    }

    fn op_device(&self, op: OpHandle) -> StatusResult<String> {
        self.with_node(op, |_, node| Ok(node.device.clone()))
    }

    fn num_inputs(&self, op: OpHandle) -> StatusResult<usize> {
        self.with_node(op, |_, node| Ok(node.inputs.len()))
    }

    fn num_control_inputs(&self, op: OpHandle) -> StatusResult<usize> {
        self.with_node(op, |_, node| Ok(node.control_inputs.len()))
    }

    fn num_outputs(&self, op: OpHandle) -> StatusResult<usize> {
        self.with_node(op, |_, node| Ok(node.outputs.len()))
    }

    fn num_control_outputs(&self, op: OpHandle) -> StatusResult<usize> {
        self.with_node(op, |_, node| Ok(node.control_outputs.len()))
    }

    fn output_num_consumers(&self, output: OpOutput) -> StatusResult<usize> {
        self.with_node(output.op, |_, node| {
            Ok(node.output(output.index)?.consumers.len())
        })
    }

    fn op_input(&self, op: OpHandle, index: i32) -> StatusResult<OpOutput> {
        self.with_node(op, |_, node| store::first_producer(node, index))
    }

    fn op_input_list(&self, op: OpHandle, index: i32) -> StatusResult<Vec<OpOutput>> {
        self.with_node(op, |_, node| Ok(node.input(index)?.producers().to_vec()))
    }

    fn output_consumers(&self, output: OpOutput) -> StatusResult<Vec<OpInput>> {
        self.with_node(output.op, |_, node| {
            Ok(node.output(output.index)?.consumers.clone())
        })
    }

    fn control_inputs(&self, op: OpHandle) -> StatusResult<Vec<OpHandle>> {
        self.with_node(op, |_, node| Ok(node.control_inputs.clone()))
    }

    fn control_outputs(&self, op: OpHandle) -> StatusResult<Vec<OpHandle>> {
        self.with_node(op, |_, node| Ok(node.control_outputs.clone()))
    }

    fn input_type(&self, graph: GraphHandle, op: OpHandle, index: i32) -> StatusResult<DataType> {
        self.with_graph(graph, |store| store.input_type(op, index))
    }

    fn output_type(&self, graph: GraphHandle, output: OpOutput) -> StatusResult<DataType> {
        self.with_graph(graph, |store| Ok(store.output(output)?.dtype))
    }

    fn tensor_shape(&self, graph: GraphHandle, output: OpOutput) -> StatusResult<Shape> {
        self.with_graph(graph, |store| Ok(store.output(output)?.shape.clone()))
    }

    fn set_tensor_shape(
        &self,
        graph: GraphHandle,
        output: OpOutput,
        shape: &Shape,
    ) -> StatusResult<()> {
        let store = self.graph(graph)?;
        let merged = store.write().refine_shape(output, shape)?;
        log_trace!(
            modules::BACKEND,
            op = output.op.raw(),
            index = output.index,
            shape = %merged,
            "Output shape refined"
        );
        Ok(())
    }

    fn attr_value(&self, op: OpHandle, name: &str) -> StatusResult<AttrValue> {
        self.with_node(op, |_, node| node.attr(name).cloned())
    }

    fn op_list(&self) -> StatusResult<Vec<u8>> {
        Ok(self.registry.encode_op_list(self.options.include_internal))
    }
}
