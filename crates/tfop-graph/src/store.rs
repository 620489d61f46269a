//! Graph storage: finished nodes and their edges.

use std::collections::{BTreeMap, HashMap};

use tfop_core::{
    AttrValue, DataType, GraphHandle, OpHandle, OpInput, OpOutput, Shape, Status, StatusResult,
};

/// Producers feeding one input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSlot {
    Single(OpOutput),
    List(Vec<OpOutput>),
}

impl InputSlot {
    pub fn producers(&self) -> &[OpOutput] {
        match self {
            InputSlot::Single(output) => std::slice::from_ref(output),
            InputSlot::List(outputs) => outputs,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, InputSlot::List(_))
    }
}

/// One output tensor of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    pub dtype: DataType,
    pub shape: Shape,
    /// Consuming `(op, input slot)` pairs, one per edge.
    pub consumers: Vec<OpInput>,
}

/// A finished operation.
#[derive(Debug, Clone)]
pub struct Node {
    pub handle: OpHandle,
    pub name: String,
    pub op_type: String,
    pub device: String,
    pub inputs: Vec<InputSlot>,
    pub control_inputs: Vec<OpHandle>,
    pub control_outputs: Vec<OpHandle>,
    pub attrs: BTreeMap<String, AttrValue>,
    pub outputs: Vec<OutputTensor>,
}

impl Node {
    pub fn input(&self, index: i32) -> StatusResult<&InputSlot> {
        let slot = checked_index(&self.name, "input", index, self.inputs.len())?;
        Ok(&self.inputs[slot])
    }

    pub fn output(&self, index: i32) -> StatusResult<&OutputTensor> {
        let slot = checked_index(&self.name, "output", index, self.outputs.len())?;
        Ok(&self.outputs[slot])
    }

    pub fn attr(&self, name: &str) -> StatusResult<&AttrValue> {
        self.attrs.get(name).ok_or_else(|| {
            Status::not_found(format!("Operation '{}' has no attr named '{name}'", self.name))
        })
    }
}

/// Checks `0 <= index < len` and converts it to a position.
pub fn checked_index(op_name: &str, what: &str, index: i32, len: usize) -> StatusResult<usize> {
    match usize::try_from(index) {
        Ok(position) if position < len => Ok(position),
        _ => Err(Status::out_of_range(format!(
            "{what} index {index} is not in [0, {len}) for operation '{op_name}'"
        ))),
    }
}

/// Nodes of one graph in insertion order.
#[derive(Debug)]
pub struct Graph {
    handle: GraphHandle,
    nodes: Vec<Node>,
    by_name: HashMap<String, usize>,
    by_handle: HashMap<OpHandle, usize>,
}

impl Graph {
    pub fn new(handle: GraphHandle) -> Self {
        Self {
            handle,
            nodes: Vec::new(),
            by_name: HashMap::new(),
            by_handle: HashMap::new(),
        }
    }

    pub fn handle(&self) -> GraphHandle {
        self.handle
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn op_handles(&self) -> impl Iterator<Item = OpHandle> + '_ {
        self.nodes.iter().map(|node| node.handle)
    }

    pub fn node(&self, op: OpHandle) -> StatusResult<&Node> {
        self.by_handle
            .get(&op)
            .map(|index| &self.nodes[*index])
            .ok_or_else(|| {
                Status::invalid_argument(format!("{op} does not belong to {}", self.handle))
            })
    }

    pub fn output(&self, output: OpOutput) -> StatusResult<&OutputTensor> {
        self.node(output.op)?.output(output.index)
    }

    /// Type of the first producer feeding `op`'s input slot `index`.
    pub fn input_type(&self, op: OpHandle, index: i32) -> StatusResult<DataType> {
        let node = self.node(op)?;
        let producer = first_producer(node, index)?;
        Ok(self.output(producer)?.dtype)
    }

    /// Merges `shape` into the stored shape of `output`.
    pub fn refine_shape(&mut self, output: OpOutput, shape: &Shape) -> StatusResult<Shape> {
        let node_index = *self.by_handle.get(&output.op).ok_or_else(|| {
            Status::invalid_argument(format!("{} does not belong to {}", output.op, self.handle))
        })?;
        let node = &mut self.nodes[node_index];
        let slot = checked_index(&node.name, "output", output.index, node.outputs.len())?;
        let tensor = &mut node.outputs[slot];
        let merged = tensor.shape.merge(shape).map_err(|conflict| {
            Status::failed_precondition(format!(
                "Cannot refine output {} of '{}': {conflict}",
                output.index, node.name
            ))
        })?;
        tensor.shape = merged.clone();
        Ok(merged)
    }

    /// Inserts a validated node and records its consumer and control back-edges.
    ///
    /// Producers and control inputs must already be nodes of this graph.
    pub fn insert(&mut self, node: Node) -> StatusResult<()> {
        if self.by_name.contains_key(&node.name) {
            return Err(Status::invalid_argument(format!(
                "Duplicate node name in graph: '{}'",
                node.name
            )));
        }
        for producer in node.inputs.iter().flat_map(InputSlot::producers) {
            self.output(*producer)?;
        }
        for control in &node.control_inputs {
            self.node(*control)?;
        }

        let handle = node.handle;
        for (slot, input) in node.inputs.iter().enumerate() {
            for producer in input.producers() {
                let index = self.by_handle[&producer.op];
                let position = producer.index as usize;
                self.nodes[index].outputs[position]
                    .consumers
                    .push(OpInput::new(handle, slot as i32));
            }
        }
        for control in &node.control_inputs {
            let index = self.by_handle[control];
            self.nodes[index].control_outputs.push(handle);
        }

        let index = self.nodes.len();
        self.by_name.insert(node.name.clone(), index);
        self.by_handle.insert(handle, index);
        self.nodes.push(node);
        Ok(())
    }
}

/// First producer of a slot; empty variadic slots have none.
pub fn first_producer(node: &Node, index: i32) -> StatusResult<OpOutput> {
    node.input(index)?
        .producers()
        .first()
        .copied()
        .ok_or_else(|| {
            Status::out_of_range(format!(
                "input {index} of operation '{}' is an empty list",
                node.name
            ))
        })
}
