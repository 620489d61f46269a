//! Pending operation state between `allocate` and `finish`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tfop_core::constants::attrs::COLOCATION_PREFIX;
use tfop_core::{AttrValue, GraphHandle, OpHandle, OpOutput};

use crate::op_def::OpDef;
use crate::store::InputSlot;

/// Accumulated configuration of an op under construction.
#[derive(Debug, Clone)]
pub struct PendingOp {
    pub graph: GraphHandle,
    pub def: Arc<OpDef>,
    pub name: String,
    pub device: String,
    pub inputs: Vec<InputSlot>,
    pub control_inputs: Vec<OpHandle>,
    /// `loc:@<name>` entries, sorted and deduplicated.
    pub colocation: BTreeSet<String>,
    pub attrs: BTreeMap<String, AttrValue>,
}

impl PendingOp {
    pub fn new(graph: GraphHandle, def: Arc<OpDef>, name: &str) -> Self {
        Self {
            graph,
            def,
            name: name.to_string(),
            device: String::new(),
            inputs: Vec::new(),
            control_inputs: Vec::new(),
            colocation: BTreeSet::new(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn op_type(&self) -> &str {
        &self.def.name
    }

    pub fn add_input(&mut self, input: OpOutput) {
        self.inputs.push(InputSlot::Single(input));
    }

    pub fn add_input_list(&mut self, inputs: Vec<OpOutput>) {
        self.inputs.push(InputSlot::List(inputs));
    }

    /// Adds a control input unless the producer is already one.
    pub fn add_control_input(&mut self, op: OpHandle) -> bool {
        if self.control_inputs.contains(&op) {
            return false;
        }
        self.control_inputs.push(op);
        true
    }

    pub fn set_device(&mut self, device: &str) {
        self.device = device.to_string();
    }

    pub fn colocate_with(&mut self, op_name: &str) {
        self.colocation.insert(format!("{COLOCATION_PREFIX}{op_name}"));
    }

    /// Last writer wins.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) {
        self.attrs.insert(name.to_string(), value);
    }
}
