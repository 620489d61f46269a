//! Registry of op definitions and the serialized catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use prost::Message;
use tfop_core::constants::{attrs::RESERVED_PREFIX, modules};
use tfop_core::{Code, Status, StatusResult, log_info};

use crate::op_def::OpDef;
use crate::ops::standard_ops;
use crate::proto;

static STANDARD: Lazy<Arc<OpRegistry>> = Lazy::new(|| {
    let mut registry = OpRegistry::new();
    for def in standard_ops() {
        // names in the standard library are unique
        let _ = registry.register(def);
    }
    log_info!(modules::CATALOG, ops = registry.len(), "Standard op library registered");
    Arc::new(registry)
});

/// Op definitions keyed by op type, in name order.
#[derive(Debug, Default)]
pub struct OpRegistry {
    ops: BTreeMap<String, Arc<OpDef>>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding the standard op library.
    pub fn standard() -> Arc<OpRegistry> {
        Arc::clone(&STANDARD)
    }

    pub fn register(&mut self, def: OpDef) -> StatusResult<()> {
        if self.ops.contains_key(&def.name) {
            return Err(Status::new(
                Code::AlreadyExists,
                format!("Op type '{}' is already registered", def.name),
            ));
        }
        self.ops.insert(def.name.clone(), Arc::new(def));
        Ok(())
    }

    pub fn lookup(&self, op_type: &str) -> StatusResult<Arc<OpDef>> {
        self.ops
            .get(op_type)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("Op type not registered '{op_type}'")))
    }

    pub fn contains(&self, op_type: &str) -> bool {
        self.ops.contains_key(op_type)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Catalog message; internal ops (leading `_`) only when requested.
    pub fn op_list(&self, include_internal: bool) -> proto::OpList {
        proto::OpList {
            op: self
                .ops
                .values()
                .filter(|def| include_internal || !def.name.starts_with(RESERVED_PREFIX))
                .map(|def| def.to_proto())
                .collect(),
        }
    }

    /// Protobuf encoding of [`OpRegistry::op_list`].
    pub fn encode_op_list(&self, include_internal: bool) -> Vec<u8> {
        self.op_list(include_internal).encode_to_vec()
    }
}
