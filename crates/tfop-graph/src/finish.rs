//! Finish-time validation and inference.
//!
//! Everything here reads the pending op and the graph without mutating either, so
//! a rejected builder leaves no trace in the graph.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tfop_core::constants::attrs::{COLOCATION, RESERVED_PREFIX};
use tfop_core::{AttrKind, AttrValue, DataType, Shape, Status, StatusResult};

use crate::builder::PendingOp;
use crate::device::DeviceSpec;
use crate::op_def::{ArgDef, ArgType, AttrDef, OpDef, ShapeContext};
use crate::store::{Graph, InputSlot};

/// Attributes and outputs of a validated op.
#[derive(Debug, Clone)]
pub struct ResolvedOp {
    pub attrs: BTreeMap<String, AttrValue>,
    pub outputs: Vec<(DataType, Shape)>,
}

pub fn resolve(pending: &PendingOp, graph: &Graph) -> StatusResult<ResolvedOp> {
    let def = pending.def.as_ref();
    validate_name(&pending.name)?;
    if graph.contains_name(&pending.name) {
        return Err(Status::invalid_argument(format!(
            "Duplicate node name in graph: '{}'",
            pending.name
        )));
    }
    DeviceSpec::parse(&pending.device)?;

    let mut attrs = pending.attrs.clone();
    merge_colocation(pending, &mut attrs)?;
    check_declared(pending, def, &attrs)?;

    let input_shapes = infer_from_inputs(pending, def, graph, &mut attrs)?;
    fill_defaults(pending, def, &mut attrs)?;
    for attr in &def.attrs {
        if let Some(value) = attrs.get(&attr.name) {
            check_constraints(&pending.name, attr, value)?;
        }
    }

    let output_types = output_types(def, &attrs)?;
    let shapes = (def.shape_fn)(&ShapeContext {
        op_type: &def.name,
        inputs: &input_shapes,
        attrs: &attrs,
    })?;
    if shapes.len() != output_types.len() {
        return Err(Status::internal(format!(
            "Shape function of '{}' produced {} shapes for {} outputs",
            def.name,
            shapes.len(),
            output_types.len()
        )));
    }

    Ok(ResolvedOp {
        attrs,
        outputs: output_types.into_iter().zip(shapes).collect(),
    })
}

/// Unions `colocate_with` entries into an explicitly set `_class` list.
fn merge_colocation(pending: &PendingOp, attrs: &mut BTreeMap<String, AttrValue>) -> StatusResult<()> {
    if pending.colocation.is_empty() {
        return Ok(());
    }
    let mut entries: BTreeSet<Vec<u8>> = pending
        .colocation
        .iter()
        .map(|entry| entry.as_bytes().to_vec())
        .collect();
    match attrs.get(COLOCATION) {
        None => {}
        Some(AttrValue::StringList(explicit)) => entries.extend(explicit.iter().cloned()),
        Some(other) => {
            return Err(Status::invalid_argument(format!(
                "Attribute '{COLOCATION}' of '{}' must be list(string), got {}",
                pending.name,
                other.kind()
            )));
        }
    }
    attrs.insert(
        COLOCATION.to_string(),
        AttrValue::StringList(entries.into_iter().collect()),
    );
    Ok(())
}

static NODE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.][A-Za-z0-9_.\-/>]*$").expect("invalid node name pattern")
});

/// Node names match `[A-Za-z0-9.][A-Za-z0-9_.\-/>]*`.
pub fn validate_name(name: &str) -> StatusResult<()> {
    if NODE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Status::invalid_argument(format!("Illegal op name '{name}'")))
    }
}
