//! tfop Graph - The graph backend behind the op bridge.
//!
//! [`GraphBackend`] lists the capabilities the bridge relies on. [`ReferenceBackend`]
//! implements all of them in process: handle issuance, the op registry and its
//! serialized catalog, the builder state machine with finish-time validation, type
//! and shape inference, and shape refinement.

pub mod backend;
pub mod builder;
pub mod device;
pub mod finish;
pub mod op_def;
pub mod op_registry;
pub mod ops;
pub mod proto;
pub mod reference;
pub mod registry;
pub mod store;

pub use backend::GraphBackend;
pub use device::DeviceSpec;
pub use op_def::{ArgDef, ArgType, AttrDef, OpDef, ShapeContext, ShapeFn};
pub use op_registry::OpRegistry;
pub use reference::{BackendOptions, ReferenceBackend};
pub use registry::HandleRegistry;
