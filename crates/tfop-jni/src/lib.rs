//! tfop JNI - Native methods of `org.platanios.tensorflow.jni.Op$`.
//!
//! Two layers:
//! - [`bridge`] holds [`OpBridge`], the entry surface as plain Rust methods over raw
//!   handle values. It resolves handles, calls the graph backend and translates
//!   statuses into [`tfop_core::BridgeError`].
//! - [`host`] is the JNI glue: argument marshaling, exception raising and the
//!   exported `Java_org_platanios_tensorflow_jni_Op_00024_*` symbols.

pub mod bridge;
pub mod host;

pub use bridge::OpBridge;
