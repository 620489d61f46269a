//! Mapping of bridge errors onto Java exceptions.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use jni::JNIEnv;
use tfop_core::constants::modules;
use tfop_core::{BridgeError, Code, ErrorKind, Result, log_debug, log_error};

pub const NULL_POINTER_EXCEPTION: &str = "java/lang/NullPointerException";
pub const INDEX_OUT_OF_BOUNDS_EXCEPTION: &str = "java/lang/IndexOutOfBoundsException";
pub const INVALID_ARGUMENT_EXCEPTION: &str = "org/platanios/tensorflow/jni/InvalidArgumentException";
pub const FAILED_PRECONDITION_EXCEPTION: &str =
    "org/platanios/tensorflow/jni/FailedPreconditionException";
pub const NOT_FOUND_EXCEPTION: &str = "org/platanios/tensorflow/jni/NotFoundException";
pub const RUNTIME_EXCEPTION: &str = "java/lang/RuntimeException";

/// Java exception class raised for an error kind.
pub fn exception_class(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidHandle => NULL_POINTER_EXCEPTION,
        ErrorKind::OutOfRange => INDEX_OUT_OF_BOUNDS_EXCEPTION,
        ErrorKind::InvalidArgument => INVALID_ARGUMENT_EXCEPTION,
        ErrorKind::FailedPrecondition => FAILED_PRECONDITION_EXCEPTION,
        ErrorKind::NotFound => NOT_FOUND_EXCEPTION,
        ErrorKind::Backend | ErrorKind::ResourceExhausted => RUNTIME_EXCEPTION,
    }
}

/// Raises `err` in the JVM unless an exception is already pending.
pub fn throw(env: &mut JNIEnv<'_>, err: &BridgeError) {
    if env.exception_check().unwrap_or(true) {
        return;
    }
    let class = exception_class(err.kind());
    if let Err(jni_err) = env.throw_new(class, err.to_string()) {
        log_error!(
            modules::HOST,
            class,
            error = %jni_err,
            "Failed to raise exception"
        );
    }
}

/// Runs one export body.
///
/// Returns the body's value on success. On failure, or if the body panics, raises
/// the mapped exception and returns `default`.
pub fn guard<'local, T, F>(env: &mut JNIEnv<'local>, method: &'static str, default: T, body: F) -> T
where
    F: FnOnce(&mut JNIEnv<'local>) -> Result<T>,
{
    log_debug!(modules::HOST, method, "Entry point called");
    let err = match panic::catch_unwind(AssertUnwindSafe(|| body(env))) {
        Ok(Ok(value)) => return value,
        Ok(Err(err)) => err,
        Err(payload) => BridgeError::backend(
            Code::Internal,
            format!("panic in {method}: {}", panic_message(payload.as_ref())),
        ),
    };
    if err.is_recoverable() {
        log_debug!(
            modules::HOST,
            method,
            category = err.category(),
            error = %err,
            "Entry point rejected its arguments"
        );
    } else {
        log_error!(
            modules::HOST,
            method,
            category = err.category(),
            error = %err,
            "Entry point failed"
        );
    }
    throw(env, &err);
    default
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
