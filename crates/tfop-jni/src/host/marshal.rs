//! Conversions between JNI references and plain Rust data.
//!
//! Inputs are copied out of the JVM on entry. Per-element local references created
//! while walking object arrays are deleted as soon as the element is copied.

use jni::JNIEnv;
use jni::errors::Error as JniError;
use jni::objects::{
    JBooleanArray, JByteArray, JFloatArray, JIntArray, JLongArray, JObject, JObjectArray,
    JString, JValue,
};
use jni::sys::{jbyteArray, jint, jlong, jlongArray, jobject, jobjectArray, jsize, jstring};
use tfop_core::{BridgeError, OpHandle, OpInput, OpOutput, Result};

/// Host class of `(op, index)` pairs.
pub const OP_OUTPUT_CLASS: &str = "org/platanios/tensorflow/jni/OpOutput";
const OP_OUTPUT_CONSTRUCTOR: &str = "(JI)V";
const BYTE_ARRAY_CLASS: &str = "[B";

/// Translates a failed JNI call. A Java exception raised by the call stays pending.
pub fn host_error(err: JniError) -> BridgeError {
    match err {
        JniError::NullPtr(what) | JniError::NullDeref(what) => {
            BridgeError::invalid_argument(format!("null reference: {what}"))
        }
        other => BridgeError::resource_exhausted(format!("JNI call failed: {other}")),
    }
}

fn require_non_null(object: &JObject<'_>, what: &str) -> Result<()> {
    if object.is_null() {
        Err(BridgeError::invalid_argument(format!("{what} must not be null")))
    } else {
        Ok(())
    }
}

fn to_jsize(len: usize) -> Result<jsize> {
    jsize::try_from(len)
        .map_err(|_| BridgeError::resource_exhausted(format!("{len} elements exceed a Java array")))
}

pub fn handle(raw: jlong) -> u64 {
    raw as u64
}

pub fn to_jlong(raw: u64) -> jlong {
    raw as jlong
}

// Reading

pub fn read_string(env: &mut JNIEnv<'_>, value: &JString<'_>, what: &str) -> Result<String> {
    require_non_null(value, what)?;
    let value = env.get_string(value).map_err(host_error)?;
    Ok(value.into())
}

pub fn read_bytes(env: &JNIEnv<'_>, array: &JByteArray<'_>, what: &str) -> Result<Vec<u8>> {
    require_non_null(array, what)?;
    env.convert_byte_array(array).map_err(host_error)
}

fn buffer_len(len: jsize) -> usize {
    usize::try_from(len).unwrap_or_default()
}

pub fn read_longs(env: &JNIEnv<'_>, array: &JLongArray<'_>, what: &str) -> Result<Vec<i64>> {
    require_non_null(array, what)?;
    let len = env.get_array_length(array).map_err(host_error)?;
    let mut values = vec![0; buffer_len(len)];
    env.get_long_array_region(array, 0, &mut values)
        .map_err(host_error)?;
    Ok(values)
}

pub fn read_ints(env: &JNIEnv<'_>, array: &JIntArray<'_>, what: &str) -> Result<Vec<i32>> {
    require_non_null(array, what)?;
    let len = env.get_array_length(array).map_err(host_error)?;
    let mut values = vec![0; buffer_len(len)];
    env.get_int_array_region(array, 0, &mut values)
        .map_err(host_error)?;
    Ok(values)
}

pub fn read_floats(env: &JNIEnv<'_>, array: &JFloatArray<'_>, what: &str) -> Result<Vec<f32>> {
    require_non_null(array, what)?;
    let len = env.get_array_length(array).map_err(host_error)?;
    let mut values = vec![0.0; buffer_len(len)];
    env.get_float_array_region(array, 0, &mut values)
        .map_err(host_error)?;
    Ok(values)
}

pub fn read_bools(env: &JNIEnv<'_>, array: &JBooleanArray<'_>, what: &str) -> Result<Vec<bool>> {
    require_non_null(array, what)?;
    let len = env.get_array_length(array).map_err(host_error)?;
    let mut values = vec![0; buffer_len(len)];
    env.get_boolean_array_region(array, 0, &mut values)
        .map_err(host_error)?;
    Ok(values.into_iter().map(|value| value != 0).collect())
}

/// Handle array as raw handle values.
pub fn read_handles(env: &JNIEnv<'_>, array: &JLongArray<'_>, what: &str) -> Result<Vec<u64>> {
    Ok(read_longs(env, array, what)?
        .into_iter()
        .map(handle)
        .collect())
}

/// Shape dims for a write. A null array is accepted only for unknown rank.
pub fn read_dims(env: &JNIEnv<'_>, dims: &JLongArray<'_>, rank: jint) -> Result<Vec<i64>> {
    if dims.is_null() && rank < 0 {
        return Ok(Vec::new());
    }
    read_longs(env, dims, "dims")
}

/// `byte[][]` as owned byte strings.
pub fn read_byte_arrays(
    env: &mut JNIEnv<'_>,
    array: &JObjectArray<'_>,
    what: &str,
) -> Result<Vec<Vec<u8>>> {
    require_non_null(array, what)?;
    let len = env.get_array_length(array).map_err(host_error)?;
    let mut values = Vec::with_capacity(buffer_len(len));
    for index in 0..len {
        let element = env
            .get_object_array_element(array, index)
            .map_err(host_error)?;
        let element = JByteArray::from(element);
        let bytes = read_bytes(env, &element, what);
        env.delete_local_ref(element).map_err(host_error)?;
        values.push(bytes?);
    }
    Ok(values)
}

/// `long[][]` as owned dims arrays, one per shape.
pub fn read_long_arrays(
    env: &mut JNIEnv<'_>,
    array: &JObjectArray<'_>,
    ranks: &[i32],
    what: &str,
) -> Result<Vec<Vec<i64>>> {
    require_non_null(array, what)?;
    let len = env.get_array_length(array).map_err(host_error)?;
    let mut values = Vec::with_capacity(buffer_len(len));
    for index in 0..len {
        let element = env
            .get_object_array_element(array, index)
            .map_err(host_error)?;
        let element = JLongArray::from(element);
        let rank = ranks
            .get(buffer_len(index))
            .copied()
            .unwrap_or_default();
        let dims = read_dims(env, &element, rank);
        env.delete_local_ref(element).map_err(host_error)?;
        values.push(dims?);
    }
    Ok(values)
}

// Writing

pub fn new_string(env: &mut JNIEnv<'_>, value: &str) -> Result<jstring> {
    Ok(env.new_string(value).map_err(host_error)?.into_raw())
}

/// Byte string as a Java string; the bytes must be UTF-8.
pub fn new_string_from_bytes(env: &mut JNIEnv<'_>, bytes: &[u8]) -> Result<jstring> {
    let value = std::str::from_utf8(bytes)
        .map_err(|err| BridgeError::invalid_argument(format!("string is not valid UTF-8: {err}")))?;
    new_string(env, value)
}

pub fn new_long_array(env: &mut JNIEnv<'_>, values: &[i64]) -> Result<jlongArray> {
    let array = env
        .new_long_array(to_jsize(values.len())?)
        .map_err(host_error)?;
    env.set_long_array_region(&array, 0, values)
        .map_err(host_error)?;
    Ok(array.into_raw())
}

/// Optional dims as `long[]`, `null` for unknown rank.
pub fn new_dims(env: &mut JNIEnv<'_>, dims: Option<Vec<i64>>) -> Result<jlongArray> {
    match dims {
        Some(dims) => new_long_array(env, &dims),
        None => Ok(std::ptr::null_mut()),
    }
}

pub fn new_handle_array(env: &mut JNIEnv<'_>, handles: &[OpHandle]) -> Result<jlongArray> {
    let raw: Vec<i64> = handles.iter().map(|op| to_jlong(op.raw())).collect();
    new_long_array(env, &raw)
}

pub fn new_byte_array(env: &mut JNIEnv<'_>, bytes: &[u8]) -> Result<jbyteArray> {
    Ok(env.byte_array_from_slice(bytes).map_err(host_error)?.into_raw())
}

pub fn new_byte_arrays(env: &mut JNIEnv<'_>, values: &[Vec<u8>]) -> Result<jobjectArray> {
    let array = env
        .new_object_array(to_jsize(values.len())?, BYTE_ARRAY_CLASS, JObject::null())
        .map_err(host_error)?;
    for (index, value) in values.iter().enumerate() {
        let element = env.byte_array_from_slice(value).map_err(host_error)?;
        env.set_object_array_element(&array, to_jsize(index)?, &element)
            .map_err(host_error)?;
        env.delete_local_ref(element).map_err(host_error)?;
    }
    Ok(array.into_raw())
}

fn new_op_output_object<'local>(
    env: &mut JNIEnv<'local>,
    op: OpHandle,
    index: i32,
) -> Result<JObject<'local>> {
    env.new_object(
        OP_OUTPUT_CLASS,
        OP_OUTPUT_CONSTRUCTOR,
        &[JValue::Long(to_jlong(op.raw())), JValue::Int(index)],
    )
    .map_err(host_error)
}

pub fn new_op_output(env: &mut JNIEnv<'_>, output: OpOutput) -> Result<jobject> {
    Ok(new_op_output_object(env, output.op, output.index)?.into_raw())
}

/// Consumer edge ends as an `OpOutput[]` of `(consumer op, input slot)`.
pub fn new_consumer_array(env: &mut JNIEnv<'_>, consumers: &[OpInput]) -> Result<jobjectArray> {
    let array = env
        .new_object_array(to_jsize(consumers.len())?, OP_OUTPUT_CLASS, JObject::null())
        .map_err(host_error)?;
    for (index, consumer) in consumers.iter().enumerate() {
        let element = new_op_output_object(env, consumer.op, consumer.index)?;
        env.set_object_array_element(&array, to_jsize(index)?, &element)
            .map_err(host_error)?;
        env.delete_local_ref(element).map_err(host_error)?;
    }
    Ok(array.into_raw())
}
