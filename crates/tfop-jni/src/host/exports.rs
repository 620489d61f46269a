//! Exported native methods of `org.platanios.tensorflow.jni.Op$`.
//!
//! Each export marshals its arguments, calls the global bridge inside
//! [`guard`] and marshals the result. On failure a Java exception is pending and the
//! return value is `0` for numbers and handles, `null` for objects.

use std::ptr;

use jni::JNIEnv;
use jni::objects::{
    JBooleanArray, JByteArray, JFloatArray, JIntArray, JLongArray, JObject, JObjectArray, JString,
};
use jni::sys::{
    jboolean, jbyteArray, jfloat, jint, jlong, jlongArray, jobject, jobjectArray, jstring,
};

use super::exceptions::guard;
use super::global::bridge;
use super::marshal::{self, handle, to_jlong};

// Inspection

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_name<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jstring {
    guard(&mut env, "name", ptr::null_mut(), |env| {
        let name = bridge().name(handle(op))?;
        marshal::new_string(env, &name)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_opType<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jstring {
    guard(&mut env, "opType", ptr::null_mut(), |env| {
        let op_type = bridge().op_type(handle(op))?;
        marshal::new_string(env, &op_type)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_device<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jstring {
    guard(&mut env, "device", ptr::null_mut(), |env| {
        let device = bridge().device(handle(op))?;
        marshal::new_string(env, &device)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_numInputs<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jint {
    guard(&mut env, "numInputs", 0, |_| bridge().num_inputs(handle(op)))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_numControlInputs<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jint {
    guard(&mut env, "numControlInputs", 0, |_| {
        bridge().num_control_inputs(handle(op))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_numOutputs<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jint {
    guard(&mut env, "numOutputs", 0, |_| bridge().num_outputs(handle(op)))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_numControlOutputs<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jint {
    guard(&mut env, "numControlOutputs", 0, |_| {
        bridge().num_control_outputs(handle(op))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_numConsumers<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
    output_index: jint,
) -> jint {
    guard(&mut env, "numConsumers", 0, |_| {
        bridge().num_consumers(handle(op), output_index)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_input<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
    input_index: jint,
) -> jobject {
    guard(&mut env, "input", ptr::null_mut(), |env| {
        let producer = bridge().input(handle(op), input_index)?;
        marshal::new_op_output(env, producer)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_controlInputs<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jlongArray {
    guard(&mut env, "controlInputs", ptr::null_mut(), |env| {
        let ops = bridge().control_inputs(handle(op))?;
        marshal::new_handle_array(env, &ops)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_controlOutputs<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
) -> jlongArray {
    guard(&mut env, "controlOutputs", ptr::null_mut(), |env| {
        let ops = bridge().control_outputs(handle(op))?;
        marshal::new_handle_array(env, &ops)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_consumers<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
    output_index: jint,
) -> jobjectArray {
    guard(&mut env, "consumers", ptr::null_mut(), |env| {
        let consumers = bridge().consumers(handle(op), output_index)?;
        marshal::new_consumer_array(env, &consumers)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_inputDataType<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    graph: jlong,
    op: jlong,
    input_index: jint,
) -> jint {
    guard(&mut env, "inputDataType", 0, |_| {
        bridge().input_data_type(handle(graph), handle(op), input_index)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_outputDataType<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    graph: jlong,
    op: jlong,
    output_index: jint,
) -> jint {
    guard(&mut env, "outputDataType", 0, |_| {
        bridge().output_data_type(handle(graph), handle(op), output_index)
    })
}

/// `null` for unknown rank; the host cannot tell it apart from a failure without
/// checking for a pending exception.
#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_shape<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    graph: jlong,
    op: jlong,
    output_index: jint,
) -> jlongArray {
    guard(&mut env, "shape", ptr::null_mut(), |env| {
        let dims = bridge().shape(handle(graph), handle(op), output_index)?;
        marshal::new_dims(env, dims)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setShape<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    graph: jlong,
    op: jlong,
    output_index: jint,
    dims: JLongArray<'local>,
    num_dims: jint,
) {
    guard(&mut env, "setShape", (), |env| {
        let dims = marshal::read_dims(env, &dims, num_dims)?;
        bridge().set_shape(handle(graph), handle(op), output_index, &dims, num_dims)
    })
}

// Attribute retrieval

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_getAttrString<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
    name: JString<'local>,
) -> jstring {
    guard(&mut env, "getAttrString", ptr::null_mut(), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let value = bridge().get_attr_string(handle(op), &name)?;
        marshal::new_string_from_bytes(env, &value)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_getAttrStringList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
    name: JString<'local>,
) -> jobjectArray {
    guard(&mut env, "getAttrStringList", ptr::null_mut(), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let values = bridge().get_attr_string_list(handle(op), &name)?;
        marshal::new_byte_arrays(env, &values)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_getAttrType<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
    name: JString<'local>,
) -> jint {
    guard(&mut env, "getAttrType", 0, |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        bridge().get_attr_type(handle(op), &name)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_getAttrShape<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    op: jlong,
    name: JString<'local>,
) -> jlongArray {
    guard(&mut env, "getAttrShape", ptr::null_mut(), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let dims = bridge().get_attr_shape(handle(op), &name)?;
        marshal::new_dims(env, dims)
    })
}

// Catalog

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_allOps<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
) -> jbyteArray {
    guard(&mut env, "allOps", ptr::null_mut(), |env| {
        let bytes = bridge().all_ops()?;
        marshal::new_byte_array(env, &bytes)
    })
}

// Building

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_allocate<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    graph: jlong,
    op_type: JString<'local>,
    name: JString<'local>,
) -> jlong {
    guard(&mut env, "allocate", 0, |env| {
        let op_type = marshal::read_string(env, &op_type, "op type")?;
        let name = marshal::read_string(env, &name, "op name")?;
        let builder = bridge().allocate(handle(graph), &op_type, &name)?;
        Ok(to_jlong(builder.raw()))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_finish<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
) -> jlong {
    guard(&mut env, "finish", 0, |_| {
        let op = bridge().finish(handle(builder))?;
        Ok(to_jlong(op.raw()))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_addInput<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    op: jlong,
    output_index: jint,
) {
    guard(&mut env, "addInput", (), |_| {
        bridge().add_input(handle(builder), handle(op), output_index)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_addInputList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    ops: JLongArray<'local>,
    output_indices: JIntArray<'local>,
) {
    guard(&mut env, "addInputList", (), |env| {
        let ops = marshal::read_handles(env, &ops, "input ops")?;
        let indices = marshal::read_ints(env, &output_indices, "output indices")?;
        bridge().add_input_list(handle(builder), &ops, &indices)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_addControlInput<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    op: jlong,
) {
    guard(&mut env, "addControlInput", (), |_| {
        bridge().add_control_input(handle(builder), handle(op))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setDevice<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    device: JString<'local>,
) {
    guard(&mut env, "setDevice", (), |env| {
        let device = marshal::read_string(env, &device, "device")?;
        bridge().set_device(handle(builder), &device)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_colocateWith<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    op: jlong,
) {
    guard(&mut env, "colocateWith", (), |_| {
        bridge().colocate_with(handle(builder), handle(op))
    })
}

// Attribute setters

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrString<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    value: JByteArray<'local>,
) {
    guard(&mut env, "setAttrString", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let value = marshal::read_bytes(env, &value, "attribute value")?;
        bridge().set_attr_string(handle(builder), &name, &value)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrStringList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    values: JObjectArray<'local>,
) {
    guard(&mut env, "setAttrStringList", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let values = marshal::read_byte_arrays(env, &values, "attribute values")?;
        bridge().set_attr_string_list(handle(builder), &name, values)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrInt<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    value: jlong,
) {
    guard(&mut env, "setAttrInt", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        bridge().set_attr_int(handle(builder), &name, value)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrIntList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    values: JLongArray<'local>,
) {
    guard(&mut env, "setAttrIntList", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let values = marshal::read_longs(env, &values, "attribute values")?;
        bridge().set_attr_int_list(handle(builder), &name, &values)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrFloat<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    value: jfloat,
) {
    guard(&mut env, "setAttrFloat", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        bridge().set_attr_float(handle(builder), &name, value)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrFloatList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    values: JFloatArray<'local>,
) {
    guard(&mut env, "setAttrFloatList", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let values = marshal::read_floats(env, &values, "attribute values")?;
        bridge().set_attr_float_list(handle(builder), &name, &values)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrBool<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    value: jboolean,
) {
    guard(&mut env, "setAttrBool", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        bridge().set_attr_bool(handle(builder), &name, value != 0)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrBoolList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    values: JBooleanArray<'local>,
) {
    guard(&mut env, "setAttrBoolList", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let values = marshal::read_bools(env, &values, "attribute values")?;
        bridge().set_attr_bool_list(handle(builder), &name, &values)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrType<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    dtype: jint,
) {
    guard(&mut env, "setAttrType", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        bridge().set_attr_type(handle(builder), &name, dtype)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrTypeList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    dtypes: JIntArray<'local>,
) {
    guard(&mut env, "setAttrTypeList", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let dtypes = marshal::read_ints(env, &dtypes, "data types")?;
        bridge().set_attr_type_list(handle(builder), &name, &dtypes)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrTensor<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    tensor: jlong,
) {
    guard(&mut env, "setAttrTensor", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        bridge().set_attr_tensor(handle(builder), &name, handle(tensor))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrTensorList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    tensors: JLongArray<'local>,
) {
    guard(&mut env, "setAttrTensorList", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let tensors = marshal::read_handles(env, &tensors, "tensors")?;
        bridge().set_attr_tensor_list(handle(builder), &name, &tensors)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrShape<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    dims: JLongArray<'local>,
    num_dims: jint,
) {
    guard(&mut env, "setAttrShape", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let dims = marshal::read_dims(env, &dims, num_dims)?;
        bridge().set_attr_shape(handle(builder), &name, &dims, num_dims)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Op_00024_setAttrShapeList<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    builder: jlong,
    name: JString<'local>,
    dims: JObjectArray<'local>,
    num_dims: JIntArray<'local>,
) {
    guard(&mut env, "setAttrShapeList", (), |env| {
        let name = marshal::read_string(env, &name, "attribute name")?;
        let ranks = marshal::read_ints(env, &num_dims, "ranks")?;
        let dims = marshal::read_long_arrays(env, &dims, &ranks, "dims")?;
        bridge().set_attr_shape_list(handle(builder), &name, &dims, &ranks)
    })
}
