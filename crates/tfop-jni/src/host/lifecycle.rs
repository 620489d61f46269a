//! Exported native methods of `org.platanios.tensorflow.jni.Graph$` and `Tensor$`.
//!
//! These create and release the graphs and tensors that the `Op$` exports take as
//! handles. Creation returns `0` with a pending exception on failure.

use jni::JNIEnv;
use jni::objects::{JByteArray, JLongArray, JObject};
use jni::sys::{jint, jlong};

use super::exceptions::guard;
use super::global::bridge;
use super::marshal::{self, handle, to_jlong};

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Graph_00024_allocate<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
) -> jlong {
    guard(&mut env, "Graph.allocate", 0, |_| {
        Ok(to_jlong(bridge().new_graph().raw()))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Graph_00024_delete<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    graph: jlong,
) {
    guard(&mut env, "Graph.delete", (), |_| {
        bridge().delete_graph(handle(graph))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Tensor_00024_fromBytes<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    data_type: jint,
    shape: JLongArray<'local>,
    bytes: JByteArray<'local>,
) -> jlong {
    guard(&mut env, "Tensor.fromBytes", 0, |env| {
        let dims = marshal::read_longs(env, &shape, "tensor shape")?;
        let data = marshal::read_bytes(env, &bytes, "tensor bytes")?;
        let tensor = bridge().new_tensor(data_type, dims, data)?;
        Ok(to_jlong(tensor.raw()))
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_platanios_tensorflow_jni_Tensor_00024_delete<'local>(
    mut env: JNIEnv<'local>,
    _object: JObject<'local>,
    tensor: jlong,
) {
    guard(&mut env, "Tensor.delete", (), |_| {
        bridge().delete_tensor(handle(tensor))
    })
}
