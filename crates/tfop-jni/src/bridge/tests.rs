use prost::Message;
use tfop_core::{AttrValue, DataType, ErrorKind, OpHandle, OpInput, OpOutput, TensorValue};
use tfop_graph::ReferenceBackend;
use tfop_graph::proto::OpList;

use super::OpBridge;

const FLOAT: i32 = 1;
const INT32: i32 = 3;

fn setup() -> (OpBridge<ReferenceBackend>, u64) {
    let bridge = OpBridge::new(ReferenceBackend::new());
    let graph = bridge.new_graph().raw();
    (bridge, graph)
}

fn placeholder(bridge: &OpBridge<ReferenceBackend>, graph: u64, name: &str, dims: &[i64]) -> u64 {
    let builder = bridge
        .allocate(graph, "Placeholder", name)
        .expect("allocate placeholder")
        .raw();
    bridge
        .set_attr_type(builder, "dtype", FLOAT)
        .expect("dtype");
    bridge
        .set_attr_shape(builder, "shape", dims, dims.len() as i32)
        .expect("shape");
    bridge.finish(builder).expect("finish placeholder").raw()
}

fn binary(bridge: &OpBridge<ReferenceBackend>, graph: u64, op_type: &str, name: &str, x: u64, y: u64) -> u64 {
    let builder = bridge.allocate(graph, op_type, name).expect("allocate").raw();
    bridge.add_input(builder, x, 0).expect("x");
    bridge.add_input(builder, y, 0).expect("y");
    bridge.finish(builder).expect("finish binary").raw()
}

fn output(op: u64, index: i32) -> OpOutput {
    OpOutput::new(OpHandle::from_raw(op), index)
}

#[test]
fn scalar_constant() {
    let (bridge, graph) = setup();
    let tensor = bridge
        .backend()
        .new_tensor(TensorValue::scalar_i32(7))
        .raw();

    let builder = bridge.allocate(graph, "Const", "c").expect("allocate").raw();
    bridge.set_attr_tensor(builder, "value", tensor).expect("value");
    bridge.set_attr_type(builder, "dtype", INT32).expect("dtype");
    let c = bridge.finish(builder).expect("finish").raw();

    let AttrValue::Tensor(stored) = bridge.backend_attr(c, "value") else {
        panic!("value is not a tensor");
    };
    assert!(stored.dims().is_empty());
    assert_eq!(stored.data(), 7i32.to_le_bytes().as_slice());

    assert_eq!(bridge.name(c).expect("name"), "c");
    assert_eq!(bridge.op_type(c).expect("type"), "Const");
    assert_eq!(bridge.device(c).expect("device"), "");
    assert_eq!(bridge.num_inputs(c).expect("inputs"), 0);
    assert_eq!(bridge.num_outputs(c).expect("outputs"), 1);
    assert_eq!(bridge.output_data_type(graph, c, 0).expect("dtype"), INT32);
    assert_eq!(bridge.shape(graph, c, 0).expect("shape"), Some(vec![]));
    assert_eq!(bridge.num_consumers(c, 0).expect("consumers"), 0);
}

#[test]
fn binary_add_of_placeholders() {
    let (bridge, graph) = setup();
    let x = placeholder(&bridge, graph, "x", &[-1]);
    let y = placeholder(&bridge, graph, "y", &[-1]);
    let add = binary(&bridge, graph, "Add", "add", x, y);

    assert_eq!(bridge.num_inputs(add).expect("inputs"), 2);
    assert_eq!(bridge.input(add, 0).expect("input 0"), output(x, 0));
    assert_eq!(bridge.input(add, 1).expect("input 1"), output(y, 0));
    assert_eq!(bridge.output_data_type(graph, add, 0).expect("dtype"), FLOAT);
    assert_eq!(bridge.shape(graph, add, 0).expect("shape"), Some(vec![-1]));
    assert_eq!(bridge.get_attr_type(add, "T").expect("inferred T"), FLOAT);

    let consumers = bridge.consumers(x, 0).expect("consumers");
    assert_eq!(consumers, vec![OpInput::new(OpHandle::from_raw(add), 0)]);
    assert_eq!(bridge.num_consumers(x, 0).expect("count"), 1);
}

#[test]
fn add_n_uses_one_variadic_slot() {
    let (bridge, graph) = setup();
    let inputs: Vec<u64> = ["a", "b", "c"]
        .iter()
        .map(|name| placeholder(&bridge, graph, name, &[2]))
        .collect();

    let builder = bridge.allocate(graph, "AddN", "sum").expect("allocate").raw();
    bridge
        .add_input_list(builder, &inputs, &[0, 0, 0])
        .expect("input list");
    let sum = bridge.finish(builder).expect("finish").raw();

    assert_eq!(bridge.num_inputs(sum).expect("inputs"), 1);
    assert_eq!(bridge.input(sum, 0).expect("first"), output(inputs[0], 0));
    let list = bridge.input_list(sum, 0).expect("list");
    assert_eq!(list, inputs.iter().map(|op| output(*op, 0)).collect::<Vec<_>>());
    assert_eq!(
        bridge.backend_attr(sum, "N"),
        AttrValue::Int(3)
    );
    assert_eq!(bridge.shape(graph, sum, 0).expect("shape"), Some(vec![2]));
    assert_eq!(
        bridge.consumers(inputs[1], 0).expect("consumers"),
        vec![OpInput::new(OpHandle::from_raw(sum), 0)]
    );
}

#[test]
fn device_and_colocation_coexist() {
    let (bridge, graph) = setup();
    let a = placeholder(&bridge, graph, "a", &[]);

    let builder = bridge.allocate(graph, "NoOp", "n").expect("allocate").raw();
    bridge.set_device(builder, "/device:CPU:0").expect("device");
    bridge.colocate_with(builder, a).expect("colocate");
    let n = bridge.finish(builder).expect("finish").raw();

    assert_eq!(bridge.device(n).expect("device"), "/device:CPU:0");
    assert_eq!(
        bridge.get_attr_string_list(n, "_class").expect("_class"),
        vec![b"loc:@a".to_vec()]
    );
    assert_eq!(bridge.device(a).expect("device"), "");
}

#[test]
fn explicit_class_merges_with_colocation() {
    let (bridge, graph) = setup();
    let a = placeholder(&bridge, graph, "a", &[]);
    let b = placeholder(&bridge, graph, "b", &[]);

    let builder = bridge.allocate(graph, "NoOp", "n").expect("allocate").raw();
    bridge
        .set_attr_string_list(builder, "_class", vec![b"loc:@b".to_vec(), b"loc:@a".to_vec()])
        .expect("explicit _class");
    bridge.colocate_with(builder, a).expect("colocate a");
    let n = bridge.finish(builder).expect("finish").raw();
    assert_eq!(
        bridge.get_attr_string_list(n, "_class").expect("_class"),
        vec![b"loc:@a".to_vec(), b"loc:@b".to_vec()]
    );

    let builder = bridge.allocate(graph, "NoOp", "m").expect("allocate").raw();
    bridge.set_attr_int(builder, "_class", 1).expect("odd _class");
    bridge.colocate_with(builder, b).expect("colocate b");
    let err = bridge.finish(builder).expect_err("_class is not a string list");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn shape_refinement() {
    let (bridge, graph) = setup();
    let p = placeholder(&bridge, graph, "p", &[-1, 4]);

    bridge.set_shape(graph, p, 0, &[3, 4], 2).expect("compatible");
    assert_eq!(bridge.shape(graph, p, 0).expect("shape"), Some(vec![3, 4]));

    bridge.set_shape(graph, p, 0, &[-1, 4], 2).expect("less specific");
    assert_eq!(bridge.shape(graph, p, 0).expect("shape"), Some(vec![3, 4]));

    let err = bridge
        .set_shape(graph, p, 0, &[3, 5], 2)
        .expect_err("conflicting refinement");
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);

    let err = bridge
        .set_shape(graph, p, 0, &[3], 2)
        .expect_err("rank mismatch");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    bridge.set_shape(graph, p, 0, &[], -1).expect("no knowledge");
    assert_eq!(bridge.shape(graph, p, 0).expect("shape"), Some(vec![3, 4]));

    let err = bridge
        .set_shape(graph, p, 0, &[3, 4, 1], 3)
        .expect_err("rank contradiction");
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
}

#[test]
fn unknown_rank_shape_reads_as_none() {
    let (bridge, graph) = setup();
    let builder = bridge.allocate(graph, "Placeholder", "p").expect("allocate").raw();
    bridge.set_attr_type(builder, "dtype", FLOAT).expect("dtype");
    let p = bridge.finish(builder).expect("finish").raw();

    assert_eq!(bridge.shape(graph, p, 0).expect("shape"), None);
    assert_eq!(bridge.get_attr_shape(p, "shape").expect("default"), None);
}

#[test]
fn catalog_decodes() {
    let (bridge, _) = setup();
    let bytes = bridge.all_ops().expect("catalog");
    let list = OpList::decode(bytes.as_slice()).expect("decode");
    let names: Vec<_> = list.op.iter().map(|op| op.name.as_str()).collect();
    for expected in ["Add", "AddN", "Const", "NoOp", "Placeholder"] {
        assert!(names.contains(&expected), "{expected} missing");
    }
    let add = list.op.iter().find(|op| op.name == "Add").expect("Add");
    assert_eq!(add.input_arg.len(), 2);
    assert_eq!(add.input_arg[0].type_attr, "T");
}

#[test]
fn empty_builder_finishes_only_when_nothing_is_needed() {
    let (bridge, graph) = setup();
    let builder = bridge.allocate(graph, "NoOp", "n").expect("allocate").raw();
    bridge.finish(builder).expect("NoOp needs nothing");

    let builder = bridge.allocate(graph, "Add", "add").expect("allocate").raw();
    let err = bridge.finish(builder).expect_err("Add needs inputs");
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);

    let builder = bridge.allocate(graph, "Placeholder", "p").expect("allocate").raw();
    let err = bridge.finish(builder).expect_err("Placeholder needs dtype");
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
}

#[test]
fn builder_is_consumed_by_finish() {
    let (bridge, graph) = setup();
    let x = placeholder(&bridge, graph, "x", &[]);

    let builder = bridge.allocate(graph, "NoOp", "n").expect("allocate").raw();
    bridge.finish(builder).expect("finish");
    for err in [
        bridge.add_control_input(builder, x).expect_err("control"),
        bridge.set_device(builder, "/cpu:0").expect_err("device"),
        bridge.set_attr_int(builder, "k", 1).expect_err("attr"),
        bridge.set_attr_type(builder, "T", 0).expect_err("bad type code"),
        bridge.set_attr_type_list(builder, "Ts", &[0]).expect_err("bad type list"),
        bridge.set_attr_shape(builder, "s", &[1], 3).expect_err("bad rank"),
        bridge
            .set_attr_shape_list(builder, "s", &[], &[1])
            .expect_err("mismatched shape list"),
        bridge.finish(builder).map(|_| ()).expect_err("finish"),
    ] {
        assert_eq!(err.kind(), ErrorKind::InvalidHandle);
    }

    let builder = bridge.allocate(graph, "Add", "bad").expect("allocate").raw();
    bridge.finish(builder).expect_err("missing inputs");
    let err = bridge.add_input(builder, x, 0).expect_err("consumed on failure");
    assert_eq!(err.kind(), ErrorKind::InvalidHandle);
    assert_eq!(bridge.backend().num_ops(graph_handle(graph)).expect("count"), 2);
}

#[test]
fn inputs_keep_call_order_and_control_inputs_dedupe() {
    let (bridge, graph) = setup();
    let x = placeholder(&bridge, graph, "x", &[2]);
    let y = placeholder(&bridge, graph, "y", &[2]);

    let builder = bridge.allocate(graph, "Sub", "sub").expect("allocate").raw();
    bridge.add_input(builder, y, 0).expect("y first");
    bridge.add_input(builder, x, 0).expect("x second");
    bridge.add_control_input(builder, x).expect("control x");
    bridge.add_control_input(builder, y).expect("control y");
    bridge.add_control_input(builder, x).expect("control x again");
    let sub = bridge.finish(builder).expect("finish").raw();

    assert_eq!(bridge.input(sub, 0).expect("0"), output(y, 0));
    assert_eq!(bridge.input(sub, 1).expect("1"), output(x, 0));
    assert_eq!(bridge.num_control_inputs(sub).expect("count"), 2);
    assert_eq!(
        bridge.control_inputs(sub).expect("controls"),
        vec![OpHandle::from_raw(x), OpHandle::from_raw(y)]
    );
    assert_eq!(
        bridge.control_outputs(x).expect("control outputs"),
        vec![OpHandle::from_raw(sub)]
    );
    assert_eq!(bridge.num_control_outputs(y).expect("count"), 1);
}

#[test]
fn edge_invariants_hold_across_graph() {
    let (bridge, graph) = setup();
    let x = placeholder(&bridge, graph, "x", &[2]);
    let y = placeholder(&bridge, graph, "y", &[2]);
    let add = binary(&bridge, graph, "Add", "add", x, y);
    let mul = binary(&bridge, graph, "Mul", "mul", add, x);
    let builder = bridge.allocate(graph, "AddN", "sum").expect("allocate").raw();
    bridge
        .add_input_list(builder, &[add, mul, x], &[0, 0, 0])
        .expect("list");
    let sum = bridge.finish(builder).expect("finish").raw();

    for op in [x, y, add, mul, sum] {
        for slot in 0..bridge.num_inputs(op).expect("inputs") {
            let producer = bridge.input(op, slot).expect("input");
            let producer_outputs = bridge.num_outputs(producer.op.raw()).expect("outputs");
            assert!(producer.index >= 0 && producer.index < producer_outputs);
            assert_eq!(
                bridge.input_data_type(graph, op, slot).expect("input type"),
                bridge
                    .output_data_type(graph, producer.op.raw(), producer.index)
                    .expect("output type")
            );
        }
        for index in 0..bridge.num_outputs(op).expect("outputs") {
            let consumers = bridge.consumers(op, index).expect("consumers");
            assert_eq!(
                bridge.num_consumers(op, index).expect("count") as usize,
                consumers.len()
            );
            for consumer in consumers {
                let list = bridge
                    .input_list(consumer.op.raw(), consumer.index)
                    .expect("input list");
                assert!(list.contains(&output(op, index)));
            }
        }
    }
    assert_eq!(bridge.num_consumers(x, 0).expect("x consumers"), 3);
}

#[test]
fn attribute_round_trips() {
    let (bridge, graph) = setup();
    let builder = bridge.allocate(graph, "VariableV2", "v").expect("allocate").raw();
    bridge.set_attr_type(builder, "dtype", INT32).expect("dtype");
    bridge.set_attr_shape(builder, "shape", &[2, -1], 2).expect("shape");
    bridge.set_attr_string(builder, "container", b"box").expect("container");
    bridge
        .set_attr_string_list(builder, "_class", vec![b"loc:@v".to_vec()])
        .expect("class");
    let v = bridge.finish(builder).expect("finish").raw();

    assert_eq!(bridge.get_attr_type(v, "dtype").expect("dtype"), INT32);
    assert_eq!(bridge.get_attr_shape(v, "shape").expect("shape"), Some(vec![2, -1]));
    assert_eq!(bridge.get_attr_string(v, "container").expect("container"), b"box");
    assert_eq!(bridge.get_attr_string(v, "shared_name").expect("default"), b"");
    assert_eq!(
        bridge.get_attr_string_list(v, "_class").expect("class"),
        vec![b"loc:@v".to_vec()]
    );
    assert_eq!(bridge.shape(graph, v, 0).expect("shape"), Some(vec![2, -1]));
}

#[test]
fn attribute_read_errors() {
    let (bridge, graph) = setup();
    let p = placeholder(&bridge, graph, "p", &[1]);

    let err = bridge.get_attr_string(p, "missing").expect_err("absent");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = bridge.get_attr_string(p, "dtype").expect_err("wrong kind");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = bridge.get_attr_shape(p, "dtype").expect_err("wrong kind");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn scalar_and_unknown_rank_attr_shapes_differ() {
    let (bridge, graph) = setup();
    let scalar = placeholder(&bridge, graph, "scalar", &[]);
    assert_eq!(bridge.get_attr_shape(scalar, "shape").expect("scalar"), Some(vec![]));

    let builder = bridge.allocate(graph, "Placeholder", "unknown").expect("allocate").raw();
    bridge.set_attr_type(builder, "dtype", FLOAT).expect("dtype");
    bridge.set_attr_shape(builder, "shape", &[], -1).expect("unknown rank");
    let unknown = bridge.finish(builder).expect("finish").raw();
    assert_eq!(bridge.get_attr_shape(unknown, "shape").expect("unknown"), None);
}

#[test]
fn handles_are_checked_by_kind() {
    let (bridge, graph) = setup();
    let p = placeholder(&bridge, graph, "p", &[]);

    for err in [
        bridge.name(0).expect_err("zero"),
        bridge.name(graph).expect_err("graph as op"),
        bridge.name(u64::MAX).expect_err("unknown"),
        bridge.finish(p).map(|_| ()).expect_err("op as builder"),
        bridge.allocate(p, "NoOp", "n").map(|_| ()).expect_err("op as graph"),
    ] {
        assert_eq!(err.kind(), ErrorKind::InvalidHandle);
    }

    let builder = bridge.allocate(graph, "Const", "c").expect("allocate").raw();
    let err = bridge.set_attr_tensor(builder, "value", p).expect_err("op as tensor");
    assert_eq!(err.kind(), ErrorKind::InvalidHandle);
}

#[test]
fn indices_are_range_checked() {
    let (bridge, graph) = setup();
    let p = placeholder(&bridge, graph, "p", &[]);
    let id = {
        let builder = bridge.allocate(graph, "Identity", "id").expect("allocate").raw();
        bridge.add_input(builder, p, 0).expect("input");
        bridge.finish(builder).expect("finish").raw()
    };

    for err in [
        bridge.num_consumers(p, 1).expect_err("consumers"),
        bridge.consumers(p, -1).map(|_| ()).expect_err("consumers list"),
        bridge.input(id, 1).map(|_| ()).expect_err("input"),
        bridge.input_data_type(graph, id, 2).expect_err("input type"),
        bridge.output_data_type(graph, id, 1).expect_err("output type"),
        bridge.shape(graph, id, 5).map(|_| ()).expect_err("shape"),
        bridge.set_shape(graph, id, 1, &[], 0).expect_err("set shape"),
    ] {
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    let builder = bridge.allocate(graph, "Identity", "bad").expect("allocate").raw();
    let err = bridge.add_input(builder, p, 3).expect_err("producer index");
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

#[test]
fn builder_argument_errors() {
    let (bridge, graph) = setup();
    let x = placeholder(&bridge, graph, "x", &[]);

    let err = bridge
        .allocate(graph, "Frobnicate", "f")
        .map(|_| ())
        .expect_err("unknown op type");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let builder = bridge.allocate(graph, "AddN", "sum").expect("allocate").raw();
    let err = bridge
        .add_input_list(builder, &[x, x], &[0])
        .expect_err("length mismatch");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = bridge.set_attr_type(builder, "T", 0).expect_err("invalid dtype");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = bridge
        .set_attr_type_list(builder, "T", &[1, 99])
        .expect_err("invalid dtype in list");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = bridge
        .set_attr_shape(builder, "s", &[1, 2], 3)
        .expect_err("rank mismatch");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = bridge
        .set_attr_shape_list(builder, "s", &[vec![1]], &[1, 2])
        .expect_err("list mismatch");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let other = bridge.new_graph().raw();
    let builder = bridge.allocate(other, "Identity", "id").expect("allocate").raw();
    let err = bridge.add_input(builder, x, 0).expect_err("foreign producer");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = bridge.colocate_with(builder, x).expect_err("foreign colocation");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = bridge.input_data_type(other, x, 0).expect_err("op of another graph");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn finish_validation_errors() {
    let (bridge, graph) = setup();
    let f = placeholder(&bridge, graph, "f", &[2]);
    let i = {
        let builder = bridge.allocate(graph, "Placeholder", "i").expect("allocate").raw();
        bridge.set_attr_type(builder, "dtype", INT32).expect("dtype");
        bridge.finish(builder).expect("finish").raw()
    };

    let rejected_noop = |name: &str, configure: &dyn Fn(u64)| {
        let builder = bridge.allocate(graph, "NoOp", name).expect("allocate").raw();
        configure(builder);
        bridge.finish(builder).map(|_| ()).expect_err(name).kind()
    };
    assert_eq!(rejected_noop("f", &|_| {}), ErrorKind::InvalidArgument);
    assert_eq!(rejected_noop("_bad", &|_| {}), ErrorKind::InvalidArgument);
    assert_eq!(
        rejected_noop("dev", &|b| bridge.set_device(b, "/gpu").expect("set")),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        rejected_noop("undeclared", &|b| bridge.set_attr_int(b, "bogus", 1).expect("set")),
        ErrorKind::InvalidArgument
    );

    let builder = bridge.allocate(graph, "NoOp", "reserved").expect("allocate").raw();
    bridge.set_attr_int(builder, "_hint", 1).expect("set");
    bridge.finish(builder).expect("reserved attrs are not checked");

    let builder = bridge.allocate(graph, "Add", "mixed").expect("allocate").raw();
    bridge.add_input(builder, f, 0).expect("float");
    bridge.add_input(builder, i, 0).expect("int");
    let err = bridge.finish(builder).expect_err("type conflict");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let builder = bridge.allocate(graph, "Identity", "wrong_t").expect("allocate").raw();
    bridge.add_input(builder, f, 0).expect("float");
    bridge.set_attr_type(builder, "T", INT32).expect("T");
    let err = bridge.finish(builder).expect_err("explicit T conflicts");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let builder = bridge.allocate(graph, "Identity", "wrong_kind").expect("allocate").raw();
    bridge.add_input(builder, f, 0).expect("float");
    bridge.set_attr_int(builder, "T", 1).expect("T");
    let err = bridge.finish(builder).expect_err("kind mismatch");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let builder = bridge.allocate(graph, "Identity", "extra").expect("allocate").raw();
    bridge.add_input(builder, f, 0).expect("first");
    bridge.add_input(builder, f, 0).expect("second");
    let err = bridge.finish(builder).expect_err("too many inputs");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let builder = bridge.allocate(graph, "AddN", "single").expect("allocate").raw();
    bridge.add_input(builder, f, 0).expect("single slot");
    let err = bridge.finish(builder).expect_err("list expected");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let builder = bridge.allocate(graph, "AddN", "empty").expect("allocate").raw();
    bridge.add_input_list(builder, &[], &[]).expect("empty list");
    bridge.set_attr_type(builder, "T", FLOAT).expect("T");
    let err = bridge.finish(builder).expect_err("N below minimum");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let builder = bridge.allocate(graph, "LeakyRelu", "relu").expect("allocate").raw();
    bridge.add_input(builder, i, 0).expect("int input");
    let err = bridge.finish(builder).expect_err("int32 not allowed");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let g = placeholder(&bridge, graph, "g", &[3]);
    let builder = bridge.allocate(graph, "Add", "broadcast").expect("allocate").raw();
    bridge.add_input(builder, f, 0).expect("[2]");
    bridge.add_input(builder, g, 0).expect("[3]");
    let err = bridge.finish(builder).expect_err("incompatible broadcast");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    assert_eq!(bridge.backend().num_ops(graph_handle(graph)).expect("count"), 4);
}

#[test]
fn tensor_attr_survives_tensor_deletion() {
    let (bridge, graph) = setup();
    let tensor = bridge.backend().new_tensor(TensorValue::scalar_i32(7));
    let builder = bridge.allocate(graph, "Const", "c").expect("allocate").raw();
    bridge
        .set_attr_tensor(builder, "value", tensor.raw())
        .expect("value");
    bridge.backend().delete_tensor(tensor).expect("delete");
    bridge.set_attr_type(builder, "dtype", INT32).expect("dtype");
    let c = bridge.finish(builder).expect("finish").raw();
    assert_eq!(bridge.output_data_type(graph, c, 0).expect("dtype"), INT32);

    let builder = bridge.allocate(graph, "Const", "gone").expect("allocate").raw();
    let err = bridge
        .set_attr_tensor(builder, "value", tensor.raw())
        .expect_err("deleted tensor");
    assert_eq!(err.kind(), ErrorKind::InvalidHandle);
}

#[test]
fn const_dtype_must_match_tensor() {
    let (bridge, graph) = setup();
    let tensor = bridge.backend().new_tensor(TensorValue::scalar_i32(7)).raw();
    let builder = bridge.allocate(graph, "Const", "c").expect("allocate").raw();
    bridge.set_attr_tensor(builder, "value", tensor).expect("value");
    bridge.set_attr_type(builder, "dtype", FLOAT).expect("dtype");
    let err = bridge.finish(builder).expect_err("dtype mismatch");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn other_ops_resolve_types_and_shapes() {
    let (bridge, graph) = setup();
    let x = placeholder(&bridge, graph, "x", &[1, 3, 1]);

    let builder = bridge.allocate(graph, "Cast", "cast").expect("allocate").raw();
    bridge.add_input(builder, x, 0).expect("x");
    bridge.set_attr_type(builder, "DstT", INT32).expect("DstT");
    let cast = bridge.finish(builder).expect("finish").raw();
    assert_eq!(bridge.output_data_type(graph, cast, 0).expect("dtype"), INT32);
    assert_eq!(bridge.get_attr_type(cast, "SrcT").expect("SrcT"), FLOAT);

    let builder = bridge.allocate(graph, "Squeeze", "squeeze").expect("allocate").raw();
    bridge.add_input(builder, x, 0).expect("x");
    let squeeze = bridge.finish(builder).expect("finish").raw();
    assert_eq!(bridge.shape(graph, squeeze, 0).expect("shape"), Some(vec![3]));

    let builder = bridge.allocate(graph, "Bucketize", "bucket").expect("allocate").raw();
    bridge.add_input(builder, x, 0).expect("x");
    bridge
        .set_attr_float_list(builder, "boundaries", &[0.0, 1.0])
        .expect("boundaries");
    let bucket = bridge.finish(builder).expect("finish").raw();
    assert_eq!(bridge.output_data_type(graph, bucket, 0).expect("dtype"), INT32);
    assert_eq!(bridge.shape(graph, bucket, 0).expect("shape"), Some(vec![1, 3, 1]));

    let cond = {
        let builder = bridge.allocate(graph, "Placeholder", "cond").expect("allocate").raw();
        bridge.set_attr_type(builder, "dtype", DataType::Bool.code()).expect("dtype");
        bridge.finish(builder).expect("finish").raw()
    };
    let builder = bridge.allocate(graph, "Assert", "check").expect("allocate").raw();
    bridge.add_input(builder, cond, 0).expect("condition");
    bridge.add_input_list(builder, &[x, cast], &[0, 0]).expect("data");
    bridge.set_attr_bool_list(builder, "_flags", &[true]).expect("reserved");
    let check = bridge.finish(builder).expect("finish").raw();
    assert_eq!(bridge.num_outputs(check).expect("outputs"), 0);
    assert_eq!(
        bridge.backend_attr(check, "T"),
        AttrValue::TypeList(vec![DataType::Float, DataType::Int32])
    );
}

fn graph_handle(raw: u64) -> tfop_core::GraphHandle {
    tfop_core::GraphHandle::from_raw(raw)
}

impl OpBridge<ReferenceBackend> {
    fn backend_attr(&self, op: u64, name: &str) -> AttrValue {
        use tfop_graph::GraphBackend;

        self.backend()
            .attr_value(OpHandle::from_raw(op), name)
            .expect("attr value")
    }
}
