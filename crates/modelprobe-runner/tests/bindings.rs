mod common;

use common::{serving_signature, spec};
use modelprobe_core::{DType, RunError, Shape, Tensor, TensorId};
use modelprobe_runner::{bind, build_inputs, default_plan};

#[test]
fn default_plan_builds_the_reference_inputs() {
    let inputs = build_inputs(&default_plan());
    assert_eq!(inputs.len(), 2);

    let first = inputs[0].to_f32_vec().unwrap();
    assert_eq!(inputs[0].shape, Shape::from_slice(&[1, 394]));
    assert_eq!(first.len(), 394);
    assert!(first.iter().all(|v| *v == 1.0));

    let second = inputs[1].to_f32_vec().unwrap();
    assert_eq!(inputs[1].shape, Shape::from_slice(&[1, 99]));
    assert_eq!(second.len(), 99);
    assert!(second.iter().all(|v| *v == 2.0));
}

#[test]
fn feeds_follow_signature_order() {
    let sig = serving_signature();
    let inputs = build_inputs(&default_plan());
    let bindings = bind(&sig, &inputs, &[], &[]).unwrap();

    let feed_ids: Vec<String> = bindings.feeds.iter().map(|(id, _)| id.to_string()).collect();
    assert_eq!(
        feed_ids,
        ["serving_default_args_0:0", "serving_default_args_0_1:0"]
    );
    assert_eq!(bindings.feeds[1].1, inputs[1]);
    assert_eq!(
        bindings.fetches,
        vec![
            TensorId::new("StatefulPartitionedCall", 0),
            TensorId::new("StatefulPartitionedCall", 1),
        ]
    );
}

#[test]
fn input_count_must_match_feeds() {
    let sig = serving_signature();
    let inputs = build_inputs(&default_plan()[..1]);
    assert_eq!(
        bind(&sig, &inputs, &[], &[]),
        Err(RunError::FeedCountMismatch {
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn declared_dtype_is_enforced() {
    let mut sig = serving_signature();
    sig.inputs[1].dtype = DType::I64;
    let inputs = build_inputs(&default_plan());
    assert_eq!(
        bind(&sig, &inputs, &[], &[]),
        Err(RunError::DTypeMismatch {
            id: TensorId::new("serving_default_args_0_1", 0),
            expected: DType::I64,
            actual: DType::F32,
        })
    );
}

#[test]
fn signature_without_outputs_has_nothing_to_fetch() {
    let mut sig = serving_signature();
    sig.outputs.clear();
    let inputs = build_inputs(&default_plan());
    assert_eq!(bind(&sig, &inputs, &[], &[]), Err(RunError::NoFetches));
}

#[test]
fn undeclared_feeds_pass_through_unchecked() {
    let mut sig = serving_signature();
    sig.inputs = vec![spec("x", "x:0", &[Some(5)])];
    let inputs = vec![Tensor::filled_f32(Shape::from_slice(&[2, 2]), 0.0)];
    let feeds = vec![TensorId::new("other", 0)];

    let bindings = bind(&sig, &inputs, &feeds, &[]).unwrap();
    assert_eq!(bindings.feeds[0].0, feeds[0]);
}
