use anyhow::{Context, Result};
use bytes::Bytes;
use modelprobe_core::{DType, Shape, Tensor};

#[test]
fn filled_f32_sets_every_element() -> Result<()> {
    let t = Tensor::filled_f32(Shape::from_slice(&[1, 394]), 1.0);
    assert_eq!(t.dtype, DType::F32);
    assert_eq!(t.byte_len(), 394 * 4);
    assert!(t.is_consistent());

    let values = t.to_f32_vec().context("expected f32 tensor")?;
    assert_eq!(values.len(), 394);
    assert!(values.iter().all(|v| *v == 1.0));
    Ok(())
}

#[test]
fn scalar_shape_has_one_element() {
    let shape = Shape::from_slice(&[]);
    assert_eq!(shape.rank(), 0);
    assert_eq!(shape.numel(), 1);
    assert_eq!(Shape::from_slice(&[4, 0]).numel(), 0);
}

#[test]
fn debug_form_truncates_after_three_values() {
    let t = Tensor::from_f32(Shape::from_slice(&[1, 4]), &[0.5, 1.0, 2.0, 3.0]);
    assert_eq!(
        t.to_string(),
        "Tensor<type: float shape: [1,4] values: 0.5 1 2...>"
    );

    let short = Tensor::from_f32(Shape::from_slice(&[2]), &[7.0, 8.0]);
    assert_eq!(short.to_string(), "Tensor<type: float shape: [2] values: 7 8>");
}

#[test]
fn debug_form_reports_inconsistent_buffers() {
    let t = Tensor::from_cpu_bytes(
        DType::I64,
        Shape::from_slice(&[2]),
        Bytes::from_static(&[1, 2, 3]),
    );
    assert!(!t.is_consistent());
    assert_eq!(
        t.to_string(),
        "Tensor<type: int64 shape: [2] values: <3 bytes>>"
    );
    assert_eq!(t.to_f32_vec(), None);
}
