use modelprobe_core::{Shape, Tensor};

/// One planned input: an `f32` tensor of `shape` with every element `value`.
#[derive(Clone, Debug, PartialEq)]
pub struct InputFill {
    pub shape: Shape,
    pub value: f32,
}

impl InputFill {
    pub fn new(dims: &[usize], value: f32) -> Self {
        Self {
            shape: Shape::from_slice(dims),
            value,
        }
    }
}

/// Synthetic test data for the two-input serving model: `[1,394]` of 1.0
/// and `[1,99]` of 2.0.
pub fn default_plan() -> Vec<InputFill> {
    vec![InputFill::new(&[1, 394], 1.0), InputFill::new(&[1, 99], 2.0)]
}

pub fn build_inputs(plan: &[InputFill]) -> Vec<Tensor> {
    plan.iter()
        .map(|fill| Tensor::filled_f32(fill.shape.clone(), fill.value))
        .collect()
}
