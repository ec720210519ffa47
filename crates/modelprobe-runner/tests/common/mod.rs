#![allow(dead_code)]

use modelprobe_core::{
    Backend, BackendModel, DType, IOName, LoadError, ModelArtifact, ModelSpec, RunError, Shape,
    SignatureSpec, Tensor, TensorId, TensorSpec,
};

pub fn spec(name: &str, id: &str, dims: &[Option<usize>]) -> TensorSpec {
    TensorSpec {
        name: IOName(name.to_string()),
        id: id.parse().unwrap(),
        dtype: DType::F32,
        rank: Some(dims.len()),
        dims: dims.to_vec(),
    }
}

/// The two-input, two-output serving signature of the reference model.
pub fn serving_signature() -> SignatureSpec {
    SignatureSpec {
        name: "serving_default".to_string(),
        method_name: "tensorflow/serving/predict".to_string(),
        inputs: vec![
            spec("args_0", "serving_default_args_0:0", &[None, Some(394)]),
            spec("args_0_1", "serving_default_args_0_1:0", &[None, Some(99)]),
        ],
        outputs: vec![
            spec("output_0", "StatefulPartitionedCall:0", &[None, Some(1)]),
            spec("output_1", "StatefulPartitionedCall:1", &[None, Some(2)]),
        ],
    }
}

/// In-process model: output 0 is the sum of all inputs, output 1 the
/// per-input means.
pub struct FakeModel {
    pub spec: ModelSpec,
    pub runs: usize,
}

impl FakeModel {
    pub fn new(signatures: Vec<SignatureSpec>) -> Self {
        Self {
            spec: ModelSpec { signatures },
            runs: 0,
        }
    }

    fn known(&self, id: &TensorId) -> bool {
        self.spec.signatures.iter().any(|sig| sig.find(id).is_some())
    }
}

impl BackendModel for FakeModel {
    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    fn run(
        &mut self,
        feeds: Vec<(TensorId, Tensor)>,
        fetches: &[TensorId],
    ) -> Result<Vec<Tensor>, RunError> {
        self.runs += 1;
        for id in feeds.iter().map(|(id, _)| id).chain(fetches) {
            if !self.known(id) {
                return Err(RunError::UnknownTensor(id.clone()));
            }
        }

        let values: Vec<Vec<f32>> = feeds
            .iter()
            .map(|(id, t)| {
                t.to_f32_vec().ok_or_else(|| RunError::UnsupportedDType {
                    id: id.clone(),
                    reason: "fake model takes f32 only".to_string(),
                })
            })
            .collect::<Result<_, _>>()?;
        let total: f32 = values.iter().flatten().sum();
        let means: Vec<f32> = values
            .iter()
            .map(|v| v.iter().sum::<f32>() / v.len() as f32)
            .collect();

        Ok(fetches
            .iter()
            .map(|id| match id.index {
                0 => Tensor::from_f32(Shape::from_slice(&[1, 1]), &[total]),
                _ => Tensor::from_f32(Shape::from_slice(&[1, means.len()]), &means),
            })
            .collect())
    }
}

pub struct FakeBackend {
    pub signatures: Vec<SignatureSpec>,
}

impl FakeBackend {
    pub fn serving() -> Self {
        Self {
            signatures: vec![serving_signature()],
        }
    }
}

impl Backend for FakeBackend {
    type Model = FakeModel;

    fn name(&self) -> &'static str {
        "fake"
    }

    fn load(&self, artifact: &ModelArtifact) -> Result<Self::Model, LoadError> {
        if !artifact.export_dir.is_dir() {
            return Err(LoadError::NotFound(artifact.export_dir.clone()));
        }
        Ok(FakeModel::new(self.signatures.clone()))
    }
}
