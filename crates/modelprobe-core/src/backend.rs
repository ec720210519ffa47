use crate::{LoadError, ModelArtifact, ModelSpec, RunError, Tensor, TensorId};

pub trait Backend {
    type Model: BackendModel;

    fn name(&self) -> &'static str;
    fn load(&self, artifact: &ModelArtifact) -> Result<Self::Model, LoadError>;
}

pub trait BackendModel {
    /// Signatures declared by the package, captured at load time.
    fn spec(&self) -> &ModelSpec;

    /// One synchronous computation. Outputs come back in `fetches` order.
    fn run(
        &mut self,
        feeds: Vec<(TensorId, Tensor)>,
        fetches: &[TensorId],
    ) -> Result<Vec<Tensor>, RunError>;
}
