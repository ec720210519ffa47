use std::io::{self, Write};

use modelprobe_core::{
    Backend, BackendModel, LoadError, ModelArtifact, RunError, SignatureNotFoundError, Tensor,
    TensorId, DEFAULT_SIGNATURE,
};
use tracing::{debug, info, warn};

use crate::{bind, build_inputs, default_plan, feed_ids, InputFill, Reporter};

#[derive(Clone, Debug, PartialEq)]
pub struct RunnerOptions {
    pub signature: String,
    pub plan: Vec<InputFill>,
    /// Explicit feed ids; empty means derive them from the signature.
    pub feeds: Vec<TensorId>,
    /// Explicit fetch ids; empty means derive them from the signature.
    pub fetches: Vec<TensorId>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            signature: DEFAULT_SIGNATURE.to_string(),
            plan: default_plan(),
            feeds: Vec::new(),
            fetches: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Signature(#[from] SignatureNotFoundError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result of a pass that reached the report stage.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Passed {
        inputs: Vec<Tensor>,
        outputs: Vec<(TensorId, Tensor)>,
    },
    RunFailed {
        inputs: Vec<Tensor>,
        error: RunError,
    },
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }
}

/// Load -> introspect -> build inputs -> bind -> run -> report, once.
pub struct Runner<B: Backend> {
    backend: B,
    options: RunnerOptions,
}

impl<B: Backend> Runner<B> {
    pub fn new(backend: B, options: RunnerOptions) -> Self {
        Self { backend, options }
    }

    /// Loads the package and probes it. A load failure stops the pass before
    /// anything is run; the model is dropped when this returns.
    pub fn execute<O: Write, E: Write>(
        &self,
        artifact: &ModelArtifact,
        reporter: &mut Reporter<O, E>,
    ) -> Result<Outcome, PipelineError> {
        info!(backend = self.backend.name(), "loading model package");
        let mut model = match self.backend.load(artifact) {
            Ok(model) => model,
            Err(err) => {
                warn!(error = %err, "load failed");
                reporter.failed(&err)?;
                return Err(err.into());
            }
        };
        self.probe(&mut model, reporter)
    }

    /// Introspects and runs an already loaded model.
    pub fn probe<O: Write, E: Write>(
        &self,
        model: &mut B::Model,
        reporter: &mut Reporter<O, E>,
    ) -> Result<Outcome, PipelineError> {
        let sig = match model.spec().signature(&self.options.signature) {
            Ok(sig) => sig.clone(),
            Err(err) => {
                warn!(error = %err, "signature lookup failed");
                reporter.failed(&err)?;
                return Err(err.into());
            }
        };
        reporter.signatures(model.spec(), &sig)?;

        let inputs = build_inputs(&self.options.plan);
        let ids = feed_ids(&sig, &self.options.feeds);
        let result = bind(&sig, &inputs, &self.options.feeds, &self.options.fetches)
            .and_then(|bindings| {
                debug!(
                    feeds = bindings.feeds.len(),
                    fetches = bindings.fetches.len(),
                    "running inference"
                );
                let outputs = model.run(bindings.feeds, &bindings.fetches)?;
                Ok(bindings.fetches.into_iter().zip(outputs).collect::<Vec<_>>())
            });

        let outcome = match result {
            Ok(outputs) => {
                info!(outputs = outputs.len(), "inference passed");
                reporter.passed()?;
                reporter.inputs(&ids, &inputs)?;
                reporter.outputs(&outputs)?;
                Outcome::Passed { inputs, outputs }
            }
            Err(err) => {
                warn!(error = %err, "inference failed");
                reporter.failed(&err)?;
                reporter.inputs(&ids, &inputs)?;
                Outcome::RunFailed { inputs, error: err }
            }
        };
        reporter.flush()?;
        Ok(outcome)
    }
}
