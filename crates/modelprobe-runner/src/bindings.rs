use modelprobe_core::{RunError, SignatureSpec, Tensor, TensorId};
use tracing::debug;

/// Feed and fetch identifiers for a single run, in call order.
#[derive(Clone, Debug, PartialEq)]
pub struct Bindings {
    pub feeds: Vec<(TensorId, Tensor)>,
    pub fetches: Vec<TensorId>,
}

/// Feed ids for a run: `explicit` when given, else the signature inputs in
/// the order the signature lists them.
pub fn feed_ids(sig: &SignatureSpec, explicit: &[TensorId]) -> Vec<TensorId> {
    if explicit.is_empty() {
        sig.inputs.iter().map(|spec| spec.id.clone()).collect()
    } else {
        explicit.to_vec()
    }
}

/// Pairs planned inputs with feed ids and picks the fetch ids.
///
/// Empty `explicit_feeds`/`fetch_ids` mean "take them from the signature", in the
/// order the signature lists its inputs and outputs. Feeds the signature
/// declares are checked for dtype and shape here so a mismatch is reported
/// without calling into the runtime; undeclared ids pass through as-is.
pub fn bind(
    sig: &SignatureSpec,
    inputs: &[Tensor],
    explicit_feeds: &[TensorId],
    fetch_ids: &[TensorId],
) -> Result<Bindings, RunError> {
    let feed_ids = feed_ids(sig, explicit_feeds);
    if feed_ids.len() != inputs.len() {
        return Err(RunError::FeedCountMismatch {
            expected: feed_ids.len(),
            got: inputs.len(),
        });
    }

    for (id, tensor) in feed_ids.iter().zip(inputs) {
        let Some(spec) = sig.input(id) else {
            debug!(%id, "feed not declared by signature, passing through");
            continue;
        };
        if spec.dtype != tensor.dtype {
            return Err(RunError::DTypeMismatch {
                id: id.clone(),
                expected: spec.dtype,
                actual: tensor.dtype,
            });
        }
        if !spec.accepts_shape(&tensor.shape) {
            return Err(RunError::ShapeMismatch {
                id: id.clone(),
                expected: spec.dims_string(),
                actual: tensor.shape.to_string(),
            });
        }
    }

    let fetches: Vec<TensorId> = if fetch_ids.is_empty() {
        sig.outputs.iter().map(|spec| spec.id.clone()).collect()
    } else {
        fetch_ids.to_vec()
    };
    if fetches.is_empty() {
        return Err(RunError::NoFetches);
    }

    Ok(Bindings {
        feeds: feed_ids.into_iter().zip(inputs.iter().cloned()).collect(),
        fetches,
    })
}
