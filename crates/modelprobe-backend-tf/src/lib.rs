use std::collections::HashMap;

use bytes::Bytes;
use modelprobe_core::{
    Backend, BackendModel, DType, IOName, LoadError, ModelArtifact, ModelSpec, RunError, Shape,
    SignatureSpec, Tensor, TensorId, TensorSpec,
};
use tensorflow::{
    DataType, FetchToken, Graph, MetaGraphDef, Operation, SavedModelBundle, SessionOptions,
    SessionRunArgs, TensorInfo, TensorType,
};
use tracing::{debug, info};

pub struct TfBackend {
    options: SessionOptions,
}

impl TfBackend {
    pub fn new() -> Self {
        Self {
            options: SessionOptions::new(),
        }
    }
}

impl Default for TfBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded SavedModel. The graph and session live as long as this value.
pub struct TfModel {
    spec: ModelSpec,
    graph: Graph,
    bundle: SavedModelBundle,
}

impl Backend for TfBackend {
    type Model = TfModel;

    fn name(&self) -> &'static str {
        "tensorflow"
    }

    fn load(&self, artifact: &ModelArtifact) -> Result<Self::Model, LoadError> {
        let path = &artifact.export_dir;
        if !path.is_dir() {
            return Err(LoadError::NotFound(path.clone()));
        }
        if artifact.tags.is_empty() {
            return Err(LoadError::NoTags(path.clone()));
        }

        info!(path = %path.display(), tags = ?artifact.tags, "loading saved model");
        let mut graph = Graph::new();
        let bundle = SavedModelBundle::load(&self.options, &artifact.tags, &mut graph, path)
            .map_err(|status| LoadError::Runtime {
                path: path.clone(),
                message: status.to_string(),
            })?;

        let spec = build_model_spec(bundle.meta_graph_def())?;
        debug!(signatures = spec.signatures.len(), "saved model loaded");

        Ok(TfModel {
            spec,
            graph,
            bundle,
        })
    }
}

impl BackendModel for TfModel {
    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    fn run(
        &mut self,
        feeds: Vec<(TensorId, Tensor)>,
        fetches: &[TensorId],
    ) -> Result<Vec<Tensor>, RunError> {
        let mut fed = Vec::with_capacity(feeds.len());
        for (id, tensor) in feeds {
            let op = self.operation(&id)?;
            let value = FeedValue::from_tensor(&id, &tensor)?;
            fed.push((op, id.index, value));
        }

        let mut requested = Vec::with_capacity(fetches.len());
        for id in fetches {
            let op = self.operation(id)?;
            requested.push((id, op, self.declared_dtype(id)));
        }

        let mut args = SessionRunArgs::new();
        for (op, index, value) in &fed {
            value.add_to(&mut args, op, *index);
        }
        let tokens: Vec<(&TensorId, FetchToken, DType)> = requested
            .iter()
            .map(|(id, op, dtype)| (*id, args.request_fetch(op, id.index), *dtype))
            .collect();

        debug!(feeds = fed.len(), fetches = tokens.len(), "running session");
        self.bundle
            .session
            .run(&mut args)
            .map_err(|status| RunError::Runtime(status.to_string()))?;

        tokens
            .into_iter()
            .map(|(id, token, dtype)| fetch_tensor(&mut args, id, token, dtype))
            .collect()
    }
}

impl TfModel {
    fn operation(&self, id: &TensorId) -> Result<Operation, RunError> {
        self.graph
            .operation_by_name_required(&id.op)
            .map_err(|_| RunError::UnknownTensor(id.clone()))
    }

    /// Element type a signature declares for `id`; ids outside every
    /// signature are fetched as `f32`.
    fn declared_dtype(&self, id: &TensorId) -> DType {
        self.spec
            .signatures
            .iter()
            .find_map(|sig| sig.find(id))
            .map_or(DType::F32, |spec| spec.dtype)
    }
}

fn build_model_spec(meta: &MetaGraphDef) -> Result<ModelSpec, LoadError> {
    let mut signatures = meta
        .signatures()
        .iter()
        .map(|(name, def)| {
            Ok(SignatureSpec {
                name: name.clone(),
                method_name: def.method_name().to_string(),
                inputs: tensor_specs(name, def.inputs())?,
                outputs: tensor_specs(name, def.outputs())?,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;
    signatures.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ModelSpec { signatures })
}

/// Signature maps are unordered; entries are sorted by logical name.
fn tensor_specs(
    signature: &str,
    entries: &HashMap<String, TensorInfo>,
) -> Result<Vec<TensorSpec>, LoadError> {
    let mut specs = entries
        .iter()
        .map(|(name, info)| tensor_spec_from_info(signature, name, info))
        .collect::<Result<Vec<_>, _>>()?;
    specs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(specs)
}

fn tensor_spec_from_info(
    signature: &str,
    name: &str,
    info: &TensorInfo,
) -> Result<TensorSpec, LoadError> {
    let dtype = tf_dtype_to_dtype(info.dtype()).ok_or_else(|| LoadError::UnsupportedSignature {
        signature: signature.to_string(),
        entry: name.to_string(),
        reason: format!("element type {}", info.dtype()),
    })?;

    let shape = info.shape();
    let rank = shape.dims();
    let dims = (0..rank.unwrap_or(0))
        .map(|i| shape[i].and_then(|d| usize::try_from(d).ok()))
        .collect();

    let tensor_name = info.name();
    Ok(TensorSpec {
        name: IOName(name.to_string()),
        id: TensorId::new(tensor_name.name.clone(), tensor_name.index),
        dtype,
        rank,
        dims,
    })
}

fn tf_dtype_to_dtype(ty: DataType) -> Option<DType> {
    match ty {
        DataType::Float => Some(DType::F32),
        DataType::Double => Some(DType::F64),
        DataType::Int32 => Some(DType::I32),
        DataType::Int64 => Some(DType::I64),
        DataType::UInt8 => Some(DType::U8),
        _ => None,
    }
}

/// Element types that can cross between `Bytes` storage and TensorFlow.
trait Element: TensorType + Copy {
    const DTYPE: DType;
    fn from_le(b: &[u8]) -> Self;
    fn extend_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn from_le(b: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(b);
                <$ty>::from_le_bytes(raw)
            }

            fn extend_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }
        }
    };
}

impl_element!(f32, DType::F32);
impl_element!(f64, DType::F64);
impl_element!(i32, DType::I32);
impl_element!(i64, DType::I64);
impl_element!(u8, DType::U8);

enum FeedValue {
    F32(tensorflow::Tensor<f32>),
    F64(tensorflow::Tensor<f64>),
    I32(tensorflow::Tensor<i32>),
    I64(tensorflow::Tensor<i64>),
    U8(tensorflow::Tensor<u8>),
}

impl FeedValue {
    fn from_tensor(id: &TensorId, tensor: &Tensor) -> Result<Self, RunError> {
        if !tensor.is_consistent() {
            return Err(RunError::Malformed {
                id: id.clone(),
                reason: format!(
                    "{} bytes for {} {} elements",
                    tensor.byte_len(),
                    tensor.numel(),
                    tensor.dtype
                ),
            });
        }
        Ok(match tensor.dtype {
            DType::F32 => FeedValue::F32(to_tf_tensor(id, tensor)?),
            DType::F64 => FeedValue::F64(to_tf_tensor(id, tensor)?),
            DType::I32 => FeedValue::I32(to_tf_tensor(id, tensor)?),
            DType::I64 => FeedValue::I64(to_tf_tensor(id, tensor)?),
            DType::U8 => FeedValue::U8(to_tf_tensor(id, tensor)?),
        })
    }

    fn add_to<'l>(&'l self, args: &mut SessionRunArgs<'l>, op: &Operation, index: i32) {
        match self {
            FeedValue::F32(t) => args.add_feed(op, index, t),
            FeedValue::F64(t) => args.add_feed(op, index, t),
            FeedValue::I32(t) => args.add_feed(op, index, t),
            FeedValue::I64(t) => args.add_feed(op, index, t),
            FeedValue::U8(t) => args.add_feed(op, index, t),
        }
    }
}

fn to_tf_tensor<T: Element>(
    id: &TensorId,
    tensor: &Tensor,
) -> Result<tensorflow::Tensor<T>, RunError> {
    let dims: Vec<u64> = tensor.shape.dims().iter().map(|d| *d as u64).collect();
    let values: Vec<T> = tensor
        .data
        .chunks_exact(T::DTYPE.byte_size())
        .map(T::from_le)
        .collect();
    tensorflow::Tensor::new(&dims)
        .with_values(&values)
        .map_err(|status| RunError::Malformed {
            id: id.clone(),
            reason: status.to_string(),
        })
}

fn from_tf_tensor<T: Element>(tensor: &tensorflow::Tensor<T>) -> Tensor {
    let dims: Vec<usize> = tensor.dims().iter().map(|d| *d as usize).collect();
    let mut buf = Vec::with_capacity(tensor.len() * T::DTYPE.byte_size());
    for &v in tensor.iter() {
        v.extend_le(&mut buf);
    }
    Tensor::from_cpu_bytes(T::DTYPE, Shape::from_slice(&dims), Bytes::from(buf))
}

fn fetch_tensor(
    args: &mut SessionRunArgs<'_>,
    id: &TensorId,
    token: FetchToken,
    dtype: DType,
) -> Result<Tensor, RunError> {
    fn fetch<T: Element>(
        args: &mut SessionRunArgs<'_>,
        id: &TensorId,
        token: FetchToken,
    ) -> Result<Tensor, RunError> {
        args.fetch::<T>(token)
            .map(|t| from_tf_tensor(&t))
            .map_err(|status| RunError::UnsupportedDType {
                id: id.clone(),
                reason: status.to_string(),
            })
    }

    match dtype {
        DType::F32 => fetch::<f32>(args, id, token),
        DType::F64 => fetch::<f64>(args, id, token),
        DType::I32 => fetch::<i32>(args, id, token),
        DType::I64 => fetch::<i64>(args, id, token),
        DType::U8 => fetch::<u8>(args, id, token),
    }
}
