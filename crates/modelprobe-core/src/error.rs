use std::path::PathBuf;

use crate::{DType, TensorId};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model package not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("no tags given for model package at {}", .0.display())]
    NoTags(PathBuf),

    #[error("failed to load model package from {}: {message}", .path.display())]
    Runtime { path: PathBuf, message: String },

    #[error("signature `{signature}` entry `{entry}` is not supported: {reason}")]
    UnsupportedSignature {
        signature: String,
        entry: String,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("signature `{name}` not found (available: {})", .available.join(", "))]
pub struct SignatureNotFoundError {
    pub name: String,
    pub available: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RunError {
    #[error("expected {expected} input tensors, got {got}")]
    FeedCountMismatch { expected: usize, got: usize },

    #[error("no output tensors requested")]
    NoFetches,

    #[error("input {id} expects {expected}, got {actual}")]
    DTypeMismatch {
        id: TensorId,
        expected: DType,
        actual: DType,
    },

    #[error("input {id} expects shape {expected}, got {actual}")]
    ShapeMismatch {
        id: TensorId,
        expected: String,
        actual: String,
    },

    #[error("tensor {0} does not exist in the graph")]
    UnknownTensor(TensorId),

    #[error("unsupported element type for {id}: {reason}")]
    UnsupportedDType { id: TensorId, reason: String },

    #[error("malformed tensor {id}: {reason}")]
    Malformed { id: TensorId, reason: String },

    #[error("inference failed: {0}")]
    Runtime(String),
}
