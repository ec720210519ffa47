use std::fmt;
use std::str::FromStr;

use crate::{DType, Shape, SignatureNotFoundError};

/// Signature selected when none is named explicitly.
pub const DEFAULT_SIGNATURE: &str = "serving_default";

/// Tag of the serving variant of a model package.
pub const SERVE_TAG: &str = "serve";

/// Logical input/output name as declared by a signature, e.g. `args_0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IOName(pub String);

impl fmt::Display for IOName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Internal graph tensor identifier, `op_name:index`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorId {
    pub op: String,
    pub index: i32,
}

impl TensorId {
    pub fn new(op: impl Into<String>, index: i32) -> Self {
        Self {
            op: op.into(),
            index,
        }
    }
}

impl fmt::Display for TensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.op, self.index)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid tensor identifier `{0}` (expected `name` or `name:index`)")]
pub struct ParseTensorIdError(pub String);

impl FromStr for TensorId {
    type Err = ParseTensorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTensorIdError(s.to_string());
        let (op, index) = match s.rsplit_once(':') {
            Some((op, idx)) => (op, idx.parse::<i32>().map_err(|_| invalid())?),
            None => (s, 0),
        };
        if op.is_empty() || index < 0 {
            return Err(invalid());
        }
        Ok(Self::new(op, index))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TensorSpec {
    pub name: IOName,
    pub id: TensorId,
    pub dtype: DType,
    /// `None` when the rank itself is unknown.
    pub rank: Option<usize>,
    pub dims: Vec<Option<usize>>, // None = dynamic
}

impl TensorSpec {
    /// Whether a concrete shape can be fed where this spec is declared.
    pub fn accepts_shape(&self, shape: &Shape) -> bool {
        match self.rank {
            None => true,
            Some(rank) if rank != shape.rank() => false,
            Some(_) => self
                .dims
                .iter()
                .zip(shape.dims())
                .all(|(want, got)| want.map_or(true, |w| w == *got)),
        }
    }

    /// Declared shape with `-1` for dynamic dims, e.g. `[-1,394]`.
    pub fn dims_string(&self) -> String {
        if self.rank.is_none() {
            return "<unknown rank>".to_string();
        }
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|d| d.map_or_else(|| "-1".to_string(), |d| d.to_string()))
            .collect();
        format!("[{}]", dims.join(","))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignatureSpec {
    pub name: String,
    pub method_name: String,
    pub inputs: Vec<TensorSpec>,
    pub outputs: Vec<TensorSpec>,
}

impl SignatureSpec {
    pub fn input(&self, id: &TensorId) -> Option<&TensorSpec> {
        self.inputs.iter().find(|spec| &spec.id == id)
    }

    /// Finds a declared input or output by its internal identifier.
    pub fn find(&self, id: &TensorId) -> Option<&TensorSpec> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .find(|spec| &spec.id == id)
    }
}

/// Everything a loaded package declares about itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelSpec {
    pub signatures: Vec<SignatureSpec>,
}

impl ModelSpec {
    pub fn signature_names(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(|s| s.name.as_str())
    }

    pub fn signature(&self, name: &str) -> Result<&SignatureSpec, SignatureNotFoundError> {
        self.signatures
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SignatureNotFoundError {
                name: name.to_string(),
                available: self.signature_names().map(str::to_string).collect(),
            })
    }
}
