use std::fmt;

use bytes::Bytes;
use smallvec::SmallVec;

/// Number of leading values shown by the tensor debug form.
const SUMMARY_VALUES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DType {
    F32,
    F64,
    I32,
    I64,
    U8,
}

impl DType {
    pub fn byte_size(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
            DType::I32 => 4,
            DType::I64 => 8,
            DType::U8 => 1,
        }
    }

    /// Name used in tensor debug output.
    pub fn type_name(self) -> &'static str {
        match self {
            DType::F32 => "float",
            DType::F64 => "double",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(pub SmallVec<[usize; 6]>);

impl Shape {
    pub fn from_slice(d: &[usize]) -> Self {
        Self(d.iter().copied().collect())
    }
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
    pub fn rank(&self) -> usize {
        self.0.len()
    }
    pub fn numel(&self) -> usize {
        self.0.iter().product::<usize>()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{d}")?;
        }
        f.write_str("]")
    }
}

/// A dense CPU tensor. Elements are stored little-endian in `data`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub dtype: DType,
    pub shape: Shape,
    pub data: Bytes,
}

impl Tensor {
    pub fn from_cpu_bytes(dtype: DType, shape: Shape, data: Bytes) -> Self {
        Self { dtype, shape, data }
    }

    pub fn from_f32(shape: Shape, values: &[f32]) -> Self {
        let mut buf = Vec::with_capacity(values.len() * 4);
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Self::from_cpu_bytes(DType::F32, shape, Bytes::from(buf))
    }

    /// Allocates an `f32` tensor of `shape` with every element set to `value`.
    pub fn filled_f32(shape: Shape, value: f32) -> Self {
        let values = vec![value; shape.numel()];
        Self::from_f32(shape, &values)
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Whether the buffer length agrees with dtype and shape.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.shape.numel() * self.dtype.byte_size()
    }

    /// Decodes the buffer as `f32` values, or `None` for other dtypes.
    pub fn to_f32_vec(&self) -> Option<Vec<f32>> {
        if self.dtype != DType::F32 {
            return None;
        }
        Some(
            self.data
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
        )
    }

    fn element_string(&self, idx: usize) -> String {
        let size = self.dtype.byte_size();
        let b = &self.data[idx * size..(idx + 1) * size];
        match self.dtype {
            DType::F32 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]).to_string(),
            DType::F64 => {
                f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]).to_string()
            }
            DType::I32 => i32::from_le_bytes([b[0], b[1], b[2], b[3]]).to_string(),
            DType::I64 => {
                i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]).to_string()
            }
            DType::U8 => b[0].to_string(),
        }
    }
}

/// Human-readable summary, e.g. `Tensor<type: float shape: [1,3] values: 1 1 1>`.
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor<type: {} shape: {} values:",
            self.dtype, self.shape
        )?;
        if !self.is_consistent() {
            return write!(f, " <{} bytes>>", self.data.len());
        }
        let available = self.numel();
        for idx in 0..available.min(SUMMARY_VALUES) {
            write!(f, " {}", self.element_string(idx))?;
        }
        if available > SUMMARY_VALUES {
            f.write_str("...")?;
        }
        f.write_str(">")
    }
}
