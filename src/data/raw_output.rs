use half::{bf16, f16};
use crate::data::PostprocessError;

/// Borrowed output buffer in the dtype the runtime produced.
#[derive(Debug, Clone, Copy)]
pub enum TensorData<'a> {
    F32(&'a [f32]),
    F16(&'a [f16]),
    Bf16(&'a [bf16]),
    /// Affine-quantized: `real = (q - zero_point) * scale`.
    U8 { data: &'a [u8], scale: f32, zero_point: i32 },
    I8 { data: &'a [i8], scale: f32, zero_point: i32 },
}

impl TensorData<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::F32(d) => d.len(),
            Self::F16(d) => d.len(),
            Self::Bf16(d) => d.len(),
            Self::U8 { data, .. } => data.len(),
            Self::I8 { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype_name(&self) -> &'static str {
        match self {
            Self::F32(_) => "f32",
            Self::F16(_) => "f16",
            Self::Bf16(_) => "bf16",
            Self::U8 { .. } => "u8",
            Self::I8 { .. } => "i8",
        }
    }

    /// Writes the first `n` values (or all, if fewer) as `f32` into `out`, reusing its allocation.
    pub fn dequantize_into(&self, n: usize, out: &mut Vec<f32>) {
        let n = n.min(self.len());
        out.clear();
        match self {
            Self::F32(d) => out.extend_from_slice(&d[..n]),
            Self::F16(d) => out.extend(d[..n].iter().map(|x| x.to_f32())),
            Self::Bf16(d) => out.extend(d[..n].iter().map(|x| x.to_f32())),
            Self::U8 { data, scale, zero_point } => {
                out.extend(data[..n].iter().map(|&q| (q as i32 - zero_point) as f32 * scale))
            }
            Self::I8 { data, scale, zero_point } => {
                out.extend(data[..n].iter().map(|&q| (q as i32 - zero_point) as f32 * scale))
            }
        }
    }
}

/// One output tensor of an inference call, immutable for the call's duration.
#[derive(Debug, Clone)]
pub struct RawOutput<'a> {
    pub shape: Vec<usize>,
    pub data: TensorData<'a>,
}

impl<'a> RawOutput<'a> {
    pub fn new(shape: &[usize], data: TensorData<'a>) -> Self {
        Self {
            shape: shape.to_vec(),
            data,
        }
    }

    pub fn f32(shape: &[usize], data: &'a [f32]) -> Self {
        Self::new(shape, TensorData::F32(data))
    }

    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Checks that the buffer is at least as long as the shape says.
    pub fn check_len(&self) -> Result<(), PostprocessError> {
        let expected = self.element_count();
        if self.data.len() < expected {
            return Err(PostprocessError::ShapeMismatch {
                shape: self.shape.clone(),
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Dequantizes the first `n` values into `scratch`. `f32` buffers are left alone.
    pub fn dequantize(&self, n: usize, scratch: &mut Vec<f32>) {
        if !matches!(self.data, TensorData::F32(_)) {
            self.data.dequantize_into(n, scratch);
        }
    }

    /// First `n` values as `f32`: borrowed for `f32` buffers, otherwise read from the
    /// scratch filled by [`RawOutput::dequantize`].
    pub fn as_f32<'s>(&'s self, scratch: &'s [f32], n: usize) -> &'s [f32] {
        match self.data {
            TensorData::F32(d) => &d[..n.min(d.len())],
            _ => &scratch[..n.min(scratch.len())],
        }
    }
}

#[derive(Debug, Clone)]
pub enum OwnedTensorData {
    F32(Vec<f32>),
    F16(Vec<f16>),
    Bf16(Vec<bf16>),
    U8 { data: Vec<u8>, scale: f32, zero_point: i32 },
    I8 { data: Vec<i8>, scale: f32, zero_point: i32 },
}

/// An output tensor that can be moved to the worker thread.
#[derive(Debug, Clone)]
pub struct OwnedOutput {
    pub shape: Vec<usize>,
    pub data: OwnedTensorData,
}

impl OwnedOutput {
    pub fn f32(shape: &[usize], data: Vec<f32>) -> Self {
        Self {
            shape: shape.to_vec(),
            data: OwnedTensorData::F32(data),
        }
    }

    pub fn as_raw(&self) -> RawOutput<'_> {
        let data = match &self.data {
            OwnedTensorData::F32(d) => TensorData::F32(d),
            OwnedTensorData::F16(d) => TensorData::F16(d),
            OwnedTensorData::Bf16(d) => TensorData::Bf16(d),
            OwnedTensorData::U8 { data, scale, zero_point } => TensorData::U8 {
                data,
                scale: *scale,
                zero_point: *zero_point,
            },
            OwnedTensorData::I8 { data, scale, zero_point } => TensorData::I8 {
                data,
                scale: *scale,
                zero_point: *zero_point,
            },
        };
        RawOutput {
            shape: self.shape.clone(),
            data,
        }
    }
}
