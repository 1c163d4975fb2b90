use std::fmt;

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::{Device, Tensor};
use crate::formatting::format_truncated;

/// Element type that can be converted to/from `TensorValue`.
pub trait TensorElement: Sized + Clone + Default {
    const DTYPE: DType;
    /// Attempt to extract a typed tensor from a generic value.
    fn from_value(value: &TensorValue) -> Option<Tensor<Self>>;
    /// Wrap a typed tensor into a generic value.
    fn into_value(tensor: Tensor<Self>) -> TensorValue;
}

macro_rules! impl_tensor_element {
    ($ty:ty, $variant:ident) => {
        impl TensorElement for $ty {
            const DTYPE: DType = DType::$variant;

            fn from_value(value: &TensorValue) -> Option<Tensor<Self>> {
                match value {
                    TensorValue::$variant(tensor) => Some(tensor.clone()),
                    _ => None,
                }
            }

            fn into_value(tensor: Tensor<Self>) -> TensorValue {
                TensorValue::$variant(tensor)
            }
        }

        impl From<Tensor<$ty>> for TensorValue {
            fn from(value: Tensor<$ty>) -> Self {
                TensorValue::$variant(value)
            }
        }
    };
}

impl_tensor_element!(f32, F32);
impl_tensor_element!(f64, F64);
impl_tensor_element!(i64, I64);
impl_tensor_element!(bool, Bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DType {
    F32,
    F64,
    I64,
    Bool,
}

/// Tensor of any supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorValue {
    F32(Tensor<f32>),
    F64(Tensor<f64>),
    I64(Tensor<i64>),
    Bool(Tensor<bool>),
}

macro_rules! with_tensor {
    ($value:expr, $t:ident => $body:expr) => {
        match $value {
            TensorValue::F32($t) => $body,
            TensorValue::F64($t) => $body,
            TensorValue::I64($t) => $body,
            TensorValue::Bool($t) => $body,
        }
    };
}

macro_rules! map_tensor {
    ($value:expr, $t:ident => $body:expr) => {
        match $value {
            TensorValue::F32($t) => TensorValue::F32($body),
            TensorValue::F64($t) => TensorValue::F64($body),
            TensorValue::I64($t) => TensorValue::I64($body),
            TensorValue::Bool($t) => TensorValue::Bool($body),
        }
    };
}

impl TensorValue {
    pub fn dtype(&self) -> DType {
        match self {
            TensorValue::F32(_) => DType::F32,
            TensorValue::F64(_) => DType::F64,
            TensorValue::I64(_) => DType::I64,
            TensorValue::Bool(_) => DType::Bool,
        }
    }

    pub fn shape(&self) -> &[usize] {
        with_tensor!(self, t => t.shape())
    }

    pub fn rank(&self) -> usize {
        self.shape().len()
    }

    pub fn len(&self) -> usize {
        with_tensor!(self, t => t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn device(&self) -> Device {
        with_tensor!(self, t => t.device())
    }

    pub fn to_device(self, device: Device) -> Self {
        map_tensor!(self, t => t.to_device(device))
    }

    pub fn zeros(dtype: DType, shape: &[usize], device: Device) -> Self {
        match dtype {
            DType::F32 => TensorValue::F32(Tensor::zeros(shape, device)),
            DType::F64 => TensorValue::F64(Tensor::zeros(shape, device)),
            DType::I64 => TensorValue::I64(Tensor::zeros(shape, device)),
            DType::Bool => TensorValue::Bool(Tensor::zeros(shape, device)),
        }
    }

    pub fn reshape(self, shape: &[usize]) -> Result<Self> {
        Ok(map_tensor!(self, t => t.reshape(shape)?))
    }

    pub fn index_select(&self, axis: usize, indices: &[usize]) -> Result<Self> {
        Ok(map_tensor!(self, t => t.index_select(axis, indices)?))
    }

    /// Outer-product index assignment; `src` must share this tensor's dtype.
    pub fn assign_outer(&mut self, index: &[Vec<usize>], src: &TensorValue) -> Result<()> {
        match (self, src) {
            (TensorValue::F32(dst), TensorValue::F32(src)) => dst.assign_outer(index, src),
            (TensorValue::F64(dst), TensorValue::F64(src)) => dst.assign_outer(index, src),
            (TensorValue::I64(dst), TensorValue::I64(src)) => dst.assign_outer(index, src),
            (TensorValue::Bool(dst), TensorValue::Bool(src)) => dst.assign_outer(index, src),
            (dst, src) => Err(anyhow!(
                "dtype mismatch: cannot assign {:?} into {:?}",
                src.dtype(),
                dst.dtype()
            )),
        }
    }
}

impl From<f64> for TensorValue {
    fn from(value: f64) -> Self {
        TensorValue::F64(Tensor::from_scalar(value))
    }
}

impl From<i64> for TensorValue {
    fn from(value: i64) -> Self {
        TensorValue::I64(Tensor::from_scalar(value))
    }
}

impl From<bool> for TensorValue {
    fn from(value: bool) -> Self {
        TensorValue::Bool(Tensor::from_scalar(value))
    }
}

impl fmt::Display for TensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = with_tensor!(self, t => format_truncated(&t.data));
        write!(
            f,
            "{:?}{:?}@{} {}",
            self.dtype(),
            self.shape(),
            self.device(),
            data
        )
    }
}
