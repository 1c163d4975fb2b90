use std::collections::BTreeMap;

use anyhow::Result;

use super::options::{check_scalar_event_dim, shifted_dim};
use super::{IndexOptions, IndexSet, Value};
use crate::error::IndexError;
use crate::tensor::{normalize_axis, TensorValue};

/// Restrict `value` to the worlds named by `indexset`.
///
/// Scalars are promoted to 0-d tensors first, so the result is always a
/// `Value::Tensor` for the kinds gather is defined on.
pub fn gather(value: &Value, indexset: &IndexSet, opts: &IndexOptions) -> Result<Value> {
    if let Value::Tensor(tensor) = value {
        return Ok(Value::Tensor(gather_tensor(tensor, indexset, opts)?));
    }
    if let Some(tensor) = value.scalar_as_tensor() {
        check_scalar_event_dim(value, opts)?;
        return Ok(Value::Tensor(gather_tensor(&tensor, indexset, opts)?));
    }
    Err(IndexError::Unsupported {
        op: "gather",
        kind: value.kind(),
    }
    .into())
}

/// `gather` on a tensor.
///
/// Each named world selects its sorted indices along `dim - event_dim`.
/// Worlds the tensor has no axis for, or whose axis has length 1, are left
/// alone.
pub fn gather_tensor(
    value: &TensorValue,
    indexset: &IndexSet,
    opts: &IndexOptions,
) -> Result<TensorValue> {
    let event_dim = opts.resolved_event_dim();
    let map = opts.resolved_name_to_dim()?;
    gather_with(value, indexset, event_dim, &map)
}

pub(crate) fn gather_with(
    value: &TensorValue,
    indexset: &IndexSet,
    event_dim: usize,
    name_to_dim: &BTreeMap<String, isize>,
) -> Result<TensorValue> {
    let mut result = value.clone();
    for (name, indices) in indexset {
        let dim = *name_to_dim
            .get(name)
            .ok_or_else(|| IndexError::UnknownName(name.clone()))?;
        let Some(axis) = normalize_axis(result.rank(), shifted_dim(dim, event_dim)) else {
            continue;
        };
        if result.shape()[axis] == 1 {
            continue;
        }
        let indices: Vec<usize> = indices.iter().copied().collect();
        result = result.index_select(axis, &indices)?;
    }
    Ok(result)
}
