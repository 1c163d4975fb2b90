use std::collections::BTreeMap;

use anyhow::{anyhow, Result};

use super::gather::gather_with;
use super::indices_of::shape_indices;
use super::options::{check_scalar_event_dim, shifted_dim};
use super::{add_indices, get_index_plates, union, IndexOptions, IndexSet, Value};
use crate::error::IndexError;
use crate::tensor::{broadcast_shapes, normalize_axis, TensorValue};

/// Write `value` into the worlds of `result` named by `indexset`.
///
/// When `result` is `None` a zero-filled tensor is allocated with every
/// named world axis at its plate's full size, so positions no partition
/// writes keep the zero fill. A supplied `result` is updated and returned.
pub fn scatter(
    value: &Value,
    indexset: &IndexSet,
    result: Option<TensorValue>,
    opts: &IndexOptions,
) -> Result<TensorValue> {
    if let Value::Tensor(tensor) = value {
        return scatter_tensor(tensor, indexset, result, opts);
    }
    if let Some(tensor) = value.scalar_as_tensor() {
        check_scalar_event_dim(value, opts)?;
        return scatter_tensor(&tensor, indexset, result, opts);
    }
    Err(IndexError::Unsupported {
        op: "scatter",
        kind: value.kind(),
    }
    .into())
}

/// `scatter` on a tensor.
pub fn scatter_tensor(
    value: &TensorValue,
    indexset: &IndexSet,
    result: Option<TensorValue>,
    opts: &IndexOptions,
) -> Result<TensorValue> {
    let event_dim = opts.resolved_event_dim();
    let map = opts.resolved_name_to_dim()?;

    let value = gather_with(value, indexset, event_dim, &map)?;
    // Worlds the value already varies over are written position by position.
    let indexset = indexset.union(&shape_indices(value.shape(), event_dim, &map));

    let mut result = match result {
        Some(result) => {
            if result.dtype() != value.dtype() {
                return Err(IndexError::InvalidArgument(format!(
                    "scatter result has dtype {:?}, value has {:?}",
                    result.dtype(),
                    value.dtype()
                ))
                .into());
            }
            result
        }
        None => allocate_result(&value, &indexset, event_dim, &map)?,
    };

    let rank = result.rank();
    let mut index: Vec<Vec<usize>> = result
        .shape()
        .iter()
        .map(|len| (0..*len).collect())
        .collect();
    for (name, indices) in &indexset {
        let dim = shifted_dim(lookup_dim(&map, name)?, event_dim);
        let axis = normalize_axis(rank, dim).ok_or_else(|| {
            IndexError::InvalidArgument(format!(
                "scatter result of shape {:?} has no axis {} for '{}'",
                result.shape(),
                dim,
                name
            ))
        })?;
        if result.shape()[axis] > 1 {
            index[axis] = indices.iter().copied().collect();
        }
    }

    result.assign_outer(&index, &value)?;
    Ok(result)
}

fn allocate_result(
    value: &TensorValue,
    indexset: &IndexSet,
    event_dim: usize,
    name_to_dim: &BTreeMap<String, isize>,
) -> Result<TensorValue> {
    let plates = get_index_plates();
    let min_rank = plates
        .values()
        .map(|plate| event_dim as isize - plate.dim)
        .max()
        .unwrap_or(0)
        .max(0) as usize;
    let mut shape = broadcast_shapes(value.shape(), &vec![1; min_rank])?;
    for (name, _) in indexset {
        let plate = plates
            .get(name)
            .ok_or_else(|| IndexError::UnknownName(name.clone()))?;
        let dim = shifted_dim(lookup_dim(name_to_dim, name)?, event_dim);
        let axis = normalize_axis(shape.len(), dim).ok_or_else(|| {
            anyhow!(
                "cannot place world '{}' at dim {} of a result with rank {}",
                name,
                dim,
                shape.len()
            )
        })?;
        shape[axis] = plate.size;
    }
    Ok(TensorValue::zeros(value.dtype(), &shape, value.device()))
}

fn lookup_dim(name_to_dim: &BTreeMap<String, isize>, name: &str) -> Result<isize> {
    name_to_dim
        .get(name)
        .copied()
        .ok_or_else(|| IndexError::UnknownName(name.to_string()).into())
}

/// Merge a piecewise value into one tensor.
///
/// The union of all partition keys is registered with `add_indices` before
/// any partition is written, then each partition is scattered into the same
/// accumulator. Keys are expected to be pairwise disjoint.
pub fn scatter_partitioned(
    partitions: &BTreeMap<IndexSet, Value>,
    result: Option<TensorValue>,
    opts: &IndexOptions,
) -> Result<TensorValue> {
    let mut parts = partitions.iter();
    let Some((first_indices, first_value)) = parts.next() else {
        return Err(IndexError::Precondition(
            "cannot scatter an empty partitioned value".to_string(),
        )
        .into());
    };
    let keys: Vec<&IndexSet> = partitions.keys().collect();
    for (i, lhs) in keys.iter().enumerate() {
        if let Some(rhs) = keys[i + 1..].iter().find(|rhs| !lhs.is_disjoint(rhs)) {
            crate::warning!("overlapping partitions {} and {}; later writes win", lhs, rhs);
        }
    }
    add_indices(&union(keys.iter().copied()))?;
    let seed = scatter(first_value, first_indices, result, opts)?;
    parts.try_fold(seed, |acc, (indices, value)| {
        scatter(value, indices, Some(acc), opts)
    })
}

