use std::collections::BTreeMap;

use anyhow::Result;

use super::options::check_scalar_event_dim;
use super::{union, IndexOptions, IndexSet, Value};
use crate::error::IndexError;
use crate::tensor::normalize_axis;

/// Worlds along which `value` already varies.
///
/// Only axes longer than one count; a length-1 axis is broadcast and names no
/// particular world.
pub fn indices_of(value: &Value, opts: &IndexOptions) -> Result<IndexSet> {
    match value {
        Value::None => Ok(IndexSet::new()),
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => {
            check_scalar_event_dim(value, opts)?;
            Ok(IndexSet::new())
        }
        Value::Tuple(items) => {
            if items.iter().all(|item| matches!(item, Value::Int(_))) {
                let shape = tuple_as_shape(items)?;
                return indices_of_shape(&shape, opts);
            }
            let parts = items
                .iter()
                .map(|item| indices_of(item, opts))
                .collect::<Result<Vec<_>>>()?;
            Ok(union(&parts))
        }
        Value::Shape(shape) => indices_of_shape(shape, opts),
        Value::Tensor(tensor) => indices_of_shape(tensor.shape(), opts),
        // Distributions already split batch from event axes.
        Value::Distribution(dist) => indices_of_shape(
            &dist.batch_shape(),
            &IndexOptions {
                event_dim: Some(0),
                name_to_dim: opts.name_to_dim.clone(),
            },
        ),
        Value::Partitioned(_) => Err(IndexError::Unsupported {
            op: "indices_of",
            kind: value.kind(),
        }
        .into()),
    }
}

/// `indices_of` for a bare shape.
pub fn indices_of_shape(shape: &[usize], opts: &IndexOptions) -> Result<IndexSet> {
    let map = opts.resolved_name_to_dim()?;
    Ok(shape_indices(shape, opts.resolved_event_dim(), &map))
}

pub(crate) fn shape_indices(
    shape: &[usize],
    event_dim: usize,
    name_to_dim: &BTreeMap<String, isize>,
) -> IndexSet {
    let batch = &shape[..shape.len().saturating_sub(event_dim)];
    name_to_dim
        .iter()
        .filter_map(|(name, dim)| {
            let axis = normalize_axis(batch.len(), *dim)?;
            let len = batch[axis];
            (len > 1).then(|| (name.clone(), 0..len))
        })
        .collect()
}

fn tuple_as_shape(items: &[Value]) -> Result<Vec<usize>> {
    let mut shape = Vec::with_capacity(items.len());
    for item in items {
        let entry = match item {
            Value::Int(v) => usize::try_from(*v).ok(),
            _ => None,
        };
        match entry {
            Some(len) => shape.push(len),
            None => {
                return Err(IndexError::InvalidArgument(format!(
                    "shape entries must be non-negative integers, got {}",
                    item
                ))
                .into())
            }
        }
    }
    Ok(shape)
}
