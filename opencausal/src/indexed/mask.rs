use std::collections::BTreeMap;

use anyhow::Result;

use super::{get_index_plates, IndexSet};
use crate::error::IndexError;
use crate::tensor::{normalize_axis, Device, Tensor};

/// Options for [`indexset_as_mask`].
#[derive(Debug, Clone, Default)]
pub struct MaskOptions {
    /// Trailing singleton axes appended to the mask.
    pub event_dim: usize,
    /// Explicit `name -> (dim, size)`; `None` reads the active plates.
    pub name_to_dim_size: Option<BTreeMap<String, (isize, usize)>>,
    pub device: Device,
}

/// Dense boolean mask that is `true` exactly at the positions of `indexset`.
///
/// Named worlds get their full size, every other plate axis stays at 1 so the
/// mask broadcasts along it.
pub fn indexset_as_mask(indexset: &IndexSet, opts: &MaskOptions) -> Result<Tensor<bool>> {
    let name_to_dim_size = match &opts.name_to_dim_size {
        Some(map) => map.clone(),
        None => get_index_plates()
            .into_iter()
            .map(|(name, plate)| (name, (plate.dim, plate.size)))
            .collect(),
    };
    let mut rank = 0usize;
    for (name, (dim, _)) in &name_to_dim_size {
        if *dim >= 0 {
            return Err(IndexError::InvalidArgument(format!(
                "dimension for '{}' must be a negative offset, got {}",
                name, dim
            ))
            .into());
        }
        rank = rank.max(dim.unsigned_abs());
    }

    let mut batch_shape = vec![1usize; rank];
    let mut index = vec![vec![0usize]; rank];
    for (name, values) in indexset {
        let (dim, size) = *name_to_dim_size
            .get(name)
            .ok_or_else(|| IndexError::UnknownName(name.clone()))?;
        let Some(axis) = normalize_axis(rank, dim) else {
            continue;
        };
        index[axis] = values.iter().copied().collect();
        batch_shape[axis] = size;
    }

    let mut mask = Tensor::full(&batch_shape, false, opts.device);
    mask.assign_outer(&index, &Tensor::from_scalar(true))?;
    let mut shape = batch_shape;
    shape.extend(std::iter::repeat(1).take(opts.event_dim));
    mask.reshape(&shape)
}
