use anyhow::{anyhow, Result};

use super::{Distribution, DistributionRef};
use crate::tensor::{broadcast_shapes, Tensor};

/// Reinterprets the rightmost batch axes of `base` as event axes.
#[derive(Debug, Clone)]
pub struct Independent {
    base: DistributionRef,
    reinterpreted_batch_ndims: usize,
}

impl Independent {
    pub fn new(base: DistributionRef, reinterpreted_batch_ndims: usize) -> Result<Self> {
        let rank = base.batch_shape().len();
        if reinterpreted_batch_ndims > rank {
            return Err(anyhow!(
                "cannot reinterpret {} batch dims of a batch shape with rank {}",
                reinterpreted_batch_ndims,
                rank
            ));
        }
        Ok(Self {
            base,
            reinterpreted_batch_ndims,
        })
    }
}

impl Distribution for Independent {
    fn batch_shape(&self) -> Vec<usize> {
        let shape = self.base.batch_shape();
        shape[..shape.len() - self.reinterpreted_batch_ndims].to_vec()
    }

    fn event_shape(&self) -> Vec<usize> {
        let shape = self.base.batch_shape();
        let mut event = shape[shape.len() - self.reinterpreted_batch_ndims..].to_vec();
        event.extend(self.base.event_shape());
        event
    }

    fn base_dist(&self) -> Option<&dyn Distribution> {
        Some(self.base.as_ref())
    }
}

/// Broadcasts `base` to a larger batch shape.
#[derive(Debug, Clone)]
pub struct Expanded {
    base: DistributionRef,
    batch_shape: Vec<usize>,
}

impl Expanded {
    pub fn new(base: DistributionRef, batch_shape: &[usize]) -> Result<Self> {
        let merged = broadcast_shapes(&base.batch_shape(), batch_shape)?;
        if merged != batch_shape {
            return Err(anyhow!(
                "cannot expand batch shape {:?} to {:?}",
                base.batch_shape(),
                batch_shape
            ));
        }
        Ok(Self {
            base,
            batch_shape: batch_shape.to_vec(),
        })
    }
}

impl Distribution for Expanded {
    fn batch_shape(&self) -> Vec<usize> {
        self.batch_shape.clone()
    }

    fn event_shape(&self) -> Vec<usize> {
        self.base.event_shape()
    }

    fn base_dist(&self) -> Option<&dyn Distribution> {
        Some(self.base.as_ref())
    }
}

/// Masks the log density of `base`; the mask broadcasts into the batch shape.
#[derive(Debug, Clone)]
pub struct Masked {
    base: DistributionRef,
    batch_shape: Vec<usize>,
}

impl Masked {
    pub fn new(base: DistributionRef, mask: &Tensor<bool>) -> Result<Self> {
        let batch_shape = broadcast_shapes(mask.shape(), &base.batch_shape())?;
        Ok(Self { base, batch_shape })
    }
}

impl Distribution for Masked {
    fn batch_shape(&self) -> Vec<usize> {
        self.batch_shape.clone()
    }

    fn event_shape(&self) -> Vec<usize> {
        self.base.event_shape()
    }

    fn base_dist(&self) -> Option<&dyn Distribution> {
        Some(self.base.as_ref())
    }
}
