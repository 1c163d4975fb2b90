//! Tensor container.
//!
//! `Tensor<T>` owns flat row-major storage with shape/stride metadata and a
//! device tag. Only the selection and assignment primitives needed by the
//! indexing algebra are provided.
use anyhow::{anyhow, Result};

use super::device::Device;
use super::shape::{broadcast_shapes, compute_strides, linear_to_indices, numel, offset_for};

/// Tensor construction options (shape/device overrides).
#[derive(Debug, Clone, Default)]
pub struct TensorOptions {
    /// Optional explicit shape.
    pub shape: Option<Vec<usize>>,
    /// Device tag for the new tensor.
    pub device: Device,
}

/// Owned tensor container with shape and stride metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub data: Vec<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    device: Device,
}

impl<T> Tensor<T> {
    /// Build a one-dimensional tensor from a flat data vector.
    ///
    /// # Example
    /// ```no_run
    /// # use opencausal::Tensor;
    /// # fn main() -> anyhow::Result<()> {
    /// let t = Tensor::from_vec(vec![1.0f32, 2.0, 3.0])?;
    /// # Ok(()) }
    /// ```
    pub fn from_vec(data: Vec<T>) -> Result<Self> {
        Self::from_vec_with_opts(data, TensorOptions::default())
    }

    /// Build a tensor with explicit options.
    ///
    /// # Example
    /// ```no_run
    /// # use opencausal::{Tensor, TensorOptions};
    /// # fn main() -> anyhow::Result<()> {
    /// let t = Tensor::from_vec_with_opts(
    ///     vec![1.0f32, 2.0, 3.0, 4.0],
    ///     TensorOptions { shape: Some(vec![2, 2]), ..TensorOptions::default() },
    /// )?;
    /// # Ok(()) }
    /// ```
    pub fn from_vec_with_opts(data: Vec<T>, opts: TensorOptions) -> Result<Self> {
        let shape = match opts.shape {
            Some(shape) => shape,
            None => vec![data.len()],
        };
        let expected = numel(&shape);
        if expected != data.len() {
            return Err(anyhow!(
                "tensor shape {:?} expects {} values, got {}",
                shape,
                expected,
                data.len()
            ));
        }
        let strides = compute_strides(&shape);
        Ok(Self {
            data,
            shape,
            strides,
            device: opts.device,
        })
    }

    /// Create a scalar tensor from a single value.
    pub fn from_scalar(value: T) -> Self {
        Self {
            data: vec![value],
            shape: Vec::new(),
            strides: Vec::new(),
            device: Device::Cpu,
        }
    }

    /// Return the raw data length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the tensor shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Return the tensor strides.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Retag the tensor with a new device.
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Return the logical element count.
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    pub fn get(&self, indices: &[usize]) -> Result<&T> {
        let offset = offset_for(&self.shape, &self.strides, indices)?;
        Ok(&self.data[offset])
    }

    /// Reinterpret the data with a new shape of the same element count.
    pub fn reshape(mut self, shape: &[usize]) -> Result<Self> {
        if numel(shape) != self.data.len() {
            return Err(anyhow!(
                "cannot reshape {:?} into {:?}",
                self.shape,
                shape
            ));
        }
        self.shape = shape.to_vec();
        self.strides = compute_strides(shape);
        Ok(self)
    }
}

impl<T: Clone> Tensor<T> {
    /// Create a tensor of the given shape filled with `value`.
    pub fn full(shape: &[usize], value: T, device: Device) -> Self {
        Self {
            data: vec![value; numel(shape)],
            shape: shape.to_vec(),
            strides: compute_strides(shape),
            device,
        }
    }

    /// Clone the tensor data into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Select `indices` along `axis`, in the order given.
    pub fn index_select(&self, axis: usize, indices: &[usize]) -> Result<Self> {
        if axis >= self.rank() {
            return Err(anyhow!(
                "axis {} out of range for tensor of rank {}",
                axis,
                self.rank()
            ));
        }
        if let Some(bad) = indices.iter().find(|idx| **idx >= self.shape[axis]) {
            return Err(anyhow!(
                "index {} out of bounds for axis {} of size {}",
                bad,
                axis,
                self.shape[axis]
            ));
        }
        let mut out_shape = self.shape.clone();
        out_shape[axis] = indices.len();
        let mut data = Vec::with_capacity(numel(&out_shape));
        for linear in 0..numel(&out_shape) {
            let mut coords = linear_to_indices(linear, &out_shape);
            coords[axis] = indices[coords[axis]];
            data.push(self.get(&coords)?.clone());
        }
        Ok(Self {
            data,
            strides: compute_strides(&out_shape),
            shape: out_shape,
            device: self.device,
        })
    }

    /// Write `src` into the positions addressed by one index list per axis.
    ///
    /// The lists combine as an outer product, so the addressed block has
    /// shape `[index[0].len(), index[1].len(), ...]`; `src` is broadcast
    /// against that block with right-aligned rules.
    pub fn assign_outer(&mut self, index: &[Vec<usize>], src: &Tensor<T>) -> Result<()> {
        if index.len() != self.rank() {
            return Err(anyhow!(
                "expected {} index lists, got {}",
                self.rank(),
                index.len()
            ));
        }
        for (axis, list) in index.iter().enumerate() {
            if let Some(bad) = list.iter().find(|idx| **idx >= self.shape[axis]) {
                return Err(anyhow!(
                    "index {} out of bounds for axis {} of size {}",
                    bad,
                    axis,
                    self.shape[axis]
                ));
            }
        }
        let block: Vec<usize> = index.iter().map(Vec::len).collect();
        // Leading singleton axes of the source carry no data.
        let mut src_shape = src.shape();
        while src_shape.len() > block.len() && src_shape[0] == 1 {
            src_shape = &src_shape[1..];
        }
        if broadcast_shapes(src_shape, &block)? != block {
            return Err(anyhow!(
                "cannot assign value of shape {:?} into block of shape {:?}",
                src.shape(),
                block
            ));
        }
        let offset = block.len() - src_shape.len();
        let src_strides = compute_strides(src_shape);
        let mut target = vec![0usize; block.len()];
        for linear in 0..numel(&block) {
            let coords = linear_to_indices(linear, &block);
            for (axis, coord) in coords.iter().enumerate() {
                target[axis] = index[axis][*coord];
            }
            let mut src_offset = 0usize;
            for (j, (dim, stride)) in src_shape.iter().zip(src_strides.iter()).enumerate() {
                if *dim != 1 {
                    src_offset += coords[offset + j] * stride;
                }
            }
            let dst = offset_for(&self.shape, &self.strides, &target)?;
            self.data[dst] = src.data[src_offset].clone();
        }
        Ok(())
    }
}

impl<T: Clone + Default> Tensor<T> {
    pub fn zeros(shape: &[usize], device: Device) -> Self {
        Self::full(shape, T::default(), device)
    }
}

impl<T> From<Vec<T>> for Tensor<T> {
    fn from(value: Vec<T>) -> Self {
        let shape = vec![value.len()];
        Self {
            strides: compute_strides(&shape),
            data: value,
            shape,
            device: Device::Cpu,
        }
    }
}
