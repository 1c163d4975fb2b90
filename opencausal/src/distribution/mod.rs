//! Distribution surface consumed by the indexing algebra.
//!
//! Only shape bookkeeping and parameter introspection live here; densities and
//! sampling belong to the surrounding inference runtime.
use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::tensor::{broadcast_shapes, TensorValue};

mod wrappers;

pub use wrappers::{Expanded, Independent, Masked};

/// A declared distribution parameter.
#[derive(Debug, Clone)]
pub enum Param {
    Tensor(TensorValue),
    Scalar(f64),
}

impl Param {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Param::Tensor(t) => t.shape().to_vec(),
            Param::Scalar(_) => Vec::new(),
        }
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Scalar(value)
    }
}

impl From<TensorValue> for Param {
    fn from(value: TensorValue) -> Self {
        Param::Tensor(value)
    }
}

pub trait Distribution: fmt::Debug {
    fn batch_shape(&self) -> Vec<usize>;

    fn event_shape(&self) -> Vec<usize>;

    fn event_dim(&self) -> usize {
        self.event_shape().len()
    }

    /// Wrapped distribution, for wrappers such as `Independent` or `Masked`.
    fn base_dist(&self) -> Option<&dyn Distribution> {
        None
    }

    /// Declared parameter names, in declaration order.
    fn arg_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn arg(&self, _name: &str) -> Option<&Param> {
        None
    }
}

pub type DistributionRef = Arc<dyn Distribution>;

#[derive(Debug, Clone)]
pub struct Normal {
    loc: Param,
    scale: Param,
    batch_shape: Vec<usize>,
}

impl Normal {
    pub fn new(loc: impl Into<Param>, scale: impl Into<Param>) -> Result<Self> {
        let loc = loc.into();
        let scale = scale.into();
        let batch_shape = broadcast_shapes(&loc.shape(), &scale.shape())?;
        Ok(Self {
            loc,
            scale,
            batch_shape,
        })
    }
}

impl Distribution for Normal {
    fn batch_shape(&self) -> Vec<usize> {
        self.batch_shape.clone()
    }

    fn event_shape(&self) -> Vec<usize> {
        Vec::new()
    }

    fn arg_names(&self) -> &'static [&'static str] {
        &["loc", "scale"]
    }

    fn arg(&self, name: &str) -> Option<&Param> {
        match name {
            "loc" => Some(&self.loc),
            "scale" => Some(&self.scale),
            _ => None,
        }
    }
}

/// Point mass at `v`; the trailing `event_dim` axes of `v` form the event.
#[derive(Debug, Clone)]
pub struct Delta {
    v: Param,
    event_dim: usize,
}

impl Delta {
    pub fn new(v: impl Into<Param>, event_dim: usize) -> Result<Self> {
        let v = v.into();
        let rank = v.shape().len();
        if event_dim > rank {
            return Err(anyhow!(
                "delta event_dim {} exceeds value rank {}",
                event_dim,
                rank
            ));
        }
        Ok(Self { v, event_dim })
    }
}

impl Distribution for Delta {
    fn batch_shape(&self) -> Vec<usize> {
        let shape = self.v.shape();
        shape[..shape.len() - self.event_dim].to_vec()
    }

    fn event_shape(&self) -> Vec<usize> {
        let shape = self.v.shape();
        shape[shape.len() - self.event_dim..].to_vec()
    }

    fn arg_names(&self) -> &'static [&'static str] {
        &["v"]
    }

    fn arg(&self, name: &str) -> Option<&Param> {
        match name {
            "v" => Some(&self.v),
            _ => None,
        }
    }
}
