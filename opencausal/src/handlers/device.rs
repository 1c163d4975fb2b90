use anyhow::Result;

use crate::distribution::{Distribution, Param};
use crate::error::IndexError;
use crate::indexed::Value;
use crate::tensor::Device;

/// Device that new mask or index tensors for a sample site must live on.
///
/// A tensor value decides directly. Otherwise the distribution is unwrapped
/// down to its root and the first tensor-valued declared parameter decides.
pub fn get_sample_msg_device(dist: &dyn Distribution, value: &Value) -> Result<Device> {
    if let Value::Tensor(tensor) = value {
        return Ok(tensor.device());
    }
    let mut root = dist;
    while let Some(base) = root.base_dist() {
        root = base;
    }
    for name in root.arg_names() {
        if let Some(Param::Tensor(param)) = root.arg(name) {
            return Ok(param.device());
        }
    }
    Err(IndexError::Lookup(format!(
        "could not infer device for {:?} and {}",
        dist, value
    ))
    .into())
}
