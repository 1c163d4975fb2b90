mod device;
mod shape;
mod tensor;
mod value;

pub use device::Device;
pub use shape::{broadcast_shapes, normalize_axis, numel};
pub use tensor::{Tensor, TensorOptions};
pub use value::{DType, TensorElement, TensorValue};
