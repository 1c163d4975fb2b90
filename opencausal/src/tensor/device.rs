use std::fmt;

use serde::Serialize;

/// Placement tag carried by every tensor.
///
/// Data never moves between devices here; the tag records where a tensor is
/// expected to live so that freshly built masks and index tensors can follow
/// the values they are combined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Device {
    #[default]
    Cpu,
    Vulkan,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Vulkan => write!(f, "vulkan"),
        }
    }
}
