//! Indexed values over parallel worlds, and an interruption event loop for
//! hybrid dynamical simulation.
//!
//! ```
//! use opencausal::{gather, indexset, IndexOptions, Tensor, TensorOptions, TensorValue, Value};
//! # fn main() -> anyhow::Result<()> {
//! let tensor = Tensor::from_vec_with_opts(
//!     vec![1.0f64, 2.0],
//!     TensorOptions { shape: Some(vec![2, 1]), ..TensorOptions::default() },
//! )?;
//! let value = Value::Tensor(TensorValue::from(tensor));
//! let opts = IndexOptions::default().with_name_to_dim([("x", -2)]);
//! let factual = gather(&value, &indexset! { x: [0] }, &opts)?;
//! assert_eq!(factual.as_tensor().map(|t| t.shape().to_vec()), Some(vec![1, 1]));
//! # Ok(()) }
//! ```

#[doc(hidden)]
pub mod logging;

pub mod distribution;
pub mod dynamical;
mod error;
mod formatting;
pub mod handlers;
pub mod indexed;
mod random;
pub mod runtime;
mod tensor;

pub use distribution::{
    Delta, Distribution, DistributionRef, Expanded, Independent, Masked, Normal, Param,
};
pub use dynamical::{
    get_solver, DynamicInterruption, Interruption, InterruptionEventLoop, InterruptionId, Solver,
    SolverScope, StaticInterruption, TraceEvent, TraceEventKind, TraceSerialize, Trigger,
};
pub use error::{IndexError, SimulationError};
pub use formatting::{format_truncated, FormatValue};
pub use handlers::{get_sample_msg_device, LazyPlate};
pub use indexed::{
    add_indices, gather, get_index_plates, indexset_as_mask, indices_of, name_to_dim, scatter,
    scatter_partitioned, union, IndexOptions, IndexPlate, IndexPlates, IndexSet, MaskOptions,
    Value,
};
pub use random::{Random, RandomValue};
pub use tensor::{Device, DType, Tensor, TensorElement, TensorOptions, TensorValue};
