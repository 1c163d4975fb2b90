//! Worlds, plates and the indexing operations over them.
mod gather;
mod index_set;
mod indices_of;
mod mask;
mod options;
mod plates;
mod scatter;
mod value;

pub use gather::{gather, gather_tensor};
pub use index_set::{union, IndexSet};
pub use indices_of::{indices_of, indices_of_shape};
pub use mask::{indexset_as_mask, MaskOptions};
pub use options::IndexOptions;
pub use plates::{
    add_indices, get_index_plates, name_to_dim, IndexPlate, IndexPlates,
    DEFAULT_FIRST_AVAILABLE_DIM,
};
pub use scatter::{scatter, scatter_partitioned, scatter_tensor};
pub use value::Value;
