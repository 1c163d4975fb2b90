use std::collections::BTreeMap;

use anyhow::Result;

use super::{name_to_dim, Value};
use crate::error::IndexError;

/// Options shared by `indices_of`, `gather` and `scatter`.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Trailing axes that belong to one event; `None` means 0.
    pub event_dim: Option<usize>,
    /// Explicit `name -> dim` map; `None` reads the active plates.
    pub name_to_dim: Option<BTreeMap<String, isize>>,
}

impl IndexOptions {
    pub fn event_dim(event_dim: usize) -> Self {
        Self {
            event_dim: Some(event_dim),
            ..Self::default()
        }
    }

    pub fn with_name_to_dim<I, N>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, isize)>,
        N: Into<String>,
    {
        self.name_to_dim = Some(
            pairs
                .into_iter()
                .map(|(name, dim)| (name.into(), dim))
                .collect(),
        );
        self
    }

    pub(crate) fn resolved_event_dim(&self) -> usize {
        self.event_dim.unwrap_or(0)
    }

    /// The supplied map, or a snapshot of the registry; dims must be negative.
    pub(crate) fn resolved_name_to_dim(&self) -> Result<BTreeMap<String, isize>> {
        let map = match &self.name_to_dim {
            Some(map) => map.clone(),
            None => name_to_dim(),
        };
        if let Some((name, dim)) = map.iter().find(|(_, dim)| **dim >= 0) {
            return Err(IndexError::InvalidArgument(format!(
                "dimension for '{}' must be a negative offset, got {}",
                name, dim
            ))
            .into());
        }
        Ok(map)
    }
}

/// Scalars only have the trivial event dimension.
pub(crate) fn check_scalar_event_dim(value: &Value, opts: &IndexOptions) -> Result<()> {
    match opts.event_dim {
        None | Some(0) => Ok(()),
        Some(event_dim) => Err(IndexError::InvalidArgument(format!(
            "event_dim must be 0 or unset for a {} value, got {}",
            value.kind(),
            event_dim
        ))
        .into()),
    }
}

/// Axis addressed by `dim` after moving past `event_dim` event axes.
pub(crate) fn shifted_dim(dim: isize, event_dim: usize) -> isize {
    dim - event_dim as isize
}
