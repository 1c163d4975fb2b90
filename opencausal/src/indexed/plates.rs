//! Registry of world plates.
//!
//! Plates are owned by `IndexPlates` handlers on the thread's interceptor
//! stack. `get_index_plates` reads every active handler; `add_indices` is an
//! effect answered by the innermost one.
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;
use serde::Serialize;

use super::IndexSet;
use crate::error::IndexError;
use crate::handlers::LazyPlate;
use crate::runtime::{handler_stack, push_handler, HandlerScope, Messenger, SampleMsg};

/// Conservative default that leaves four batch axes to model code.
pub const DEFAULT_FIRST_AVAILABLE_DIM: isize = -5;

/// One registered world dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPlate {
    pub name: String,
    /// Negative offset from the rightmost batch axis.
    pub dim: isize,
    /// Total number of worlds along this dimension.
    pub size: usize,
}

/// Scope handler that allocates a plate for each new world name.
#[derive(Debug)]
pub struct IndexPlates {
    first_available_dim: Cell<isize>,
    plates: RefCell<Vec<LazyPlate>>,
}

impl Default for IndexPlates {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexPlates {
    pub fn new() -> Self {
        Self {
            first_available_dim: Cell::new(DEFAULT_FIRST_AVAILABLE_DIM),
            plates: RefCell::new(Vec::new()),
        }
    }

    pub fn with_first_available_dim(self, dim: isize) -> Self {
        self.first_available_dim.set(dim);
        self
    }

    /// Install on the handler stack; plates are released when the scope drops.
    pub fn enter(self) -> Result<HandlerScope> {
        let dim = self.first_available_dim.get();
        if dim >= 0 {
            return Err(IndexError::InvalidArgument(format!(
                "first_available_dim must be negative, got {}",
                dim
            ))
            .into());
        }
        Ok(push_handler(Rc::new(self)))
    }

    fn register(&self, indexset: &IndexSet) -> Result<()> {
        // Names owned by enclosing scopes keep their plate; free dims avoid them.
        let visible = get_index_plates();
        let mut fresh = Vec::new();
        for (name, indices) in indexset {
            let (Some(min), Some(max)) = (indices.first(), indices.last()) else {
                continue;
            };
            match visible.get(name) {
                Some(plate) if *max >= plate.size => {
                    return Err(IndexError::Precondition(format!(
                        "cannot add {}={{{}..={}}} to a plate of size {}",
                        name, min, max, plate.size
                    ))
                    .into());
                }
                Some(_) => {}
                None => fresh.push((name.clone(), (max + 1).max(indices.len()))),
            }
        }
        if fresh.is_empty() {
            return Ok(());
        }

        let mut dim = self.first_available_dim.get();
        if let Some(lowest) = visible.values().map(|plate| plate.dim).min() {
            dim = dim.min(lowest - 1);
        }
        let mut plates = self.plates.borrow_mut();
        for (name, size) in fresh {
            crate::trace!("plate.alloc name={} dim={} size={}", name, dim, size);
            plates.push(LazyPlate::new(name, dim, size));
            dim -= 1;
        }
        self.first_available_dim.set(dim);
        Ok(())
    }
}

impl Messenger for IndexPlates {
    fn label(&self) -> &str {
        "index_plates"
    }

    fn process_sample(&self, msg: &mut SampleMsg) -> Result<()> {
        let plates = self.plates.borrow().clone();
        for plate in plates.iter().rev() {
            plate.process_sample(msg)?;
        }
        Ok(())
    }

    fn process_add_indices(&self, indexset: &IndexSet) -> Result<bool> {
        self.register(indexset)?;
        Ok(true)
    }

    fn collect_index_plates(&self, plates: &mut BTreeMap<String, IndexPlate>) {
        for plate in self.plates.borrow().iter() {
            plates.insert(plate.name().to_string(), plate.plate());
        }
    }
}

/// All plates visible from the current scope, by name.
pub fn get_index_plates() -> BTreeMap<String, IndexPlate> {
    let mut plates = BTreeMap::new();
    for messenger in handler_stack() {
        messenger.collect_index_plates(&mut plates);
    }
    plates
}

/// Snapshot of `name -> dim` for the visible plates.
pub fn name_to_dim() -> BTreeMap<String, isize> {
    get_index_plates()
        .into_iter()
        .map(|(name, plate)| (name, plate.dim))
        .collect()
}

/// Announce that `indexset` is in scope, allocating plates as needed.
///
/// Registering indices that are already covered is a no-op. Without an
/// `IndexPlates` handler the call has no effect.
pub fn add_indices(indexset: &IndexSet) -> Result<IndexSet> {
    for messenger in handler_stack().iter().rev() {
        if messenger.process_add_indices(indexset)? {
            break;
        }
    }
    Ok(indexset.clone())
}
