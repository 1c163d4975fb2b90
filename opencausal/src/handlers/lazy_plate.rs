use anyhow::Result;

use crate::indexed::{indices_of, IndexOptions, IndexPlate, Value};
use crate::runtime::{CondIndepStackFrame, Messenger, SampleMsg};

/// Plate handler that only claims sample sites which vary along its world.
///
/// A site is claimed when the plate's name appears among the indices of the
/// sampled value (read at the distribution's event dimension) or of the
/// distribution's batch shape. Claimed sites get the plate's frame prepended
/// to their conditional-independence stack; other sites are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyPlate {
    name: String,
    dim: isize,
    size: usize,
}

impl LazyPlate {
    pub fn new(name: impl Into<String>, dim: isize, size: usize) -> Self {
        Self {
            name: name.into(),
            dim,
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dim(&self) -> isize {
        self.dim
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn frame(&self) -> CondIndepStackFrame {
        CondIndepStackFrame {
            name: self.name.clone(),
            dim: self.dim,
            size: self.size,
            counter: 0,
        }
    }

    pub fn plate(&self) -> IndexPlate {
        IndexPlate {
            name: self.name.clone(),
            dim: self.dim,
            size: self.size,
        }
    }

    fn claims(&self, msg: &SampleMsg) -> Result<bool> {
        let value_indices = indices_of(
            &msg.value,
            &IndexOptions::event_dim(msg.fn_.event_dim()),
        )?;
        let fn_indices = indices_of(
            &Value::Distribution(msg.fn_.clone()),
            &IndexOptions::default(),
        )?;
        Ok(value_indices.union(&fn_indices).contains(&self.name))
    }
}

impl Messenger for LazyPlate {
    fn label(&self) -> &str {
        &self.name
    }

    fn process_sample(&self, msg: &mut SampleMsg) -> Result<()> {
        if msg.is_subsample {
            return Ok(());
        }
        if self.claims(msg)? {
            msg.cond_indep_stack.insert(0, self.frame());
        }
        Ok(())
    }
}
