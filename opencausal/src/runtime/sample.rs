use anyhow::Result;
use serde::Serialize;

use super::messenger::handler_stack;
use crate::distribution::DistributionRef;
use crate::indexed::Value;

/// Conditional-independence record for one active world plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CondIndepStackFrame {
    pub name: String,
    pub dim: isize,
    pub size: usize,
    pub counter: usize,
}

/// A sampling site travelling through the handler stack.
#[derive(Debug, Clone)]
pub struct SampleMsg {
    pub name: String,
    pub fn_: DistributionRef,
    pub value: Value,
    pub is_observed: bool,
    /// Subsample-marker sites are skipped by plate handlers.
    pub is_subsample: bool,
    /// Outermost plate first.
    pub cond_indep_stack: Vec<CondIndepStackFrame>,
}

impl SampleMsg {
    pub fn new(name: impl Into<String>, fn_: DistributionRef) -> Self {
        Self {
            name: name.into(),
            fn_,
            value: Value::None,
            is_observed: false,
            is_subsample: false,
            cond_indep_stack: Vec::new(),
        }
    }

    /// Attach an observed value.
    pub fn observed(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self.is_observed = true;
        self
    }

    /// Attach a value produced upstream without marking the site observed.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn subsample(mut self) -> Self {
        self.is_subsample = true;
        self
    }

    pub fn frame_names(&self) -> Vec<&str> {
        self.cond_indep_stack
            .iter()
            .map(|frame| frame.name.as_str())
            .collect()
    }
}

/// Run a sample site through every active handler, innermost first.
pub fn sample(mut msg: SampleMsg) -> Result<SampleMsg> {
    for messenger in handler_stack().iter().rev() {
        messenger.process_sample(&mut msg)?;
    }
    crate::trace!(
        "sample name={} frames={:?}",
        msg.name,
        msg.frame_names()
    );
    Ok(msg)
}
