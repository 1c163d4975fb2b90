use std::collections::HashSet;
use std::fmt;

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

/// Identity of one interruption instance.
///
/// Two interruptions with identical configuration are still distinct; the
/// event loop tracks which ones already fired by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InterruptionId(Uuid);

impl InterruptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InterruptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InterruptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When an interruption fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Trigger {
    /// At a fixed point in time.
    At(f64),
    /// When the interruption's event function crosses zero; only a solver
    /// can locate it.
    Dynamic,
}

/// Effect applied to `(dynamics, state)` when an interruption fires.
pub type Effect<D, S> = Box<dyn FnMut(D, S) -> Result<(D, S)>>;

/// A discrete event that pauses integration.
pub trait Interruption<D, S> {
    fn id(&self) -> InterruptionId;

    fn label(&self) -> &str;

    fn trigger(&self) -> Trigger;

    /// Signed distance to the event for dynamic triggers, zero at the event.
    fn event_fn(&self, _time: f64, _state: &S) -> Option<f64> {
        None
    }

    /// Mutate `dynamics` and `state`; only called for interruptions that
    /// just fired.
    fn apply(&mut self, dynamics: D, state: S) -> Result<(D, S)>;
}

/// Fires once at a fixed time.
pub struct StaticInterruption<D, S> {
    id: InterruptionId,
    label: String,
    time: f64,
    effect: Option<Effect<D, S>>,
}

impl<D, S> StaticInterruption<D, S> {
    pub fn new(label: impl Into<String>, time: f64) -> Self {
        Self {
            id: InterruptionId::new(),
            label: label.into(),
            time,
            effect: None,
        }
    }

    pub fn with_effect<F>(mut self, effect: F) -> Self
    where
        F: FnMut(D, S) -> Result<(D, S)> + 'static,
    {
        self.effect = Some(Box::new(effect));
        self
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

impl<D, S> fmt::Debug for StaticInterruption<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticInterruption")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("time", &self.time)
            .field("has_effect", &self.effect.is_some())
            .finish()
    }
}

impl<D, S> Interruption<D, S> for StaticInterruption<D, S> {
    fn id(&self) -> InterruptionId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn trigger(&self) -> Trigger {
        Trigger::At(self.time)
    }

    fn apply(&mut self, dynamics: D, state: S) -> Result<(D, S)> {
        match self.effect.as_mut() {
            Some(effect) => effect(dynamics, state),
            None => Ok((dynamics, state)),
        }
    }
}

/// Fires when `event_fn(t, state)` reaches zero.
pub struct DynamicInterruption<D, S> {
    id: InterruptionId,
    label: String,
    event_fn: Box<dyn Fn(f64, &S) -> f64>,
    effect: Option<Effect<D, S>>,
}

impl<D, S> DynamicInterruption<D, S> {
    pub fn new<F>(label: impl Into<String>, event_fn: F) -> Self
    where
        F: Fn(f64, &S) -> f64 + 'static,
    {
        Self {
            id: InterruptionId::new(),
            label: label.into(),
            event_fn: Box::new(event_fn),
            effect: None,
        }
    }

    pub fn with_effect<F>(mut self, effect: F) -> Self
    where
        F: FnMut(D, S) -> Result<(D, S)> + 'static,
    {
        self.effect = Some(Box::new(effect));
        self
    }
}

impl<D, S> fmt::Debug for DynamicInterruption<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicInterruption")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("has_effect", &self.effect.is_some())
            .finish()
    }
}

impl<D, S> Interruption<D, S> for DynamicInterruption<D, S> {
    fn id(&self) -> InterruptionId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn trigger(&self) -> Trigger {
        Trigger::Dynamic
    }

    fn event_fn(&self, time: f64, state: &S) -> Option<f64> {
        Some((self.event_fn)(time, state))
    }

    fn apply(&mut self, dynamics: D, state: S) -> Result<(D, S)> {
        match self.effect.as_mut() {
            Some(effect) => effect(dynamics, state),
            None => Ok((dynamics, state)),
        }
    }
}

/// Run the effects of every interruption in `fired`, in registration order.
///
/// Interruptions outside `fired` are not touched.
pub fn apply_interruptions<D, S>(
    dynamics: D,
    state: S,
    interruptions: &mut [Box<dyn Interruption<D, S>>],
    fired: &HashSet<InterruptionId>,
) -> Result<(D, S)> {
    let mut dynamics = dynamics;
    let mut state = state;
    for interruption in interruptions.iter_mut() {
        if !fired.contains(&interruption.id()) {
            continue;
        }
        crate::trace!("interruption.apply label={}", interruption.label());
        (dynamics, state) = interruption.apply(dynamics, state).map_err(|err| {
            crate::error!("interruption '{}' failed to apply: {}", interruption.label(), err);
            err
        })?;
    }
    Ok((dynamics, state))
}
