use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;

use super::{Interruption, InterruptionId, Trigger};
use crate::error::SimulationError;

static NEXT_SOLVER_ID: AtomicU64 = AtomicU64::new(0);

/// Numerical backend driven by the event loop.
///
/// `live` holds the interruptions that may still fire in the current step.
pub trait Solver<D, S> {
    fn label(&self) -> &str {
        "solver"
    }

    /// Earliest interruptions in `[start, end]` and the time they fire.
    ///
    /// When nothing fires the solver returns no ids and `end`.
    fn get_next_interruptions(
        &self,
        dynamics: &D,
        state: &S,
        start: f64,
        end: f64,
        live: &[&dyn Interruption<D, S>],
    ) -> Result<(Vec<InterruptionId>, f64)>;

    /// Integrate `state` from `start` to `end` under `dynamics`.
    fn simulate_to_interruption(
        &self,
        dynamics: &D,
        state: S,
        start: f64,
        end: f64,
        live: &[&dyn Interruption<D, S>],
    ) -> Result<S>;
}

/// Earliest fixed-time interruptions within `[start, end]`.
///
/// Interruptions scheduled at the same time fire together. Dynamic triggers
/// are left to the solver.
pub fn next_static_interruptions<D, S>(
    live: &[&dyn Interruption<D, S>],
    start: f64,
    end: f64,
) -> Result<(Vec<InterruptionId>, f64)> {
    let mut next = end;
    let mut fired = Vec::new();
    for interruption in live {
        let Trigger::At(time) = interruption.trigger() else {
            continue;
        };
        if time < start {
            return Err(SimulationError::StaleInterruption {
                label: interruption.label().to_string(),
                time,
                start,
            }
            .into());
        }
        if time > end {
            continue;
        }
        if time < next {
            next = time;
            fired.clear();
        }
        if time == next {
            fired.push(interruption.id());
        }
    }
    Ok((fired, next))
}

struct SolverEntry {
    id: u64,
    solver: Box<dyn Any>,
}

thread_local! {
    static SOLVER_STACK: RefCell<Vec<SolverEntry>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a default solver installed until dropped.
#[must_use = "the solver is uninstalled as soon as the scope is dropped"]
pub struct SolverScope {
    id: u64,
    label: String,
    _not_send: PhantomData<Rc<()>>,
}

impl SolverScope {
    pub fn enter<D: 'static, S: 'static>(solver: Rc<dyn Solver<D, S>>) -> Self {
        let id = NEXT_SOLVER_ID.fetch_add(1, Ordering::Relaxed);
        let label = solver.label().to_string();
        crate::trace!("solver.enter label={}", label);
        SOLVER_STACK.with(|stack| {
            stack.borrow_mut().push(SolverEntry {
                id,
                solver: Box::new(solver),
            })
        });
        Self {
            id,
            label,
            _not_send: PhantomData,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for SolverScope {
    fn drop(&mut self) {
        SOLVER_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            match stack.last() {
                Some(top) if top.id == self.id => {
                    stack.pop();
                }
                _ => {
                    crate::critical!("solver '{}' exited out of order", self.label);
                    stack.retain(|entry| entry.id != self.id);
                }
            }
        });
        crate::trace!("solver.exit label={}", self.label);
    }
}

/// Innermost installed solver for `(D, S)`.
pub fn get_solver<D: 'static, S: 'static>() -> Result<Rc<dyn Solver<D, S>>> {
    SOLVER_STACK.with(|stack| {
        stack
            .borrow()
            .iter()
            .rev()
            .find_map(|entry| entry.solver.downcast_ref::<Rc<dyn Solver<D, S>>>())
            .cloned()
            .ok_or_else(|| SimulationError::NoSolver.into())
    })
}
