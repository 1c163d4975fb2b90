//! Hybrid simulation: continuous integration between discrete interruptions.
mod event_loop;
mod interruption;
mod solver;
mod trace;

pub use event_loop::InterruptionEventLoop;
pub use interruption::{
    apply_interruptions, DynamicInterruption, Effect, Interruption, InterruptionId,
    StaticInterruption, Trigger,
};
pub use solver::{get_solver, next_static_interruptions, Solver, SolverScope};
pub use trace::{TraceEvent, TraceEventKind, TraceSerialize};
