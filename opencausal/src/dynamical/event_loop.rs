use std::collections::HashSet;
use std::time::Instant;

use anyhow::Result;

use super::trace::{format_trace_timing, TraceEvent, TraceEventKind, TraceTiming};
use super::{apply_interruptions, get_solver, Interruption, InterruptionId, Solver};
use crate::error::SimulationError;

/// Simulates a hybrid system by integrating between interruptions.
///
/// Each step asks the solver for the next interruptions among those that
/// have not fired yet, integrates up to their time and then applies only
/// the interruptions that just fired. Every interruption fires at most once
/// per `simulate` call.
pub struct InterruptionEventLoop<D, S> {
    interruptions: Vec<Box<dyn Interruption<D, S>>>,
    trace_enabled: bool,
    timer_enabled: bool,
    trace: Vec<TraceEvent>,
}

impl<D, S> Default for InterruptionEventLoop<D, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, S> InterruptionEventLoop<D, S> {
    pub fn new() -> Self {
        Self {
            interruptions: Vec::new(),
            trace_enabled: false,
            timer_enabled: false,
            trace: Vec::new(),
        }
    }

    pub fn with_interruption(mut self, interruption: impl Interruption<D, S> + 'static) -> Self {
        self.push_interruption(interruption);
        self
    }

    pub fn push_interruption(&mut self, interruption: impl Interruption<D, S> + 'static) {
        self.interruptions.push(Box::new(interruption));
    }

    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    pub fn with_timer(mut self) -> Self {
        self.timer_enabled = true;
        self
    }

    pub fn interruptions(&self) -> &[Box<dyn Interruption<D, S>>] {
        &self.interruptions
    }

    /// Events recorded by the last `simulate` call.
    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    /// Run from `start` to `end` with the innermost installed solver.
    pub fn simulate(&mut self, dynamics: D, state: S, start: f64, end: f64) -> Result<S>
    where
        D: 'static,
        S: 'static,
    {
        let solver = get_solver::<D, S>()?;
        self.simulate_with(solver.as_ref(), dynamics, state, start, end)
    }

    pub fn simulate_with(
        &mut self,
        solver: &dyn Solver<D, S>,
        dynamics: D,
        state: S,
        start: f64,
        end: f64,
    ) -> Result<S> {
        self.trace.clear();
        let mut used: HashSet<InterruptionId> = HashSet::new();
        let mut dynamics = dynamics;
        let mut state = state;
        let mut current = start;
        let mut step = 0usize;

        while current < end {
            let live: Vec<&dyn Interruption<D, S>> = self
                .interruptions
                .iter()
                .filter(|interruption| !used.contains(&interruption.id()))
                .map(|interruption| interruption.as_ref())
                .collect();

            let clock = self.timer_enabled.then(Instant::now);
            let (mut fired, next) = solver
                .get_next_interruptions(&dynamics, &state, current, end, &live)
                .map_err(|err| {
                    crate::error!("solver '{}' failed to discover: {}", solver.label(), err);
                    err
                })?;
            let timing = clock.map(|clock| format_trace_timing(clock.elapsed()));
            fired.retain(|id| live.iter().any(|interruption| interruption.id() == *id));
            check_progress(current, next, end, fired.is_empty())?;

            let labels: Vec<String> = live
                .iter()
                .filter(|interruption| fired.contains(&interruption.id()))
                .map(|interruption| interruption.label().to_string())
                .collect();
            crate::trace!(
                "loop.discover step={} t={} next={} fired={:?}",
                step,
                current,
                next,
                labels
            );
            record(
                &mut self.trace,
                self.trace_enabled,
                TraceEventKind::Discover,
                step,
                (current, next),
                &labels,
                timing,
            );

            let clock = self.timer_enabled.then(Instant::now);
            state = solver
                .simulate_to_interruption(&dynamics, state, current, next, &live)
                .map_err(|err| {
                    crate::error!("solver '{}' failed to integrate: {}", solver.label(), err);
                    err
                })?;
            let timing = clock.map(|clock| format_trace_timing(clock.elapsed()));
            drop(live);
            crate::trace!("loop.integrate step={} t0={} t1={}", step, current, next);
            record(
                &mut self.trace,
                self.trace_enabled,
                TraceEventKind::Integrate,
                step,
                (current, next),
                &labels,
                timing,
            );
            current = next;

            if !fired.is_empty() {
                let fired: HashSet<InterruptionId> = fired.into_iter().collect();
                used.extend(fired.iter().copied());
                let clock = self.timer_enabled.then(Instant::now);
                (dynamics, state) =
                    apply_interruptions(dynamics, state, &mut self.interruptions, &fired)?;
                let timing = clock.map(|clock| format_trace_timing(clock.elapsed()));
                crate::trace!("loop.apply step={} t={} fired={:?}", step, current, labels);
                record(
                    &mut self.trace,
                    self.trace_enabled,
                    TraceEventKind::Apply,
                    step,
                    (current, current),
                    &labels,
                    timing,
                );
            }
            step += 1;
        }
        Ok(state)
    }
}

fn record(
    trace: &mut Vec<TraceEvent>,
    enabled: bool,
    kind: TraceEventKind,
    step: usize,
    span: (f64, f64),
    labels: &[String],
    timing: Option<TraceTiming>,
) {
    if enabled {
        trace.push(TraceEvent::new(kind, step, span, labels.to_vec(), timing));
    }
}

fn check_progress(current: f64, next: f64, end: f64, nothing_fired: bool) -> Result<()> {
    if next.is_nan() || next < current {
        return Err(SimulationError::TimeRegression { current, next }.into());
    }
    if next > end {
        return Err(SimulationError::OutOfSpan { next, end }.into());
    }
    if next == current && nothing_fired {
        return Err(SimulationError::NoProgress { time: current }.into());
    }
    Ok(())
}
