use anyhow::{anyhow, Result};
use opencausal::dynamical::next_static_interruptions;
use opencausal::{
    DynamicInterruption, Interruption, SimulationError, StaticInterruption, Trigger,
};

use crate::common::Growth;

#[test]
fn earliest_static_time_wins() -> Result<()> {
    let early = StaticInterruption::<Growth, f64>::new("early", 2.0);
    let late = StaticInterruption::<Growth, f64>::new("late", 4.0);
    let live: Vec<&dyn Interruption<Growth, f64>> = vec![&late, &early];
    let (fired, time) = next_static_interruptions(&live, 0.0, 10.0)?;
    assert_eq!(fired, vec![early.id()]);
    assert_eq!(time, 2.0);
    Ok(())
}

#[test]
fn ties_fire_together() -> Result<()> {
    let a = StaticInterruption::<Growth, f64>::new("a", 3.0);
    let b = StaticInterruption::<Growth, f64>::new("b", 3.0);
    let live: Vec<&dyn Interruption<Growth, f64>> = vec![&a, &b];
    let (fired, time) = next_static_interruptions(&live, 0.0, 10.0)?;
    assert_eq!(fired, vec![a.id(), b.id()]);
    assert_eq!(time, 3.0);
    Ok(())
}

#[test]
fn nothing_in_span_returns_end() -> Result<()> {
    let later = StaticInterruption::<Growth, f64>::new("later", 12.0);
    let dynamic = DynamicInterruption::<Growth, f64>::new("cross", |_, state| *state);
    let live: Vec<&dyn Interruption<Growth, f64>> = vec![&later, &dynamic];
    let (fired, time) = next_static_interruptions(&live, 0.0, 10.0)?;
    assert!(fired.is_empty());
    assert_eq!(time, 10.0);
    Ok(())
}

#[test]
fn static_before_start_is_stale() -> Result<()> {
    let past = StaticInterruption::<Growth, f64>::new("past", 1.0);
    let live: Vec<&dyn Interruption<Growth, f64>> = vec![&past];
    let err = next_static_interruptions(&live, 2.0, 3.0)
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    assert!(matches!(
        err.downcast_ref::<SimulationError>(),
        Some(SimulationError::StaleInterruption { .. })
    ));
    Ok(())
}

#[test]
fn interruptions_report_their_trigger() -> Result<()> {
    let fixed = StaticInterruption::<Growth, f64>::new("fixed", 1.5);
    let dynamic = DynamicInterruption::<Growth, f64>::new("cross", |t, _| t - 2.0);
    assert_eq!(fixed.trigger(), Trigger::At(1.5));
    assert_eq!(dynamic.trigger(), Trigger::Dynamic);
    assert_eq!(fixed.event_fn(0.0, &0.0), None);
    assert_eq!(dynamic.event_fn(3.0, &0.0), Some(1.0));
    assert_ne!(fixed.id(), StaticInterruption::<Growth, f64>::new("fixed", 1.5).id());
    Ok(())
}

#[test]
fn static_without_effect_keeps_state() -> Result<()> {
    let mut fixed = StaticInterruption::<Growth, f64>::new("observe", 1.0);
    let (dynamics, state) = fixed.apply(Growth { rate: 2.0 }, 3.0)?;
    assert_eq!(dynamics, Growth { rate: 2.0 });
    assert_eq!(state, 3.0);
    Ok(())
}
